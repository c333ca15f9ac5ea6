use thiserror::Error;
use vesting_schedule::ScheduleError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Check failed: {0}")]
    CheckFailed(String),
}
