use crate::commands::{print_skipped, print_summary};
use crate::config::ConversionConfig;
use crate::error::{CliError, CliResult};
use std::path::PathBuf;
use vesting_schedule::read_schedule_csv;

pub fn execute(
    table_csv_in: PathBuf,
    config_path: Option<PathBuf>,
    header_height: Option<usize>,
    strict: bool,
    json: bool,
) -> CliResult<()> {
    let config = ConversionConfig::load_or_default(config_path.as_deref())?
        .into_reader_config(header_height)?;

    let report = read_schedule_csv(&table_csv_in, &config)?;
    let summary = report.schedule.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Table: {}", table_csv_in.display());
        print_summary(&summary);
        print_skipped(&report.skipped_rows);
    }

    if let Some(unbalanced) = report.unbalanced_last_pool() {
        let message = format!(
            "last pool '{}' accounts add up to {} (expected {})",
            unbalanced.pool, unbalanced.accumulated, unbalanced.expected
        );
        if strict {
            return Err(CliError::CheckFailed(message));
        }
        eprintln!("warning: {}", message);
    }

    Ok(())
}
