use crate::config::ConversionConfig;
use crate::error::CliResult;
use std::path::PathBuf;
use tracing::{info, warn};
use vesting_schedule::{read_schedule_csv, to_json, write_schedule_json};

pub fn execute(
    table_csv_in: PathBuf,
    schedule_json_out: Option<PathBuf>,
    config_path: Option<PathBuf>,
    header_height: Option<usize>,
) -> CliResult<()> {
    let config = ConversionConfig::load_or_default(config_path.as_deref())?
        .into_reader_config(header_height)?;

    let report = read_schedule_csv(&table_csv_in, &config)?;

    for skipped in &report.skipped_rows {
        warn!(row = skipped.row, "skipped unrecognized row");
    }
    if let Some(unbalanced) = report.unbalanced_last_pool() {
        warn!(
            pool = %unbalanced.pool,
            accumulated = %unbalanced.accumulated,
            expected = %unbalanced.expected,
            "last pool's accounts do not add up to its subtotal"
        );
    }

    match schedule_json_out {
        Some(path) => {
            write_schedule_json(&path, &report.schedule)?;
            info!(path = %path.display(), "schedule written");
        }
        None => println!("{}", to_json(&report.schedule)?),
    }

    Ok(())
}
