use crate::commands::print_summary;
use crate::error::CliResult;
use std::path::PathBuf;
use vesting_schedule::read_schedule_json;

pub fn execute(schedule_json_in: PathBuf, json: bool) -> CliResult<()> {
    let schedule = read_schedule_json(&schedule_json_in)?;
    let summary = schedule.summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Schedule: {}", schedule_json_in.display());
    print_summary(&summary);
    for pool in &schedule.pools {
        println!(
            "  {}: {} across {} account(s)",
            pool.name,
            pool.total,
            pool.accounts.len()
        );
    }

    Ok(())
}
