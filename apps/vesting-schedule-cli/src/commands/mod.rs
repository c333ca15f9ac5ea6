pub mod check;
pub mod convert;
pub mod summarize;

use vesting_schedule::{ScheduleSummary, SkippedRow};

pub(crate) fn print_summary(summary: &ScheduleSummary) {
    println!("Grand total: {}", summary.total);
    println!("Pools: {}", summary.pool_count);
    println!("Accounts: {}", summary.account_count);
    println!("Allocated to accounts: {}", summary.allocated);
    match &summary.unallocated {
        Some(unallocated) => println!("Unallocated: {}", unallocated),
        None => println!("Unallocated: none (accounts exceed the grand total)"),
    }
}

pub(crate) fn print_skipped(skipped_rows: &[SkippedRow]) {
    if skipped_rows.is_empty() {
        return;
    }
    println!("Skipped {} unrecognized row(s):", skipped_rows.len());
    for skipped in skipped_rows {
        let fields: Vec<_> = skipped.fields.iter().map(|f| f.as_str()).collect();
        println!("  row {}: {}", skipped.row, fields.join(", "));
    }
}
