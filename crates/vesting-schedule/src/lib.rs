/*!
# Vesting Schedule

Turns a human-authored vesting table (a spreadsheet splitting a token supply
across pools and accounts) into a validated, hierarchical [`Schedule`] ready to
configure a vesting contract.

## Table Shape

After a fixed block of heading rows, every row is one of:

- **Grand total**: carries `total` and `subtotal`, which must be equal
- **Pool header**: carries `pool`, `subtotal` and `percent_of_total`
- **Account entry**: carries `name`, `amount` and `percent_of_total`, and belongs
  to the pool header above it
- **Anything else**: skipped and reported as a diagnostic

The build is a single pass that stops at the first arithmetic or structural
problem. All amounts are arbitrary-precision integers.

## Usage

```rust,no_run
use vesting_schedule::{read_schedule_csv, to_json, ReaderConfig, ScheduleResult};

fn example() -> ScheduleResult<()> {
    let report = read_schedule_csv("schedule.csv", &ReaderConfig::default())?;

    for skipped in &report.skipped_rows {
        eprintln!("skipped row {}", skipped.row);
    }

    println!("{}", to_json(&report.schedule)?);
    Ok(())
}
```
*/

pub mod amount;
pub mod builder;
pub mod columns;
pub mod errors;
pub mod schemas;
pub mod serializer;
pub mod table;

// Re-export main types for convenience
pub use amount::{Amount, ParseAmountError};
pub use builder::{
    build_schedule, BuildReport, BuilderState, RowKind, ScheduleBuilder, SkippedRow,
    UnbalancedPool,
};
pub use columns::{ColumnLayout, FieldClassifier};
pub use errors::{ErrorKind, ScheduleError, ScheduleResult};
pub use schemas::{Account, Field, FieldRecord, Pool, Schedule, ScheduleSummary};
pub use serializer::{from_json, read_schedule_json, to_json, write_schedule_json};
pub use table::{
    build_from_table, read_schedule_csv, CsvSheet, ReaderConfig, RowSource, TableExtent,
    DEFAULT_HEADER_HEIGHT,
};
