/*!
# Schedule Builder

Walks classified table rows in order and assembles a [`Schedule`], checking the
arithmetic as it goes:

- **Grand total**: the header row's `total` must equal its `subtotal`.
- **Pool bound**: the running sum of pool subtotals never exceeds the grand total.
  Checked as each pool header is read.
- **Pool balance**: a pool's account amounts add up to its subtotal. Checked when
  the *next* pool header is read, so the last pool in a table is only balanced
  if something follows it. [`BuildReport::unbalanced_last_pool`] reports it
  without failing the build.

The first violation aborts the build.
*/

use crate::{
    amount::Amount,
    errors::{ScheduleError, ScheduleResult},
    schemas::{Account, Field, FieldRecord, Pool, Schedule},
};
use tracing::{debug, info, warn};

/// What a row is, judged only by which fields it carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    GrandTotal,
    PoolHeader,
    AccountEntry,
    Unrecognized,
}

impl RowKind {
    pub fn classify(record: &FieldRecord) -> RowKind {
        ClassifiedRow::from_record(record).kind()
    }
}

/// A row's kind together with the fields that make it that kind
enum ClassifiedRow<'a> {
    GrandTotal {
        total: &'a Amount,
        subtotal: &'a Amount,
    },
    PoolHeader {
        name: &'a str,
        subtotal: &'a Amount,
    },
    AccountEntry {
        name: &'a str,
        amount: &'a Amount,
    },
    Unrecognized,
}

impl<'a> ClassifiedRow<'a> {
    fn from_record(record: &'a FieldRecord) -> Self {
        match record {
            FieldRecord {
                total: Some(total),
                subtotal: Some(subtotal),
                ..
            } => ClassifiedRow::GrandTotal { total, subtotal },
            FieldRecord {
                pool: Some(name),
                subtotal: Some(subtotal),
                percent_of_total: Some(_),
                ..
            } => ClassifiedRow::PoolHeader { name, subtotal },
            FieldRecord {
                name: Some(name),
                amount: Some(amount),
                percent_of_total: Some(_),
                ..
            } => ClassifiedRow::AccountEntry { name, amount },
            _ => ClassifiedRow::Unrecognized,
        }
    }

    fn kind(&self) -> RowKind {
        match self {
            ClassifiedRow::GrandTotal { .. } => RowKind::GrandTotal,
            ClassifiedRow::PoolHeader { .. } => RowKind::PoolHeader,
            ClassifiedRow::AccountEntry { .. } => RowKind::AccountEntry,
            ClassifiedRow::Unrecognized => RowKind::Unrecognized,
        }
    }
}

/// Where the builder is between rows
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BuilderState {
    /// No pool header seen since the grand total
    #[default]
    Empty,
    /// Accounts go into `pools[pool_index]`
    InPool {
        pool_index: usize,
        running_account_total: Amount,
    },
}

/// A non-empty row that matched no known shape
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub row: usize,
    pub fields: Vec<Field>,
}

/// Last pool of a schedule whose accounts do not add up to its subtotal
#[derive(Debug, Clone, PartialEq)]
pub struct UnbalancedPool {
    pub pool: String,
    pub accumulated: Amount,
    pub expected: Amount,
}

/// Successful build: the schedule plus diagnostics
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub schedule: Schedule,
    pub skipped_rows: Vec<SkippedRow>,
}

impl BuildReport {
    pub fn unbalanced_last_pool(&self) -> Option<UnbalancedPool> {
        let pool = self.schedule.pools.last()?;
        let accumulated = pool.allocated();
        (accumulated != pool.total).then(|| UnbalancedPool {
            pool: pool.name.clone(),
            accumulated,
            expected: pool.total.clone(),
        })
    }
}

#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    schedule: Option<Schedule>,
    running_pool_total: Amount,
    state: BuilderState,
    skipped_rows: Vec<SkippedRow>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Apply one table row
    ///
    /// `row` is the row's index in table coordinates and only used for reporting.
    /// After an error the builder must be discarded.
    pub fn push(&mut self, row: usize, record: &FieldRecord) -> ScheduleResult<RowKind> {
        let classified = ClassifiedRow::from_record(record);
        let kind = classified.kind();
        debug!(row, ?kind, "classified row");

        match classified {
            ClassifiedRow::GrandTotal { total, subtotal } => {
                self.grand_total(row, total, subtotal)?
            }
            ClassifiedRow::PoolHeader { name, subtotal } => {
                self.pool_header(row, name, subtotal)?
            }
            ClassifiedRow::AccountEntry { name, amount } => {
                self.account_entry(row, name, amount, record)?
            }
            ClassifiedRow::Unrecognized => {
                if !record.is_empty() {
                    let fields = record.present_fields();
                    debug!(row, ?fields, "skipping unrecognized row");
                    self.skipped_rows.push(SkippedRow { row, fields });
                }
            }
        }

        Ok(kind)
    }

    pub fn finish(self) -> ScheduleResult<BuildReport> {
        let schedule = self.schedule.ok_or(ScheduleError::MissingGrandTotal)?;
        info!(
            total = %schedule.total,
            pools = schedule.pools.len(),
            skipped = self.skipped_rows.len(),
            "schedule built"
        );
        Ok(BuildReport {
            schedule,
            skipped_rows: self.skipped_rows,
        })
    }

    fn grand_total(
        &mut self,
        row: usize,
        total: &Amount,
        subtotal: &Amount,
    ) -> ScheduleResult<()> {
        if total != subtotal {
            return Err(ScheduleError::GrandTotalMismatch {
                row,
                total: total.clone(),
                subtotal: subtotal.clone(),
            });
        }

        if self.schedule.is_some() {
            warn!(row, "another grand total row, restarting the schedule");
        }

        self.schedule = Some(Schedule {
            total: total.clone(),
            pools: Vec::new(),
        });
        self.running_pool_total = Amount::zero();
        self.state = BuilderState::Empty;
        Ok(())
    }

    fn pool_header(&mut self, row: usize, name: &str, subtotal: &Amount) -> ScheduleResult<()> {
        let Some(schedule) = self.schedule.as_mut() else {
            return Err(ScheduleError::PoolBeforeGrandTotal {
                row,
                pool: name.to_string(),
            });
        };

        let running = &self.running_pool_total + subtotal;
        if running > schedule.total {
            return Err(ScheduleError::PoolsExceedTotal {
                row,
                pool: name.to_string(),
                running,
                total: schedule.total.clone(),
            });
        }

        if let BuilderState::InPool {
            pool_index,
            running_account_total,
        } = &self.state
        {
            let previous = &schedule.pools[*pool_index];
            if *running_account_total != previous.total {
                return Err(ScheduleError::PoolTotalMismatch {
                    row,
                    pool: previous.name.clone(),
                    accumulated: running_account_total.clone(),
                    expected: previous.total.clone(),
                });
            }
        }

        schedule.pools.push(Pool {
            name: name.to_string(),
            total: subtotal.clone(),
            partial: false,
            accounts: Vec::new(),
        });
        self.running_pool_total = running;
        self.state = BuilderState::InPool {
            pool_index: schedule.pools.len() - 1,
            running_account_total: Amount::zero(),
        };
        Ok(())
    }

    fn account_entry(
        &mut self,
        row: usize,
        name: &str,
        amount: &Amount,
        record: &FieldRecord,
    ) -> ScheduleResult<()> {
        let (
            Some(schedule),
            BuilderState::InPool {
                pool_index,
                running_account_total,
            },
        ) = (self.schedule.as_mut(), &mut self.state)
        else {
            return Err(ScheduleError::AccountOutsidePool {
                row,
                account: name.to_string(),
            });
        };

        *running_account_total += amount;
        schedule.pools[*pool_index].accounts.push(Account {
            name: name.to_string(),
            amount: amount.clone(),
            address: record.address.clone(),
            start_at: record.start_at,
            interval: record.interval,
            duration: record.duration,
            cliff: record.cliff.clone(),
            portion_size: record.portion_size.clone(),
            remainder: record.remainder.clone(),
        });
        Ok(())
    }
}

/// Build a schedule from `(row, record)` pairs in table order
pub fn build_schedule<I>(rows: I) -> ScheduleResult<BuildReport>
where
    I: IntoIterator<Item = (usize, FieldRecord)>,
{
    let mut builder = ScheduleBuilder::new();
    for (row, record) in rows {
        builder.push(row, &record)?;
    }
    builder.finish()
}

// ================================================================================================
// Tests
// ================================================================================================
