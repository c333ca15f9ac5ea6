use crate::amount::Amount;
use thiserror::Error;

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Broad category of a [`ScheduleError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A row's field combination does not fit where it appears in the table
    Structural,
    /// One of the schedule's arithmetic relationships does not hold
    Invariant,
    /// The table could not be read or a cell could not be interpreted
    Source,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    // ============================================================================================
    // Structural
    // ============================================================================================
    #[error("row {row} (pool '{pool}'): pool header appears before the grand total row")]
    PoolBeforeGrandTotal { row: usize, pool: String },

    #[error("row {row} (account '{account}'): account entry appears before any pool header")]
    AccountOutsidePool { row: usize, account: String },

    #[error("table has no grand total row")]
    MissingGrandTotal,

    // ============================================================================================
    // Arithmetic invariants
    // ============================================================================================
    #[error("row {row} (schedule total): total must equal subtotal, found total {total} and subtotal {subtotal}")]
    GrandTotalMismatch {
        row: usize,
        total: Amount,
        subtotal: Amount,
    },

    #[error("row {row} (pool '{pool}'): subtotals add up to {running}, more than the schedule total {total}")]
    PoolsExceedTotal {
        row: usize,
        pool: String,
        running: Amount,
        total: Amount,
    },

    #[error("row {row} (pool): previous pool '{pool}' accounts add up to {accumulated} (expected {expected})")]
    PoolTotalMismatch {
        row: usize,
        pool: String,
        accumulated: Amount,
        expected: Amount,
    },

    // ============================================================================================
    // Source
    // ============================================================================================
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {row}, column {column} ({field}): cannot read '{value}': {reason}")]
    InvalidCell {
        row: usize,
        column: String,
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid column layout: {0}")]
    InvalidLayout(String),
}

impl ScheduleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PoolBeforeGrandTotal { .. }
            | Self::AccountOutsidePool { .. }
            | Self::MissingGrandTotal => ErrorKind::Structural,

            Self::GrandTotalMismatch { .. }
            | Self::PoolsExceedTotal { .. }
            | Self::PoolTotalMismatch { .. } => ErrorKind::Invariant,

            Self::Csv(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidCell { .. }
            | Self::InvalidLayout(_) => ErrorKind::Source,
        }
    }

    /// Table row the error points at, when it points at one
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::PoolBeforeGrandTotal { row, .. }
            | Self::AccountOutsidePool { row, .. }
            | Self::GrandTotalMismatch { row, .. }
            | Self::PoolsExceedTotal { row, .. }
            | Self::PoolTotalMismatch { row, .. }
            | Self::InvalidCell { row, .. } => Some(*row),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_message_keeps_exact_digits() {
        let err = ScheduleError::PoolTotalMismatch {
            row: 9,
            pool: "Team".to_string(),
            accumulated: "123456789012345678901".parse().unwrap(),
            expected: "123456789012345678900".parse().unwrap(),
        };

        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert_eq!(err.row(), Some(9));
        assert_eq!(
            err.to_string(),
            "row 9 (pool): previous pool 'Team' accounts add up to 123456789012345678901 (expected 123456789012345678900)"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ScheduleError::MissingGrandTotal.kind(), ErrorKind::Structural);
        assert_eq!(ScheduleError::MissingGrandTotal.row(), None);
        assert_eq!(
            ScheduleError::InvalidLayout("bad".to_string()).kind(),
            ErrorKind::Source
        );
    }
}
