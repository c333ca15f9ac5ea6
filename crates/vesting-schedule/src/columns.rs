/*!
# Column Layout

Maps a row's raw cells to a [`FieldRecord`]. Which spreadsheet column holds which
field is described by a [`ColumnLayout`]; the default matches the standard
vesting table:

| Column | Field              |
|--------|--------------------|
| A      | `total`            |
| B      | `subtotal`         |
| C      | `percent_of_total` |
| D      | `pool`             |
| E      | `name`             |
| F      | `amount`           |
| G      | `address`          |
| H      | `start_at`         |
| I      | `interval`         |
| J      | `duration`         |
| K      | `cliff`            |
| L      | `portion_size`     |
| M      | `remainder`        |

Blank cells become absent fields. A cell that is present but cannot be read as
its field's type is an error rather than an absent field.
*/

use crate::{
    amount::Amount,
    errors::{ScheduleError, ScheduleResult},
    schemas::{Field, FieldRecord},
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::str::FromStr;

/// Turns one row's raw cells into named fields
pub trait FieldClassifier {
    fn classify(&self, row: usize, cells: &[Option<String>]) -> ScheduleResult<FieldRecord>;
}

/// Which column holds which field
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    columns: Vec<(usize, Field)>,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            columns: Field::ALL.iter().copied().enumerate().collect(),
        }
    }
}

impl ColumnLayout {
    /// Build a layout from `(column letter, field)` pairs
    pub fn new<'a, I>(entries: I) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = (&'a str, Field)>,
    {
        let mut columns = Vec::new();
        let mut seen_columns = HashSet::new();
        let mut seen_fields = HashSet::new();

        for (letter, field) in entries {
            let column = column_index(letter)?;
            if !seen_columns.insert(column) {
                return Err(ScheduleError::InvalidLayout(format!(
                    "column {} is mapped more than once",
                    letter
                )));
            }
            if !seen_fields.insert(field) {
                return Err(ScheduleError::InvalidLayout(format!(
                    "field '{}' is mapped to more than one column",
                    field
                )));
            }
            columns.push((column, field));
        }

        if columns.is_empty() {
            return Err(ScheduleError::InvalidLayout(
                "layout maps no columns".to_string(),
            ));
        }

        columns.sort_by_key(|(column, _)| *column);
        Ok(Self { columns })
    }

    /// Column holding `field`, as a letter
    pub fn column_of(&self, field: Field) -> Option<String> {
        self.columns
            .iter()
            .find(|(_, f)| *f == field)
            .map(|(column, _)| column_letter(*column))
    }

    /// Number of columns a row needs to cover every mapped field
    pub fn width(&self) -> usize {
        self.columns
            .iter()
            .map(|(column, _)| column + 1)
            .max()
            .unwrap_or(0)
    }
}

impl FieldClassifier for ColumnLayout {
    fn classify(&self, row: usize, cells: &[Option<String>]) -> ScheduleResult<FieldRecord> {
        let mut record = FieldRecord::default();

        for &(column, field) in &self.columns {
            let Some(text) = cells
                .get(column)
                .and_then(|cell| cell.as_deref())
                .map(str::trim)
                .filter(|text| !text.is_empty())
            else {
                continue;
            };

            let invalid = |reason: String| ScheduleError::InvalidCell {
                row,
                column: column_letter(column),
                field: field.to_string(),
                value: text.to_string(),
                reason,
            };

            let amount = || Amount::parse_cell(text).map_err(|e| invalid(e.to_string()));
            let seconds = || parse_seconds(text).map_err(&invalid);

            match field {
                Field::Total => record.total = Some(amount()?),
                Field::Subtotal => record.subtotal = Some(amount()?),
                Field::Amount => record.amount = Some(amount()?),
                Field::Cliff => record.cliff = Some(amount()?),
                Field::PortionSize => record.portion_size = Some(amount()?),
                Field::Remainder => record.remainder = Some(amount()?),
                Field::PercentOfTotal => {
                    record.percent_of_total = Some(parse_percent(text).map_err(&invalid)?)
                }
                Field::StartAt => record.start_at = Some(seconds()?),
                Field::Interval => record.interval = Some(seconds()?),
                Field::Duration => record.duration = Some(seconds()?),
                Field::Pool => record.pool = Some(text.to_string()),
                Field::Name => record.name = Some(text.to_string()),
                Field::Address => record.address = Some(text.to_string()),
            }
        }

        Ok(record)
    }
}

fn parse_percent(text: &str) -> Result<Decimal, String> {
    let number = text.strip_suffix('%').unwrap_or(text).trim();
    Decimal::from_str(number).map_err(|e| e.to_string())
}

/// Same digit rules as [`Amount::parse_cell`], bounded to `u64`
fn parse_seconds(text: &str) -> Result<u64, String> {
    let digits: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("expected whole seconds, found '{}'", text));
    }
    digits
        .parse::<u64>()
        .map_err(|e| format!("expected whole seconds: {}", e))
}

/// `A` → 0, `Z` → 25, `AA` → 26
pub fn column_index(letter: &str) -> ScheduleResult<usize> {
    let letter = letter.trim();
    if letter.is_empty() || !letter.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ScheduleError::InvalidLayout(format!(
            "'{}' is not a column letter",
            letter
        )));
    }

    let number = letter
        .chars()
        .try_fold(0usize, |acc, c| {
            let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
            acc.checked_mul(26)?.checked_add(digit)
        })
        .ok_or_else(|| {
            ScheduleError::InvalidLayout(format!("column {} is out of range", letter))
        })?;

    Ok(number - 1)
}

/// 0 → `A`, 25 → `Z`, 26 → `AA`
pub fn column_letter(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use rust_decimal::prelude::dec;

    fn cells(values: &[&str]) -> Vec<Option<String>> {
        values
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect()
    }

    #[test]
    fn test_column_letters() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("z").unwrap(), 25);
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index("AZ").unwrap(), 51);
        assert!(column_index("").is_err());
        assert!(column_index("A1").is_err());

        for index in [0, 1, 25, 26, 51, 52, 701, 702] {
            assert_eq!(column_index(&column_letter(index)).unwrap(), index);
        }
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_default_layout() {
        let layout = ColumnLayout::default();
        assert_eq!(layout.width(), 13);
        assert_eq!(layout.column_of(Field::Total).as_deref(), Some("A"));
        assert_eq!(layout.column_of(Field::Remainder).as_deref(), Some("M"));
    }

    #[test]
    fn test_classify_pool_header() {
        let layout = ColumnLayout::default();
        let record = layout
            .classify(6, &cells(&["", "600", "60%", "Team"]))
            .unwrap();

        assert_eq!(
            record,
            FieldRecord {
                subtotal: Some(Amount::from(600u64)),
                percent_of_total: Some(dec!(60)),
                pool: Some("Team".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_classify_account_entry() {
        let layout = ColumnLayout::default();
        let record = layout
            .classify(
                7,
                &cells(&[
                    "", "", "2.5", "", " Alice ", "1,000", "secret1alice", "0", "86400",
                    "31,536,000", "0", "100", "",
                ]),
            )
            .unwrap();

        assert_eq!(record.name.as_deref(), Some("Alice"));
        assert_eq!(record.amount, Some(Amount::from(1000u64)));
        assert_eq!(record.percent_of_total, Some(dec!(2.5)));
        assert_eq!(record.start_at, Some(0));
        assert_eq!(record.interval, Some(86_400));
        assert_eq!(record.duration, Some(31_536_000));
        assert_eq!(record.cliff, Some(Amount::zero()));
        assert_eq!(record.portion_size, Some(Amount::from(100u64)));
        assert_eq!(record.remainder, None);
    }

    #[test]
    fn test_blank_and_short_rows() {
        let layout = ColumnLayout::default();
        assert!(layout.classify(1, &[]).unwrap().is_empty());
        assert!(layout
            .classify(1, &cells(&["  ", "", "\t"]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_cell() {
        let layout = ColumnLayout::default();
        let err = layout
            .classify(12, &cells(&["", "", "", "", "Alice", "12.5"]))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Source);
        match err {
            ScheduleError::InvalidCell {
                row,
                column,
                field,
                value,
                ..
            } => {
                assert_eq!(row, 12);
                assert_eq!(column, "F");
                assert_eq!(field, "amount");
                assert_eq!(value, "12.5");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_seconds_follow_amount_cell_rules() {
        assert_eq!(parse_seconds("86 400"), Ok(86_400));
        assert_eq!(parse_seconds("31,536,000"), Ok(31_536_000));
        assert_eq!(parse_seconds("3_600"), Ok(3_600));
        assert!(parse_seconds("+60").is_err());
        assert!(parse_seconds("-60").is_err());
        assert!(parse_seconds("1.5").is_err());
        assert!(parse_seconds("99999999999999999999").is_err());

        for text in ["86 400", "+60", "1.5"] {
            assert_eq!(
                parse_seconds(text).is_ok(),
                Amount::parse_cell(text).is_ok(),
                "{text}"
            );
        }
    }

    #[test]
    fn test_custom_layout() {
        let layout = ColumnLayout::new([("C", Field::Name), ("B", Field::Amount)]).unwrap();
        assert_eq!(layout.width(), 3);

        let record = layout.classify(1, &cells(&["ignored", "5", "Bob"])).unwrap();
        assert_eq!(record.name.as_deref(), Some("Bob"));
        assert_eq!(record.amount, Some(Amount::from(5u64)));
        assert_eq!(record.present_fields(), vec![Field::Name, Field::Amount]);
    }

    #[test]
    fn test_layout_rejects_duplicates() {
        assert!(ColumnLayout::new([("A", Field::Name), ("A", Field::Amount)]).is_err());
        assert!(ColumnLayout::new([("A", Field::Name), ("B", Field::Name)]).is_err());
        assert!(ColumnLayout::new(Vec::<(&str, Field)>::new()).is_err());
    }
}
