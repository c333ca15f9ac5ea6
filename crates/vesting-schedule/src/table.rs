/*!
# Table Reading

Feeds a tabular vesting schedule through the [`ScheduleBuilder`] one row at a
time. The table itself comes from a [`RowSource`]; [`CsvSheet`] reads a sheet
exported as CSV.

Rows are numbered the way a spreadsheet numbers them (first row is 1). The top
`header_height` rows of the table are titles and column headings and are never
classified; the first row after them is the grand total row.
*/

use crate::{
    builder::{BuildReport, ScheduleBuilder},
    columns::{ColumnLayout, FieldClassifier},
    errors::ScheduleResult,
};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Rows above the grand total row in the standard vesting table
pub const DEFAULT_HEADER_HEIGHT: usize = 4;

/// Inclusive range of row numbers a table occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableExtent {
    pub first_row: usize,
    pub last_row: usize,
}

/// Anything that can hand out a table's rows as raw cells
pub trait RowSource {
    fn extent(&self) -> TableExtent;

    /// Cells of row `index`, `None` for a blank cell. Rows outside the extent are empty.
    fn row(&self, index: usize) -> ScheduleResult<Vec<Option<String>>>;
}

/// Sheet exported as CSV, without a header record
#[derive(Debug, Clone, Default)]
pub struct CsvSheet {
    rows: Vec<Vec<Option<String>>>,
}

impl CsvSheet {
    pub fn open<P: AsRef<Path>>(path: P) -> ScheduleResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> ScheduleResult<Self> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        for result in rdr.records() {
            let record = result?;

            // Empty lines produce no record; keep row n at sheet row n
            if let Some(line) = record.position().map(|pos| pos.line() as usize) {
                if line > rows.len() + 1 {
                    rows.resize(line - 1, Vec::new());
                }
            }

            rows.push(
                record
                    .iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect(),
            );
        }

        Ok(Self { rows })
    }
}

impl RowSource for CsvSheet {
    fn extent(&self) -> TableExtent {
        TableExtent {
            first_row: 1,
            last_row: self.rows.len(),
        }
    }

    fn row(&self, index: usize) -> ScheduleResult<Vec<Option<String>>> {
        Ok(index
            .checked_sub(1)
            .and_then(|i| self.rows.get(i))
            .cloned()
            .unwrap_or_default())
    }
}

/// How to read a vesting table
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Rows skipped at the top of the table before the grand total row
    pub header_height: usize,
    pub layout: ColumnLayout,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            header_height: DEFAULT_HEADER_HEIGHT,
            layout: ColumnLayout::default(),
        }
    }
}

/// Classify and build every data row of `source`, one row at a time
pub fn build_from_table<S, C>(
    source: &S,
    classifier: &C,
    header_height: usize,
) -> ScheduleResult<BuildReport>
where
    S: RowSource + ?Sized,
    C: FieldClassifier + ?Sized,
{
    let TableExtent {
        first_row,
        last_row,
    } = source.extent();
    let mut builder = ScheduleBuilder::new();

    for row in first_row.saturating_add(header_height)..=last_row {
        let cells = source.row(row)?;
        let record = classifier.classify(row, &cells)?;
        builder.push(row, &record)?;
    }

    builder.finish()
}

/// Read, classify and build a schedule from a CSV export of the vesting table
pub fn read_schedule_csv<P: AsRef<Path>>(
    path: P,
    config: &ReaderConfig,
) -> ScheduleResult<BuildReport> {
    let path = path.as_ref();
    let sheet = CsvSheet::open(path)?;
    info!(
        path = %path.display(),
        rows = sheet.extent().last_row,
        header_height = config.header_height,
        "reading vesting table"
    );
    build_from_table(&sheet, &config.layout, config.header_height)
}

// ================================================================================================
// Tests
// ================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{amount::Amount, errors::ScheduleError, schemas::Field};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TABLE: &str = "\
Vesting schedule,,,,,
,,,,,
Total,Subtotal,%,Pool,Name,Amount
,,,,,
1000,1000,100,,,
,600,60,Team,,
,,30,,Alice,300
,,30,,Bob,300
,400,40,Advisors,,
,,40,,Carol,400
";

    #[test]
    fn test_csv_sheet_rows() {
        let sheet = CsvSheet::from_reader(TABLE.as_bytes()).unwrap();
        assert_eq!(
            sheet.extent(),
            TableExtent {
                first_row: 1,
                last_row: 10
            }
        );

        let row = sheet.row(6).unwrap();
        assert_eq!(row[1].as_deref(), Some("600"));
        assert_eq!(row[3].as_deref(), Some("Team"));
        assert_eq!(row[4], None);

        assert!(sheet.row(0).unwrap().is_empty());
        assert!(sheet.row(11).unwrap().is_empty());
    }

    #[test]
    fn test_build_from_table() {
        let sheet = CsvSheet::from_reader(TABLE.as_bytes()).unwrap();
        let report = build_from_table(&sheet, &ColumnLayout::default(), 4).unwrap();

        let schedule = report.schedule;
        assert_eq!(schedule.total, Amount::from(1000u64));
        assert_eq!(schedule.pools.len(), 2);
        assert_eq!(schedule.pools[0].name, "Team");
        assert_eq!(schedule.pools[1].accounts[0].name, "Carol");
        assert!(report.skipped_rows.is_empty());
    }

    #[test]
    fn test_header_rows_are_not_classified() {
        // The column heading row would fail to parse if it were classified
        let sheet = CsvSheet::from_reader(TABLE.as_bytes()).unwrap();
        let err = build_from_table(&sheet, &ColumnLayout::default(), 2).unwrap_err();
        match err {
            ScheduleError::InvalidCell { row, field, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, Field::Total.to_string());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_errors_use_sheet_rows() {
        let table = TABLE.replace(",,30,,Bob,300", ",,30,,Bob,250");
        let sheet = CsvSheet::from_reader(table.as_bytes()).unwrap();
        let err = build_from_table(&sheet, &ColumnLayout::default(), 4).unwrap_err();
        assert_eq!(err.row(), Some(9));
    }

    #[test]
    fn test_read_schedule_csv() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TABLE.as_bytes()).unwrap();

        let report = read_schedule_csv(file.path(), &ReaderConfig::default()).unwrap();
        assert_eq!(report.schedule.summary().account_count, 3);
    }

    #[test]
    fn test_empty_lines_keep_sheet_rows() {
        let table = "Title\n\nheadings\n\n1000,1000,100\n,600,60,Team\n\n,,30,,Alice,300\n";
        let sheet = CsvSheet::from_reader(table.as_bytes()).unwrap();
        assert_eq!(
            sheet.extent(),
            TableExtent {
                first_row: 1,
                last_row: 8
            }
        );
        assert!(sheet.row(2).unwrap().is_empty());
        assert_eq!(sheet.row(5).unwrap()[0].as_deref(), Some("1000"));
        assert_eq!(sheet.row(8).unwrap()[4].as_deref(), Some("Alice"));

        let report = build_from_table(&sheet, &ColumnLayout::default(), 4).unwrap();
        assert_eq!(report.schedule.total, Amount::from(1000u64));
        assert_eq!(report.schedule.pools[0].accounts[0].name, "Alice");
        assert!(report.skipped_rows.is_empty());
    }

    #[test]
    fn test_errors_after_empty_line_use_sheet_rows() {
        let table = "Title\n\nheadings\n\n1000,1000,100\n\n,,30,,Alice,300\n";
        let sheet = CsvSheet::from_reader(table.as_bytes()).unwrap();
        let err = build_from_table(&sheet, &ColumnLayout::default(), 4).unwrap_err();
        assert!(matches!(err, ScheduleError::AccountOutsidePool { row: 7, .. }));
    }

    #[test]
    fn test_empty_table() {
        let sheet = CsvSheet::from_reader("".as_bytes()).unwrap();
        let err = build_from_table(&sheet, &ColumnLayout::default(), 4).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingGrandTotal));
    }
}
