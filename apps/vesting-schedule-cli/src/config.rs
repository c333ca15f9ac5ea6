use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use vesting_schedule::{ColumnLayout, Field, ReaderConfig, DEFAULT_HEADER_HEIGHT};

/// Conversion configuration file structure
///
/// ```yaml
/// header_height: 4
/// columns:
///   A: total
///   B: subtotal
///   C: percent_of_total
///   D: pool
///   E: name
///   F: amount
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConversionConfig {
    /// Rows above the grand total row
    pub header_height: Option<usize>,

    /// Column letter → field name. Replaces the default layout entirely when given.
    pub columns: Option<BTreeMap<String, Field>>,
}

impl ConversionConfig {
    pub fn load(path: &Path) -> CliResult<Self> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(file)?)
    }

    /// Load `path` if given, otherwise start from defaults
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        path.map(Self::load).transpose().map(Option::unwrap_or_default)
    }

    /// Resolve into a reader configuration, `header_height` taking precedence over the file
    pub fn into_reader_config(self, header_height: Option<usize>) -> CliResult<ReaderConfig> {
        let layout = match self.columns {
            Some(columns) => ColumnLayout::new(
                columns
                    .iter()
                    .map(|(letter, field)| (letter.as_str(), *field)),
            )
            .map_err(|e| CliError::InvalidConfig(e.to_string()))?,
            None => ColumnLayout::default(),
        };

        Ok(ReaderConfig {
            header_height: header_height
                .or(self.header_height)
                .unwrap_or(DEFAULT_HEADER_HEIGHT),
            layout,
        })
    }
}
