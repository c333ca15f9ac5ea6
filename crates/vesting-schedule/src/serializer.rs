/*!
# Canonical Serialization

A schedule is written as pretty-printed JSON. Keys follow the field order of
[`Schedule`], [`Pool`](crate::Pool) and [`Account`](crate::Account), and every
amount is a decimal string, so values beyond the range a JSON number can carry
exactly survive any JSON parser.
*/

use crate::{errors::ScheduleResult, schemas::Schedule};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn to_json(schedule: &Schedule) -> ScheduleResult<String> {
    Ok(serde_json::to_string_pretty(schedule)?)
}

pub fn from_json(json: &str) -> ScheduleResult<Schedule> {
    Ok(serde_json::from_str(json)?)
}

pub fn write_schedule_json<P: AsRef<Path>>(path: P, schedule: &Schedule) -> ScheduleResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, schedule)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn read_schedule_json<P: AsRef<Path>>(path: P) -> ScheduleResult<Schedule> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{amount::Amount, schemas::Account, schemas::Pool};
    use tempfile::NamedTempFile;

    fn schedule() -> Schedule {
        Schedule {
            total: "123456789012345678901".parse().unwrap(),
            pools: vec![Pool {
                name: "Investors".to_string(),
                total: "123456789012345678901".parse().unwrap(),
                partial: false,
                accounts: vec![Account {
                    name: "Fund".to_string(),
                    amount: "123456789012345678901".parse().unwrap(),
                    address: Some("secret1fund".to_string()),
                    start_at: Some(0),
                    interval: Some(86_400),
                    duration: None,
                    cliff: Some(Amount::zero()),
                    portion_size: None,
                    remainder: None,
                }],
            }],
        }
    }

    #[test]
    fn test_canonical_layout() {
        let json = to_json(&schedule()).unwrap();
        let expected = r#"{
  "total": "123456789012345678901",
  "pools": [
    {
      "name": "Investors",
      "total": "123456789012345678901",
      "partial": false,
      "accounts": [
        {
          "name": "Fund",
          "amount": "123456789012345678901",
          "address": "secret1fund",
          "start_at": 0,
          "interval": 86400,
          "cliff": "0"
        }
      ]
    }
  ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_reparse() {
        let original = schedule();
        let parsed = from_json(&to_json(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_file_roundtrip() {
        let file = NamedTempFile::new().unwrap();
        write_schedule_json(file.path(), &schedule()).unwrap();
        assert_eq!(read_schedule_json(file.path()).unwrap(), schedule());
    }

    #[test]
    fn test_reject_lossy_input() {
        let json = r#"{"total": 1.2345678901234568e20, "pools": []}"#;
        assert!(from_json(json).is_err());
    }
}
