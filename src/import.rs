//! Batch import of sensor packages from CSV
//!
//! Each record is `code,value1,value2,...`; records may differ in length since
//! each workout kind carries its own number of readings.

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info, warn, Level};

use crate::error::{FitTrackError, ImportError, Result};
use crate::package::{process, SensorPackage};
use crate::report::InfoMessage;

/// Column names accepted for the leading code column of a header row
const HEADER_NAMES: [&str; 3] = ["code", "type", "workout_type"];

/// CSV reader for sensor packages
pub struct PackageReader {
    delimiter: u8,
}

impl Default for PackageReader {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read all packages from a file
    pub fn read_file(&self, path: &Path) -> Result<Vec<SensorPackage>> {
        let file = File::open(path)?;
        let packages = self.read_from(file)?;
        info!(
            file = %path.display(),
            packages = packages.len(),
            "Packages imported"
        );
        Ok(packages)
    }

    /// Read all packages from any reader
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<SensorPackage>> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .delimiter(self.delimiter)
            .from_reader(reader);

        let mut packages = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record.map_err(ImportError::from)?;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(index as u64 + 1);

            if index == 0 && Self::is_header(&record) {
                continue;
            }
            if record.iter().all(str::is_empty) {
                continue;
            }

            packages.push(Self::parse_record(&record, line)?);
        }

        Ok(packages)
    }

    fn is_header(record: &StringRecord) -> bool {
        record
            .get(0)
            .map(|field| HEADER_NAMES.contains(&field.to_lowercase().as_str()))
            .unwrap_or(false)
    }

    fn parse_record(record: &StringRecord, line: u64) -> Result<SensorPackage> {
        let code = record
            .get(0)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ImportError::ParseError {
                line,
                reason: "missing workout code".to_string(),
            })?;

        // Spreadsheets pad short rows to the header width; only trailing
        // empty columns may be dropped, or later readings would shift left
        let mut fields: Vec<&str> = record.iter().skip(1).collect();
        while fields.last().is_some_and(|field| field.is_empty()) {
            fields.pop();
        }

        let values = fields
            .into_iter()
            .enumerate()
            .map(|(index, field)| {
                if field.is_empty() {
                    return Err(ImportError::ParseError {
                        line,
                        reason: format!("empty value in column {}", index + 2),
                    });
                }
                Decimal::from_str(field).map_err(|e| ImportError::ParseError {
                    line,
                    reason: format!("invalid number '{}': {}", field, e),
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(SensorPackage::new(code, values))
    }
}

/// Outcome of processing a batch of packages
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub messages: Vec<InfoMessage>,
    /// Row index (0-based) and error of each rejected package
    pub failures: Vec<(usize, FitTrackError)>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Compute every package in order.
///
/// With `fail_fast` the first bad package aborts the batch; otherwise bad
/// packages are logged and collected in [`BatchOutcome::failures`].
pub fn process_all(packages: &[SensorPackage], fail_fast: bool) -> Result<BatchOutcome> {
    let mut outcome = BatchOutcome::default();

    for (row, package) in packages.iter().enumerate() {
        match process(package) {
            Ok(message) => outcome.messages.push(message),
            Err(e) if fail_fast => return Err(e),
            Err(e) => {
                log_failure(row, package, &e);
                outcome.failures.push((row, e));
            }
        }
    }

    Ok(outcome)
}

fn log_failure(row: usize, package: &SensorPackage, err: &FitTrackError) {
    if err.severity().to_tracing_level() == Level::ERROR {
        error!(row, code = %package.code, error = %err, "Rejecting package");
    } else {
        warn!(row, code = %package.code, error = %err, "Skipping package");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CalculationError, PackageError};
    use rust_decimal_macros::dec;

    const SAMPLE: &str = "\
code,action,duration,weight,extra1,extra2
# reference packages
SWM,720,1,80,25,40
RUN, 15000, 1, 75
WLK,9000,1,75,180
";

    #[test]
    fn test_read_packages_with_header_and_comments() {
        let packages = PackageReader::new().read_from(SAMPLE.as_bytes()).unwrap();

        assert_eq!(packages.len(), 3);
        assert_eq!(packages[0].code, "SWM");
        assert_eq!(packages[0].values.len(), 5);
        assert_eq!(packages[1].values, vec![dec!(15000), dec!(1), dec!(75)]);
        assert_eq!(packages[2].values.len(), 4);
    }

    #[test]
    fn test_read_without_header() {
        let packages = PackageReader::new()
            .with_delimiter(b';')
            .read_from("RUN;15000;1;75\n".as_bytes())
            .unwrap();
        assert_eq!(packages.len(), 1);
    }

    #[test]
    fn test_bad_number_reports_line() {
        let err = PackageReader::new()
            .read_from("RUN,15000,1,75\nWLK,9000,one,75,180\n".as_bytes())
            .unwrap_err();

        match err {
            FitTrackError::Import(ImportError::ParseError { line, reason }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("'one'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_middle_column_is_rejected() {
        let err = PackageReader::new()
            .read_from("RUN,15000,,1,75\n".as_bytes())
            .unwrap_err();

        match err {
            FitTrackError::Import(ImportError::ParseError { line, reason }) => {
                assert_eq!(line, 1);
                assert_eq!(reason, "empty value in column 3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trailing_empty_columns_are_dropped() {
        let packages = PackageReader::new()
            .read_from("code,action,duration,weight,extra1,extra2\nRUN,15000,1,75,,\n".as_bytes())
            .unwrap();

        assert_eq!(packages[0].values, vec![dec!(15000), dec!(1), dec!(75)]);
    }

    #[test]
    fn test_process_all_skips_overflowing_rows() {
        let packages = vec![
            SensorPackage::new("RUN", vec![dec!(15000), dec!(1), dec!(75)]),
            SensorPackage::new("RUN", vec![dec!(15000), dec!(1), Decimal::MAX]),
            SensorPackage::new("SWM", vec![dec!(720), dec!(1), dec!(80), dec!(25), dec!(40)]),
        ];

        let outcome = process_all(&packages, false).unwrap();
        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.messages[1].training_type, "Swimming");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, 1);
        assert!(matches!(
            outcome.failures[0].1,
            FitTrackError::Calculation(CalculationError::Overflow { .. })
        ));
    }

    #[test]
    fn test_process_all_skips_bad_rows() {
        let packages = vec![
            SensorPackage::new("RUN", vec![dec!(15000), dec!(1), dec!(75)]),
            SensorPackage::new("BIK", vec![dec!(1), dec!(1), dec!(1)]),
            SensorPackage::new("SWM", vec![dec!(720), dec!(1), dec!(80), dec!(25), dec!(40)]),
        ];

        let outcome = process_all(&packages, false).unwrap();
        assert_eq!(outcome.messages.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, 1);
        assert!(!outcome.is_clean());
    }

    #[test]
    fn test_process_all_fail_fast() {
        let packages = vec![
            SensorPackage::new("RUN", vec![dec!(15000), dec!(1)]),
            SensorPackage::new("RUN", vec![dec!(15000), dec!(1), dec!(75)]),
        ];

        let err = process_all(&packages, true).unwrap_err();
        assert!(matches!(
            err,
            FitTrackError::Package(PackageError::WrongArity { .. })
        ));
    }
}
