//! CSV decoding for the processed crime dataset.
//!
//! Rows are decoded through serde into [`CrimeRecord`]s keyed by the
//! header row. Extra columns are ignored; the four record columns are
//! required.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crime_dash_crime_models::CrimeRecord;

use crate::DatasetError;
use crate::progress::ProgressCallback;

/// Column headers every dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 4] = ["State", "Crime_Type", "Year", "Crime_Count"];

/// Reads every record from the CSV file at `path`.
///
/// # Errors
///
/// Returns [`DatasetError`] if the file is missing or unreadable, a
/// required column is absent, or a row fails to decode.
pub fn read_file(
    path: &Path,
    progress: &dyn ProgressCallback,
) -> Result<Vec<CrimeRecord>, DatasetError> {
    if !path.is_file() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    read_records(BufReader::new(file), progress)
}

/// Reads every record from CSV text supplied by `reader`.
///
/// # Errors
///
/// Returns [`DatasetError`] if a required column is absent or a row fails
/// to decode.
pub fn read_records<R: Read>(
    reader: R,
    progress: &dyn ProgressCallback,
) -> Result<Vec<CrimeRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(DatasetError::MissingColumn { column });
        }
    }

    progress.set_message("Reading crime dataset".to_owned());

    let mut records = Vec::new();
    for row in reader.deserialize::<CrimeRecord>() {
        records.push(row?);
        progress.inc(1);
    }

    progress.finish(format!("Read {} crime records", records.len()));

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NullProgress;

    #[test]
    fn decodes_rows_by_header() {
        let csv = "Year,State,Crime_Type,Crime_Count,Notes\n\
                   2020, Kerala ,Theft,10,x\n\
                   2021,Kerala,Theft,12.5,\n";
        let records = read_records(csv.as_bytes(), &NullProgress).unwrap();

        assert_eq!(
            records,
            vec![
                CrimeRecord::new("Kerala", "Theft", 2020, 10.0),
                CrimeRecord::new("Kerala", "Theft", 2021, 12.5),
            ]
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "State,Crime_Type,Year\nKerala,Theft,2020\n";
        let err = read_records(csv.as_bytes(), &NullProgress).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::MissingColumn {
                column: "Crime_Count"
            }
        ));
    }

    #[test]
    fn malformed_row_is_reported() {
        let csv = "State,Crime_Type,Year,Crime_Count\nKerala,Theft,twenty,10\n";
        let err = read_records(csv.as_bytes(), &NullProgress).unwrap_err();
        assert!(matches!(err, DatasetError::Csv(_)));
    }

    #[test]
    fn header_only_file_is_empty() {
        let csv = "State,Crime_Type,Year,Crime_Count\n";
        let records = read_records(csv.as_bytes(), &NullProgress).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_file_is_not_found() {
        let path = std::env::temp_dir().join("crime_dash_reader_test_absent.csv");
        let _ = std::fs::remove_file(&path);
        let err = read_file(&path, &NullProgress).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound { .. }));
    }
}
