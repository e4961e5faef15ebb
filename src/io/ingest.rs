//! CSV ingest.
//!
//! This module turns a museum-object CSV export into `RawRecord`s. It does not
//! clean anything beyond trimming cells: year parsing and filtering belong to
//! the normalizer.
//!
//! Design goals:
//! - **Strict schema** for the four required columns (clear errors + exit code 2)
//! - **Row-level tolerance** (skip unreadable rows, but report what happened)
//! - **Deterministic behavior** (input order is preserved)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ColumnNames, RawRecord};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: raw records in file order plus row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<RawRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    object_id: usize,
    department: usize,
    credit_line: usize,
    accession_year: usize,
}

/// Load raw records from a CSV file.
pub fn load_raw_records(path: &Path, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    let data = read_raw_records(file, columns)?;
    info!(
        path = %path.display(),
        rows = data.rows_read,
        records = data.records.len(),
        row_errors = data.row_errors.len(),
        "loaded input"
    );
    Ok(data)
}

/// Load raw records from any reader producing CSV with a header row.
pub fn read_raw_records<R: Read>(reader: R, columns: &ColumnNames) -> Result<IngestedData, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    let index = resolve_columns(&header_map, columns)?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records() starts after the header, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        records.push(parse_row(&record, index, line));
    }

    debug!(rows_read, row_errors = row_errors.len(), "csv scan finished");

    Ok(IngestedData {
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>, columns: &ColumnNames) -> Result<ColumnIndex, AppError> {
    let find = |name: &str| {
        header_map
            .get(&normalize_header_name(name))
            .copied()
            .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
    };

    Ok(ColumnIndex {
        object_id: find(&columns.object_id)?,
        department: find(&columns.department)?,
        credit_line: find(&columns.credit_line)?,
        accession_year: find(&columns.accession_year)?,
    })
}

/// A blank object id is replaced by `line:N`; the accession year is the only
/// field that decides whether a row is kept.
fn parse_row(record: &StringRecord, index: ColumnIndex, line: usize) -> RawRecord {
    let object_id = match get_optional(record, index.object_id) {
        Some(id) => id.to_string(),
        None => format!("line:{line}"),
    };

    RawRecord {
        object_id,
        department: get_optional(record, index.department).unwrap_or_default().to_string(),
        credit_line: get_optional(record, index.credit_line).map(str::to_string),
        accession_year: get_optional(record, index.accession_year).map(str::to_string),
    }
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\u{feff}Object ID,Is Highlight,Department,AccessionYear,Credit Line\n\
1,False,Paintings,1955,Gift of Jane Doe\n\
2,False,Paintings,,\"Purchase, 1962 Funds\"\n\
,False,Arms,1960,Gift\n\
4,True,Arms,1890,\n";

    #[test]
    fn reads_required_columns_case_insensitively() {
        let data = read_raw_records(CSV.as_bytes(), &ColumnNames::default()).unwrap();
        assert_eq!(data.rows_read, 4);
        assert_eq!(data.records.len(), 4);
        assert!(data.row_errors.is_empty());

        let first = &data.records[0];
        assert_eq!(first.object_id, "1");
        assert_eq!(first.department, "Paintings");
        assert_eq!(first.credit_line.as_deref(), Some("Gift of Jane Doe"));
        assert_eq!(first.accession_year.as_deref(), Some("1955"));

        assert_eq!(data.records[1].credit_line.as_deref(), Some("Purchase, 1962 Funds"));
        assert_eq!(data.records[1].accession_year, None);
        assert_eq!(data.records[3].credit_line, None);
    }

    #[test]
    fn blank_object_id_keeps_the_row() {
        let data = read_raw_records(CSV.as_bytes(), &ColumnNames::default()).unwrap();
        let arms = &data.records[2];
        assert_eq!(arms.object_id, "line:4");
        assert_eq!(arms.department, "Arms");
        assert_eq!(arms.accession_year.as_deref(), Some("1960"));
    }

    #[test]
    fn undecodable_row_is_a_row_error() {
        let mut bytes = b"Object ID,Department,Credit Line,AccessionYear\n1,Arms,Gift,1950\n".to_vec();
        bytes.extend_from_slice(b"2,Arms,\xff\xfe,1951\n3,Arms,Purchase,1952\n");
        let data = read_raw_records(bytes.as_slice(), &ColumnNames::default()).unwrap();
        assert_eq!(data.rows_read, 3);
        assert_eq!(data.records.len(), 2);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.row_errors[0].line, 3);
    }

    #[test]
    fn missing_column_is_an_input_error() {
        let csv = "Object ID,Department,Credit Line\n1,Paintings,Gift\n";
        let err = read_raw_records(csv.as_bytes(), &ColumnNames::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("AccessionYear"));
    }

    #[test]
    fn custom_column_names() {
        let csv = "id,dept,credit,year\nx,Prints,Bequest,1921\n";
        let columns = ColumnNames {
            object_id: "id".to_string(),
            department: "DEPT".to_string(),
            credit_line: "credit".to_string(),
            accession_year: "year".to_string(),
        };
        let data = read_raw_records(csv.as_bytes(), &columns).unwrap();
        assert_eq!(data.records.len(), 1);
        assert_eq!(data.records[0].department, "Prints");
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();
        let data = load_raw_records(file.path(), &ColumnNames::default()).unwrap();
        assert_eq!(data.records.len(), 3);

        let missing = load_raw_records(Path::new("/nonexistent/objects.csv"), &ColumnNames::default());
        assert_eq!(missing.unwrap_err().exit_code(), 2);
    }
}
