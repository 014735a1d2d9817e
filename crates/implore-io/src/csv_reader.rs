//! CSV file reader with type inference

use crate::reader::{DataReader, IoError, IoResult};
use crate::schema::{ColumnType, DataColumn, DataSchema, DataTable};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Number of leading rows sampled for type inference
const INFERENCE_ROWS: usize = 100;

/// CSV file reader
pub struct CsvReader {
    path: String,
    delimiter: u8,
    has_header: bool,
    schema: DataSchema,
}

impl CsvReader {
    /// Open a CSV file
    pub fn open(path: impl AsRef<Path>) -> IoResult<Self> {
        Self::open_with_options(path, b',', true)
    }

    /// Open a CSV file with options
    pub fn open_with_options(
        path: impl AsRef<Path>,
        delimiter: u8,
        has_header: bool,
    ) -> IoResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound(path.display().to_string()));
        }

        let table = load(open_buffered(path)?, delimiter, has_header)?;

        Ok(Self {
            path: path.display().to_string(),
            delimiter,
            has_header,
            schema: table.schema(),
        })
    }
}

impl DataReader for CsvReader {
    fn read_schema(&self) -> IoResult<DataSchema> {
        Ok(self.schema.clone())
    }

    fn read_table(&self) -> IoResult<DataTable> {
        load(
            open_buffered(Path::new(&self.path))?,
            self.delimiter,
            self.has_header,
        )
    }

    fn path(&self) -> Option<&str> {
        Some(&self.path)
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

fn open_buffered(path: &Path) -> IoResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
    Ok(BufReader::new(file))
}

/// Parse comma-separated text with a header row into a table
pub fn parse_csv_str(content: &str) -> IoResult<DataTable> {
    load(content.as_bytes(), b',', true)
}

/// Read every record and build a typed table
fn load<R: Read>(source: R, delimiter: u8, has_header: bool) -> IoResult<DataTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_header)
        .trim(csv::Trim::All)
        .from_reader(source);

    let mut headers: Vec<String> = if has_header {
        reader
            .headers()
            .map_err(|e| IoError::InvalidFormat(e.to_string()))?
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        Vec::new()
    };

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for (row, result) in reader.records().enumerate() {
        let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;

        if !has_header && row == 0 {
            // Generate column names from the first record's width
            headers = (0..record.len()).map(|i| format!("col_{}", i)).collect();
            cells = vec![Vec::new(); headers.len()];
        }

        if record.len() != headers.len() {
            return Err(IoError::InvalidFormat(format!(
                "record {} has {} fields, expected {}",
                row + 1,
                record.len(),
                headers.len()
            )));
        }

        for (column, value) in cells.iter_mut().zip(record.iter()) {
            column.push(value.to_string());
        }
    }

    let mut table = DataTable::new();
    for (name, values) in headers.into_iter().zip(cells) {
        let sample_len = values.len().min(INFERENCE_ROWS);
        let dtype = widen_type(infer_type(&values[..sample_len]), &values);
        table.add_column(name, parse_column(&values, dtype))?;
    }

    Ok(table)
}

/// Infer column type from sample values
fn infer_type(values: &[String]) -> ColumnType {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty() && !is_missing(s))
        .collect();
    if non_empty.is_empty() {
        return ColumnType::String;
    }

    // Try parsing as integers
    if non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        // Missing cells cannot be held by an integer column
        if non_empty.len() < values.len() {
            return ColumnType::Float64;
        }
        return ColumnType::Int64;
    }

    // Try parsing as floats
    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }

    // Try parsing as booleans
    if non_empty
        .iter()
        .all(|s| matches!(s.to_lowercase().as_str(), "true" | "false" | "yes" | "no"))
    {
        return ColumnType::Bool;
    }

    ColumnType::String
}

/// Widen an integer column to floats when a cell past the sample is not an
/// integer, so later missing markers become NaN instead of 0
fn widen_type(dtype: ColumnType, values: &[String]) -> ColumnType {
    match dtype {
        ColumnType::Int64 if values.iter().any(|s| s.parse::<i64>().is_err()) => {
            ColumnType::Float64
        }
        other => other,
    }
}

/// Missing-value markers written by common statistics packages
fn is_missing(s: &str) -> bool {
    matches!(s, "NA" | "NaN" | "nan" | ".")
}

/// Parse column values into a DataColumn
fn parse_column(values: &[String], dtype: ColumnType) -> DataColumn {
    match dtype {
        ColumnType::Float64 => DataColumn::Float64(
            values
                .iter()
                .map(|s| s.parse().unwrap_or(f64::NAN))
                .collect(),
        ),
        ColumnType::Int64 => DataColumn::Int64(
            values
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect(),
        ),
        ColumnType::Bool => DataColumn::Bool(
            values
                .iter()
                .map(|s| matches!(s.to_lowercase().as_str(), "true" | "yes"))
                .collect(),
        ),
        ColumnType::String => DataColumn::String(values.to_vec()),
    }
}
