//! CSV-backed string tables with passthrough columns
//!
//! Every cell is kept as text, surrounding whitespace included, so columns
//! the analyses don't touch are written back with the same content. Only
//! cells that get parsed, and header lookups, ignore surrounding whitespace.

use crate::io::error::{AnalysisError, Result, WithPath, invalid_parameter, invalid_source};
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Header plus rows of raw cells, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table, checking that every row matches the header width
    ///
    /// # Errors
    ///
    /// Returns an invalid source data error on ragged rows or duplicate headers
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (i, name) in headers.iter().enumerate() {
            if headers.iter().skip(i + 1).any(|other| other == name) {
                return Err(invalid_source(&format!("duplicate column '{name}'")));
            }
        }
        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(invalid_source(&format!(
                "row {row} has {} cells, expected {}",
                cells.len(),
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    /// Read a table with a header row from a CSV file
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be opened or parsed
    pub fn read_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| AnalysisError::FileSystem {
            path: path.to_path_buf(),
            operation: "open",
            source,
        })?;
        let table = Self::from_reader(file).with_path(path)?;
        log::debug!(
            "Read {} rows x {} columns from {}",
            table.len(),
            table.headers.len(),
            path.display()
        );
        Ok(table)
    }

    /// Read a table with a header row from any CSV source
    ///
    /// # Errors
    ///
    /// Returns an error if the source isn't valid CSV or rows are ragged
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(ToString::to_string).collect());
        }
        Self::new(headers, rows)
    }

    /// Write the table with its header row to a CSV file
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be created or written
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path).map_err(|source| AnalysisError::FileSystem {
            path: path.to_path_buf(),
            operation: "create",
            source,
        })?;
        self.to_writer(file).with_path(path)?;
        log::debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }

    /// Write the table with its header row to any sink
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails
    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.headers)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Column names in order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows in order
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a named column
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` if no column has that name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Parse every cell of a named column
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` or `ParseValue` for the first bad cell
    pub fn parse_column<T: FromStr>(&self, name: &str) -> Result<Vec<T>> {
        let index = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                let cell = cells.get(index).map_or("", String::as_str);
                cell.trim().parse::<T>().map_err(|_parse_error| AnalysisError::ParseValue {
                    column: name.to_string(),
                    row,
                    value: cell.to_string(),
                })
            })
            .collect()
    }

    /// Append a column of raw cells
    ///
    /// # Errors
    ///
    /// Returns an invalid parameter error if the name is taken or the
    /// column length differs from the row count
    pub fn push_column(&mut self, name: &str, cells: Vec<String>) -> Result<()> {
        if self.headers.iter().any(|h| h == name) {
            return Err(invalid_parameter(
                "column",
                &name,
                &"a column with this name already exists",
            ));
        }
        if cells.len() != self.rows.len() {
            return Err(invalid_parameter(
                "column",
                &name,
                &format!("has {} cells for {} rows", cells.len(), self.rows.len()),
            ));
        }
        self.headers.push(name.to_string());
        for (row, cell) in self.rows.iter_mut().zip(cells) {
            row.push(cell);
        }
        Ok(())
    }

    /// Append a numeric column; `NaN` cells are written empty
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::push_column`]
    pub fn push_float_column(&mut self, name: &str, values: &[f64]) -> Result<()> {
        self.push_column(name, values.iter().map(|v| format_float(*v)).collect())
    }
}

/// Render a float the way the output tables store it
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

/// Read a square numeric matrix from a CSV file
///
/// With `has_header` the first line is skipped, matching matrices exported
/// together with their column labels.
///
/// # Errors
///
/// Returns an error if the file can't be read or a cell isn't a number
pub fn read_numeric_matrix(path: &Path, has_header: bool) -> Result<Vec<Vec<f64>>> {
    let file = std::fs::File::open(path).map_err(|source| AnalysisError::FileSystem {
        path: path.to_path_buf(),
        operation: "open",
        source,
    })?;
    numeric_matrix_from_reader(file, has_header).with_path(path)
}

/// Read a numeric matrix from any CSV source
///
/// # Errors
///
/// Returns an error if the source isn't valid CSV or a cell isn't a number
pub fn numeric_matrix_from_reader(reader: impl Read, has_header: bool) -> Result<Vec<Vec<f64>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        let values = record
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                cell.parse::<f64>()
                    .map_err(|_parse_error| AnalysisError::ParseValue {
                        column: format!("{}", col + 1),
                        row,
                        value: cell.to_string(),
                    })
            })
            .collect::<Result<Vec<f64>>>()?;
        rows.push(values);
    }
    Ok(rows)
}
