//! Delimited numeric tables used for characteristic curves.
//!
//! Component data sheets are often exported with a locale-specific decimal
//! comma and a semicolon separator, so both characters are configurable.

use std::{fs, path::Path};

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// How a delimited table is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFormat {
    /// Character separating the fields of a row.
    pub separator: char,
    /// Character used as the decimal mark.
    pub decimal: char,
    /// Whether the first non-empty row holds column names.
    pub header: bool,
}

impl Default for TableFormat {
    /// Semicolon separated with a decimal comma and one header row.
    fn default() -> Self {
        Self {
            separator: ';',
            decimal: ',',
            header: true,
        }
    }
}

impl TableFormat {
    /// Comma separated with a decimal point and one header row.
    #[must_use]
    pub fn csv() -> Self {
        Self {
            separator: ',',
            decimal: '.',
            header: true,
        }
    }
}

/// Errors that can occur while loading a [`DelimitedTable`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read table from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("separator and decimal mark are both {0:?}")]
    AmbiguousFormat(char),

    #[error("line {line}, column {column}: cannot parse {text:?} as a number")]
    Parse {
        line: usize,
        column: usize,
        text: String,
    },

    #[error("line {line} has {found} fields, expected {expected}")]
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("table contains no data rows")]
    Empty,

    #[error("column {column} requested from a table with {columns} columns")]
    MissingColumn { column: usize, columns: usize },

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// A dense table of `f64` values, one row per line.
///
/// Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedTable {
    data: Array2<f64>,
}

impl DelimitedTable {
    /// Parses a table from text.
    ///
    /// # Errors
    ///
    /// Returns a [`TableError`] if a field is not numeric, rows differ in
    /// length, or no data rows remain after the header.
    pub fn parse(text: &str, format: &TableFormat) -> Result<Self, TableError> {
        if format.separator == format.decimal {
            return Err(TableError::AmbiguousFormat(format.separator));
        }

        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        if format.header {
            lines.next();
        }

        let mut values = Vec::new();
        let mut columns = None;
        let mut rows = 0;

        for (line_number, line) in lines {
            let start = values.len();
            for (column, field) in line.split(format.separator).enumerate() {
                values.push(parse_field(field, format.decimal).ok_or_else(|| {
                    TableError::Parse {
                        line: line_number,
                        column: column + 1,
                        text: field.trim().to_owned(),
                    }
                })?);
            }

            let found = values.len() - start;
            let expected = *columns.get_or_insert(found);
            if found != expected {
                return Err(TableError::Ragged {
                    line: line_number,
                    expected,
                    found,
                });
            }
            rows += 1;
        }

        let columns = columns.ok_or(TableError::Empty)?;
        let data = Array2::from_shape_vec((rows, columns), values)?;
        Ok(Self { data })
    }

    /// Reads and parses a table file.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Io`] if the file cannot be read, or any error
    /// from [`DelimitedTable::parse`].
    pub fn from_path(path: impl AsRef<Path>, format: &TableFormat) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let table = Self::parse(&text, format)?;
        debug!(
            path = %path.display(),
            rows = table.nrows(),
            columns = table.ncols(),
            "loaded table"
        );
        Ok(table)
    }

    #[must_use]
    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    #[must_use]
    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    /// Returns a view of one column.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::MissingColumn`] if `index` is out of range.
    pub fn column(&self, index: usize) -> Result<ArrayView1<'_, f64>, TableError> {
        if index >= self.ncols() {
            return Err(TableError::MissingColumn {
                column: index,
                columns: self.ncols(),
            });
        }
        Ok(self.data.index_axis(Axis(1), index))
    }
}

fn parse_field(field: &str, decimal: char) -> Option<f64> {
    let field = field.trim();
    if decimal == '.' {
        field.parse().ok()
    } else {
        field.replace(decimal, ".").parse().ok()
    }
}

/// Returns the index of the value closest to `target`.
///
/// Ties resolve to the lowest index. Returns `None` for an empty slice.
/// NaN entries are never selected unless every entry is NaN.
#[must_use]
pub fn nearest_index(values: ArrayView1<'_, f64>, target: f64) -> Option<usize> {
    values
        .iter()
        .map(|value| {
            let distance = (value - target).abs();
            if distance.is_nan() {
                f64::INFINITY
            } else {
                distance
            }
        })
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(index, _)| index)
}
