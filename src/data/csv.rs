//! Row-range CSV loading for pixel-feature files.
//!
//! Supported format:
//! - UTF-8, comma-separated, one example per line, no header
//! - Double-quoted fields with embedded commas are handled correctly
//! - Blank lines are skipped and do not count as rows

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum DataError {
    Io { path: String, source: std::io::Error },
    InvalidRange { start: usize, end: usize },
    RangeOutOfBounds { end: usize, available: usize },
    Parse { row: usize, cell: String },
    RaggedRow { row: usize, expected: usize, found: usize },
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io { path, source } => write!(f, "cannot read '{}': {}", path, source),
            DataError::InvalidRange { start, end } => {
                write!(f, "row range [{}, {}) is empty or reversed", start, end)
            }
            DataError::RangeOutOfBounds { end, available } => write!(
                f,
                "row range ends at {} but the source only has {} rows",
                end, available
            ),
            DataError::Parse { row, cell } => {
                write!(f, "row {}: '{}' is not a valid number", row, cell)
            }
            DataError::RaggedRow { row, expected, found } => write!(
                f,
                "row {}: found {} columns, expected {}",
                row, found, expected
            ),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Turns one CSV line into a row of feature values.
///
/// `row` is the 0-based row index within the source, used for error reporting.
pub trait CsvDataExtractor {
    fn extract(&self, line: &str, row: usize) -> Result<Vec<f64>, DataError>;
}

/// Every cell is a pixel intensity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelFeaturesExtractor;

impl CsvDataExtractor for PixelFeaturesExtractor {
    fn extract(&self, line: &str, row: usize) -> Result<Vec<f64>, DataError> {
        let mut cells = parse_csv_row(line);
        // Tolerate a trailing comma.
        if cells.last().map_or(false, |c| c.trim().is_empty()) {
            cells.pop();
        }
        parse_floats(&cells, row)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Reads rows `[start, end)` from `reader`.
///
/// Returns exactly `end - start` rows, all of the same width.
pub fn load_rows<R, E>(reader: R, extractor: &E, start: usize, end: usize) -> Result<Vec<Vec<f64>>, DataError>
where
    R: BufRead,
    E: CsvDataExtractor + ?Sized,
{
    if start >= end {
        return Err(DataError::InvalidRange { start, end });
    }

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(end - start);
    let mut row_idx = 0usize;

    for line in reader.lines() {
        let line = line.map_err(|source| DataError::Io {
            path: "<reader>".into(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if row_idx >= start {
            let values = extractor.extract(line, row_idx)?;
            if let Some(first) = rows.first() {
                if values.len() != first.len() {
                    return Err(DataError::RaggedRow {
                        row: row_idx,
                        expected: first.len(),
                        found: values.len(),
                    });
                }
            }
            rows.push(values);
        }
        row_idx += 1;
        if row_idx == end {
            break;
        }
    }

    if row_idx < end {
        return Err(DataError::RangeOutOfBounds {
            end,
            available: row_idx,
        });
    }
    Ok(rows)
}

/// Opens `path` and reads rows `[start, end)`.
pub fn load_rows_from_csv<P, E>(path: P, extractor: &E, start: usize, end: usize) -> Result<Vec<Vec<f64>>, DataError>
where
    P: AsRef<Path>,
    E: CsvDataExtractor + ?Sized,
{
    let path = path.as_ref();
    debug!("Loading rows [{}, {}) from {}", start, end, path.display());
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_rows(BufReader::new(file), extractor, start, end).map_err(|e| match e {
        DataError::Io { source, .. } => DataError::Io {
            path: path.display().to_string(),
            source,
        },
        other => other,
    })
}

/// Narrows loaded rows to `f32`.
pub fn to_f32_rows(rows: &[Vec<f64>]) -> Vec<Vec<f32>> {
    rows.iter()
        .map(|row| row.iter().map(|&v| v as f32).collect())
        .collect()
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside quoted field.
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    fields.push(current);
    fields
}

fn parse_floats(cells: &[String], row: usize) -> Result<Vec<f64>, DataError> {
    cells.iter()
        .map(|c| {
            c.trim().parse::<f64>().map_err(|_| DataError::Parse {
                row,
                cell: c.clone(),
            })
        })
        .collect()
}
