//! CSV row codec
//!
//! This module contains the row schema trait implemented by persisted types and the
//! CSV tokenizer/encoder the record store uses. Files carry a header line; columns
//! are looked up by name so their order does not matter.

use super::StoreError;
use std::collections::HashMap;

/// A row type that can be persisted in a tabular collection
pub trait Record: Sized {
    /// Human-readable kind used in error messages
    const KIND: &'static str;

    /// Column names, in the order they are written
    const COLUMNS: &'static [&'static str];

    /// Encode the record into cells matching [`Record::COLUMNS`]
    fn to_row(&self) -> Vec<String>;

    /// Decode a record from a row
    fn from_row(row: &RowView<'_>) -> Result<Self, StoreError>;
}

/// Read access to one parsed row, addressed by column name
#[derive(Debug)]
pub struct RowView<'a> {
    kind: &'static str,
    line: usize,
    columns: &'a HashMap<String, usize>,
    fields: &'a [String],
}

impl<'a> RowView<'a> {
    /// Line number (1-based) where this row starts
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get a required cell. A short row yields an empty cell.
    pub fn get(&self, column: &str) -> Result<&'a str, StoreError> {
        let index = self.columns.get(column).ok_or_else(|| StoreError::MissingColumn {
            kind: self.kind,
            column: column.to_string(),
        })?;
        Ok(self.fields.get(*index).map(String::as_str).unwrap_or(""))
    }

    /// Get an optional cell, empty when the column is absent
    pub fn get_or_empty(&self, column: &str) -> &'a str {
        self.columns
            .get(column)
            .and_then(|index| self.fields.get(*index))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// A tokenized row with the line it started on
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedRow {
    pub(crate) line: usize,
    pub(crate) fields: Vec<String>,
}

/// Tokenize CSV text into rows. Blank lines are skipped.
pub(crate) fn parse_rows(input: &str) -> Result<Vec<ParsedRow>, StoreError> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut has_content = false;
    let mut line = 1;
    let mut row_start = 1;
    let mut chars = input.strip_prefix('\u{feff}').unwrap_or(input).chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                has_content = true;
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
                has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if has_content {
                    fields.push(std::mem::take(&mut field));
                    rows.push(ParsedRow { line: row_start, fields: std::mem::take(&mut fields) });
                }
                has_content = false;
                line += 1;
                row_start = line;
            }
            _ => {
                field.push(c);
                has_content = true;
            }
        }
    }

    if in_quotes {
        return Err(StoreError::MalformedRow {
            line: row_start,
            detail: "unterminated quoted field".to_string(),
        });
    }
    if has_content {
        fields.push(field);
        rows.push(ParsedRow { line: row_start, fields });
    }

    Ok(rows)
}

/// Encode one row, quoting cells that contain separators or quotes
pub(crate) fn encode_row<S: AsRef<str>>(cells: &[S]) -> String {
    cells.iter().map(|cell| encode_cell(cell.as_ref())).collect::<Vec<_>>().join(",")
}

fn encode_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Decode a full collection. Empty input is an empty collection.
pub(crate) fn decode<T: Record>(input: &str) -> Result<Vec<T>, StoreError> {
    let mut rows = parse_rows(input)?.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let columns: HashMap<String, usize> = header
        .fields
        .iter()
        .enumerate()
        .map(|(index, name)| (name.trim().to_string(), index))
        .collect();
    if !T::COLUMNS.iter().any(|column| columns.contains_key(*column)) {
        return Err(StoreError::MissingHeader { kind: T::KIND });
    }

    rows.map(|row| {
        T::from_row(&RowView { kind: T::KIND, line: row.line, columns: &columns, fields: &row.fields })
    })
    .collect()
}

/// Encode a full collection with its header line
pub(crate) fn encode<T: Record>(records: &[T]) -> String {
    let mut out = encode_row(T::COLUMNS);
    out.push('\n');
    for record in records {
        out.push_str(&encode_row(&record.to_row()));
        out.push('\n');
    }
    out
}
