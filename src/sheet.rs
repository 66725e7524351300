//! Line-oriented CSV parsing for sheet exports.
//!
//! The export is split on newlines before any quote handling, so a quoted
//! field can never span lines. Blank lines are dropped wherever they appear.

use std::collections::HashMap;

use crate::error::PipelineError;

/// Field values of one data line keyed by the literal header text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.fields.get(header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

pub fn parse_csv(text: &str) -> Result<Vec<RawRow>, PipelineError> {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());
    let header_line = lines.next().ok_or(PipelineError::EmptyInput)?;
    let headers = parse_line(header_line);

    let rows: Vec<RawRow> = lines
        .map(|line| {
            let mut values = parse_line(line).into_iter();
            headers
                .iter()
                .map(|header| (header.clone(), values.next().unwrap_or_default()))
                .collect::<RawRow>()
        })
        .collect();

    tracing::debug!(headers = headers.len(), rows = rows.len(), "parsed sheet export");
    Ok(rows)
}

/// Splits one line into trimmed fields.
///
/// A `"` toggles quoting wherever it appears; `""` inside quotes is a literal
/// quote. An unterminated quote runs the field to the end of the line.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }

    if in_quotes {
        tracing::warn!(line, "unterminated quote, field runs to end of line");
    }
    fields.push(current.trim().to_string());
    fields
}
