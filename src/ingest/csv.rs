//! Minimal CSV reader for the blocks embedded in supplier tabs.

use std::collections::HashMap;
use std::mem::take;

/// Split CSV text into rows of fields (quotes and CRLF tolerant).
///
/// Blank lines are skipped. An unterminated quote runs to the end of input.
#[must_use]
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = String::new();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            // Quotes only open a quoted field at its start
            '"' if field.is_empty() => in_quotes = true,
            c if c == sep && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() == 1 && row[0].is_empty() {
                    row.clear();
                } else {
                    rows.push(take(&mut row));
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Turn rows into header-keyed records.
///
/// The first row is the header. Header names and values are trimmed; empty
/// header names are dropped, and cells missing from short rows read as empty.
#[must_use]
pub fn records(rows: &[Vec<String>]) -> Vec<HashMap<String, String>> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };

    body.iter()
        .map(|row| {
            header
                .iter()
                .enumerate()
                .filter(|(_, name)| !name.trim().is_empty())
                .map(|(i, name)| {
                    let value = row.get(i).map(|v| v.trim()).unwrap_or_default();
                    (name.trim().to_string(), value.to_string())
                })
                .collect()
        })
        .collect()
}
