//! Comma-delimited text decoding with a header row.
//!
//! Quoted fields may contain delimiters, escaped quotes (`""`) and line
//! breaks. A malformed row is reported and skipped; it never stops the rows
//! after it from decoding.

use std::collections::HashMap;

use crate::error::RowDecodeError;

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// One data row keyed by header column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    line: usize,
    values: HashMap<String, String>,
}

impl Row {
    pub fn new(line: usize, values: HashMap<String, String>) -> Self {
        Self { line, values }
    }

    /// Raw value of `column`, or `""` when the header has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.values.get(column).map(String::as_str).unwrap_or("")
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// 1-based line the row starts on
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Rows in source order plus the rows that had to be skipped
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    pub errors: Vec<RowDecodeError>,
}

/// A record split into fields before the header is applied.
#[derive(Debug)]
struct Record {
    line: usize,
    fields: Vec<String>,
    unterminated: bool,
}

/// Decode `text` using its first record as the header.
pub fn decode(text: &str) -> Decoded {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut records = split_records(text).into_iter();

    let Some(header) = records.next() else {
        return Decoded::default();
    };
    if header.unterminated {
        return Decoded {
            errors: vec![RowDecodeError::UnterminatedQuote { line: header.line }],
            ..Decoded::default()
        };
    }

    let columns: Vec<String> = header
        .fields
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut decoded = Decoded {
        columns,
        ..Decoded::default()
    };

    for record in records {
        if record.unterminated {
            decoded
                .errors
                .push(RowDecodeError::UnterminatedQuote { line: record.line });
            continue;
        }

        let expected = decoded.columns.len();
        if record.fields.iter().skip(expected).any(|f| !f.is_empty()) {
            decoded.errors.push(RowDecodeError::TooManyFields {
                line: record.line,
                found: record.fields.len(),
                expected,
            });
            continue;
        }

        let mut values = HashMap::with_capacity(expected);
        let mut fields = record.fields.into_iter();
        for column in &decoded.columns {
            let value = fields.next().unwrap_or_default();
            values.entry(column.clone()).or_insert(value);
        }
        decoded.rows.push(Row::new(record.line, values));
    }

    decoded
}

fn split_records(text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut chars = text.chars().peekable();

    let mut line = 1;
    let mut record_line = 1;
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    // a quoted empty field still makes the record non-blank
    let mut touched = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                '\r' => {
                    if chars.peek() != Some(&'\n') {
                        line += 1;
                    }
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
                touched = true;
            }
            DELIMITER => {
                fields.push(std::mem::take(&mut field));
                at_field_start = true;
                touched = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                if touched || !field.is_empty() {
                    fields.push(std::mem::take(&mut field));
                    records.push(Record {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                        unterminated: false,
                    });
                }
                record_line = line;
                at_field_start = true;
                touched = false;
            }
            _ => {
                field.push(c);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        fields.push(field);
        records.push(Record {
            line: record_line,
            fields,
            unterminated: true,
        });
    } else if touched || !field.is_empty() {
        fields.push(field);
        records.push(Record {
            line: record_line,
            fields,
            unterminated: false,
        });
    }

    records
}
