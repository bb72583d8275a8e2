//! A minimal comma-separated values codec.
//!
//! Fields containing a comma, a double quote, or a line break are wrapped in
//! double quotes, with embedded quotes doubled. The reader accepts `\n` and
//! `\r\n` line endings, skips blank lines, and allows quoted fields to span
//! lines.

use std::io::{self, Write};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Quotes a field if it needs quoting.
#[must_use]
pub fn escape(value: &str) -> String {
    if value.contains([DELIMITER, QUOTE, '\n', '\r']) {
        let escaped = value.replace(QUOTE, "\"\"");
        format!("\"{escaped}\"")
    } else {
        value.to_string()
    }
}

/// Writes one record followed by a newline.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_record<W, I, S>(writer: &mut W, fields: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let line = fields
        .into_iter()
        .map(|field| escape(field.as_ref()))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{line}")
}

/// A parsed record and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// One-based line number of the first character of the record.
    pub line: usize,
    /// The unescaped field values.
    pub fields: Vec<String>,
}

/// Error returned when the input cannot be split into records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: quoted field is never closed")]
pub struct UnterminatedQuote {
    /// The line the unterminated field started on.
    pub line: usize,
    /// How many records were complete before the unterminated one.
    pub complete: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field.
    FieldStart,
    /// Inside an unquoted field.
    Unquoted,
    /// Inside a quoted field.
    Quoted,
    /// Just read a quote inside a quoted field: either an escaped quote or the
    /// closing quote.
    QuoteInQuoted,
}

/// Splits text into records.
///
/// A leading byte order mark is ignored. Lines that are entirely empty are
/// skipped. Malformed quoting inside an unquoted field is taken literally, as
/// are characters between a closing quote and the next delimiter.
///
/// # Errors
///
/// Returns an error if the input ends inside a quoted field.
pub fn parse(input: &str) -> Result<Vec<Record>, UnterminatedQuote> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);

    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut state = State::FieldStart;
    let mut line = 1;
    let mut record_line = 1;
    let mut quote_line = 1;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match (state, c) {
            (State::Quoted, '\n') => {
                line += 1;
                field.push(c);
            }
            (State::Quoted, QUOTE) => state = State::QuoteInQuoted,
            (State::Quoted, _) => field.push(c),
            (State::QuoteInQuoted, QUOTE) => {
                field.push(QUOTE);
                state = State::Quoted;
            }
            (_, '\r') if chars.peek() == Some(&'\n') => {}
            (_, '\n' | '\r') => {
                let blank = fields.is_empty() && field.is_empty() && state == State::FieldStart;
                if !blank {
                    fields.push(std::mem::take(&mut field));
                    records.push(Record {
                        line: record_line,
                        fields: std::mem::take(&mut fields),
                    });
                }
                line += 1;
                record_line = line;
                state = State::FieldStart;
            }
            (_, DELIMITER) => {
                fields.push(std::mem::take(&mut field));
                state = State::FieldStart;
            }
            (State::FieldStart, QUOTE) => {
                quote_line = line;
                state = State::Quoted;
            }
            (State::FieldStart | State::Unquoted, _) => {
                field.push(c);
                state = State::Unquoted;
            }
            (State::QuoteInQuoted, _) => {
                field.push(c);
                state = State::Unquoted;
            }
        }
    }

    match state {
        State::Quoted => {
            return Err(UnterminatedQuote {
                line: quote_line,
                complete: records.len(),
            });
        }
        State::FieldStart if fields.is_empty() => {}
        _ => {
            fields.push(field);
            records.push(Record {
                line: record_line,
                fields,
            });
        }
    }

    Ok(records)
}
