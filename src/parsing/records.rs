use std::io::Read;

use crate::error::Error;

/// One comma-delimited input record with its 1-based starting line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub line: u64,
    pub fields: Vec<String>,
}

impl Record {
    pub fn new<S: Into<String>>(line: u64, fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether every field is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.fields.iter().all(|f| f.trim().is_empty())
    }

    #[must_use]
    pub fn first(&self) -> &str {
        self.fields.first().map_or("", String::as_str)
    }
}

/// Split sample sheet text into records.
///
/// Fields are comma-delimited and may be wrapped in double quotes when they
/// contain a comma. Spaces directly after a delimiter are dropped. Rows may
/// have any number of fields, and empty lines produce no record.
///
/// # Errors
///
/// Returns `Error::InvalidCharacters` (with the line number) if the input is
/// not valid UTF-8, or `Error::Csv` for other tokenizer failures.
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<Record>, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let bytes = skip_initial_spaces(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .quote(b'"')
        .from_reader(bytes.as_slice());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| match e.kind() {
            csv::ErrorKind::Utf8 { pos, .. } => {
                let line = pos.as_ref().map_or(0, csv::Position::line);
                Error::InvalidCharacters("input is not valid UTF-8".to_string()).at_line(line)
            }
            _ => Error::Csv(e),
        })?;

        let line = record.position().map_or(0, csv::Position::line);
        records.push(Record::new(
            line,
            record.iter().map(|f| f.trim_start_matches(' ')),
        ));
    }

    Ok(records)
}

/// Drop spaces that follow a delimiter outside quotes, so that a quoted
/// field written as `, "A, B"` is still read as one field. Line breaks are
/// kept so record line numbers do not move.
fn skip_initial_spaces(input: &[u8]) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let mut in_quotes = false;
    let mut after_delimiter = false;

    for &byte in input {
        if after_delimiter && byte == b' ' {
            continue;
        }
        after_delimiter = false;
        match byte {
            b'"' => in_quotes = !in_quotes,
            b',' if !in_quotes => after_delimiter = true,
            _ => {}
        }
        output.push(byte);
    }

    output
}
