//! Section-aware parser that turns tokenized records into a [`SampleSheet`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, warn};

use crate::core::options::{FieldCountPolicy, ParseOptions};
use crate::core::sample::Sample;
use crate::error::Error;
use crate::parsing::records::{read_records, Record};
use crate::sheet::SampleSheet;
use crate::utils::validation::{all_valid_characters, is_required_section, normalize_whitespace};

/// Which section the parser is currently inside.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    NoSection,
    InHeader,
    InSettings,
    InReads,
    InData,
    InCustomSection(String),
}

struct SheetParser {
    sheet: SampleSheet,
    state: State,
    columns: Option<Vec<String>>,
}

/// Parse a sample sheet file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, or any error from
/// [`parse_records`].
pub fn parse_file(path: &Path, options: ParseOptions) -> Result<SampleSheet, Error> {
    let file = File::open(path)?;
    let sheet = parse_reader(BufReader::new(file), options)?;
    debug!(path = %path.display(), samples = sheet.len(), "Parsed sample sheet");
    Ok(sheet.with_path(path))
}

/// Parse a sample sheet from a reader.
///
/// # Errors
///
/// Returns an error if the input cannot be tokenized, or any error from
/// [`parse_records`].
pub fn parse_reader<R: Read>(reader: R, options: ParseOptions) -> Result<SampleSheet, Error> {
    let records = read_records(reader)?;
    parse_records(records, options)
}

/// Parse sample sheet text.
///
/// # Errors
///
/// See [`parse_reader`].
pub fn parse_text(text: &str, options: ParseOptions) -> Result<SampleSheet, Error> {
    parse_reader(text.as_bytes(), options)
}

/// Build a sheet from records in input order.
///
/// Blank records are skipped. A record whose first field starts with `[`
/// switches section. Inside `[Header]`, `[Settings]`, and custom sections
/// the first two fields are a key and a value. Inside `[Reads]` the first
/// field is a positive cycle count. Inside `[Data]` the first record names
/// the columns and every later record becomes a sample.
///
/// # Errors
///
/// Every error carries the 1-based line of the offending record:
///
/// - `Error::InvalidCharacters` for characters outside the permitted set
/// - `Error::InvalidFormat` for a record outside any section, an empty key,
///   a bad cycle count, an empty column name, or a field count mismatch
///   under [`FieldCountPolicy::Strict`]
/// - any error from [`Sample::with_index_validation`] or
///   [`SampleSheet::add_sample`]
pub fn parse_records(
    records: impl IntoIterator<Item = Record>,
    options: ParseOptions,
) -> Result<SampleSheet, Error> {
    let mut parser = SheetParser {
        sheet: SampleSheet::with_options(options),
        state: State::NoSection,
        columns: None,
    };

    for record in records {
        let line = record.line;
        parser.record(record).map_err(|e| e.at_line(line))?;
    }

    Ok(parser.sheet)
}

/// The name inside `[...]` if this record opens a section.
fn section_name(record: &Record) -> Option<&str> {
    let rest = record.first().strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(rest[..end].trim())
}

impl SheetParser {
    fn record(&mut self, record: Record) -> Result<(), Error> {
        if !all_valid_characters(record.fields.iter().map(String::as_str)) {
            return Err(Error::InvalidCharacters(record.fields.join(",")));
        }

        if record.is_blank() {
            return Ok(());
        }

        if let Some(name) = section_name(&record) {
            let name = name.to_string();
            return self.enter_section(&name);
        }

        match self.state.clone() {
            State::NoSection => Err(Error::InvalidFormat(format!(
                "Record found before any section header: {}",
                record.fields.join(",")
            ))),
            State::InHeader => {
                let (key, value) = key_value(record)?;
                self.sheet.header_mut().insert(key, value);
                Ok(())
            }
            State::InSettings => {
                let (key, value) = key_value(record)?;
                self.sheet.settings_mut().insert(key, value);
                Ok(())
            }
            State::InCustomSection(name) => {
                let (key, value) = key_value(record)?;
                if let Some(section) = self.sheet.section_mut(&name) {
                    section.insert(key, value);
                }
                Ok(())
            }
            State::InReads => {
                let cycles = parse_cycles(record.first())?;
                self.sheet.push_read(cycles);
                Ok(())
            }
            State::InData => self.data_record(record),
        }
    }

    fn enter_section(&mut self, name: &str) -> Result<(), Error> {
        debug!(section = %name, "Entering section");

        self.state = if name.eq_ignore_ascii_case("Header") {
            State::InHeader
        } else if name.eq_ignore_ascii_case("Settings") {
            State::InSettings
        } else if name.eq_ignore_ascii_case("Reads") {
            State::InReads
        } else if name.eq_ignore_ascii_case("Data") {
            State::InData
        } else {
            let name = normalize_whitespace(name);
            if name.is_empty() || is_required_section(&name) {
                return Err(Error::InvalidFormat(format!(
                    "Invalid section name: [{name}]"
                )));
            }
            if self.sheet.section(&name).is_none() {
                self.sheet.add_section(&name)?;
            }
            State::InCustomSection(name)
        };

        Ok(())
    }

    fn data_record(&mut self, record: Record) -> Result<(), Error> {
        let Some(columns) = &self.columns else {
            self.columns = Some(data_columns(record)?);
            return Ok(());
        };

        let mut values = record.fields;
        match self.sheet.options().field_count {
            FieldCountPolicy::Strict => {
                // Empty trailing fields are padding and may exceed the column count.
                let used = values
                    .iter()
                    .rposition(|v| !v.is_empty())
                    .map_or(0, |i| i + 1);
                if used > columns.len() || values.len() < columns.len() {
                    return Err(Error::InvalidFormat(format!(
                        "Data row has {} fields but the header has {} columns",
                        values.len(),
                        columns.len()
                    )));
                }
            }
            FieldCountPolicy::Truncate => {
                if values.len() != columns.len() {
                    warn!(
                        fields = values.len(),
                        columns = columns.len(),
                        "Data row field count differs from header; truncating"
                    );
                }
            }
        }
        values.truncate(columns.len());

        let sample = Sample::with_index_validation(
            columns.iter().cloned().zip(values),
            self.sheet.options().index_validation,
        )?;
        self.sheet.add_sample(sample)
    }
}

/// The `[Data]` column names. Empty trailing names are padding and dropped;
/// an empty name before a non-empty one is an error.
fn data_columns(record: Record) -> Result<Vec<String>, Error> {
    let mut columns: Vec<String> = record.fields.into_iter().map(|f| f.trim().to_string()).collect();
    while columns.last().is_some_and(String::is_empty) {
        columns.pop();
    }

    if columns.iter().any(String::is_empty) {
        return Err(Error::InvalidFormat(format!(
            "Header for [Data] section is not allowed to have empty fields: {}",
            columns.join(",")
        )));
    }

    debug!(columns = columns.len(), "Read [Data] column header");
    Ok(columns)
}

fn key_value(record: Record) -> Result<(String, String), Error> {
    let mut fields = record.fields.into_iter();
    let key = fields.next().unwrap_or_default();
    let value = fields.next().unwrap_or_default();
    if key.trim().is_empty() {
        return Err(Error::InvalidFormat(format!(
            "Key/value row has an empty key (value \"{value}\")"
        )));
    }
    Ok((key, value))
}

fn parse_cycles(field: &str) -> Result<u32, Error> {
    match field.trim().parse::<u32>() {
        Ok(cycles) if cycles > 0 => Ok(cycles),
        _ => Err(Error::InvalidFormat(format!(
            "Read cycle count must be a positive integer: \"{field}\""
        ))),
    }
}
