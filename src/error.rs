//! Error types shared by the parser, the model, and the writers.

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input: read structures, index values, cycle counts, table shape.
    Format,
    /// A character outside the permitted sample sheet character set.
    Encoding,
    /// Samples that disagree with each other or with the sheet.
    Consistency,
    /// An operation called with arguments or state it cannot work with.
    Precondition,
    /// Failure reading or writing the underlying stream.
    Io,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Not a valid read structure: \"{0}\"")]
    InvalidReadStructure(String),

    #[error("Not a valid index for '{key}': \"{value}\"")]
    InvalidIndex { key: String, value: String },

    #[error("Invalid sample sheet format: {0}")]
    InvalidFormat(String),

    #[error("Sample sheet contains invalid characters: {0}")]
    InvalidCharacters(String),

    #[error("Line {line}: {source}")]
    AtLine {
        line: u64,
        #[source]
        source: Box<Error>,
    },

    #[error(
        "Sample '{sample}' has a {design}-indexed read structure ({structure}) but is missing `{key}`"
    )]
    MissingIndexForReadStructure {
        sample: String,
        structure: String,
        design: &'static str,
        key: &'static str,
    },

    #[error("Sample must have \"Sample_ID\" defined")]
    MissingSampleId,

    #[error(
        "Sample sheet pairing has been set with Reads: {reads:?} and is not compatible with sample read structure: {structure}"
    )]
    IncompatibleReadStructure { reads: Vec<u32>, structure: String },

    #[error(
        "Sample read structure ({sample}) different than read structure in sample sheet ({sheet})"
    )]
    ReadStructureMismatch { sample: String, sheet: String },

    #[error("Two equivalent samples added: '{sample}' and '{other}'")]
    DuplicateSample { sample: String, other: String },

    #[error(
        "Cannot add sample '{sample}' without `{key}` when previous samples have `{key}` set"
    )]
    MissingIndex { sample: String, key: &'static str },

    #[error("Sample index combination for '{sample}' has already been added on this lane or flowcell: '{other}'")]
    IndexCollision { sample: String, other: String },

    #[error("No samples in sample sheet")]
    NoSamples,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Attach a 1-based input line number to this error.
    #[must_use]
    pub fn at_line(self, line: u64) -> Self {
        match self {
            Error::AtLine { .. } => self,
            other => Error::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// The input line this error was reported against, if any.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            Error::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::Csv(e) if e.is_io_error() => ErrorKind::Io,
            Error::Csv(e) => match e.kind() {
                csv::ErrorKind::Utf8 { .. } => ErrorKind::Encoding,
                _ => ErrorKind::Format,
            },
            Error::InvalidReadStructure(_)
            | Error::InvalidIndex { .. }
            | Error::InvalidFormat(_) => ErrorKind::Format,
            Error::InvalidCharacters(_) => ErrorKind::Encoding,
            Error::AtLine { source, .. } => source.kind(),
            Error::MissingIndexForReadStructure { .. }
            | Error::MissingSampleId
            | Error::IncompatibleReadStructure { .. }
            | Error::ReadStructureMismatch { .. }
            | Error::DuplicateSample { .. }
            | Error::MissingIndex { .. }
            | Error::IndexCollision { .. } => ErrorKind::Consistency,
            Error::NoSamples | Error::InvalidArgument(_) => ErrorKind::Precondition,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_wraps_once() {
        let err = Error::InvalidReadStructure("10X".to_string())
            .at_line(4)
            .at_line(9);
        assert_eq!(err.line(), Some(4));
        assert_eq!(err.kind(), ErrorKind::Format);
        assert_eq!(
            err.to_string(),
            "Line 4: Not a valid read structure: \"10X\""
        );
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Error::NoSamples.kind(), ErrorKind::Precondition);
        assert_eq!(
            Error::InvalidCharacters("x".to_string()).kind(),
            ErrorKind::Encoding
        );
        assert_eq!(Error::MissingSampleId.kind(), ErrorKind::Consistency);
    }
}
