//! The sample sheet aggregate and the rules enforced as samples are admitted.
//!
//! A [`SampleSheet`] owns its `[Header]`, `[Settings]`, `[Reads]`, custom
//! sections, and the ordered list of admitted [`Sample`]s. Every sample passes
//! through [`SampleSheet::add_sample`], which checks it against the samples
//! already admitted:
//!
//! - `Sample_ID` must be present
//! - the read structure must match the sheet's (inherited from the first sample)
//! - the first sample's read structure must agree with `[Reads]` pairing
//! - samples equal on (`Sample_ID`, `Library_ID`, `Lane`) are rejected or warned
//! - once the first sample fixes whether samples carry `index`/`index2`, every
//!   later sample must carry them too
//! - `index`/`index2` combinations must be unique per lane (or per flowcell
//!   when no lane is given)
//!
//! A rejected sample leaves the sheet unchanged.

pub mod design;
pub mod json;
pub mod picard;
pub mod writer;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::core::options::{DuplicatePolicy, ParseOptions};
use crate::core::read_structure::ReadStructure;
use crate::core::sample::Sample;
use crate::core::section::Section;
use crate::error::Error;
use crate::parsing;
use crate::utils::validation::{is_required_section, normalize_whitespace};

static NEXT_SHEET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`SampleSheet`], recorded on each sample it admits.
///
/// Clones of a sheet share its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(u64);

impl SheetId {
    fn next() -> Self {
        SheetId(NEXT_SHEET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// An Illumina sample sheet.
///
/// | Section | Layout |
/// |---------|--------|
/// | `[Header]` | key/value rows |
/// | `[<Other>]` | key/value rows (optional, multiple, user defined) |
/// | `[Settings]` | key/value rows |
/// | `[Reads]` | one cycle count per row |
/// | `[Data]` | table with a column header row |
///
/// Not internally synchronized: callers sharing one sheet across threads must
/// serialize access to it.
#[derive(Debug, Clone)]
pub struct SampleSheet {
    id: SheetId,
    path: Option<PathBuf>,
    options: ParseOptions,
    header: Section,
    settings: Section,
    reads: Vec<u32>,
    sections: Vec<(String, Section)>,
    samples: Vec<Sample>,
    read_structure: Option<ReadStructure>,
    samples_have_index: Option<bool>,
    samples_have_index2: Option<bool>,
}

impl Default for SampleSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            id: SheetId::next(),
            path: None,
            options,
            header: Section::new(),
            settings: Section::new(),
            reads: Vec::new(),
            sections: Vec::new(),
            samples: Vec::new(),
            read_structure: None,
            samples_have_index: None,
            samples_have_index2: None,
        }
    }

    /// Parse a sample sheet file with default options.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading, tokenizing, or validating the sheet.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        parsing::sheet::parse_file(path.as_ref(), ParseOptions::default())
    }

    /// Parse a sample sheet file.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading, tokenizing, or validating the sheet.
    pub fn from_path_with_options(
        path: impl AsRef<Path>,
        options: ParseOptions,
    ) -> Result<Self, Error> {
        parsing::sheet::parse_file(path.as_ref(), options)
    }

    /// Parse a sample sheet from any reader.
    ///
    /// # Errors
    ///
    /// Returns any error raised while reading, tokenizing, or validating the sheet.
    pub fn from_reader<R: std::io::Read>(reader: R, options: ParseOptions) -> Result<Self, Error> {
        parsing::sheet::parse_reader(reader, options)
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> SheetId {
        self.id
    }

    /// Where this sheet was read from. Provenance only.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    #[must_use]
    pub fn header(&self) -> &Section {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Section {
        &mut self.header
    }

    #[must_use]
    pub fn settings(&self) -> &Section {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Section {
        &mut self.settings
    }

    /// Cycle counts from `[Reads]`, one per sequencing read.
    #[must_use]
    pub fn reads(&self) -> &[u32] {
        &self.reads
    }

    pub fn set_reads(&mut self, reads: Vec<u32>) {
        self.reads = reads;
    }

    pub(crate) fn push_read(&mut self, cycles: u32) {
        self.reads.push(cycles);
    }

    /// `None` until `[Reads]` is populated, then whether there is exactly one read.
    #[must_use]
    pub fn is_single_end(&self) -> Option<bool> {
        (!self.reads.is_empty()).then_some(self.reads.len() == 1)
    }

    /// `None` until `[Reads]` is populated, then whether there are exactly two reads.
    #[must_use]
    pub fn is_paired_end(&self) -> Option<bool> {
        (!self.reads.is_empty()).then_some(self.reads.len() == 2)
    }

    /// The read structure every sample must share, if one is known.
    #[must_use]
    pub fn read_structure(&self) -> Option<&ReadStructure> {
        self.read_structure.as_ref()
    }

    pub fn set_read_structure(&mut self, read_structure: Option<ReadStructure>) {
        self.read_structure = read_structure;
    }

    /// Whether admitted samples carry `index`; `None` before the first sample.
    #[must_use]
    pub fn samples_have_index(&self) -> Option<bool> {
        self.samples_have_index
    }

    /// Whether admitted samples carry `index2`; `None` before the first sample.
    #[must_use]
    pub fn samples_have_index2(&self) -> Option<bool> {
        self.samples_have_index2
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Register a new custom section.
    ///
    /// Whitespace in the name is collapsed to underscores.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if the name is empty, reserved, or
    /// already registered.
    pub fn add_section(&mut self, name: &str) -> Result<&mut Section, Error> {
        let name = normalize_whitespace(name.trim());
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "Section name must not be empty".to_string(),
            ));
        }
        if is_required_section(&name) {
            return Err(Error::InvalidArgument(format!(
                "Section name is reserved: {name}"
            )));
        }
        if self.custom_position(&name).is_some() {
            return Err(Error::InvalidArgument(format!(
                "Section already exists: {name}"
            )));
        }

        debug!(section = %name, "Adding section");
        self.sections.push((name, Section::new()));
        let last = self.sections.len() - 1;
        Ok(&mut self.sections[last].1)
    }

    fn custom_position(&self, name: &str) -> Option<usize> {
        let name = normalize_whitespace(name.trim());
        self.sections
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(&name))
    }

    /// Look up `Header`, `Settings`, or a custom section by name, ignoring case.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        if name.eq_ignore_ascii_case("Header") {
            Some(&self.header)
        } else if name.eq_ignore_ascii_case("Settings") {
            Some(&self.settings)
        } else {
            self.custom_position(name).map(|i| &self.sections[i].1)
        }
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut Section> {
        if name.eq_ignore_ascii_case("Header") {
            Some(&mut self.header)
        } else if name.eq_ignore_ascii_case("Settings") {
            Some(&mut self.settings)
        } else {
            self.custom_position(name).map(|i| &mut self.sections[i].1)
        }
    }

    /// Custom section names in first-seen order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|(name, _)| name.as_str())
    }

    /// Custom sections in first-seen order.
    pub fn custom_sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(name, s)| (name.as_str(), s))
    }

    /// Keys supplied by any sample, discovered first by sample order and then
    /// by key order within each sample.
    #[must_use]
    pub fn all_sample_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = Vec::new();
        for key in self.samples.iter().flat_map(Sample::supplied_keys) {
            if !keys.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Admit a sample after checking it against every sample already admitted.
    ///
    /// On success the sample is appended and linked to this sheet. The first
    /// sample fixes [`samples_have_index`](Self::samples_have_index),
    /// [`samples_have_index2`](Self::samples_have_index2), and, when the sheet
    /// has none yet, the sheet's read structure.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingSampleId`, `Error::IncompatibleReadStructure`,
    /// `Error::ReadStructureMismatch`, `Error::DuplicateSample` (unless the
    /// sheet's duplicate policy is `Warn`), `Error::MissingIndex`, or
    /// `Error::IndexCollision`. The sheet is unchanged on error.
    pub fn add_sample(&mut self, mut sample: Sample) -> Result<(), Error> {
        if sample.sample_id().is_none() {
            return Err(Error::MissingSampleId);
        }

        let first = self.samples.is_empty();
        let inherit = first && self.read_structure.is_none() && sample.read_structure().is_some();

        if inherit {
            if let Some(rs) = sample.read_structure() {
                let incompatible = (self.is_paired_end() == Some(true) && !rs.is_paired_end())
                    || (self.is_single_end() == Some(true) && !rs.is_single_end());
                if incompatible {
                    return Err(Error::IncompatibleReadStructure {
                        reads: self.reads.clone(),
                        structure: rs.to_string(),
                    });
                }
            }
        }

        let sheet_rs = if inherit {
            sample.read_structure()
        } else {
            self.read_structure.as_ref()
        };
        if sheet_rs != sample.read_structure() {
            return Err(Error::ReadStructureMismatch {
                sample: display_optional(sample.read_structure()),
                sheet: display_optional(sheet_rs),
            });
        }

        let (have_index, have_index2) = if first {
            (sample.index().is_some(), sample.index2().is_some())
        } else {
            (
                self.samples_have_index.unwrap_or(false),
                self.samples_have_index2.unwrap_or(false),
            )
        };

        for other in &self.samples {
            if sample == *other {
                match self.options.duplicates {
                    DuplicatePolicy::Error => {
                        return Err(Error::DuplicateSample {
                            sample: sample.to_string(),
                            other: other.to_string(),
                        });
                    }
                    DuplicatePolicy::Warn => {
                        warn!(
                            sample = %sample,
                            library = sample.library_id().unwrap_or_default(),
                            lane = sample.lane().unwrap_or_default(),
                            "Two equivalent samples added"
                        );
                    }
                }
            }

            if have_index && sample.index().is_none() {
                return Err(Error::MissingIndex {
                    sample: sample.to_string(),
                    key: "index",
                });
            }
            if have_index2 && sample.index2().is_none() {
                return Err(Error::MissingIndex {
                    sample: sample.to_string(),
                    key: "index2",
                });
            }

            let same_lane = sample.lane() == other.lane();
            let collides = match (have_index, have_index2) {
                (true, true) => {
                    sample.index() == other.index() && sample.index2() == other.index2()
                }
                (true, false) => sample.index() == other.index(),
                (false, true) => sample.index2() == other.index2(),
                (false, false) => false,
            };
            if collides && same_lane {
                return Err(Error::IndexCollision {
                    sample: sample.to_string(),
                    other: other.to_string(),
                });
            }
        }

        if first {
            self.samples_have_index = Some(have_index);
            self.samples_have_index2 = Some(have_index2);
        }
        if inherit {
            self.read_structure = sample.read_structure().map(ReadStructure::copy);
        }

        sample.set_sheet(self.id);
        debug!(sample = %sample, "Admitted sample");
        self.samples.push(sample);
        Ok(())
    }

    /// Admit samples in order, stopping at the first rejection.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`add_sample`](Self::add_sample). Samples
    /// admitted before it remain on the sheet.
    pub fn add_samples(&mut self, samples: impl IntoIterator<Item = Sample>) -> Result<(), Error> {
        for sample in samples {
            self.add_sample(sample)?;
        }
        Ok(())
    }
}

fn display_optional(rs: Option<&ReadStructure>) -> String {
    rs.map_or_else(|| "None".to_string(), ToString::to_string)
}

impl FromStr for SampleSheet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsing::sheet::parse_text(s, ParseOptions::default())
    }
}

impl<'a> IntoIterator for &'a SampleSheet {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
