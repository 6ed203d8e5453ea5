use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use ::read_structure::{ReadSegment, SegmentType};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One or more `<digits><operator>` tokens and nothing else.
fn grammar() -> &'static Regex {
    static GRAMMAR: OnceLock<Regex> = OnceLock::new();
    GRAMMAR.get_or_init(|| {
        Regex::new(r"^(?:[0-9]+[BMST])+$").expect("Failed to compile read structure grammar")
    })
}

fn token() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"[0-9]+[BMST]").expect("Failed to compile read structure token"))
}

/// The kind of bases described by one read structure segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `T`: template bases (experimental DNA or RNA)
    Template,
    /// `S`: bases to be skipped
    Skip,
    /// `B`: sample barcode bases
    SampleIndex,
    /// `M`: molecular identifier (UMI) bases
    MolecularIndex,
}

impl Operator {
    /// The operator for a segment kind, or `None` for kinds a sample sheet
    /// does not use (e.g. cellular barcodes).
    #[must_use]
    pub fn from_segment_type(kind: SegmentType) -> Option<Self> {
        match kind {
            SegmentType::Template => Some(Operator::Template),
            SegmentType::Skip => Some(Operator::Skip),
            SegmentType::SampleBarcode => Some(Operator::SampleIndex),
            SegmentType::MolecularBarcode => Some(Operator::MolecularIndex),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    #[must_use]
    pub fn code(self) -> char {
        match self {
            Operator::Template => 'T',
            Operator::Skip => 'S',
            Operator::SampleIndex => 'B',
            Operator::MolecularIndex => 'M',
        }
    }
}

/// One `<cycles><operator>` token of a read structure, e.g. `141T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub cycles: u64,
    pub operator: Operator,
}

impl Segment {
    /// Fixed-length segments with a positive length only. Variable-length
    /// (`+`) segments have no place in a sample sheet.
    fn from_read_segment(segment: &ReadSegment) -> Option<Self> {
        let cycles = u64::try_from(segment.length()?).ok().filter(|&c| c > 0)?;
        let operator = Operator::from_segment_type(segment.kind)?;
        Some(Self { cycles, operator })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.cycles, self.operator.code())
    }
}

/// The order, number, and type of bases in a sequencing read.
///
/// A read structure is one or more `<number><operator>` tokens where the
/// operator is one of:
///
/// | Operator | Description |
/// |----------|-------------|
/// | `T` | Template base (e.g. experimental DNA, RNA) |
/// | `S` | Bases to be skipped or ignored |
/// | `B` | Bases used as an index to identify the sample |
/// | `M` | Bases used as an index to identify the molecule |
///
/// The value is validated on construction and never changes afterwards. All
/// counts and classifications are derived from the canonical string.
///
/// # Examples
///
/// ```
/// use sample_sheet::ReadStructure;
///
/// let rs: ReadStructure = "10M141T8B".parse().unwrap();
/// assert!(!rs.is_paired_end());
/// assert!(rs.has_umi());
/// assert_eq!(rs.tokens(), vec!["10M", "141T", "8B"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReadStructure {
    structure: String,
    segments: Vec<Segment>,
}

impl ReadStructure {
    /// Parse and validate a read structure.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidReadStructure` unless the whole string is one or
    /// more `<digits><B|M|S|T>` tokens, each with a positive cycle count.
    pub fn parse(structure: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidReadStructure(structure.to_string());
        if !grammar().is_match(structure) {
            return Err(invalid());
        }

        let layout = ::read_structure::ReadStructure::from_str(structure).map_err(|_| invalid())?;
        let segments = layout
            .iter()
            .map(Segment::from_read_segment)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        Ok(Self {
            structure: structure.to_string(),
            segments,
        })
    }

    /// The canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.structure
    }

    /// An independently owned, equal read structure.
    #[must_use]
    pub fn copy(&self) -> Self {
        self.clone()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// All tokens in order as written, e.g. `["10M", "141T", "8B"]`.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        token()
            .find_iter(&self.structure)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn tokens_of(&self, operator: Operator) -> Vec<String> {
        self.tokens()
            .into_iter()
            .zip(&self.segments)
            .filter(|(_, s)| s.operator == operator)
            .map(|(t, _)| t)
            .collect()
    }

    fn count_of(&self, operator: Operator) -> usize {
        self.segments
            .iter()
            .filter(|s| s.operator == operator)
            .count()
    }

    fn cycles_of(&self, operator: Operator) -> u64 {
        self.segments
            .iter()
            .filter(|s| s.operator == operator)
            .map(|s| s.cycles)
            .sum()
    }

    #[must_use]
    pub fn template_tokens(&self) -> Vec<String> {
        self.tokens_of(Operator::Template)
    }

    #[must_use]
    pub fn skip_tokens(&self) -> Vec<String> {
        self.tokens_of(Operator::Skip)
    }

    #[must_use]
    pub fn index_tokens(&self) -> Vec<String> {
        self.tokens_of(Operator::SampleIndex)
    }

    #[must_use]
    pub fn umi_tokens(&self) -> Vec<String> {
        self.tokens_of(Operator::MolecularIndex)
    }

    #[must_use]
    pub fn template_cycles(&self) -> u64 {
        self.cycles_of(Operator::Template)
    }

    #[must_use]
    pub fn skip_cycles(&self) -> u64 {
        self.cycles_of(Operator::Skip)
    }

    #[must_use]
    pub fn index_cycles(&self) -> u64 {
        self.cycles_of(Operator::SampleIndex)
    }

    #[must_use]
    pub fn umi_cycles(&self) -> u64 {
        self.cycles_of(Operator::MolecularIndex)
    }

    /// Sum of cycles over every token regardless of operator.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.segments.iter().map(|s| s.cycles).sum()
    }

    /// Exactly one template token.
    #[must_use]
    pub fn is_single_end(&self) -> bool {
        self.count_of(Operator::Template) == 1
    }

    /// Exactly two template tokens. Three or more is neither single nor paired.
    #[must_use]
    pub fn is_paired_end(&self) -> bool {
        self.count_of(Operator::Template) == 2
    }

    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.count_of(Operator::SampleIndex) > 0
    }

    #[must_use]
    pub fn is_single_indexed(&self) -> bool {
        self.count_of(Operator::SampleIndex) == 1
    }

    #[must_use]
    pub fn is_dual_indexed(&self) -> bool {
        self.count_of(Operator::SampleIndex) == 2
    }

    #[must_use]
    pub fn has_umi(&self) -> bool {
        self.count_of(Operator::MolecularIndex) > 0
    }

    #[must_use]
    pub fn has_skips(&self) -> bool {
        self.count_of(Operator::Skip) > 0
    }
}

impl FromStr for ReadStructure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ReadStructure {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReadStructure> for String {
    fn from(value: ReadStructure) -> Self {
        value.structure
    }
}

impl fmt::Display for ReadStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_end_with_umi() {
        let rs = ReadStructure::parse("10M141T8B").unwrap();
        assert_eq!(rs.tokens(), vec!["10M", "141T", "8B"]);
        assert_eq!(rs.template_cycles(), 141);
        assert_eq!(rs.index_cycles(), 8);
        assert_eq!(rs.umi_cycles(), 10);
        assert_eq!(rs.skip_cycles(), 0);
        assert_eq!(rs.total_cycles(), 159);
        assert!(rs.is_single_end());
        assert!(!rs.is_paired_end());
        assert!(rs.is_single_indexed());
        assert!(!rs.is_dual_indexed());
        assert!(rs.has_umi());
        assert!(!rs.has_skips());
    }

    #[test]
    fn test_paired_end_dual_indexed() {
        let rs = ReadStructure::parse("10M141T8B8B10M141T").unwrap();
        assert!(rs.is_paired_end());
        assert!(!rs.is_single_end());
        assert!(rs.is_dual_indexed());
        assert_eq!(rs.index_cycles(), 16);
        assert_eq!(rs.template_cycles(), 282);
        assert_eq!(rs.umi_cycles(), 20);
        assert_eq!(rs.total_cycles(), 318);
        assert_eq!(rs.index_tokens(), vec!["8B", "8B"]);
        assert_eq!(rs.umi_tokens(), vec!["10M", "10M"]);
        assert_eq!(rs.template_tokens(), vec!["141T", "141T"]);
    }

    #[test]
    fn test_three_templates_is_neither_single_nor_paired() {
        let rs = ReadStructure::parse("50T50T50T").unwrap();
        assert!(!rs.is_single_end());
        assert!(!rs.is_paired_end());
    }

    #[test]
    fn test_skips() {
        let rs = ReadStructure::parse("2S149T").unwrap();
        assert!(rs.has_skips());
        assert_eq!(rs.skip_tokens(), vec!["2S"]);
        assert_eq!(rs.skip_cycles(), 2);
        assert!(!rs.is_indexed());
    }

    #[test]
    fn test_invalid_structures() {
        for s in [
            "200BAD", "141C28B", "151T20M8BB", "", "T", "151", "151t", " 151T", "151T ",
            "+T", "151T+T", "10C151T", "0T", "151T0B", "99999999999999999999999T",
        ] {
            assert!(
                ReadStructure::parse(s).is_err(),
                "'{s}' should not be a valid read structure"
            );
        }
    }

    #[test]
    fn test_large_cycle_counts_do_not_overflow() {
        let rs = ReadStructure::parse("4000000000T4000000000T").unwrap();
        assert_eq!(rs.template_cycles(), 8_000_000_000);
        assert_eq!(rs.total_cycles(), 8_000_000_000);
        assert!(rs.is_paired_end());
    }

    #[test]
    fn test_tokens_keep_their_spelling() {
        let rs = ReadStructure::parse("010M141T").unwrap();
        assert_eq!(rs.tokens(), vec!["010M", "141T"]);
        assert_eq!(rs.umi_tokens(), vec!["010M"]);
        assert_eq!(rs.umi_cycles(), 10);
        assert_eq!(rs.to_string(), "010M141T");
        assert_eq!(
            rs.segments(),
            &[
                Segment { cycles: 10, operator: Operator::MolecularIndex },
                Segment { cycles: 141, operator: Operator::Template },
            ]
        );
    }

    #[test]
    fn test_round_trip_and_equality() {
        for s in ["151T", "10M141T8B", "8B8B", "2S149T8B8B2S149T"] {
            let rs = ReadStructure::parse(s).unwrap();
            assert_eq!(rs.to_string(), s);
            assert_eq!(rs, ReadStructure::parse(s).unwrap());
            assert_eq!(ReadStructure::parse(&rs.to_string()).unwrap(), rs);
        }
        assert_ne!(
            ReadStructure::parse("115T").unwrap(),
            ReadStructure::parse("112T").unwrap()
        );
    }

    #[test]
    fn test_copy_is_equal() {
        let rs = ReadStructure::parse("151T8B").unwrap();
        let copy = rs.copy();
        assert_eq!(rs, copy);
        assert_eq!(copy.as_str(), "151T8B");
    }

    #[test]
    fn test_serde_as_string() {
        let rs: ReadStructure = serde_json::from_str("\"151T8B\"").unwrap();
        assert_eq!(serde_json::to_string(&rs).unwrap(), "\"151T8B\"");
        assert!(serde_json::from_str::<ReadStructure>("\"151X\"").is_err());
    }
}
