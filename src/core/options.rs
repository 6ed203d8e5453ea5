use serde::{Deserialize, Serialize};

/// How `[Data]` rows whose field count differs from the column header are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FieldCountPolicy {
    /// Reject the row with a format error
    #[default]
    Strict,
    /// Pair columns with values up to the shorter of the two
    Truncate,
}

/// How a sample equal to an already admitted sample is handled.
///
/// Equality is over (`Sample_ID`, `Library_ID`, `Lane`). Identical identifiers
/// across lanes or flowcells can be legitimate, so callers may opt into `Warn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    #[default]
    Error,
    Warn,
}

/// Which values are accepted in `index`/`index2` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IndexValidation {
    /// Uppercase `A`, `C`, `G`, `T`, `N` only
    #[default]
    Bases,
    /// Bases, or an index kit well name such as `SI-GA-H1`
    AllowKitNames,
}

/// Policies applied while parsing a sheet and admitting samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParseOptions {
    pub field_count: FieldCountPolicy,
    pub duplicates: DuplicatePolicy,
    pub index_validation: IndexValidation,
}

impl ParseOptions {
    /// Truncating field counts and warning on duplicate samples.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            field_count: FieldCountPolicy::Truncate,
            duplicates: DuplicatePolicy::Warn,
            index_validation: IndexValidation::Bases,
        }
    }

    #[must_use]
    pub fn with_field_count(mut self, policy: FieldCountPolicy) -> Self {
        self.field_count = policy;
        self
    }

    #[must_use]
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    #[must_use]
    pub fn with_index_validation(mut self, mode: IndexValidation) -> Self {
        self.index_validation = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_strict() {
        let options = ParseOptions::default();
        assert_eq!(options.field_count, FieldCountPolicy::Strict);
        assert_eq!(options.duplicates, DuplicatePolicy::Error);
        assert_eq!(options.index_validation, IndexValidation::Bases);
    }

    #[test]
    fn test_deserialize_partial_options() {
        let options: ParseOptions =
            serde_json::from_str(r#"{"duplicates": "warn", "index_validation": "allow-kit-names"}"#)
                .unwrap();
        assert_eq!(options.field_count, FieldCountPolicy::Strict);
        assert_eq!(options.duplicates, DuplicatePolicy::Warn);
        assert_eq!(options.index_validation, IndexValidation::AllowKitNames);
    }
}
