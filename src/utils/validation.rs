//! Centralized validation and helper functions.

use crate::core::options::IndexValidation;

/// Section names with fixed meaning; they can never be custom sections.
pub const REQUIRED_SECTIONS: [&str; 4] = ["Header", "Settings", "Reads", "Data"];

/// Check that a character is allowed in a sample sheet.
///
/// The Illumina format permits printable ASCII plus carriage return and line
/// feed. Tabs and all other control characters are rejected.
///
/// # Examples
///
/// ```
/// use sample_sheet::utils::validation::is_valid_character;
///
/// assert!(is_valid_character('A'));
/// assert!(is_valid_character(' '));
/// assert!(!is_valid_character('\t'));
/// assert!(!is_valid_character('😃'));
/// ```
#[must_use]
pub fn is_valid_character(c: char) -> bool {
    matches!(c, ' '..='~' | '\r' | '\n')
}

/// Check that every character of every field is allowed in a sample sheet.
#[must_use]
pub fn all_valid_characters<'a>(mut fields: impl Iterator<Item = &'a str>) -> bool {
    fields.all(|field| field.chars().all(is_valid_character))
}

/// Collapse each run of whitespace in a key into a single underscore.
///
/// # Examples
///
/// ```
/// use sample_sheet::utils::validation::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("Investigator Name"), "Investigator_Name");
/// assert_eq!(normalize_whitespace("Read   Structure"), "Read_Structure");
/// assert_eq!(normalize_whitespace("Sample_ID"), "Sample_ID");
/// ```
#[must_use]
pub fn normalize_whitespace(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_whitespace = false;
    for c in key.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

/// Lookup form of a key: whitespace collapsed to underscores, then lowercased.
#[must_use]
pub fn lookup_key(key: &str) -> String {
    normalize_whitespace(key).to_ascii_lowercase()
}

/// Whether a key names the read structure column, ignoring case and underscores.
#[must_use]
pub fn is_read_structure_key(key: &str) -> bool {
    lookup_key(key).replace('_', "") == "readstructure"
}

/// Whether a key names an index column: `index`, `index2`, or `index<digit>`.
#[must_use]
pub fn is_index_key(key: &str) -> bool {
    let key = lookup_key(key);
    match key.strip_prefix("index") {
        Some("") => true,
        Some(rest) => rest.len() == 1 && rest.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Whether a value is only uppercase `A`, `C`, `G`, `T`, `N`. The empty string is valid.
#[must_use]
pub fn is_valid_index_bases(value: &str) -> bool {
    value.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'T' | 'N'))
}

/// Whether a value looks like an index kit well name such as `SI-GA-H1`.
#[must_use]
pub fn is_index_kit_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}

/// Validate an index value under the given validation mode.
#[must_use]
pub fn is_valid_index(value: &str, mode: IndexValidation) -> bool {
    match mode {
        IndexValidation::Bases => is_valid_index_bases(value),
        IndexValidation::AllowKitNames => {
            is_valid_index_bases(value) || is_index_kit_name(value)
        }
    }
}

/// Whether a section name is one of the four reserved names, ignoring case.
#[must_use]
pub fn is_required_section(name: &str) -> bool {
    REQUIRED_SECTIONS.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_index_key() {
        assert!(is_index_key("index"));
        assert!(is_index_key("index2"));
        assert!(is_index_key("Index"));
        assert!(is_index_key("INDEX2"));
        assert!(is_index_key("index3"));
        assert!(!is_index_key("index22"));
        assert!(!is_index_key("indexes"));
        assert!(!is_index_key("I7_Index_ID"));
        assert!(!is_index_key("Sample_ID"));
    }

    #[test]
    fn test_is_read_structure_key() {
        assert!(is_read_structure_key("Read_Structure"));
        assert!(is_read_structure_key("read structure"));
        assert!(is_read_structure_key("ReadStructure"));
        assert!(is_read_structure_key("READ__STRUCTURE"));
        assert!(!is_read_structure_key("Read_Structures"));
    }

    #[test]
    fn test_index_validation_modes() {
        assert!(is_valid_index("ACGTN", IndexValidation::Bases));
        assert!(is_valid_index("", IndexValidation::Bases));
        assert!(!is_valid_index("ACUGTN", IndexValidation::Bases));
        assert!(!is_valid_index("acgt", IndexValidation::Bases));
        assert!(!is_valid_index("SI-GA-H1", IndexValidation::Bases));

        assert!(is_valid_index("SI-GA-H1", IndexValidation::AllowKitNames));
        assert!(is_valid_index("ACGT", IndexValidation::AllowKitNames));
        assert!(!is_valid_index("-GA", IndexValidation::AllowKitNames));
        assert!(!is_valid_index("SI GA", IndexValidation::AllowKitNames));
    }

    #[test]
    fn test_valid_characters() {
        assert!(all_valid_characters(["Sample_ID", "a, b!"].into_iter()));
        assert!(!all_valid_characters(["ok", "bad 😃 description"].into_iter()));
        assert!(!all_valid_characters(["caf\u{e9}"].into_iter()));
        assert!(!all_valid_characters(["\u{7f}"].into_iter()));
    }
}
