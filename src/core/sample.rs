use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::options::IndexValidation;
use crate::core::read_structure::ReadStructure;
use crate::core::section::Section;
use crate::error::Error;
use crate::sheet::SheetId;
use crate::utils::validation::{is_index_key, is_read_structure_key, is_valid_index};

/// The only column Illumina requires in `[Data]`.
pub const REQUIRED_KEYS: [&str; 1] = ["Sample_ID"];

/// Columns this library recommends every sample define.
pub const RECOMMENDED_KEYS: [&str; 3] = ["Sample_ID", "Sample_Name", "index"];

/// A single row of the `[Data]` section.
///
/// Keys are whitespace-normalized and looked up ignoring case; missing keys
/// read as `None`. A `Read_Structure` column (in any case, with any number of
/// underscores) is promoted to a [`ReadStructure`], and `index`/`index2`
/// columns are validated as sample barcodes.
///
/// Two samples are equal when their `Sample_ID`, `Library_ID`, and `Lane`
/// are equal; every other field is ignored.
///
/// # Examples
///
/// ```
/// use sample_sheet::Sample;
///
/// let sample = Sample::new([("Sample_ID", "87"), ("Sample_Name", "3T"), ("index", "A")]).unwrap();
/// assert_eq!(sample.sample_name(), Some("3T"));
/// assert_eq!(sample.get("SAMPLE_NAME"), Some("3T"));
/// assert_eq!(sample.lane(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Sample {
    fields: Section,
    read_structure: Option<ReadStructure>,
    sheet: Option<SheetId>,
}

impl Sample {
    /// Build a sample validating index columns as bases.
    ///
    /// # Errors
    ///
    /// See [`Sample::with_index_validation`].
    pub fn new<I, K, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::with_index_validation(pairs, IndexValidation::Bases)
    }

    /// Build a sample from ordered key/value pairs.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidReadStructure` for a malformed read structure,
    /// `Error::InvalidIndex` for an index value the mode rejects, or
    /// `Error::MissingIndexForReadStructure` when an indexed read structure
    /// lacks the `index`/`index2` values it needs.
    pub fn with_index_validation<I, K, V>(pairs: I, mode: IndexValidation) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = Section::new();
        let mut read_structure = None;

        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();

            if is_read_structure_key(&key) {
                read_structure = Some(ReadStructure::parse(&value)?);
            }

            if is_index_key(&key) && !is_valid_index(&value, mode) {
                return Err(Error::InvalidIndex { key, value });
            }

            fields.insert(key, value);
        }

        let sample = Self {
            fields,
            read_structure,
            sheet: None,
        };
        sample.check_index_design()?;
        Ok(sample)
    }

    fn check_index_design(&self) -> Result<(), Error> {
        let Some(rs) = &self.read_structure else {
            return Ok(());
        };

        let (design, required): (&'static str, &[&'static str]) = if rs.is_single_indexed() {
            ("single", &["index"])
        } else if rs.is_dual_indexed() {
            ("dual", &["index", "index2"])
        } else {
            return Ok(());
        };

        match required.iter().find(|key| self.get(key).is_none()) {
            Some(key) => Err(Error::MissingIndexForReadStructure {
                sample: self.to_string(),
                structure: rs.to_string(),
                design,
                key,
            }),
            None => Ok(()),
        }
    }

    /// Look up a field ignoring case and whitespace style.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The promoted `Read_Structure` column, if supplied.
    #[must_use]
    pub fn read_structure(&self) -> Option<&ReadStructure> {
        self.read_structure.as_ref()
    }

    #[must_use]
    pub fn sample_id(&self) -> Option<&str> {
        self.get("Sample_ID")
    }

    #[must_use]
    pub fn sample_name(&self) -> Option<&str> {
        self.get("Sample_Name")
    }

    #[must_use]
    pub fn library_id(&self) -> Option<&str> {
        self.get("Library_ID")
    }

    #[must_use]
    pub fn lane(&self) -> Option<&str> {
        self.get("Lane")
    }

    #[must_use]
    pub fn index(&self) -> Option<&str> {
        self.get("index")
    }

    #[must_use]
    pub fn index2(&self) -> Option<&str> {
        self.get("index2")
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.get("Description")
    }

    /// Recommended keys first, then any other supplied keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = RECOMMENDED_KEYS.iter().map(ToString::to_string).collect();
        for key in self.fields.keys() {
            if !RECOMMENDED_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key)) {
                keys.push(key.to_string());
            }
        }
        keys
    }

    /// Only the keys actually supplied, in the order they were supplied.
    pub fn supplied_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    /// Supplied `(key, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Supplied fields as a JSON object of strings.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::Value::Object(map)
    }

    /// The sheet this sample was admitted to, if any.
    #[must_use]
    pub fn sheet(&self) -> Option<SheetId> {
        self.sheet
    }

    pub(crate) fn set_sheet(&mut self, id: SheetId) {
        self.sheet = Some(id);
    }
}

impl PartialEq for Sample {
    fn eq(&self, other: &Self) -> bool {
        self.sample_id() == other.sample_id()
            && self.library_id() == other.library_id()
            && self.lane() == other.lane()
    }
}

impl Eq for Sample {}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sample_id().unwrap_or_default())
    }
}

impl Serialize for Sample {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
