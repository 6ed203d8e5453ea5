use serde_json::{json, Map, Value};

use crate::core::sample::Sample;
use crate::sheet::SampleSheet;

impl SampleSheet {
    /// Project the sheet onto plain JSON.
    ///
    /// The object holds `Header`, `Reads`, `Settings`, and `Data` (an array
    /// with one object per sample), followed by one object per custom section.
    /// Key order follows the sheet.
    ///
    /// # Examples
    ///
    /// ```
    /// use sample_sheet::SampleSheet;
    ///
    /// let sheet: SampleSheet = "[Reads]\n151\n[Data]\nSample_ID\n49\n".parse().unwrap();
    /// assert_eq!(
    ///     sheet.to_json().to_string(),
    ///     r#"{"Header":{},"Reads":[151],"Settings":{},"Data":[{"Sample_ID":"49"}]}"#
    /// );
    /// ```
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut content = Map::new();
        content.insert("Header".to_string(), json!(self.header()));
        content.insert("Reads".to_string(), json!(self.reads()));
        content.insert("Settings".to_string(), json!(self.settings()));
        content.insert(
            "Data".to_string(),
            Value::Array(self.iter().map(Sample::to_json).collect()),
        );
        for (name, section) in self.custom_sections() {
            content.insert(name.to_string(), json!(section));
        }
        Value::Object(content)
    }
}

#[cfg(test)]
mod tests {
    use crate::sheet::SampleSheet;

    #[test]
    fn test_to_json_layout() {
        let text = "\
[Header]
Investigator Name,jdoe
[Reads]
151
151
[Manifests]
PoolRNA,RNAMatrix.txt
[Settings]
Adapter,AGATCGGAAGAGCACACGTCTGAACTCCAGTCA
[Data]
Sample_ID,index
1823A,GAATCTGA
";
        let sheet: SampleSheet = text.parse().unwrap();
        let value = sheet.to_json();

        assert_eq!(value["Header"]["Investigator Name"], "jdoe");
        assert_eq!(value["Reads"][1], 151);
        assert_eq!(value["Settings"]["Adapter"], "AGATCGGAAGAGCACACGTCTGAACTCCAGTCA");
        assert_eq!(value["Data"][0]["index"], "GAATCTGA");
        assert_eq!(value["Manifests"]["PoolRNA"], "RNAMatrix.txt");

        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Header", "Reads", "Settings", "Data", "Manifests"]);
    }
}
