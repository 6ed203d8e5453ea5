use std::io::Write;

use crate::error::Error;
use crate::sheet::SampleSheet;

impl SampleSheet {
    /// Number of fields every written row is padded to.
    #[must_use]
    pub fn csv_width(&self) -> usize {
        self.all_sample_keys().len().max(2)
    }

    /// Write the sheet as Illumina sample sheet text.
    ///
    /// Sections are written in the order `[Header]`, `[Reads]`, custom
    /// sections in first-seen order, `[Settings]`, each followed by
    /// `blank_lines` empty rows, then `[Data]`. Every row, section markers
    /// included, is padded with empty fields to [`csv_width`](Self::csv_width).
    /// Parsing the output yields an equal sheet, except that leading spaces
    /// in values are dropped on the way back in.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` before anything is written if
    /// `blank_lines` is zero, or if a value in the first column would read
    /// back as a section marker such as `[Data]`. Otherwise an I/O or CSV
    /// error from the writer.
    pub fn write<W: Write>(&self, writer: W, blank_lines: usize) -> Result<(), Error> {
        if blank_lines == 0 {
            return Err(Error::InvalidArgument(
                "Number of blank lines must be a positive integer".to_string(),
            ));
        }

        let keys = self.all_sample_keys();
        self.check_first_column(&keys)?;
        let width = keys.len().max(2);
        let mut csv = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        let mut write_row = |fields: &[&str]| -> Result<(), Error> {
            csv.write_record(pad(fields, width))?;
            Ok(())
        };

        write_row(&["[Header]"])?;
        for (key, value) in self.header().iter_original() {
            write_row(&[key, value])?;
        }
        for _ in 0..blank_lines {
            write_row(&[])?;
        }

        write_row(&["[Reads]"])?;
        for read in self.reads() {
            write_row(&[read.to_string().as_str()])?;
        }
        for _ in 0..blank_lines {
            write_row(&[])?;
        }

        for (name, section) in self.custom_sections() {
            write_row(&[format!("[{name}]").as_str()])?;
            for (key, value) in section.iter_original() {
                write_row(&[key, value])?;
            }
            for _ in 0..blank_lines {
                write_row(&[])?;
            }
        }

        write_row(&["[Settings]"])?;
        for (key, value) in self.settings().iter_original() {
            write_row(&[key, value])?;
        }
        for _ in 0..blank_lines {
            write_row(&[])?;
        }

        write_row(&["[Data]"])?;
        let header: Vec<&str> = keys.iter().map(String::as_str).collect();
        write_row(&header)?;
        for sample in self.iter() {
            let row: Vec<&str> = keys
                .iter()
                .map(|key| sample.get(key).unwrap_or_default())
                .collect();
            write_row(&row)?;
        }

        drop(write_row);
        csv.flush()?;
        Ok(())
    }

    /// The sheet as text with one blank row between sections.
    ///
    /// # Errors
    ///
    /// Returns a CSV error if a record cannot be encoded.
    pub fn to_csv_string(&self) -> Result<String, Error> {
        let mut buffer = Vec::new();
        self.write(&mut buffer, 1)?;
        String::from_utf8(buffer).map_err(|e| Error::InvalidCharacters(e.to_string()))
    }
}

impl SampleSheet {
    fn check_first_column(&self, keys: &[String]) -> Result<(), Error> {
        let section_keys = self
            .header()
            .iter_original()
            .chain(self.settings().iter_original())
            .chain(self.custom_sections().flat_map(|(_, s)| s.iter_original()))
            .map(|(key, _)| key);
        let data_values = keys.first().into_iter().flat_map(move |first| {
            std::iter::once(first.as_str()).chain(self.iter().filter_map(move |s| s.get(first)))
        });

        match section_keys.chain(data_values).find(|f| reads_as_section(f)) {
            Some(field) => Err(Error::InvalidArgument(format!(
                "Cannot write '{field}' in the first column; it would be read as a section"
            ))),
            None => Ok(()),
        }
    }
}

/// A first-column field the parser takes for a section marker.
fn reads_as_section(field: &str) -> bool {
    field
        .trim_start_matches(' ')
        .strip_prefix('[')
        .is_some_and(|rest| rest.contains(']'))
}

fn pad<'a>(fields: &[&'a str], width: usize) -> Vec<&'a str> {
    let mut row = fields.to_vec();
    row.resize(width.max(fields.len()), "");
    row
}

#[cfg(test)]
mod tests {
    use crate::core::options::ParseOptions;
    use crate::core::sample::Sample;
    use crate::error::ErrorKind;
    use crate::sheet::SampleSheet;

    const SHEET: &str = "\
[Header],,,,
IEMFileVersion,4,,,
Investigator Name,jdoe,,,
,,,,
[Reads],,,,
151,,,,
151,,,,
,,,,
[Manifests],,,,
PoolRNA,RNAMatrix.txt,,,
,,,,
[Settings],,,,
CreateFastqForIndexReads,1,,,
,,,,
[Data],,,,
Sample_ID,Sample_Name,Library_ID,index,Description
1823A,1823A-tissue,2017-01-20,GAATCTGA,\"0.5x, treatment\"
1823B,1823B-tissue,2017-01-20,AGCAGGAA,0.5x treatment
";

    #[test]
    fn test_canonical_text_is_reproduced() {
        let sheet: SampleSheet = SHEET.parse().unwrap();
        assert_eq!(sheet.to_csv_string().unwrap(), SHEET);
    }

    #[test]
    fn test_round_trip() {
        let sheet: SampleSheet = SHEET.parse().unwrap();
        let mut buffer = Vec::new();
        sheet.write(&mut buffer, 3).unwrap();
        let reparsed = SampleSheet::from_reader(buffer.as_slice(), ParseOptions::default()).unwrap();

        assert_eq!(reparsed.header(), sheet.header());
        assert_eq!(reparsed.settings(), sheet.settings());
        assert_eq!(reparsed.reads(), sheet.reads());
        assert_eq!(reparsed.section("Manifests"), sheet.section("Manifests"));
        assert_eq!(reparsed.len(), sheet.len());
        for (a, b) in reparsed.iter().zip(sheet.iter()) {
            assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_zero_blank_lines_writes_nothing() {
        let sheet = SampleSheet::new();
        let mut buffer = Vec::new();
        let err = sheet.write(&mut buffer, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_minimum_width_and_absent_fields() {
        let mut sheet = SampleSheet::new();
        sheet.add_sample(Sample::new([("Sample_ID", "49")]).unwrap()).unwrap();
        sheet
            .add_sample(Sample::new([("Sample_ID", "23"), ("Key1", "x")]).unwrap())
            .unwrap();
        let text = sheet.to_csv_string().unwrap();
        assert!(text.ends_with("[Data],\nSample_ID,Key1\n49,\n23,x\n"));

        let mut sheet = SampleSheet::new();
        sheet.add_sample(Sample::new([("Sample_ID", "49")]).unwrap()).unwrap();
        assert_eq!(sheet.csv_width(), 2);
        let reparsed: SampleSheet = sheet.to_csv_string().unwrap().parse().unwrap();
        assert_eq!(reparsed.samples()[0].sample_id(), Some("49"));
    }

    #[test]
    fn test_section_like_first_column_is_rejected() {
        let mut sheet = SampleSheet::new();
        sheet
            .add_sample(Sample::new([("Sample_ID", "[Data]"), ("Key1", "x")]).unwrap())
            .unwrap();
        let mut buffer = Vec::new();
        let err = sheet.write(&mut buffer, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
        assert!(err.to_string().contains("[Data]"));
        assert!(buffer.is_empty());

        let mut sheet = SampleSheet::new();
        sheet.header_mut().insert("[Custom]", "x");
        assert!(sheet.to_csv_string().is_err());

        // Brackets later in the row or without a closing bracket are fine
        let mut sheet = SampleSheet::new();
        sheet
            .add_sample(Sample::new([("Sample_ID", "[49"), ("Key1", "[x]")]).unwrap())
            .unwrap();
        let reparsed: SampleSheet = sheet.to_csv_string().unwrap().parse().unwrap();
        assert_eq!(reparsed.samples()[0].sample_id(), Some("[49"));
    }

    #[test]
    fn test_leading_spaces_in_values_are_dropped() {
        let mut sheet = SampleSheet::new();
        sheet.header_mut().insert("Description", "  padded");
        let reparsed: SampleSheet = sheet.to_csv_string().unwrap().parse().unwrap();
        assert_eq!(reparsed.header().get("Description"), Some("padded"));
    }

    #[test]
    fn test_empty_sheet() {
        let text = SampleSheet::new().to_csv_string().unwrap();
        assert_eq!(
            text,
            "[Header],\n,\n[Reads],\n,\n[Settings],\n,\n[Data],\n,\n"
        );
        let reparsed: SampleSheet = text.parse().unwrap();
        assert!(reparsed.is_empty());
    }
}
