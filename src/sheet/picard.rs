//! Picard basecalling parameter files.
//!
//! Two tab-delimited files are written per lane:
//!
//! - `barcode_params.<lane>.txt` for `ExtractIlluminaBarcodes` and
//!   `CollectIlluminaBasecallingMetrics`
//! - `library_params.<lane>.txt` for `IlluminaBasecallsToSam`
//!
//! When samples carry `index2`, both files gain a second barcode column.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::sample::Sample;
use crate::error::Error;
use crate::sheet::SampleSheet;

impl SampleSheet {
    /// Write barcode and library parameter files for each lane.
    ///
    /// BAM outputs are named
    /// `<bam_prefix>/<Sample_Name>.<Library_ID>/<Sample_Name>.<index><index2>.<lane>.bam`,
    /// and each library file ends with an `unmatched` row. `directory` is
    /// created if missing. Returns the paths written, barcode file first, in
    /// lane order.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoSamples` for an empty sheet, `Error::InvalidArgument`
    /// when `lanes` is empty, when a sample lacks `Sample_Name`, `Library_ID`,
    /// or `index`, or when `index`/`index2` lengths differ between samples,
    /// and an I/O or CSV error if a file cannot be written.
    pub fn to_picard_basecalling_params(
        &self,
        directory: impl AsRef<Path>,
        bam_prefix: impl AsRef<Path>,
        lanes: &[u32],
    ) -> Result<Vec<PathBuf>, Error> {
        if self.is_empty() {
            return Err(Error::NoSamples);
        }
        if lanes.is_empty() {
            return Err(Error::InvalidArgument(
                "At least one lane is required".to_string(),
            ));
        }
        if !uniform_length(self.iter().map(Sample::index)) {
            return Err(Error::InvalidArgument(
                "I7 indexes have differing lengths".to_string(),
            ));
        }
        if !uniform_length(self.iter().map(Sample::index2)) {
            return Err(Error::InvalidArgument(
                "I5 indexes have differing lengths".to_string(),
            ));
        }
        if let Some(sample) = self
            .iter()
            .find(|s| s.sample_name().is_none() || s.library_id().is_none() || s.index().is_none())
        {
            return Err(Error::InvalidArgument(format!(
                "Sample '{sample}' must have `Sample_Name`, `Library_ID`, and `index` set"
            )));
        }

        let directory = directory.as_ref();
        let bam_prefix = bam_prefix.as_ref();
        fs::create_dir_all(directory)?;

        let dual = self.samples_have_index2().unwrap_or(false);
        let mut written = Vec::with_capacity(lanes.len() * 2);

        for &lane in lanes {
            let barcode_path = directory.join(format!("barcode_params.{lane}.txt"));
            let library_path = directory.join(format!("library_params.{lane}.txt"));

            let mut barcodes = tsv_writer(&barcode_path)?;
            let mut libraries = tsv_writer(&library_path)?;

            barcodes.write_record(with_barcodes(
                dual,
                ["barcode_sequence_1"],
                ["barcode_sequence_1", "barcode_sequence_2"],
                ["barcode_name", "library_name"],
            ))?;
            libraries.write_record(with_barcodes(
                dual,
                ["BARCODE_1"],
                ["BARCODE_1", "BARCODE_2"],
                ["OUTPUT", "SAMPLE_ALIAS", "LIBRARY_NAME", "DS"],
            ))?;

            for sample in self.iter() {
                let name = sample.sample_name().unwrap_or_default();
                let library = sample.library_id().unwrap_or_default();
                let index = sample.index().unwrap_or_default();
                let index2 = sample.index2().unwrap_or_default();
                let barcode_name = format!("{index}{index2}");
                let bam = bam_prefix
                    .join(format!("{name}.{library}"))
                    .join(format!("{name}.{barcode_name}.{lane}.bam"));
                let bam = bam.display().to_string();

                barcodes.write_record(with_barcodes(
                    dual,
                    [index],
                    [index, index2],
                    [barcode_name.as_str(), library],
                ))?;
                libraries.write_record(with_barcodes(
                    dual,
                    [index],
                    [index, index2],
                    [
                        bam.as_str(),
                        name,
                        library,
                        sample.description().unwrap_or_default(),
                    ],
                ))?;
            }

            let unmatched = bam_prefix.join(format!("unmatched.{lane}.bam"));
            let unmatched = unmatched.display().to_string();
            libraries.write_record(with_barcodes(
                dual,
                ["N"],
                ["N", "N"],
                [unmatched.as_str(), "unmatched", "unmatchedunmatched", ""],
            ))?;

            barcodes.flush()?;
            libraries.flush()?;
            info!(lane, path = %barcode_path.display(), "Wrote barcode parameters");
            info!(lane, path = %library_path.display(), "Wrote library parameters");

            written.push(barcode_path);
            written.push(library_path);
        }

        Ok(written)
    }
}

/// Whether every value has the same length, counting an absent value as zero.
fn uniform_length<'a>(values: impl Iterator<Item = Option<&'a str>>) -> bool {
    values
        .map(|v| v.map_or(0, str::len))
        .collect::<HashSet<_>>()
        .len()
        <= 1
}

fn with_barcodes<'a, const N: usize>(
    dual: bool,
    single: [&'a str; 1],
    both: [&'a str; 2],
    rest: [&'a str; N],
) -> Vec<&'a str> {
    let mut row: Vec<&str> = if dual { both.to_vec() } else { single.to_vec() };
    row.extend(rest);
    row
}

fn tsv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>, Error> {
    let file = File::create(path)?;
    Ok(csv::WriterBuilder::new()
        .has_headers(false)
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use tempfile::TempDir;

    fn sheet(rows: &[&[(&str, &str)]]) -> SampleSheet {
        let mut sheet = SampleSheet::new();
        for row in rows {
            sheet.add_sample(Sample::new(row.iter().copied()).unwrap()).unwrap();
        }
        sheet
    }

    #[test]
    fn test_single_indexed_params() {
        let dir = TempDir::new().unwrap();
        let sheet = sheet(&[
            &[
                ("Sample_ID", "1823A"),
                ("Sample_Name", "1823A-tissue"),
                ("Library_ID", "2017-01-20"),
                ("index", "GAATCTGA"),
                ("Description", "0.5x treatment"),
            ],
            &[
                ("Sample_ID", "1823B"),
                ("Sample_Name", "1823B-tissue"),
                ("Library_ID", "2017-01-20"),
                ("index", "AGCAGGAA"),
            ],
        ]);

        let written = sheet
            .to_picard_basecalling_params(dir.path(), "/bams", &[1, 2])
            .unwrap();
        assert_eq!(written.len(), 4);
        assert!(written[2].ends_with("barcode_params.2.txt"));

        let barcodes = fs::read_to_string(dir.path().join("barcode_params.1.txt")).unwrap();
        assert_eq!(
            barcodes,
            "barcode_sequence_1\tbarcode_name\tlibrary_name\n\
             GAATCTGA\tGAATCTGA\t2017-01-20\n\
             AGCAGGAA\tAGCAGGAA\t2017-01-20\n"
        );

        let libraries = fs::read_to_string(dir.path().join("library_params.2.txt")).unwrap();
        assert_eq!(
            libraries,
            "BARCODE_1\tOUTPUT\tSAMPLE_ALIAS\tLIBRARY_NAME\tDS\n\
             GAATCTGA\t/bams/1823A-tissue.2017-01-20/1823A-tissue.GAATCTGA.2.bam\t1823A-tissue\t2017-01-20\t0.5x treatment\n\
             AGCAGGAA\t/bams/1823B-tissue.2017-01-20/1823B-tissue.AGCAGGAA.2.bam\t1823B-tissue\t2017-01-20\t\n\
             N\t/bams/unmatched.2.bam\tunmatched\tunmatchedunmatched\t\n"
        );
    }

    #[test]
    fn test_dual_indexed_params() {
        let dir = TempDir::new().unwrap();
        let sheet = sheet(&[&[
            ("Sample_ID", "1"),
            ("Sample_Name", "s1"),
            ("Library_ID", "lib"),
            ("index", "ACGT"),
            ("index2", "TTAA"),
        ]]);
        sheet
            .to_picard_basecalling_params(dir.path().join("nested"), "out", &[3])
            .unwrap();

        let barcodes =
            fs::read_to_string(dir.path().join("nested").join("barcode_params.3.txt")).unwrap();
        assert!(barcodes.starts_with("barcode_sequence_1\tbarcode_sequence_2\tbarcode_name"));
        assert!(barcodes.contains("ACGT\tTTAA\tACGTTTAA\tlib\n"));

        let libraries =
            fs::read_to_string(dir.path().join("nested").join("library_params.3.txt")).unwrap();
        assert!(libraries.starts_with("BARCODE_1\tBARCODE_2\tOUTPUT"));
        assert!(libraries.contains("out/s1.lib/s1.ACGTTTAA.3.bam"));
        assert!(libraries.ends_with("N\tN\tout/unmatched.3.bam\tunmatched\tunmatchedunmatched\t\n"));
    }

    #[test]
    fn test_preconditions() {
        let dir = TempDir::new().unwrap();

        let err = SampleSheet::new()
            .to_picard_basecalling_params(dir.path(), "bams", &[1])
            .unwrap_err();
        assert!(matches!(err, Error::NoSamples));

        let complete = sheet(&[&[
            ("Sample_ID", "1"),
            ("Sample_Name", "s1"),
            ("Library_ID", "lib"),
            ("index", "ACGT"),
        ]]);
        let err = complete
            .to_picard_basecalling_params(dir.path(), "bams", &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);

        let missing_name = sheet(&[&[("Sample_ID", "1"), ("Library_ID", "lib"), ("index", "ACGT")]]);
        assert!(missing_name
            .to_picard_basecalling_params(dir.path(), "bams", &[1])
            .is_err());

        let uneven = sheet(&[
            &[("Sample_ID", "1"), ("Sample_Name", "a"), ("Library_ID", "l"), ("index", "ACGT")],
            &[("Sample_ID", "2"), ("Sample_Name", "b"), ("Library_ID", "l"), ("index", "ACG")],
        ]);
        let err = uneven
            .to_picard_basecalling_params(dir.path(), "bams", &[1])
            .unwrap_err();
        assert!(err.to_string().contains("I7"));

        assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
    }
}
