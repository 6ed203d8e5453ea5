//! # sample-sheet
//!
//! A library for reading, validating, and writing Illumina sample sheets.
//!
//! A sample sheet is a comma-delimited file split into bracketed sections:
//! `[Header]` and `[Settings]` hold key/value pairs, `[Reads]` lists the cycle
//! count of each read, and `[Data]` is a table with one row per sample. Any
//! other bracketed section is kept as a custom key/value section.
//!
//! Samples are checked as they are added, so a parsed [`SampleSheet`] is
//! internally consistent:
//!
//! - **Index values**: `index`/`index2` hold only `A`, `C`, `G`, `T`, `N`
//! - **Read structures**: every sample shares one [`ReadStructure`], which
//!   must agree with `[Reads]` and with the indexes each sample carries
//! - **Uniqueness**: no two samples share an identity or an index
//!   combination on the same lane
//!
//! ## Example
//!
//! ```rust
//! use sample_sheet::SampleSheet;
//!
//! let text = "\
//! [Header]
//! Investigator Name,jdoe
//! [Reads]
//! 151
//! 151
//! [Data]
//! Sample_ID,Sample_Name,index
//! 1823A,1823A-tissue,GAATCTGA
//! 1823B,1823B-tissue,AGCAGGAA
//! ";
//!
//! let sheet: SampleSheet = text.parse().unwrap();
//! assert_eq!(sheet.header().get("Investigator_Name"), Some("jdoe"));
//! assert_eq!(sheet.is_paired_end(), Some(true));
//!
//! for sample in &sheet {
//!     println!("{}: {}", sample, sample.index().unwrap_or_default());
//! }
//!
//! // Write canonical text that parses back to an equal sheet
//! let canonical = sheet.to_csv_string().unwrap();
//! assert!(canonical.starts_with("[Header],,\n"));
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Read structures, samples, sections, and parse options
//! - [`parsing`]: Tokenizer and section-aware parser
//! - [`sheet`]: The sample sheet aggregate and its writers
//! - [`cli`]: Command-line interface implementation
//! - [`error`]: Error type and kinds

pub mod cli;
pub mod core;
pub mod error;
pub mod parsing;
pub mod sheet;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::options::{DuplicatePolicy, FieldCountPolicy, IndexValidation, ParseOptions};
pub use core::read_structure::{Operator, ReadStructure, Segment};
pub use core::sample::Sample;
pub use core::section::Section;
pub use error::{Error, ErrorKind};
pub use sheet::design::ExperimentalDesign;
pub use sheet::{SampleSheet, SheetId};
