//! Parsers for Illumina sample sheet text.
//!
//! Parsing runs in two stages:
//!
//! - [`records`]: split the input into comma-delimited records, honoring
//!   double-quoted fields and keeping each record's line number
//! - [`sheet`]: walk the records section by section and build a
//!   [`SampleSheet`](crate::SampleSheet)
//!
//! ## Example
//!
//! ```rust
//! use sample_sheet::parsing::sheet::parse_text;
//! use sample_sheet::ParseOptions;
//!
//! let text = "[Reads]\n151\n151\n[Data]\nSample_ID,index\n1823A,GAATCTGA\n";
//! let sheet = parse_text(text, ParseOptions::default()).unwrap();
//!
//! assert_eq!(sheet.reads(), &[151, 151]);
//! assert_eq!(sheet.samples()[0].index(), Some("GAATCTGA"));
//! ```
//!
//! ## Sections
//!
//! | Section | Record layout |
//! |---------|---------------|
//! | `[Header]`, `[Settings]`, custom | `key,value` |
//! | `[Reads]` | `cycles` |
//! | `[Data]` | column header row, then one row per sample |

pub mod records;
pub mod sheet;
