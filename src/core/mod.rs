//! Core data types for sample sheets.
//!
//! - [`ReadStructure`]: a validated `<cycles><operator>` layout such as `10M141T8B`
//! - [`Sample`]: one row of the `[Data]` section
//! - [`Section`]: an ordered, case-insensitive key/value section
//! - [`ParseOptions`]: policies for the cases the format leaves ambiguous
//!
//! ## Read structure operators
//!
//! | Operator | Meaning |
//! |----------|---------|
//! | T | Template |
//! | S | Skip |
//! | B | Sample barcode |
//! | M | Molecular barcode (UMI) |

pub mod options;
pub mod read_structure;
pub mod sample;
pub mod section;

pub use options::{DuplicatePolicy, FieldCountPolicy, IndexValidation, ParseOptions};
pub use self::read_structure::{Operator, ReadStructure, Segment};
pub use sample::Sample;
pub use section::Section;
