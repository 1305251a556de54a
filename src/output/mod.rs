//! Output formatters for duplicate scan results.
//!
//! - [`TextOutput`]: human-readable listing
//! - [`JsonOutput`]: machine-readable document for scripting
//!
//! # Example
//!
//! ```no_run
//! use dupsift::duplicates::DuplicateFinder;
//! use dupsift::output::TextOutput;
//! use std::path::Path;
//!
//! let (sets, summary) = DuplicateFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! print!("{}", TextOutput::new(&sets, &summary).render());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonDuplicateSet, JsonOutput, JsonOutputError, JsonSummary};
pub use text::TextOutput;
