//! Console and JSON output.
//!
//! Null audits and ranked results print as `tabled` ASCII tables.
//! [`AnalysisReport`] gathers everything a run produced and
//! serializes to the JSON emitted by `--json`.
//!
//! # Example
//!
//! ```rust,ignore
//! let report = pipeline.run(&source)?;
//!
//! for audit in &report.null_audits {
//!     println!("{audit}");
//! }
//! println!("{}", report.tags_table(Some(20)));
//! ```

mod report;

pub use report::{AnalysisReport, TablePreview, ranked_table};
