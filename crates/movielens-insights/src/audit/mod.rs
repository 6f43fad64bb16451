//! Null-audit reporting.
//!
//! Diagnostic only: the pipeline logs and prints the audits, but nothing
//! downstream consumes them.

mod nulls;

pub use nulls::{NullAuditor, audit_nulls};
