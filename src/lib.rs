//! # template-issues
//!
//! Separates the static-analysis issues a student introduced from the ones
//! inherited from an exercise's starter template.
//!
//! The template is aligned with the submitted code by a char-level diff;
//! issues that land in text copied unchanged from the template are reported
//! as template issues, together with where they sit in the template.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Filtering of whole submission datasets
pub mod batch;
/// Runtime configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Char-level diffing of templates against submissions
pub mod diff;
/// Error types
pub mod error;
/// Classification of issues into template and new ones
pub mod filter;
/// Issue and report types of the supported linters
pub mod issue;
/// Parsers for Python literals in exported tables
pub mod parsers;
/// Resolution of step templates
pub mod template;
/// Positions and intervals
pub mod types;
/// Utility functions for convenience
pub mod util;

pub use batch::{FilterStatus, Row, StepIndex, TemplateIssueRow, filter_submissions};
pub use config::FilterConfig;
pub use diff::{CleanupMode, DiffEngine, DiffSegment, DiffTag, EditOp, MyersEngine};
pub use error::{FilterError, FilterResult};
pub use filter::{FilteredReport, TemplateFilter, TemplatePartition};
pub use issue::{HyperstyleReport, Issue, IssueReport, QodanaReport, ReportKind};
pub use template::TemplateSource;
pub use types::{Interval, Position};
