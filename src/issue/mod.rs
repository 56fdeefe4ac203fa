#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Static-analysis findings and the reports that carry them.

/// Hyperstyle report format.
pub mod hyperstyle;
/// Qodana report format.
pub mod qodana;

use std::{fmt, str::FromStr};

use serde::{Serialize, de::DeserializeOwned};

pub use hyperstyle::{HyperstyleIssue, HyperstyleReport, Quality};
pub use qodana::{QodanaAttributes, QodanaCode, QodanaProblem, QodanaReport, QodanaSource};

use crate::{
    constants::{HYPERSTYLE_ISSUES_COLUMN, QODANA_ISSUES_COLUMN},
    error::FilterResult,
};

/// A single finding of a code quality tool.
pub trait Issue {
    /// Inspection name, e.g. `MissingBreakInSwitch`.
    fn name(&self) -> &str;
    /// Human readable description of the finding.
    fn text(&self) -> &str;
    /// Line of the finding, starting from 1. `0` means the finding has no
    /// specific position.
    fn line(&self) -> usize;
    /// Column of the finding, starting from 0.
    fn column(&self) -> usize;
    /// Issue category, e.g. `ERROR_PRONE`.
    fn category(&self) -> &str;
    /// Issue difficulty or severity, e.g. `HARD`.
    fn difficulty(&self) -> &str;
}

/// A report in one of the supported wire formats.
///
/// Reports are re-serialized after filtering, so everything except the issue
/// list must survive a round trip untouched.
pub trait IssueReport: Clone + Serialize + DeserializeOwned {
    /// The concrete issue type of this format.
    type Issue: Issue;

    /// The issues in report order.
    fn issues(&self) -> &[Self::Issue];

    /// Returns a copy of the report that only keeps the issues for which
    /// `keep` returns true. `keep` receives each issue's index in
    /// [`IssueReport::issues`].
    fn retain_issues(&self, keep: impl FnMut(usize) -> bool) -> Self;

    /// Parses a report from its JSON representation.
    fn from_json(json: &str) -> FilterResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the report back to JSON.
    fn to_json(&self) -> FilterResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Keeps the items of `items` whose index passes `keep`.
pub(crate) fn retain_by_index<T: Clone>(items: &[T], mut keep: impl FnMut(usize) -> bool) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(idx, _)| keep(*idx))
        .map(|(_, item)| item.clone())
        .collect()
}

/// Which report format a column of issues is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    /// Hyperstyle JSON reports.
    Hyperstyle,
    /// Qodana JSON reports.
    Qodana,
}

impl ReportKind {
    /// Name of the column that stores reports of this kind.
    pub fn column(self) -> &'static str {
        match self {
            ReportKind::Hyperstyle => HYPERSTYLE_ISSUES_COLUMN,
            ReportKind::Qodana => QODANA_ISSUES_COLUMN,
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            HYPERSTYLE_ISSUES_COLUMN | "hyperstyle" => Ok(ReportKind::Hyperstyle),
            QODANA_ISSUES_COLUMN | "qodana" => Ok(ReportKind::Qodana),
            other => Err(format!(
                "no report parser for issues stored in `{other}` (expected \
                 `{HYPERSTYLE_ISSUES_COLUMN}` or `{QODANA_ISSUES_COLUMN}`)"
            )),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}
