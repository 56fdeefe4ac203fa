//! Hyperstyle reports: `{"quality": {...}, "issues": [...]}`.

use serde::{Deserialize, Serialize};

use super::{Issue, IssueReport, retain_by_index};

/// Overall quality verdict attached to a Hyperstyle report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Quality {
    /// Quality code, e.g. `EXCELLENT`.
    pub code: String,
    /// Human readable verdict.
    pub text: String,
}

/// One Hyperstyle finding.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HyperstyleIssue {
    /// Inspection code, e.g. `W0612`.
    pub code:                 String,
    /// Finding description.
    pub text:                 String,
    /// The offending source line.
    pub line:                 String,
    /// Line number, starting from 1.
    pub line_number:          usize,
    /// Column number.
    pub column_number:        usize,
    /// Issue category.
    pub category:             String,
    /// Issue difficulty.
    #[serde(default)]
    pub difficulty:           String,
    /// How much the finding lowers the grade.
    #[serde(default)]
    pub influence_on_penalty: i64,
}

impl Issue for HyperstyleIssue {
    fn name(&self) -> &str {
        &self.code
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn line(&self) -> usize {
        self.line_number
    }

    fn column(&self) -> usize {
        self.column_number
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn difficulty(&self) -> &str {
        &self.difficulty
    }
}

/// A Hyperstyle report for a single file.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct HyperstyleReport {
    /// Quality verdict. Filtering keeps it as is.
    pub quality: Quality,
    /// Findings in report order.
    pub issues:  Vec<HyperstyleIssue>,
}

impl IssueReport for HyperstyleReport {
    type Issue = HyperstyleIssue;

    fn issues(&self) -> &[HyperstyleIssue] {
        &self.issues
    }

    // TODO: recompute `quality` once the penalty rules are available here.
    fn retain_issues(&self, keep: impl FnMut(usize) -> bool) -> Self {
        Self {
            quality: self.quality.clone(),
            issues:  retain_by_index(&self.issues, keep),
        }
    }
}
