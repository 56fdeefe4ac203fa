//! Qodana reports: `{"version": "...", "listProblem": [...]}`.

use serde::{Deserialize, Serialize};

use super::{Issue, IssueReport, retain_by_index};

/// Snippet of code around a Qodana problem.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QodanaCode {
    /// First line of the snippet.
    pub start_line:       usize,
    /// Length of the snippet.
    pub length:           usize,
    /// Offset of the snippet.
    pub offset:           usize,
    /// The snippet text.
    pub surrounding_code: String,
}

/// Location of a Qodana problem.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QodanaSource {
    /// Source kind, e.g. `file`.
    #[serde(rename = "type")]
    pub kind:     String,
    /// Path of the file.
    pub path:     String,
    /// Language of the file.
    pub language: String,
    /// Line of the problem, starting from 1.
    pub line:     usize,
    /// Column of the problem within its line.
    pub offset:   usize,
    /// Length of the flagged region.
    pub length:   usize,
    /// Code around the problem.
    pub code:     QodanaCode,
}

/// Extra problem attributes.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QodanaAttributes {
    /// Name of the inspection that fired.
    pub inspection_name: String,
}

/// One Qodana problem.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QodanaProblem {
    /// Tool that produced the problem.
    pub tool:         String,
    /// Problem category.
    pub category:     String,
    /// Problem type.
    #[serde(rename = "type")]
    pub kind:         String,
    /// Problem severity.
    pub severity:     String,
    /// Problem description.
    pub comment:      String,
    /// Longer description.
    pub details_info: String,
    /// Locations; the first one positions the problem.
    pub sources:      Vec<QodanaSource>,
    /// Extra attributes.
    pub attributes:   QodanaAttributes,
}

impl Issue for QodanaProblem {
    fn name(&self) -> &str {
        &self.attributes.inspection_name
    }

    fn text(&self) -> &str {
        &self.comment
    }

    fn line(&self) -> usize {
        self.sources.first().map_or(0, |source| source.line)
    }

    fn column(&self) -> usize {
        self.sources.first().map_or(0, |source| source.offset)
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn difficulty(&self) -> &str {
        &self.severity
    }
}

/// A Qodana report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct QodanaReport {
    /// Qodana version.
    pub version:      String,
    /// Problems in report order.
    pub list_problem: Vec<QodanaProblem>,
}

impl IssueReport for QodanaReport {
    type Issue = QodanaProblem;

    fn issues(&self) -> &[QodanaProblem] {
        &self.list_problem
    }

    fn retain_issues(&self, keep: impl FnMut(usize) -> bool) -> Self {
        Self {
            version:      self.version.clone(),
            list_problem: retain_by_index(&self.list_problem, keep),
        }
    }
}
