#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Single-line comment markers recognised when deciding whether a template
/// placeholder comment was removed or added.
pub const DEFAULT_COMMENT_MARKERS: &[&str] = &["#", "//"];

/// Issue column holding Hyperstyle reports
pub const HYPERSTYLE_ISSUES_COLUMN: &str = "hyperstyle_issues";

/// Issue column holding Qodana reports
pub const QODANA_ISSUES_COLUMN: &str = "qodana_issues";

/// Suffix of the column receiving issues that were matched to the template
pub const DIFF_SUFFIX: &str = "diff";

/// Suffix of the column receiving the unfiltered report
pub const ALL_SUFFIX: &str = "all";

/// Suffix of the column receiving template positions of matched issues
pub const DIFF_TEMPLATE_POSITIONS_SUFFIX: &str = "diff_template_positions";

/// Column recording whether a submission was classified
pub const STATUS_COLUMN: &str = "template_filter_status";

/// Column recording why a submission could not be classified
pub const ERROR_COLUMN: &str = "template_filter_error";

/// Submission id field
pub const ID_FIELD: &str = "id";

/// Submission field pointing to its step
pub const STEP_ID_FIELD: &str = "step_id";

/// Submission language field
pub const LANG_FIELD: &str = "lang";

/// Submission source code field
pub const CODE_FIELD: &str = "code";

/// Step field holding a single template
pub const CODE_TEMPLATE_FIELD: &str = "code_template";

/// Step field holding templates keyed by language
pub const CODE_TEMPLATES_FIELD: &str = "code_templates";
