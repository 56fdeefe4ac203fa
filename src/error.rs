#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Errors raised while filtering template issues out of a single submission.

/// An enum to represent possible errors while classifying one submission's
/// issues.
#[derive(thiserror::Error, Debug)]
pub enum FilterError {
    /// The step has no flat template and its per-language templates have no
    /// entry for the submission's language.
    #[error("No template found for language `{lang}`, and the step has no single template.")]
    MissingTemplate {
        /// The language tag that was looked up.
        lang: String,
    },
    /// An issue points outside the code it was reported for.
    #[error("Issue position {line}:{column} is outside of the code ({lines} lines).")]
    OutOfRangePosition {
        /// The reported line.
        line:   usize,
        /// The reported column.
        column: usize,
        /// How many lines the code actually has.
        lines:  usize,
    },
    /// The issue report could not be parsed or serialized.
    #[error("Malformed issue report: {0}")]
    MalformedReport(#[from] serde_json::Error),
    /// The per-language template mapping could not be parsed.
    #[error("Malformed `code_templates` value: {0}")]
    MalformedTemplates(String),
    /// The submission refers to a step that was not provided.
    #[error("The step `{0}` referenced by the submission could not be found.")]
    UnknownStep(String),
    /// A required field is missing from a submission or step row.
    #[error("Missing field `{0}`.")]
    MissingField(String),
}

/// Convenience alias for results of template filtering.
pub type FilterResult<T> = Result<T, FilterError>;
