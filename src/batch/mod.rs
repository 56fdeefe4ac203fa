#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Filters whole datasets of submissions.
//!
//! Submissions and steps are plain JSON objects. A submission row carries
//! `id`, `step_id`, `lang`, `code` and an issue column (see [`ReportKind`]);
//! a step row carries `id` and its templates (see [`TemplateSource`]). Any
//! other field is passed through untouched.

/// Deduplicated listing of the issues found in templates.
pub mod table;

use std::{collections::HashMap, fmt, sync::Arc};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde_json::{Map, Value};

pub use table::{TemplateIssueRow, render_table, template_issue_rows};

use crate::{
    constants::{
        ALL_SUFFIX, CODE_FIELD, DIFF_SUFFIX, DIFF_TEMPLATE_POSITIONS_SUFFIX, ERROR_COLUMN, ID_FIELD,
        LANG_FIELD, STATUS_COLUMN, STEP_ID_FIELD,
    },
    diff::DiffEngine,
    error::{FilterError, FilterResult},
    filter::TemplateFilter,
    issue::{HyperstyleReport, IssueReport, QodanaReport, ReportKind},
    template::TemplateSource,
};

/// One submission or step.
pub type Row = Map<String, Value>;

/// Parses a dataset: either a JSON array of objects or one object per line.
pub fn read_rows(text: &str) -> FilterResult<Vec<Row>> {
    if text.trim_start().starts_with('[') {
        return Ok(serde_json::from_str(text)?);
    }

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| -> FilterResult<Row> { Ok(serde_json::from_str(line)?) })
        .collect()
}

/// Normalizes a step id so that `5`, `5.0` and `"5"` refer to the same step.
pub fn step_key(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.trim().to_string()),
        Value::Number(id) => match (id.as_i64(), id.as_f64()) {
            (Some(id), _) => Some(id.to_string()),
            (None, Some(id)) if id.fract() == 0.0 => Some(format!("{id:.0}")),
            _ => Some(id.to_string()),
        },
        _ => None,
    }
}

/// Name of an output column derived from the issue column.
pub fn derived_column(kind: ReportKind, suffix: &str) -> String {
    format!("{}_{suffix}", kind.column())
}

/// Templates of every known step, by normalized step id.
#[derive(Debug, Default)]
pub struct StepIndex {
    /// Step templates, or the reason they could not be read.
    templates: HashMap<String, Result<TemplateSource, String>>,
}

impl StepIndex {
    /// Indexes step rows. Rows without an `id` are skipped; rows whose
    /// templates are malformed are remembered so that their submissions
    /// fail with a useful message.
    pub fn new(steps: &[Row]) -> Self {
        let templates = steps
            .iter()
            .filter_map(|step| {
                let Some(id) = step.get(ID_FIELD).and_then(step_key) else {
                    tracing::warn!("Skipping step without an `{ID_FIELD}` field");
                    return None;
                };
                let source = TemplateSource::from_step(step).map_err(|e| e.to_string());
                Some((id, source))
            })
            .collect();

        Self { templates }
    }

    /// Returns the number of indexed steps.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns true if no step was indexed.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Returns the template a `lang` submission to `step_id` started from.
    pub fn template(&self, step_id: &str, lang: &str) -> FilterResult<&str> {
        match self.templates.get(step_id) {
            Some(Ok(source)) => source.resolve(lang),
            Some(Err(reason)) => Err(FilterError::MalformedTemplates(reason.clone())),
            None => Err(FilterError::UnknownStep(step_id.to_string())),
        }
    }
}

/// Outcome of filtering one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterStatus {
    /// Issues were split into template and new ones.
    Classified,
    /// Something went wrong; every issue was kept as new.
    Unclassified,
}

impl FilterStatus {
    /// Value written to the status column.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterStatus::Classified => "classified",
            FilterStatus::Unclassified => "unclassified",
        }
    }

    /// Reads the status column of a filtered row.
    pub fn of(row: &Row) -> Option<Self> {
        match row.get(STATUS_COLUMN).and_then(Value::as_str) {
            Some("classified") => Some(FilterStatus::Classified),
            Some("unclassified") => Some(FilterStatus::Unclassified),
            _ => None,
        }
    }
}

impl fmt::Display for FilterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output columns of one classified submission.
struct FilteredColumns {
    /// New issues.
    new_issues:         Value,
    /// Template issues.
    template_issues:    Value,
    /// Unfiltered report.
    all_issues:         Value,
    /// Template positions of the template issues.
    template_positions: Value,
}

/// Filters one submission row in place.
///
/// On failure the row is marked unclassified, the error is recorded and the
/// issue column is left as is, so every issue counts as new.
pub fn filter_submission_row<E: DiffEngine>(
    filter: &TemplateFilter<E>,
    steps: &StepIndex,
    kind: ReportKind,
    row: &mut Row,
) -> FilterStatus {
    match classify_row(filter, steps, kind, row) {
        Ok(columns) => {
            row.insert(kind.column().to_string(), columns.new_issues);
            row.insert(derived_column(kind, DIFF_SUFFIX), columns.template_issues);
            row.insert(derived_column(kind, ALL_SUFFIX), columns.all_issues);
            row.insert(
                derived_column(kind, DIFF_TEMPLATE_POSITIONS_SUFFIX),
                columns.template_positions,
            );
            row.insert(STATUS_COLUMN.to_string(), FilterStatus::Classified.as_str().into());
            row.remove(ERROR_COLUMN);
            FilterStatus::Classified
        }
        Err(e) => {
            let id = row.get(ID_FIELD).cloned().unwrap_or(Value::Null);
            tracing::warn!("Could not classify issues of submission {id}: {e}");

            let all = row.get(kind.column()).cloned().unwrap_or(Value::Null);
            row.insert(derived_column(kind, ALL_SUFFIX), all);
            row.insert(derived_column(kind, DIFF_SUFFIX), Value::Null);
            row.insert(
                derived_column(kind, DIFF_TEMPLATE_POSITIONS_SUFFIX),
                Value::Array(Vec::new()),
            );
            row.insert(STATUS_COLUMN.to_string(), FilterStatus::Unclassified.as_str().into());
            row.insert(ERROR_COLUMN.to_string(), e.to_string().into());
            FilterStatus::Unclassified
        }
    }
}

/// Looks up everything a row needs and runs the filter on it.
fn classify_row<E: DiffEngine>(
    filter: &TemplateFilter<E>,
    steps: &StepIndex,
    kind: ReportKind,
    row: &Row,
) -> FilterResult<FilteredColumns> {
    let step_id = row
        .get(STEP_ID_FIELD)
        .and_then(step_key)
        .ok_or_else(|| FilterError::MissingField(STEP_ID_FIELD.to_string()))?;
    let lang = string_field(row, LANG_FIELD)?;
    let code = string_field(row, CODE_FIELD)?;
    let raw = match row.get(kind.column()) {
        None | Some(Value::Null) => return Err(FilterError::MissingField(kind.column().to_string())),
        Some(raw) => raw,
    };

    let template = steps.template(&step_id, lang)?;
    match kind {
        ReportKind::Hyperstyle => filter_columns::<HyperstyleReport, E>(filter, template, code, raw),
        ReportKind::Qodana => filter_columns::<QodanaReport, E>(filter, template, code, raw),
    }
}

/// Returns a string field of a row.
fn string_field<'a>(row: &'a Row, field: &str) -> FilterResult<&'a str> {
    row.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| FilterError::MissingField(field.to_string()))
}

/// Filters a report stored in a column. Reports stored as JSON strings are
/// written back as strings, reports stored as objects as objects.
fn filter_columns<R: IssueReport, E: DiffEngine>(
    filter: &TemplateFilter<E>,
    template: &str,
    code: &str,
    raw: &Value,
) -> FilterResult<FilteredColumns> {
    let (report, as_string) = match raw {
        Value::String(json) => (R::from_json(json)?, true),
        other => (serde_json::from_value::<R>(other.clone())?, false),
    };

    let filtered = filter.filter_report(template, code, &report)?;
    let encode = |report: &R| -> FilterResult<Value> {
        if as_string {
            Ok(Value::String(report.to_json()?))
        } else {
            Ok(serde_json::to_value(report)?)
        }
    };

    Ok(FilteredColumns {
        new_issues:         encode(&filtered.new_issues)?,
        template_issues:    encode(&filtered.template_issues)?,
        all_issues:         encode(&filtered.all_issues)?,
        template_positions: serde_json::to_value(&filtered.template_positions)?,
    })
}

/// Filters every submission, spreading the work over
/// [`crate::config::FilterConfig::workers`] blocking tasks.
///
/// Rows come back in their original order.
pub async fn filter_submissions<E>(
    rows: Vec<Row>,
    steps: Arc<StepIndex>,
    kind: ReportKind,
    filter: Arc<TemplateFilter<E>>,
) -> Result<Vec<Row>>
where
    E: DiffEngine + Send + Sync + 'static,
{
    let total = rows.len();
    let workers = filter.config().workers().max(1);
    let chunk_size = total.div_ceil(workers).max(1);

    let chunks: Vec<Vec<Row>> = rows
        .into_iter()
        .chunks(chunk_size)
        .into_iter()
        .map(|chunk| chunk.collect())
        .collect();

    let handles = chunks.into_iter().map(|mut chunk| {
        let steps = Arc::clone(&steps);
        let filter = Arc::clone(&filter);
        tokio::task::spawn_blocking(move || {
            let unclassified = chunk
                .iter_mut()
                .map(|row| filter_submission_row(&*filter, &steps, kind, row))
                .filter(|status| *status == FilterStatus::Unclassified)
                .count();
            (chunk, unclassified)
        })
    });

    let mut filtered = Vec::with_capacity(total);
    let mut unclassified = 0;
    for result in futures::future::join_all(handles).await {
        let (chunk, failures) = result.context("A filtering task panicked")?;
        filtered.extend(chunk);
        unclassified += failures;
    }

    tracing::info!(
        "Filtered {total} submissions against {} steps: {} classified, {unclassified} unclassified",
        steps.len(),
        total - unclassified
    );
    Ok(filtered)
}
