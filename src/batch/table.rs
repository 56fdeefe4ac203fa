#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::cmp::Ordering;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};
use typed_builder::TypedBuilder;

use super::{FilterStatus, Row, derived_column, step_key};
use crate::{
    constants::{DIFF_SUFFIX, DIFF_TEMPLATE_POSITIONS_SUFFIX, STEP_ID_FIELD},
    error::{FilterError, FilterResult},
    issue::{HyperstyleReport, Issue, IssueReport, QodanaReport, ReportKind},
    types::Position,
};

#[derive(Tabled, Serialize, Deserialize, TypedBuilder, Clone, Debug, PartialEq, Eq)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// An issue found in a step's template, positioned in the template
pub struct TemplateIssueRow {
    /// * `step_id`: the step whose template has the issue
    #[tabled(rename = "Step")]
    step_id:    String,
    /// * `name`: inspection name
    #[tabled(rename = "Issue")]
    name:       String,
    /// * `category`: issue category
    #[tabled(rename = "Category")]
    category:   String,
    /// * `difficulty`: issue difficulty or severity
    #[tabled(rename = "Difficulty")]
    difficulty: String,
    /// * `text`: description of the first occurrence
    #[tabled(rename = "Description")]
    text:       String,
    /// * `line`: line in the template
    #[tabled(rename = "Line")]
    line:       usize,
    /// * `column`: column in the template
    #[tabled(rename = "Column")]
    column:     usize,
}

impl TemplateIssueRow {
    /// Returns the step id.
    pub fn step_id(&self) -> &str {
        &self.step_id
    }

    /// Returns the inspection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the position of the issue in the template.
    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Fields that identify the same issue seen in several submissions.
    fn dedup_key(&self) -> (String, String, String, String, usize, usize) {
        (
            self.step_id.clone(),
            self.name.clone(),
            self.category.clone(),
            self.difficulty.clone(),
            self.line,
            self.column,
        )
    }
}

/// Collects the template issues of classified rows.
///
/// The same issue is usually found in many submissions to a step; it is
/// listed once. Rows are ordered by step id, numeric ids first.
pub fn template_issue_rows(rows: &[Row], kind: ReportKind) -> FilterResult<Vec<TemplateIssueRow>> {
    let mut issues = Vec::new();
    for row in rows {
        if FilterStatus::of(row) != Some(FilterStatus::Classified) {
            continue;
        }
        match kind {
            ReportKind::Hyperstyle => collect_row::<HyperstyleReport>(row, kind, &mut issues)?,
            ReportKind::Qodana => collect_row::<QodanaReport>(row, kind, &mut issues)?,
        }
    }

    let mut unique: Vec<TemplateIssueRow> = issues
        .into_iter()
        .unique_by(TemplateIssueRow::dedup_key)
        .collect();
    unique.sort_by(|a, b| compare_steps(&a.step_id, &b.step_id));
    Ok(unique)
}

/// Pairs the template issues of one row with their template positions.
fn collect_row<R: IssueReport>(
    row: &Row,
    kind: ReportKind,
    out: &mut Vec<TemplateIssueRow>,
) -> FilterResult<()> {
    let step_id = row
        .get(STEP_ID_FIELD)
        .and_then(step_key)
        .ok_or_else(|| FilterError::MissingField(STEP_ID_FIELD.to_string()))?;

    let diff_column = derived_column(kind, DIFF_SUFFIX);
    let report: R = match row.get(&diff_column) {
        Some(Value::String(json)) => R::from_json(json)?,
        Some(value) => serde_json::from_value(value.clone())?,
        None => return Err(FilterError::MissingField(diff_column)),
    };

    let positions_column = derived_column(kind, DIFF_TEMPLATE_POSITIONS_SUFFIX);
    let positions: Vec<Position> = match row.get(&positions_column) {
        Some(value) => serde_json::from_value(value.clone())?,
        None => return Err(FilterError::MissingField(positions_column)),
    };

    out.extend(
        report
            .issues()
            .iter()
            .zip(positions)
            .map(|(issue, position)| TemplateIssueRow {
                step_id:    step_id.clone(),
                name:       issue.name().to_string(),
                category:   issue.category().to_string(),
                difficulty: issue.difficulty().to_string(),
                text:       issue.text().to_string(),
                line:       position.line,
                column:     position.column,
            }),
    );
    Ok(())
}

/// Orders step ids numerically when both are numbers.
fn compare_steps(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(a), Ok(b)) => a.cmp(&b),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Renders template issues as a terminal table.
pub fn render_table(rows: &[TemplateIssueRow]) -> String {
    let steps = rows.iter().map(TemplateIssueRow::step_id).unique().count();
    Table::new(rows)
        .with(Panel::header("Issues found in templates"))
        .with(Panel::footer(format!("{} issues in {steps} steps", rows.len())))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(32).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}
