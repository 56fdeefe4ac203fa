#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Template issue filtering for a single submission.

/// The forward-scan issue classifier.
pub mod classify;
/// Partitioning of classified issues.
pub mod positions;

pub use classify::{ClassifiedIssue, LocatedIssue, classify_sorted, locate_issues, sort_by_offset};
pub use positions::{TemplatePartition, partition_issues, template_position};

use crate::{
    config::FilterConfig,
    diff::{DiffEngine, DiffSegment, EditOp, MyersEngine, OffsetMapper, template_edit_script, walk_segments},
    error::FilterResult,
    issue::{Issue, IssueReport},
    types::Position,
    util::split_lines,
};

/// A report split into the issues a student introduced and the ones the
/// template already had.
#[derive(Debug, Clone)]
pub struct FilteredReport<R> {
    /// Report with the student's issues only.
    pub new_issues:         R,
    /// Report with the template's issues only.
    pub template_issues:    R,
    /// The original report.
    pub all_issues:         R,
    /// Template positions of the issues in `template_issues`, in order.
    pub template_positions: Vec<Position>,
}

/// Decides which issues of a submission come from its template.
#[derive(Debug, Clone)]
pub struct TemplateFilter<E = MyersEngine> {
    /// Diff algorithm used to align template and code.
    engine: E,
    /// Filter settings.
    config: FilterConfig,
}

impl TemplateFilter<MyersEngine> {
    /// Creates a filter backed by the Myers char diff.
    pub fn new(config: FilterConfig) -> Self {
        Self::with_engine(MyersEngine, config)
    }
}

impl Default for TemplateFilter<MyersEngine> {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl<E: DiffEngine> TemplateFilter<E> {
    /// Creates a filter backed by a custom diff engine.
    pub fn with_engine(engine: E, config: FilterConfig) -> Self {
        Self { engine, config }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Edit script turning `template` into `code`, cleaned up when needed.
    pub fn edit_script(&self, template: &str, code: &str) -> Vec<EditOp> {
        template_edit_script(
            &self.engine,
            &split_lines(template),
            &split_lines(code),
            self.config.cleanup(),
            self.config.comment_markers(),
        )
    }

    /// Interval-annotated segments aligning `template` with `code`.
    pub fn segments(&self, template: &str, code: &str) -> Vec<DiffSegment> {
        walk_segments(&self.edit_script(template, code))
    }

    /// Splits `issues`, reported for `code`, by whether they already exist
    /// in `template`.
    pub fn partition<'a, I: Issue>(
        &self,
        template: &str,
        code: &str,
        issues: &'a [I],
    ) -> FilterResult<TemplatePartition<'a, I>> {
        let template_lines = split_lines(template);
        let code_lines = split_lines(code);
        let template_mapper = OffsetMapper::new(&template_lines);
        let code_mapper = OffsetMapper::new(&code_lines);

        let mut located = locate_issues(issues, &code_mapper, self.config.strict_positions())?;
        sort_by_offset(&mut located);

        let script = template_edit_script(
            &self.engine,
            &template_lines,
            &code_lines,
            self.config.cleanup(),
            self.config.comment_markers(),
        );
        let segments = walk_segments(&script);
        let classified = classify_sorted(&located, &segments);
        let partition = partition_issues(&classified, issues.len(), &template_mapper);

        tracing::debug!(
            segments = segments.len(),
            issues = issues.len(),
            template_issues = partition.template_issues.len(),
            "classified submission issues"
        );
        Ok(partition)
    }

    /// Like [`TemplateFilter::partition`], but rebuilds whole reports so
    /// they can be serialized back in their own format.
    pub fn filter_report<R: IssueReport>(
        &self,
        template: &str,
        code: &str,
        report: &R,
    ) -> FilterResult<FilteredReport<R>> {
        let partition = self.partition(template, code, report.issues())?;

        Ok(FilteredReport {
            new_issues:         report.retain_issues(|idx| !partition.is_template_issue(idx)),
            template_issues:    report.retain_issues(|idx| partition.is_template_issue(idx)),
            all_issues:         report.clone(),
            template_positions: partition.template_positions,
        })
    }
}
