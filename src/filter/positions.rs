#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Splits classified issues into report-ready collections.

use super::classify::ClassifiedIssue;
use crate::{diff::OffsetMapper, types::Position};

/// Issues of one submission, split by origin.
///
/// Every collection borrows the caller's issues and keeps their original
/// order.
#[derive(Debug)]
pub struct TemplatePartition<'a, I: ?Sized> {
    /// Issues the student introduced; these are the ones worth reporting.
    pub new_issues:         Vec<&'a I>,
    /// Issues inherited from the template; excluded from scoring.
    pub template_issues:    Vec<&'a I>,
    /// Positions of `template_issues` in the template, index for index.
    pub template_positions: Vec<Position>,
    /// Every issue, unfiltered.
    pub all_issues:         Vec<&'a I>,
    /// Per original index: true if that issue came from the template.
    pub template_mask:      Vec<bool>,
}

impl<I: ?Sized> TemplatePartition<'_, I> {
    /// Returns true if the issue at `index` was matched to the template.
    pub fn is_template_issue(&self, index: usize) -> bool {
        self.template_mask.get(index).copied().unwrap_or(false)
    }
}

/// Builds the partition from classifier output.
///
/// `classified` may come in any order and should hold each of the
/// `issue_count` original indices once; items with an index outside of that
/// range are skipped. Template offsets are mapped back to positions in
/// `template` with [`template_position`].
pub fn partition_issues<'a, I: ?Sized>(
    classified: &[ClassifiedIssue<'a, I>],
    issue_count: usize,
    template: &OffsetMapper,
) -> TemplatePartition<'a, I> {
    let mut by_index: Vec<Option<&ClassifiedIssue<'a, I>>> = vec![None; issue_count];
    for item in classified {
        if let Some(slot) = by_index.get_mut(item.index) {
            *slot = Some(item);
        }
    }

    let mut partition = TemplatePartition {
        new_issues:         Vec::new(),
        template_issues:    Vec::new(),
        template_positions: Vec::new(),
        all_issues:         Vec::with_capacity(issue_count),
        template_mask:      Vec::with_capacity(issue_count),
    };

    for item in by_index.into_iter().flatten() {
        partition.all_issues.push(item.issue);
        match item.template_offset {
            Some(offset) => {
                partition.template_issues.push(item.issue);
                partition
                    .template_positions
                    .push(template_position(template, offset));
                partition.template_mask.push(true);
            }
            None => {
                partition.new_issues.push(item.issue);
                partition.template_mask.push(false);
            }
        }
    }

    partition
}

/// Position of a template offset, always on a line the template has.
///
/// The end of a template without a trailing newline maps to one past the
/// last char of its last line, so the position converts back to the same
/// offset with [`OffsetMapper::checked_position_to_offset`].
pub fn template_position(template: &OffsetMapper, offset: usize) -> Position {
    let position = template.offset_to_position(offset);
    let lines = template.line_count();
    if lines == 0 || position.line <= lines {
        return position;
    }

    let last_line_start = template.prefix_lengths()[lines - 1];
    Position::new(lines, offset - last_line_start)
}
