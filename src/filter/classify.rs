#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Assigns issues to the template or to the student.

use crate::{
    diff::{DiffSegment, DiffTag, OffsetMapper},
    error::FilterResult,
    issue::Issue,
};

/// An issue paired with its offset in the flattened code.
#[derive(Debug)]
pub struct LocatedIssue<'a, I: ?Sized> {
    /// Index of the issue in the caller's collection.
    pub index:  usize,
    /// The issue itself.
    pub issue:  &'a I,
    /// Offset of the issue in the code.
    pub offset: usize,
}

// Manual impls: `I` itself does not need to be `Clone`.
impl<I: ?Sized> Clone for LocatedIssue<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for LocatedIssue<'_, I> {}

/// Result of classifying one issue.
#[derive(Debug)]
pub struct ClassifiedIssue<'a, I: ?Sized> {
    /// Index of the issue in the caller's collection.
    pub index:             usize,
    /// The issue itself.
    pub issue:             &'a I,
    /// True if the issue sits in code copied unchanged from the template.
    pub is_template_issue: bool,
    /// Where the issue sits in the template, for template issues.
    pub template_offset:   Option<usize>,
}

impl<I: ?Sized> Clone for ClassifiedIssue<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for ClassifiedIssue<'_, I> {}

/// Computes the code offset of every issue.
///
/// With `strict` set, positions outside of the code are rejected with
/// [`crate::error::FilterError::OutOfRangePosition`]; otherwise they map to
/// whatever offset the arithmetic gives.
pub fn locate_issues<'a, I: Issue>(
    issues: &'a [I],
    code: &OffsetMapper,
    strict: bool,
) -> FilterResult<Vec<LocatedIssue<'a, I>>> {
    issues
        .iter()
        .enumerate()
        .map(|(index, issue)| {
            let offset = if strict {
                code.checked_position_to_offset(issue.line(), issue.column())?
            } else {
                code.position_to_offset(issue.line(), issue.column())
            };
            Ok(LocatedIssue {
                index,
                issue,
                offset,
            })
        })
        .collect()
}

/// Sorts located issues by offset, keeping the original order on ties.
pub fn sort_by_offset<I: ?Sized>(located: &mut [LocatedIssue<'_, I>]) {
    located.sort_by_key(|issue| issue.offset);
}

/// Classifies issues with a single forward scan over `segments`.
///
/// An issue is a template issue when an Equal segment covers its offset; its
/// template offset is then the same distance into the segment's template
/// interval. Intervals are half-open, except that the last segment also
/// covers the offset right past the end of the code.
///
/// `located` **must** be sorted by offset (see [`sort_by_offset`]): the
/// segment cursor never moves backwards, so an issue that comes after one
/// with a larger offset can miss the segment that covers it and is reported
/// as new. Results come back in input order.
pub fn classify_sorted<'a, I: ?Sized>(
    located: &[LocatedIssue<'a, I>],
    segments: &[DiffSegment],
) -> Vec<ClassifiedIssue<'a, I>> {
    let mut cursor = 0;
    let mut classified = Vec::with_capacity(located.len());

    for item in located {
        let mut template_offset = None;

        while let Some(segment) = segments.get(cursor) {
            let is_last = cursor + 1 == segments.len();
            let before_offset = segment.code_interval.end < item.offset
                || (segment.code_interval.end == item.offset && !is_last);

            if before_offset || segment.tag != DiffTag::Equal {
                cursor += 1;
                continue;
            }

            // The issue lies in text that precedes this equality, i.e. in
            // something the student inserted.
            if item.offset < segment.code_interval.start {
                break;
            }

            template_offset =
                Some(segment.template_interval.start + (item.offset - segment.code_interval.start));
            break;
        }

        classified.push(ClassifiedIssue {
            index: item.index,
            issue: item.issue,
            is_template_issue: template_offset.is_some(),
            template_offset,
        });
    }

    classified
}
