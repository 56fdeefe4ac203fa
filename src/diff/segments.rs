#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Edit scripts annotated with their intervals in both documents.

use serde::Serialize;

use super::engine::{DiffTag, EditOp};
use crate::{types::Interval, util::char_len};

/// One edit operation together with the span it covers in the template and
/// in the code.
///
/// Inserts have a zero-width template interval and deletes a zero-width code
/// interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSegment {
    /// What happened to the text.
    pub tag:               DiffTag,
    /// The text itself.
    pub text:              String,
    /// Where the text sits in the template.
    pub template_interval: Interval,
    /// Where the text sits in the code.
    pub code_interval:     Interval,
}

/// Walks `script` once, accumulating offsets on both axes.
///
/// The last segment ends at the template's length on the template axis and
/// at the code's length on the code axis.
pub fn walk_segments(script: &[EditOp]) -> Vec<DiffSegment> {
    let (mut template_start, mut template_end) = (0usize, 0usize);
    let (mut code_start, mut code_end) = (0usize, 0usize);

    let mut segments = Vec::with_capacity(script.len());
    for op in script {
        let len = char_len(&op.text);
        match op.tag {
            DiffTag::Insert => code_end = code_start + len,
            DiffTag::Equal => {
                code_end = code_start + len;
                template_end = template_start + len;
            }
            DiffTag::Delete => template_end = template_start + len,
        }

        segments.push(DiffSegment {
            tag:               op.tag,
            text:              op.text.clone(),
            template_interval: Interval::new(template_start, template_end),
            code_interval:     Interval::new(code_start, code_end),
        });
        template_start = template_end;
        code_start = code_end;
    }

    segments
}

/// Rebuilds the template text from the segments that cover it.
pub fn template_text(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|segment| segment.tag != DiffTag::Insert)
        .map(|segment| segment.text.as_str())
        .collect()
}

/// Rebuilds the code text from the segments that cover it.
pub fn code_text(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|segment| segment.tag != DiffTag::Delete)
        .map(|segment| segment.text.as_str())
        .collect()
}
