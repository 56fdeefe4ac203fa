#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Conversions between `(line, column)` positions and flat char offsets.

use crate::{
    error::{FilterError, FilterResult},
    types::Position,
    util::char_len,
};

/// Cumulative char counts of `lines`, terminators included.
///
/// The result has `lines.len() + 1` entries and starts with `0`.
pub fn build_prefix_lengths<S: AsRef<str>>(lines: &[S]) -> Vec<usize> {
    let mut prefix_lengths = Vec::with_capacity(lines.len() + 1);
    prefix_lengths.push(0);
    for line in lines {
        let last = prefix_lengths[prefix_lengths.len() - 1];
        prefix_lengths.push(last + char_len(line.as_ref()));
    }
    prefix_lengths
}

/// Maps positions to offsets and back over one line sequence.
///
/// The same mapper type serves both the template and the code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMapper {
    /// `prefix_lengths[i]` is the offset at which line `i + 1` starts.
    prefix_lengths: Vec<usize>,
}

impl OffsetMapper {
    /// Builds a mapper for `lines`.
    pub fn new<S: AsRef<str>>(lines: &[S]) -> Self {
        Self {
            prefix_lengths: build_prefix_lengths(lines),
        }
    }

    /// Returns the prefix length table.
    pub fn prefix_lengths(&self) -> &[usize] {
        &self.prefix_lengths
    }

    /// Number of lines the mapper was built from.
    pub fn line_count(&self) -> usize {
        self.prefix_lengths.len() - 1
    }

    /// Offset of `(line, column)`.
    ///
    /// Line `0` maps to offset `0`. Positions are not validated: a line past
    /// the end of the document is clamped to the end, and the column is added
    /// as is.
    pub fn position_to_offset(&self, line: usize, column: usize) -> usize {
        position_to_offset(&self.prefix_lengths, line, column)
    }

    /// Like [`OffsetMapper::position_to_offset`], but rejects positions that
    /// do not exist in the document.
    ///
    /// The column may point one past the last char of a line, and the line
    /// right after the last terminator is addressable at column `0`.
    pub fn checked_position_to_offset(&self, line: usize, column: usize) -> FilterResult<usize> {
        if line == 0 {
            return Ok(0);
        }

        let out_of_range = || FilterError::OutOfRangePosition {
            line,
            column,
            lines: self.line_count(),
        };

        let line_start = *self.prefix_lengths.get(line - 1).ok_or_else(out_of_range)?;
        let line_len = match self.prefix_lengths.get(line) {
            Some(line_end) => line_end - line_start,
            None => 0,
        };

        if column > line_len {
            return Err(out_of_range());
        }
        Ok(line_start + column)
    }

    /// Position of `offset`, found with a right-biased binary search over the
    /// prefix lengths.
    pub fn offset_to_position(&self, offset: usize) -> Position {
        offset_to_position(&self.prefix_lengths, offset)
    }
}

/// Offset of `(line, column)` given a prefix length table.
///
/// See [`OffsetMapper::position_to_offset`].
pub fn position_to_offset(prefix_lengths: &[usize], line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start = prefix_lengths
        .get(line - 1)
        .or_else(|| prefix_lengths.last())
        .copied()
        .unwrap_or_default();
    line_start + column
}

/// Position of `offset` given a prefix length table.
///
/// See [`OffsetMapper::offset_to_position`].
pub fn offset_to_position(prefix_lengths: &[usize], offset: usize) -> Position {
    let line = prefix_lengths.partition_point(|&start| start <= offset);
    let column = if line == 0 {
        offset
    } else {
        offset - prefix_lengths[line - 1]
    };
    Position::new(line, column)
}
