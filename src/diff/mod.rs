#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Template-to-code diffing: offsets, edit scripts and annotated segments.

/// Semantic cleanup pass over raw edit scripts.
pub mod cleanup;
/// Pluggable diff engines and the cleanup decision.
pub mod engine;
/// Position/offset conversions.
pub mod offsets;
/// Interval-annotated diff segments.
pub mod segments;

pub use cleanup::cleanup_semantic;
pub use engine::{
    CleanupMode, DiffEngine, DiffTag, EditOp, MyersEngine, should_apply_cleanup,
    template_edit_script,
};
pub use offsets::{OffsetMapper, build_prefix_lengths, offset_to_position, position_to_offset};
pub use segments::{DiffSegment, code_text, template_text, walk_segments};
