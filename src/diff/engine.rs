#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Edit scripts between a template and a submission.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use similar::{Algorithm, DiffTag as OpTag, capture_diff_slices};

use super::cleanup::cleanup_semantic;

/// Kind of change an edit operation describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffTag {
    /// Text present in both the template and the code.
    Equal,
    /// Text the student added.
    Insert,
    /// Template text the student removed.
    Delete,
}

impl DiffTag {
    /// Returns the string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            DiffTag::Equal => "EQUAL",
            DiffTag::Insert => "INSERT",
            DiffTag::Delete => "DELETE",
        }
    }
}

impl fmt::Display for DiffTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One operation of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOp {
    /// What happened to `text`.
    pub tag:  DiffTag,
    /// The text that was kept, inserted or deleted.
    pub text: String,
}

impl EditOp {
    /// Creates a new operation.
    pub fn new(tag: DiffTag, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    /// Shorthand for an [`DiffTag::Equal`] operation.
    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(DiffTag::Equal, text)
    }

    /// Shorthand for an [`DiffTag::Insert`] operation.
    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(DiffTag::Insert, text)
    }

    /// Shorthand for an [`DiffTag::Delete`] operation.
    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(DiffTag::Delete, text)
    }
}

/// Anything that can turn one text into another with an edit script.
///
/// Implementations must be deterministic, and the script must reproduce
/// `old` from its Equal and Delete operations and `new` from its Equal and
/// Insert operations.
pub trait DiffEngine {
    /// Computes the edit script transforming `old` into `new`.
    fn compute_edit_script(&self, old: &str, new: &str) -> Vec<EditOp>;
}

impl<F> DiffEngine for F
where
    F: Fn(&str, &str) -> Vec<EditOp>,
{
    fn compute_edit_script(&self, old: &str, new: &str) -> Vec<EditOp> {
        self(old, new)
    }
}

/// Char-level Myers diff backed by `similar`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MyersEngine;

impl DiffEngine for MyersEngine {
    fn compute_edit_script(&self, old: &str, new: &str) -> Vec<EditOp> {
        let old_chars: Vec<char> = old.chars().collect();
        let new_chars: Vec<char> = new.chars().collect();

        let mut script = Vec::new();
        for op in capture_diff_slices(Algorithm::Myers, &old_chars, &new_chars) {
            let (tag, old_range, new_range) = op.as_tag_tuple();
            match tag {
                OpTag::Equal => push_op(&mut script, DiffTag::Equal, &old_chars[old_range]),
                OpTag::Delete => push_op(&mut script, DiffTag::Delete, &old_chars[old_range]),
                OpTag::Insert => push_op(&mut script, DiffTag::Insert, &new_chars[new_range]),
                OpTag::Replace => {
                    push_op(&mut script, DiffTag::Delete, &old_chars[old_range]);
                    push_op(&mut script, DiffTag::Insert, &new_chars[new_range]);
                }
            }
        }
        script
    }
}

/// Appends `chars` to the script, extending the last operation when it has
/// the same tag.
fn push_op(script: &mut Vec<EditOp>, tag: DiffTag, chars: &[char]) {
    if chars.is_empty() {
        return;
    }
    match script.last_mut() {
        Some(last) if last.tag == tag => last.text.extend(chars),
        _ => script.push(EditOp::new(tag, chars.iter().collect::<String>())),
    }
}

/// When to run the semantic cleanup pass over a raw edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupMode {
    /// Clean up only when the comment lines of template and code differ.
    #[default]
    Auto,
    /// Always clean up.
    Always,
    /// Keep the raw script.
    Never,
}

impl FromStr for CleanupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(CleanupMode::Auto),
            "always" => Ok(CleanupMode::Always),
            "never" => Ok(CleanupMode::Never),
            other => Err(format!("unknown cleanup mode `{other}` (expected auto, always or never)")),
        }
    }
}

/// Trimmed contents of the comment-only lines in `lines`.
fn comment_lines<'a, S: AsRef<str>>(lines: &[&'a str], markers: &[S]) -> HashSet<&'a str> {
    lines
        .iter()
        .copied()
        .filter(|line| crate::util::is_comment_line(line, markers))
        .map(str::trim)
        .collect()
}

/// Decides whether the raw diff between template and code needs the semantic
/// cleanup pass.
///
/// A char-level diff between a deleted placeholder comment and the code that
/// replaced it interleaves tiny inserts and deletes wherever the two share
/// words. That happens exactly when a comment line exists on one side but not
/// on the other, so the comment lines of both sides are compared as sets.
pub fn should_apply_cleanup<S: AsRef<str>>(
    template_lines: &[&str],
    code_lines: &[&str],
    markers: &[S],
) -> bool {
    comment_lines(template_lines, markers) != comment_lines(code_lines, markers)
}

/// Computes the template-to-code edit script for two line sequences, running
/// the semantic cleanup pass when `mode` asks for it.
pub fn template_edit_script<E, S>(
    engine: &E,
    template_lines: &[&str],
    code_lines: &[&str],
    mode: CleanupMode,
    markers: &[S],
) -> Vec<EditOp>
where
    E: DiffEngine + ?Sized,
    S: AsRef<str>,
{
    let template = template_lines.concat();
    let code = code_lines.concat();
    let mut script = engine.compute_edit_script(&template, &code);

    let cleanup = match mode {
        CleanupMode::Auto => should_apply_cleanup(template_lines, code_lines, markers),
        CleanupMode::Always => true,
        CleanupMode::Never => false,
    };
    tracing::debug!(ops = script.len(), cleanup, "computed raw template diff");

    if cleanup {
        cleanup_semantic(&mut script);
    }
    script
}
