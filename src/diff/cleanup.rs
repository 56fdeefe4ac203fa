#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Semantic cleanup of char-level edit scripts.
//!
//! A minimal char diff happily matches single letters and spaces between a
//! deleted comment and the code that replaced it, which produces unreadable
//! scripts like `-bel +"g =o -w: +ld"`. The pass below folds such short
//! coincidental equalities into the surrounding edits, the way
//! diff-match-patch's `diff_cleanupSemantic` does, so that replaced regions
//! end up as one delete block followed by one insert block.

use super::engine::{DiffTag, EditOp};

/// Working representation: operations over chars so slicing stays cheap.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Chunk {
    /// Operation tag.
    tag:   DiffTag,
    /// Operation text.
    chars: Vec<char>,
}

impl Chunk {
    /// Creates a chunk.
    fn new(tag: DiffTag, chars: Vec<char>) -> Self {
        Self { tag, chars }
    }
}

/// Rewrites `script` in place, merging coincidental equalities into the edits
/// around them.
///
/// The rewritten script still turns the same template into the same code.
pub fn cleanup_semantic(script: &mut Vec<EditOp>) {
    let mut chunks: Vec<Chunk> = script
        .drain(..)
        .map(|op| Chunk::new(op.tag, op.text.chars().collect()))
        .collect();

    eliminate_equalities(&mut chunks);
    cleanup_semantic_lossless(&mut chunks);
    eliminate_overlaps(&mut chunks);

    script.extend(
        chunks
            .into_iter()
            .filter(|chunk| !chunk.chars.is_empty())
            .map(|chunk| EditOp::new(chunk.tag, chunk.chars.into_iter().collect::<String>())),
    );
}

/// Replaces every equality that is no longer than the edits on both of its
/// sides with a delete and an insert of the same text.
fn eliminate_equalities(chunks: &mut Vec<Chunk>) {
    let mut changes = false;
    // Indices of equalities seen so far that are still candidates.
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<usize> = None;
    let (mut inserted_before, mut deleted_before) = (0usize, 0usize);
    let (mut inserted_after, mut deleted_after) = (0usize, 0usize);

    let mut pointer = 0usize;
    while pointer < chunks.len() {
        if chunks[pointer].tag == DiffTag::Equal {
            equalities.push(pointer);
            inserted_before = inserted_after;
            deleted_before = deleted_after;
            inserted_after = 0;
            deleted_after = 0;
            last_equality = Some(chunks[pointer].chars.len());
            pointer += 1;
            continue;
        }

        if chunks[pointer].tag == DiffTag::Insert {
            inserted_after += chunks[pointer].chars.len();
        } else {
            deleted_after += chunks[pointer].chars.len();
        }

        let eliminate = last_equality.is_some_and(|len| {
            len <= inserted_before.max(deleted_before) && len <= inserted_after.max(deleted_after)
        });

        if eliminate && let Some(index) = equalities.pop() {
            let text = chunks[index].chars.clone();
            chunks.insert(index, Chunk::new(DiffTag::Delete, text));
            chunks[index + 1].tag = DiffTag::Insert;

            // The previous equality has to be re-evaluated as well.
            equalities.pop();
            inserted_before = 0;
            deleted_before = 0;
            inserted_after = 0;
            deleted_after = 0;
            last_equality = None;
            changes = true;

            pointer = match equalities.last() {
                Some(&previous) => previous + 1,
                None => 0,
            };
            continue;
        }

        pointer += 1;
    }

    if changes {
        cleanup_merge(chunks);
    }
}

/// Length of the common prefix of two char slices.
fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Length of the common suffix of two char slices.
fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// Length of the longest suffix of `a` that is also a prefix of `b`.
fn common_overlap(a: &[char], b: &[char]) -> usize {
    let max = a.len().min(b.len());
    (1..=max)
        .rev()
        .find(|&len| a[a.len() - len..] == b[..len])
        .unwrap_or(0)
}

/// Coalesces adjacent operations of the same kind, factors shared prefixes
/// and suffixes out of delete/insert pairs and slides single edits sideways
/// when that lets two equalities merge.
fn cleanup_merge(chunks: &mut Vec<Chunk>) {
    loop {
        coalesce(chunks);
        if !slide_single_edits(chunks) {
            break;
        }
    }
}

/// First half of [`cleanup_merge`]: rebuilds every run of edits between two
/// equalities as at most one delete followed by one insert.
fn coalesce(chunks: &mut Vec<Chunk>) {
    let mut merged: Vec<Chunk> = Vec::with_capacity(chunks.len());
    let mut deleted: Vec<char> = Vec::new();
    let mut inserted: Vec<char> = Vec::new();

    // A trailing empty equality flushes the last run.
    let sentinel = Chunk::new(DiffTag::Equal, Vec::new());
    for chunk in chunks.drain(..).chain(std::iter::once(sentinel)) {
        match chunk.tag {
            DiffTag::Delete => deleted.extend(chunk.chars),
            DiffTag::Insert => inserted.extend(chunk.chars),
            DiffTag::Equal => {
                let mut equal = chunk.chars;

                if !deleted.is_empty() && !inserted.is_empty() {
                    let prefix = common_prefix(&inserted, &deleted);
                    if prefix > 0 {
                        let shared: Vec<char> = inserted.drain(..prefix).collect();
                        deleted.drain(..prefix);
                        match merged.last_mut() {
                            Some(previous) if previous.tag == DiffTag::Equal => {
                                previous.chars.extend(shared)
                            }
                            _ => merged.push(Chunk::new(DiffTag::Equal, shared)),
                        }
                    }

                    let suffix = common_suffix(&inserted, &deleted);
                    if suffix > 0 {
                        let mut shared: Vec<char> =
                            inserted.drain(inserted.len() - suffix..).collect();
                        deleted.truncate(deleted.len() - suffix);
                        shared.append(&mut equal);
                        equal = shared;
                    }
                }

                if !deleted.is_empty() {
                    merged.push(Chunk::new(DiffTag::Delete, std::mem::take(&mut deleted)));
                }
                if !inserted.is_empty() {
                    merged.push(Chunk::new(DiffTag::Insert, std::mem::take(&mut inserted)));
                }

                if equal.is_empty() {
                    continue;
                }
                match merged.last_mut() {
                    Some(previous) if previous.tag == DiffTag::Equal => {
                        previous.chars.extend(equal)
                    }
                    _ => merged.push(Chunk::new(DiffTag::Equal, equal)),
                }
            }
        }
    }

    *chunks = merged;
}

/// Second half of [`cleanup_merge`]: for `A<ins>BA` / `AB<ins>B`-shaped
/// single edits, slides the edit so that it is absorbed by an equality.
///
/// Returns true when anything moved, in which case the script needs another
/// coalescing round.
fn slide_single_edits(chunks: &mut Vec<Chunk>) -> bool {
    let mut changes = false;
    let mut pointer = 1;

    while pointer + 1 < chunks.len() {
        if chunks[pointer - 1].tag != DiffTag::Equal || chunks[pointer + 1].tag != DiffTag::Equal {
            pointer += 1;
            continue;
        }

        let before = chunks[pointer - 1].chars.clone();
        let after = chunks[pointer + 1].chars.clone();
        let edit = &chunks[pointer].chars;

        if edit.ends_with(&before) {
            // Shift the edit over the previous equality.
            let mut shifted = before.clone();
            shifted.extend_from_slice(&edit[..edit.len() - before.len()]);
            chunks[pointer].chars = shifted;
            let mut next = before;
            next.extend(after);
            chunks[pointer + 1].chars = next;
            chunks.remove(pointer - 1);
            changes = true;
        } else if edit.starts_with(&after) {
            // Shift the edit over the next equality.
            let mut shifted = edit[after.len()..].to_vec();
            shifted.extend_from_slice(&after);
            chunks[pointer - 1].chars.extend(after);
            chunks[pointer].chars = shifted;
            chunks.remove(pointer + 1);
            changes = true;
        }
        pointer += 1;
    }

    changes
}

/// Scores how well a boundary between `one` and `two` falls on a logical
/// boundary. Higher is better; 6 means an edge of the text.
fn boundary_score(one: &[char], two: &[char]) -> u8 {
    let (Some(&last), Some(&first)) = (one.last(), two.first()) else {
        return 6;
    };

    let non_alnum_1 = !last.is_alphanumeric();
    let non_alnum_2 = !first.is_alphanumeric();
    let whitespace_1 = non_alnum_1 && last.is_whitespace();
    let whitespace_2 = non_alnum_2 && first.is_whitespace();
    let line_break_1 = whitespace_1 && matches!(last, '\r' | '\n');
    let line_break_2 = whitespace_2 && matches!(first, '\r' | '\n');
    let blank_line_1 = line_break_1 && (one.ends_with(&['\n', '\n']) || one.ends_with(&['\n', '\r', '\n']));
    let blank_line_2 = line_break_2
        && [&['\n', '\n'][..], &['\n', '\r', '\n'], &['\r', '\n', '\n'], &['\r', '\n', '\r', '\n']]
            .iter()
            .any(|blank| two.starts_with(blank));

    if blank_line_1 || blank_line_2 {
        5
    } else if line_break_1 || line_break_2 {
        4
    } else if non_alnum_1 && !whitespace_1 && whitespace_2 {
        3
    } else if whitespace_1 || whitespace_2 {
        2
    } else if non_alnum_1 || non_alnum_2 {
        1
    } else {
        0
    }
}

/// Slides single edits surrounded by equalities to the position where their
/// edges line up best with word and line boundaries.
fn cleanup_semantic_lossless(chunks: &mut Vec<Chunk>) {
    let mut pointer = 1;

    while pointer + 1 < chunks.len() {
        if chunks[pointer - 1].tag != DiffTag::Equal || chunks[pointer + 1].tag != DiffTag::Equal {
            pointer += 1;
            continue;
        }

        let mut equality_1 = chunks[pointer - 1].chars.clone();
        let mut edit = chunks[pointer].chars.clone();
        let mut equality_2 = chunks[pointer + 1].chars.clone();

        // Shift the edit as far left as it goes.
        let offset = common_suffix(&equality_1, &edit);
        if offset > 0 {
            let common = edit[edit.len() - offset..].to_vec();
            equality_1.truncate(equality_1.len() - offset);
            let mut shifted = common.clone();
            shifted.extend_from_slice(&edit[..edit.len() - offset]);
            edit = shifted;
            let mut next = common;
            next.extend(equality_2);
            equality_2 = next;
        }

        // Then step right one char at a time, remembering the best fit.
        let mut best = (equality_1.clone(), edit.clone(), equality_2.clone());
        let mut best_score =
            boundary_score(&equality_1, &edit) + boundary_score(&edit, &equality_2);
        while !edit.is_empty() && !equality_2.is_empty() && edit[0] == equality_2[0] {
            equality_1.push(edit.remove(0));
            edit.push(equality_2.remove(0));
            let score = boundary_score(&equality_1, &edit) + boundary_score(&edit, &equality_2);
            // `>=` prefers the rightmost of equally good boundaries.
            if score >= best_score {
                best_score = score;
                best = (equality_1.clone(), edit.clone(), equality_2.clone());
            }
        }

        let (best_equality_1, best_edit, best_equality_2) = best;
        if chunks[pointer - 1].chars != best_equality_1 {
            chunks[pointer].chars = best_edit;
            chunks[pointer + 1].chars = best_equality_2;
            chunks[pointer - 1].chars = best_equality_1;

            if chunks[pointer + 1].chars.is_empty() {
                chunks.remove(pointer + 1);
            }
            if chunks[pointer - 1].chars.is_empty() {
                chunks.remove(pointer - 1);
                pointer -= 1;
            }
        }
        pointer += 1;
    }
}

/// Splits delete/insert pairs that overlap by at least half of either side,
/// turning the overlap into an equality.
///
/// `-abcxxx +xxxdef` becomes `-abc =xxx +def`, and `-xxxabc +defxxx` becomes
/// `+def =xxx -abc`.
fn eliminate_overlaps(chunks: &mut Vec<Chunk>) {
    let mut pointer = 1;

    while pointer < chunks.len() {
        if chunks[pointer - 1].tag != DiffTag::Delete || chunks[pointer].tag != DiffTag::Insert {
            pointer += 1;
            continue;
        }

        let deletion = chunks[pointer - 1].chars.clone();
        let insertion = chunks[pointer].chars.clone();
        let overlap_1 = common_overlap(&deletion, &insertion);
        let overlap_2 = common_overlap(&insertion, &deletion);
        let substantial =
            |overlap: usize| overlap > 0 && (overlap * 2 >= deletion.len() || overlap * 2 >= insertion.len());

        if overlap_1 >= overlap_2 {
            if substantial(overlap_1) {
                chunks[pointer - 1].chars = deletion[..deletion.len() - overlap_1].to_vec();
                chunks[pointer].chars = insertion[overlap_1..].to_vec();
                chunks.insert(pointer, Chunk::new(DiffTag::Equal, insertion[..overlap_1].to_vec()));
                pointer += 1;
            }
        } else if substantial(overlap_2) {
            chunks[pointer - 1] =
                Chunk::new(DiffTag::Insert, insertion[..insertion.len() - overlap_2].to_vec());
            chunks[pointer] = Chunk::new(DiffTag::Delete, deletion[overlap_2..].to_vec());
            chunks.insert(pointer, Chunk::new(DiffTag::Equal, deletion[..overlap_2].to_vec()));
            pointer += 1;
        }
        pointer += 2;
    }
}
