//! Text edits against the original source and the buffer that collects them.
//!
//! The scribe never builds the output string. It records replacements
//! against byte offsets of the input, so rolling back a speculative layout
//! is a truncation of the buffer to a remembered length.

use std::ops::Range;

use serde::Serialize;

/// Replace `length` bytes at `offset` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextEdit {
    pub offset: usize,
    pub length: usize,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(offset: usize, length: usize, replacement: impl Into<String>) -> Self {
        Self {
            offset,
            length,
            replacement: replacement.into(),
        }
    }

    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// Growable list of edits with merging of adjacent replacements.
///
/// Edits below `floor` (the length recorded by some live checkpoint) are
/// never rewritten by a merge, so truncating back to a checkpoint always
/// restores exactly the edits that existed when it was taken.
#[derive(Debug, Default)]
pub(crate) struct EditBuffer {
    edits: Vec<TextEdit>,
}

impl EditBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.edits.len()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.edits.truncate(len);
    }

    #[cfg(test)]
    pub(crate) fn edits(&self) -> &[TextEdit] {
        &self.edits
    }

    /// Record a replacement, folding it into the previous edit when the two
    /// touch and the previous edit is above `floor`.
    pub(crate) fn add_replace(
        &mut self,
        source: &str,
        offset: usize,
        length: usize,
        replacement: &str,
        floor: usize,
    ) {
        if self.edits.len() > floor {
            if let Some(previous) = self.edits.last_mut() {
                let prev_offset = previous.offset;
                let prev_length = previous.length;
                let prev_repl_len = previous.replacement.len();

                if prev_offset == offset && prev_length == length {
                    if length == 0 {
                        previous.replacement.push_str(replacement);
                        return;
                    }
                    if prev_repl_len == 0 {
                        // A deletion superseded by a replacement of the same range.
                        self.edits.pop();
                        self.push_unless_noop(source, offset, length, replacement);
                        return;
                    }
                }

                if prev_offset + prev_length == offset {
                    if length != 0 {
                        if !replacement.is_empty() {
                            previous.length += length;
                            previous.replacement.push_str(replacement);
                        } else if prev_length + length == prev_repl_len {
                            let original = source.get(prev_offset..prev_offset + prev_repl_len);
                            if original == Some(previous.replacement.as_str()) {
                                self.edits.pop();
                            } else {
                                previous.length = prev_repl_len;
                            }
                        } else {
                            previous.length += length;
                        }
                    } else if !replacement.is_empty() {
                        previous.replacement.push_str(replacement);
                    }
                    return;
                }

                if offset + length == prev_offset
                    && prev_length + length == replacement.len() + prev_repl_len
                {
                    let total = format!("{replacement}{}", previous.replacement);
                    let span_len = prev_length + length;
                    if source.get(offset..offset + span_len) == Some(total.as_str()) {
                        self.edits.pop();
                    } else {
                        previous.offset = offset;
                        previous.length = span_len;
                        previous.replacement = total;
                    }
                    return;
                }
            }
        }
        self.edits.push(TextEdit::new(offset, length, replacement));
    }

    fn push_unless_noop(&mut self, source: &str, offset: usize, length: usize, replacement: &str) {
        if source.get(offset..offset + length) != Some(replacement) {
            self.edits.push(TextEdit::new(offset, length, replacement));
        }
    }

    /// Produce the final ordered, non-overlapping, minimal edit list
    /// restricted to `region`.
    pub(crate) fn finalize(self, source: &str, region: Range<usize>) -> Vec<TextEdit> {
        let mut edits = self.edits;
        // Inserts sort ahead of replacements at the same offset.
        edits.sort_by_key(|e| (e.offset, e.length != 0));

        let mut grouped: Vec<TextEdit> = Vec::with_capacity(edits.len());
        for edit in edits {
            match grouped.last_mut() {
                Some(last) if edit.offset <= last.end() => {
                    let end = last.end().max(edit.end());
                    last.length = end - last.offset;
                    last.replacement.push_str(&edit.replacement);
                }
                _ => grouped.push(edit),
            }
        }

        grouped
            .into_iter()
            .filter_map(|edit| minimize(source, edit))
            .filter_map(|edit| clip_to_region(source, edit, &region))
            .collect()
    }
}

/// Strip the text an edit shares with the source at both ends; `None` when
/// nothing is left to change.
fn minimize(source: &str, edit: TextEdit) -> Option<TextEdit> {
    let original = source.get(edit.offset..edit.end())?;
    let replacement = edit.replacement.as_str();
    let prefix = common_prefix(original, replacement);
    let suffix = common_suffix(&original[prefix..], &replacement[prefix..]);
    let length = original.len() - prefix - suffix;
    let new_text = &replacement[prefix..replacement.len() - suffix];
    if length == 0 && new_text.is_empty() {
        return None;
    }
    Some(TextEdit::new(edit.offset + prefix, length, new_text))
}

fn common_prefix(a: &str, b: &str) -> usize {
    a.char_indices()
        .zip(b.chars())
        .find(|((_, x), y)| x != y)
        .map(|((i, _), _)| i)
        .unwrap_or_else(|| a.len().min(b.len()))
}

fn common_suffix(a: &str, b: &str) -> usize {
    let mut len = 0;
    for (x, y) in a.chars().rev().zip(b.chars().rev()) {
        if x != y {
            break;
        }
        len += x.len_utf8();
    }
    len
}

/// Keep edits inside `region`. An edit that starts before the region and
/// reaches its start is cut at the region start: the source it covers inside
/// the region is replaced by the part of its replacement the source does not
/// already have.
fn clip_to_region(source: &str, edit: TextEdit, region: &Range<usize>) -> Option<TextEdit> {
    let region_start = region.start;
    let region_end = region.end;
    if edit.length != 0 {
        if region_start <= edit.offset && edit.end() <= region_end {
            return Some(edit);
        }
        if edit.offset < region_start && region_start <= edit.end() {
            let original = source.get(edit.offset..edit.end())?;
            let matched = common_prefix(original, &edit.replacement);
            let rest = &edit.replacement[matched..];
            let length = edit.end().min(region_end) - region_start;
            if source.get(region_start..region_start + length)? == rest {
                return None;
            }
            return Some(TextEdit::new(region_start, length, rest));
        }
        return None;
    }
    if region_start <= edit.offset && edit.offset < region_end {
        return Some(edit);
    }
    if edit.offset == source.len() && edit.offset == region_end {
        return Some(edit);
    }
    None
}

/// Apply an ordered, non-overlapping edit list to `source`.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        out.push_str(&source[cursor..edit.offset]);
        out.push_str(&edit.replacement);
        cursor = edit.end();
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finalize_all(buffer: EditBuffer, source: &str) -> Vec<TextEdit> {
        buffer.finalize(source, 0..source.len())
    }

    #[test]
    fn adjacent_replacements_merge() {
        let source = "a  b";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 1, " ", 0);
        buffer.add_replace(source, 2, 1, "", 0);
        assert_eq!(buffer.edits(), &[TextEdit::new(1, 2, " ")]);
        let edits = finalize_all(buffer, source);
        assert_eq!(apply_edits(source, &edits), "a b");
    }

    #[test]
    fn delete_then_matching_insert_is_dropped() {
        let source = "a b";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 1, "", 0);
        buffer.add_replace(source, 1, 1, " ", 0);
        assert!(buffer.edits().is_empty());
    }

    #[test]
    fn merge_never_touches_edits_below_floor() {
        let source = "ab";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 0, " ", 0);
        buffer.add_replace(source, 1, 0, "\n", 1);
        assert_eq!(buffer.len(), 2);
        buffer.truncate(1);
        assert_eq!(buffer.edits(), &[TextEdit::new(1, 0, " ")]);
    }

    #[test]
    fn finalize_drops_noops_and_trims() {
        let source = "x =  1";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 1, " ", 0);
        buffer.add_replace(source, 3, 2, " ", 0);
        let edits = finalize_all(buffer, source);
        assert_eq!(edits, vec![TextEdit::new(4, 1, "")]);
        assert_eq!(apply_edits(source, &edits), "x = 1");
    }

    #[test]
    fn region_filter_keeps_only_inside_edits() {
        let source = "a  b  c";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 2, " ", 0);
        buffer.add_replace(source, 4, 2, " ", 0);
        let edits = buffer.finalize(source, 4..7);
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].offset, 5);
        assert_eq!(apply_edits(source, &edits), "a  b c");
    }

    #[test]
    fn edit_ending_at_region_start_is_clipped() {
        let source = "a  b";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 2, " \n", 0);
        let edits = buffer.finalize(source, 3..4);
        assert_eq!(edits, vec![TextEdit::new(3, 0, "\n")]);
    }

    #[test]
    fn edit_straddling_region_start_is_cut_there() {
        let source = "a;   b;";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 2, 3, "\n", 0);
        let edits = buffer.finalize(source, 3..7);
        assert_eq!(edits, vec![TextEdit::new(3, 2, "\n")]);
        assert_eq!(apply_edits(source, &edits), "a; \nb;");
    }

    #[test]
    fn deletion_straddling_region_start_deletes_inside_only() {
        let source = "a    b";
        let mut buffer = EditBuffer::new();
        buffer.add_replace(source, 1, 4, "", 0);
        let edits = buffer.finalize(source, 3..6);
        assert_eq!(edits, vec![TextEdit::new(3, 2, "")]);
        assert_eq!(apply_edits(source, &edits), "a  b");
    }

    #[test]
    fn apply_in_order() {
        let source = "abc";
        let edits = vec![TextEdit::new(0, 0, "<"), TextEdit::new(1, 1, "B"), TextEdit::new(3, 0, ">")];
        assert_eq!(apply_edits(source, &edits), "<aBc>");
    }
}
