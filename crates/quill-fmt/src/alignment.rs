//! Alignments: wrappable groups of fragments and their wrap state.
//!
//! An `Alignment` is plain data. The scribe owns the stacks of live
//! alignments and applies the effects (new lines, indentation) the
//! alignment decides on.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::config::{FormatConfig, IndentStyle};

/// Alignment mode bits: indentation policy, split style and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode(u32);

impl Mode {
    pub const NO_ALIGNMENT: Mode = Mode(0);
    /// Break even when the group fits.
    pub const FORCE: Mode = Mode(1);
    pub const INDENT_ON_COLUMN: Mode = Mode(2);
    pub const INDENT_BY_ONE: Mode = Mode(4);

    pub const COMPACT_SPLIT: Mode = Mode(16);
    pub const COMPACT_FIRST_BREAK_SPLIT: Mode = Mode(32);
    pub const ONE_PER_LINE_SPLIT: Mode = Mode(32 + 16);
    pub const NEXT_SHIFTED_SPLIT: Mode = Mode(64);
    pub const NEXT_PER_LINE_SPLIT: Mode = Mode(64 + 16);

    /// Tabular layout across sibling members.
    pub const MULTICOLUMN: Mode = Mode(256);

    const SPLIT_MASK: u32 = 16 | 32 | 64;

    pub fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Only the split-style bits.
    pub fn split(self) -> Mode {
        Mode(self.0 & Self::SPLIT_MASK)
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

/// Which enclosing alignment absorbs an overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TieBreak {
    Outermost,
    Innermost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FragmentBreak {
    None,
    Break,
}

/// Kind of the member chunk currently laid out by a member alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkKind {
    /// Forces the next chunk check to start a chunk.
    Unset,
    Field,
    Method,
}

/// Snapshot of the scribe taken when an alignment is entered or a member
/// chunk starts. Restoring it rewinds the output to that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Location {
    pub line: usize,
    pub column: usize,
    pub indentation_level: usize,
    pub number_of_indentations: usize,
    pub last_number_of_new_lines: usize,
    pub need_space: bool,
    pub pending_space: bool,
    pub edits_len: usize,
    pub scanner_pos: usize,
    pub nls_tag_counter: usize,
}

/// The subset of preferences that turn columns into indentation levels.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndentMetrics {
    pub indentation_size: usize,
    pub tabs: bool,
    pub tabs_only_for_leading: bool,
}

impl IndentMetrics {
    pub(crate) fn from_config(config: &FormatConfig) -> Self {
        let tabs = config.indent_style == IndentStyle::Tab;
        Self {
            indentation_size: if tabs {
                config.tab_size
            } else {
                config.indentation_size
            },
            tabs,
            tabs_only_for_leading: config.use_tabs_only_for_leading_indentations,
        }
    }

    /// Indentation level reaching `column`, rounded up to a whole tab stop
    /// when indenting with tabs.
    pub(crate) fn next_indentation_level(&self, column: usize, current_level: usize) -> usize {
        let indent = column.saturating_sub(1);
        if indent == 0 {
            return current_level;
        }
        if self.tabs && !self.tabs_only_for_leading && self.indentation_size > 0 {
            let rem = indent % self.indentation_size;
            let addition = if rem == 0 {
                0
            } else {
                self.indentation_size - rem
            };
            indent + addition
        } else {
            indent
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Alignment {
    pub id: u32,
    pub name: &'static str,
    pub mode: Mode,
    pub tie_break: TieBreak,
    pub fragment_count: usize,
    pub fragment_index: usize,
    pub fragment_breaks: Vec<FragmentBreak>,
    pub fragment_indentations: Vec<usize>,
    pub break_indentation_level: usize,
    pub shift_break_indentation_level: usize,
    pub was_split: bool,
    pub location: Location,
    pub chunk_kind: ChunkKind,
    pub chunk_start_index: Option<usize>,
    pub need_redo_column_alignment: bool,
    pub original_indentation_level: usize,
    /// Number of times this alignment was laid out again.
    pub restarts: usize,
}

impl Alignment {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: u32,
        name: &'static str,
        mode: Mode,
        tie_break: TieBreak,
        fragment_count: usize,
        location: Location,
        continuation_indent: usize,
        metrics: IndentMetrics,
    ) -> Self {
        let indent_size = metrics.indentation_size;
        let output_level = location.indentation_level;
        let mut current_column = location.column;
        if current_column == 1 {
            current_column = output_level + 1;
        }
        let break_indentation_level = if mode.contains(Mode::INDENT_ON_COLUMN) {
            let level = metrics.next_indentation_level(current_column, output_level);
            if level == output_level {
                level + continuation_indent * indent_size
            } else {
                level
            }
        } else if mode.contains(Mode::INDENT_BY_ONE) {
            output_level + indent_size
        } else {
            output_level + continuation_indent * indent_size
        };

        let mut alignment = Self {
            id,
            name,
            mode,
            tie_break,
            fragment_count,
            fragment_index: 0,
            fragment_breaks: vec![FragmentBreak::None; fragment_count],
            fragment_indentations: vec![0; fragment_count],
            break_indentation_level,
            shift_break_indentation_level: break_indentation_level + indent_size,
            was_split: false,
            location,
            chunk_kind: ChunkKind::Unset,
            chunk_start_index: None,
            need_redo_column_alignment: false,
            original_indentation_level: output_level,
            restarts: 0,
        };
        if mode.contains(Mode::FORCE) {
            alignment.could_break();
        }
        alignment
    }

    fn break_at(&mut self, index: usize, indentation: usize) {
        self.fragment_breaks[index] = FragmentBreak::Break;
        self.fragment_indentations[index] = indentation;
    }

    /// Escalate to the next wrap layout, if the split style has one left.
    pub(crate) fn could_break(&mut self) -> bool {
        if self.fragment_count == 0 {
            return false;
        }
        let split = self.mode.split();
        let broke = if split == Mode::COMPACT_FIRST_BREAK_SPLIT {
            if self.fragment_breaks[0] == FragmentBreak::None {
                self.break_at(0, self.break_indentation_level);
                true
            } else {
                self.break_compact()
            }
        } else if split == Mode::COMPACT_SPLIT {
            self.break_compact()
        } else if split == Mode::NEXT_SHIFTED_SPLIT {
            if self.fragment_breaks[0] == FragmentBreak::None {
                self.break_at(0, self.break_indentation_level);
                for i in 1..self.fragment_count {
                    self.break_at(i, self.shift_break_indentation_level);
                }
                true
            } else {
                false
            }
        } else if split == Mode::ONE_PER_LINE_SPLIT {
            if self.fragment_breaks[0] == FragmentBreak::None {
                for i in 0..self.fragment_count {
                    self.break_at(i, self.break_indentation_level);
                }
                true
            } else {
                self.break_next_per_line()
            }
        } else if split == Mode::NEXT_PER_LINE_SPLIT {
            self.break_next_per_line()
        } else {
            false
        };
        if broke {
            self.was_split = true;
        }
        broke
    }

    /// Break the closest unbroken fragment at or before the current one.
    fn break_compact(&mut self) -> bool {
        let last = self.fragment_index.min(self.fragment_count - 1);
        for i in (0..=last).rev() {
            if self.fragment_breaks[i] == FragmentBreak::None {
                self.break_at(i, self.break_indentation_level);
                return true;
            }
        }
        false
    }

    fn break_next_per_line(&mut self) -> bool {
        if self.fragment_breaks[0] != FragmentBreak::None
            || self.fragment_count < 2
            || self.fragment_breaks[1] != FragmentBreak::None
        {
            return false;
        }
        if self.mode.contains(Mode::INDENT_ON_COLUMN) {
            self.fragment_indentations[0] = self.break_indentation_level;
        }
        for i in 1..self.fragment_count {
            self.break_at(i, self.break_indentation_level);
        }
        true
    }

    /// Whether fragment effects (breaks and indentation) apply at all.
    pub(crate) fn has_fragment_effects(&self) -> bool {
        self.mode.contains(Mode::MULTICOLUMN) || self.mode.split() != Mode::NO_ALIGNMENT
    }

    pub(crate) fn current_break(&self) -> FragmentBreak {
        self.fragment_breaks
            .get(self.fragment_index)
            .copied()
            .unwrap_or(FragmentBreak::None)
    }

    pub(crate) fn current_indentation(&self) -> usize {
        self.fragment_indentations
            .get(self.fragment_index)
            .copied()
            .unwrap_or(0)
    }

    /// Record the column a multi-column fragment reached. Returns whether the
    /// whole alignment must be laid out again with the wider columns.
    pub(crate) fn check_column(&mut self, reached_level: usize) -> bool {
        if !self.mode.contains(Mode::MULTICOLUMN) {
            return false;
        }
        let index = self.fragment_index;
        let Some(&fragment_indentation) = self.fragment_indentations.get(index) else {
            return false;
        };
        if reached_level > fragment_indentation {
            self.fragment_indentations[index] = reached_level;
            if fragment_indentation != 0 {
                for later in &mut self.fragment_indentations[index + 1..] {
                    *later = 0;
                }
                self.need_redo_column_alignment = true;
            }
        }
        if self.need_redo_column_alignment && index + 1 == self.fragment_count {
            self.need_redo_column_alignment = false;
            return true;
        }
        false
    }

    /// Start a new member chunk when the kind changes. A chunk starting at
    /// a new member takes a fresh checkpoint and forgets its breaks.
    pub(crate) fn check_chunk_start(
        &mut self,
        kind: ChunkKind,
        start_index: usize,
        location: Location,
    ) -> bool {
        if self.chunk_kind == kind {
            return false;
        }
        self.chunk_kind = kind;
        if self.chunk_start_index != Some(start_index) {
            self.chunk_start_index = Some(start_index);
            self.location = location;
            self.reset();
        }
        true
    }

    pub(crate) fn reset(&mut self) {
        self.fragment_breaks = vec![FragmentBreak::None; self.fragment_count];
        self.fragment_indentations = vec![0; self.fragment_count];
        if self.mode.contains(Mode::FORCE) {
            self.could_break();
        }
    }

    /// Re-apply the break indentation to fragments already broken.
    pub(crate) fn update(&mut self) {
        for i in 1..self.fragment_count {
            if self.fragment_breaks[i] == FragmentBreak::Break {
                self.fragment_indentations[i] = self.break_indentation_level;
            }
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} (fragment {}/{}, break level {}, split {})",
            self.name,
            self.id,
            self.fragment_index,
            self.fragment_count,
            self.break_indentation_level,
            self.was_split
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(column: usize, indentation_level: usize) -> Location {
        Location {
            line: 1,
            column,
            indentation_level,
            number_of_indentations: 0,
            last_number_of_new_lines: 0,
            need_space: false,
            pending_space: false,
            edits_len: 0,
            scanner_pos: 0,
            nls_tag_counter: 0,
        }
    }

    fn spaces() -> IndentMetrics {
        IndentMetrics {
            indentation_size: 4,
            tabs: false,
            tabs_only_for_leading: false,
        }
    }

    fn alignment(mode: Mode, count: usize) -> Alignment {
        Alignment::new(
            0,
            "test",
            mode,
            TieBreak::Outermost,
            count,
            location(10, 4),
            2,
            spaces(),
        )
    }

    #[test]
    fn break_indentation_by_mode() {
        assert_eq!(alignment(Mode::COMPACT_SPLIT, 3).break_indentation_level, 12);
        assert_eq!(
            alignment(Mode::COMPACT_SPLIT | Mode::INDENT_BY_ONE, 3).break_indentation_level,
            8
        );
        let on_column = alignment(Mode::COMPACT_SPLIT | Mode::INDENT_ON_COLUMN, 3);
        assert_eq!(on_column.break_indentation_level, 9);
        assert_eq!(on_column.shift_break_indentation_level, 13);
    }

    #[test]
    fn compact_breaks_one_fragment_per_attempt() {
        let mut a = alignment(Mode::COMPACT_SPLIT, 4);
        a.fragment_index = 2;
        assert!(a.could_break());
        assert_eq!(a.fragment_breaks[2], FragmentBreak::Break);
        assert!(a.could_break());
        assert_eq!(a.fragment_breaks[1], FragmentBreak::Break);
        assert!(a.could_break());
        assert!(!a.could_break());
        assert!(a.was_split);
    }

    #[test]
    fn one_per_line_breaks_everything_once() {
        let mut a = alignment(Mode::ONE_PER_LINE_SPLIT, 3);
        assert!(a.could_break());
        assert!(a.fragment_breaks.iter().all(|b| *b == FragmentBreak::Break));
        assert!(!a.could_break());
    }

    #[test]
    fn next_shifted_indents_followers_further() {
        let mut a = alignment(Mode::NEXT_SHIFTED_SPLIT, 3);
        assert!(a.could_break());
        assert_eq!(a.fragment_indentations, vec![12, 16, 16]);
        assert!(!a.could_break());
    }

    #[test]
    fn next_per_line_keeps_first_fragment_inline() {
        let mut a = alignment(Mode::NEXT_PER_LINE_SPLIT, 3);
        assert!(a.could_break());
        assert_eq!(a.fragment_breaks[0], FragmentBreak::None);
        assert_eq!(a.fragment_breaks[1], FragmentBreak::Break);
        assert!(!a.could_break());
        assert!(!alignment(Mode::NEXT_PER_LINE_SPLIT, 1).could_break());
    }

    #[test]
    fn no_split_never_breaks_and_force_breaks_up_front() {
        assert!(!alignment(Mode::NO_ALIGNMENT, 2).could_break());
        let forced = alignment(Mode::ONE_PER_LINE_SPLIT | Mode::FORCE, 2);
        assert!(forced.was_split);
    }

    #[test]
    fn multicolumn_widening_requests_redo_on_last_fragment() {
        let mut a = alignment(Mode::MULTICOLUMN, 2);
        a.fragment_index = 0;
        assert!(!a.check_column(8));
        a.fragment_index = 1;
        assert!(!a.check_column(12));
        a.fragment_index = 0;
        assert!(!a.check_column(10));
        assert_eq!(a.fragment_indentations, vec![10, 0]);
        a.fragment_index = 1;
        assert!(a.check_column(14));
    }

    #[test]
    fn chunk_start_resets_only_for_new_members() {
        let mut a = alignment(Mode::COMPACT_SPLIT, 2);
        assert!(a.check_chunk_start(ChunkKind::Field, 0, location(1, 0)));
        a.could_break();
        a.chunk_kind = ChunkKind::Unset;
        assert!(a.check_chunk_start(ChunkKind::Field, 0, location(1, 0)));
        assert!(a.was_split);
        assert_eq!(a.fragment_breaks[0], FragmentBreak::Break);
        assert!(a.check_chunk_start(ChunkKind::Method, 3, location(1, 0)));
        assert_eq!(a.fragment_breaks[0], FragmentBreak::None);
        assert!(!a.check_chunk_start(ChunkKind::Method, 4, location(1, 0)));
    }

    #[test]
    fn tab_metrics_round_to_tab_stops() {
        let tabs = IndentMetrics {
            indentation_size: 4,
            tabs: true,
            tabs_only_for_leading: false,
        };
        assert_eq!(tabs.next_indentation_level(7, 0), 8);
        assert_eq!(tabs.next_indentation_level(1, 4), 4);
        assert_eq!(spaces().next_indentation_level(7, 0), 6);
    }
}
