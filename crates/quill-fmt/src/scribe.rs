//! The scribe: a virtual output cursor that turns formatting decisions into
//! edits against the original source.
//!
//! The tree walker tells the scribe which token comes next and where spaces,
//! new lines and indentation belong. The scribe consumes the token stream in
//! lockstep, prints the comments and whitespace it finds on the way, tracks
//! the line and column the output would be at, and raises a restart when a
//! token would run past the page width.

use quill_parser::SyntaxKind;
use tracing::{debug, trace};

use crate::alignment::{
    Alignment, ChunkKind, FragmentBreak, IndentMetrics, Location, Mode, TieBreak,
};
use crate::config::{FormatConfig, IndentStyle};
use crate::edit::{EditBuffer, TextEdit};
use crate::scanner::{line_break_len, ScanToken, Scanner};
use crate::signal::{AlignmentRestart, FmtResult, FormatSignal, RestartReason};

/// Restarts allowed per formatting request before giving up.
const MAX_RESTARTS: usize = 20_000;

const NLS_TAG: &str = "$NON-NLS-";

/// Handle to a live alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AlignmentId(u32);

pub(crate) struct Scribe<'a> {
    source: &'a str,
    pub(crate) config: &'a FormatConfig,
    metrics: IndentMetrics,
    line_separator: &'a str,
    scanner: Scanner<'a>,
    edits: EditBuffer,

    pub(crate) line: usize,
    pub(crate) column: usize,
    pub(crate) indentation_level: usize,
    pub(crate) number_of_indentations: usize,
    pub(crate) last_number_of_new_lines: usize,
    pub(crate) need_space: bool,
    pub(crate) pending_space: bool,
    nls_tag_counter: usize,

    alignments: Vec<Alignment>,
    member_alignments: Vec<Alignment>,
    next_alignment_id: u32,
    restarts: usize,
}

impl<'a> Scribe<'a> {
    pub(crate) fn new(
        source: &'a str,
        tokens: &'a [ScanToken],
        config: &'a FormatConfig,
        indentation_level: usize,
        line_separator: &'a str,
    ) -> Self {
        let metrics = IndentMetrics::from_config(config);
        Self {
            source,
            config,
            metrics,
            line_separator,
            scanner: Scanner::new(tokens),
            edits: EditBuffer::new(),
            line: 1,
            column: 1,
            indentation_level: indentation_level * metrics.indentation_size,
            number_of_indentations: indentation_level,
            last_number_of_new_lines: 0,
            need_space: false,
            pending_space: false,
            nls_tag_counter: 0,
            alignments: Vec::new(),
            member_alignments: Vec::new(),
            next_alignment_id: 0,
            restarts: 0,
        }
    }

    pub(crate) fn page_width(&self) -> usize {
        self.config.page_width
    }

    /// Finish the walk and return the edits inside `region`.
    pub(crate) fn into_edits(self, region: std::ops::Range<usize>) -> Vec<TextEdit> {
        self.edits.finalize(self.source, region)
    }

    // ── Edits ──────────────────────────────────────────────────────────

    /// Length below which merges may not rewrite edits: every live
    /// checkpoint must find its edits untouched when it rolls back.
    fn edit_floor(&self) -> usize {
        self.alignments
            .iter()
            .chain(self.member_alignments.iter())
            .map(|a| a.location.edits_len)
            .max()
            .unwrap_or(0)
    }

    fn add_replace_edit(&mut self, start: usize, end: usize, replacement: &str) {
        let floor = self.edit_floor();
        self.edits
            .add_replace(self.source, start, end - start, replacement, floor);
    }

    fn add_insert_edit(&mut self, offset: usize, text: &str) {
        self.add_replace_edit(offset, offset, text);
    }

    fn add_delete_edit(&mut self, start: usize, end: usize) {
        self.add_replace_edit(start, end, "");
    }

    // ── Cursor ─────────────────────────────────────────────────────────

    pub(crate) fn indent(&mut self) {
        self.indentation_level += self.metrics.indentation_size;
        self.number_of_indentations += 1;
    }

    pub(crate) fn unindent(&mut self) {
        self.indentation_level = self
            .indentation_level
            .saturating_sub(self.metrics.indentation_size);
        self.number_of_indentations = self.number_of_indentations.saturating_sub(1);
    }

    /// Ask for a space before the next printed token.
    pub(crate) fn space(&mut self) {
        if !self.need_space {
            return;
        }
        self.last_number_of_new_lines = 0;
        self.pending_space = true;
        self.column += 1;
        self.need_space = false;
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
            indentation_level: self.indentation_level,
            number_of_indentations: self.number_of_indentations,
            last_number_of_new_lines: self.last_number_of_new_lines,
            need_space: self.need_space,
            pending_space: self.pending_space,
            edits_len: self.edits.len(),
            scanner_pos: self.scanner.position(),
            nls_tag_counter: self.nls_tag_counter,
        }
    }

    fn reset_at(&mut self, location: Location) {
        self.line = location.line;
        self.column = location.column;
        self.indentation_level = location.indentation_level;
        self.number_of_indentations = location.number_of_indentations;
        self.last_number_of_new_lines = location.last_number_of_new_lines;
        self.need_space = location.need_space;
        self.pending_space = location.pending_space;
        self.nls_tag_counter = location.nls_tag_counter;
        self.edits.truncate(location.edits_len);
        self.scanner.reset_to(location.scanner_pos);
    }

    /// Indentation level that reaches `column` from the current level.
    pub(crate) fn next_indentation_level(&self, column: usize) -> usize {
        self.metrics
            .next_indentation_level(column, self.indentation_level)
    }

    // ── Token printing ─────────────────────────────────────────────────

    /// Kind of the next significant token, without consuming anything.
    pub(crate) fn peek(&self) -> SyntaxKind {
        self.scanner.peek_significant()
    }

    pub(crate) fn is_next(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    /// Print the comments ahead, then the next token, which must be `expected`.
    pub(crate) fn print_next_token(&mut self, expected: SyntaxKind, space_before: bool) -> FmtResult {
        self.print_next_token_of(&[expected], space_before)
    }

    pub(crate) fn print_next_token_of(
        &mut self,
        expected: &[SyntaxKind],
        space_before: bool,
    ) -> FmtResult {
        self.print_comment()?;
        let token = self.next_token()?;
        if !expected.contains(&token.kind) {
            return Err(FormatSignal::abort(format!(
                "unexpected token at offset {}: expected {:?}, found {:?}",
                token.start, expected, token.kind
            )));
        }
        if token.kind == SyntaxKind::STRING {
            self.check_nls_tag();
        }
        let space_before = space_before || self.would_fuse(token);
        let text = &self.source[token.start..token.end];
        self.print_text(text, space_before)
    }

    /// Whether printing `token` right after the previous token would lex
    /// differently, as in `- -a` or `typeof x`.
    fn would_fuse(&self, token: ScanToken) -> bool {
        let Some(previous) = self.scanner.token_before_current() else {
            return false;
        };
        let is_word = |kind: SyntaxKind| {
            kind == SyntaxKind::IDENT || kind == SyntaxKind::NUMBER || kind.is_keyword()
        };
        use SyntaxKind as K;
        match (previous.kind, token.kind) {
            (K::PLUS | K::PLUS_PLUS, K::PLUS | K::PLUS_PLUS) => true,
            (K::MINUS | K::MINUS_MINUS, K::MINUS | K::MINUS_MINUS) => true,
            (K::SLASH, K::REGEX) => true,
            (K::REGEX, next) => is_word(next),
            (K::NUMBER, K::DOT) => self.source[previous.start..previous.end]
                .bytes()
                .all(|b| b.is_ascii_digit()),
            (prev, next) => is_word(prev) && is_word(next),
        }
    }

    /// Print the next token if it is `kind`; otherwise print nothing.
    pub(crate) fn print_optional_next_token(
        &mut self,
        kind: SyntaxKind,
        space_before: bool,
    ) -> FmtResult<bool> {
        if self.peek() != kind {
            return Ok(false);
        }
        self.print_next_token(kind, space_before)?;
        Ok(true)
    }

    fn next_token(&mut self) -> FmtResult<ScanToken> {
        let token = self
            .scanner
            .next_token()
            .ok_or_else(|| FormatSignal::abort("unexpected end of input"))?;
        if token.kind == SyntaxKind::ERROR {
            return Err(FormatSignal::abort(format!(
                "invalid input at offset {}",
                token.start
            )));
        }
        Ok(token)
    }

    /// Emit the current token's text at the virtual cursor.
    fn print_text(&mut self, text: &str, space_before: bool) -> FmtResult {
        let length = text.chars().count();
        // Measured before the indentation below is printed: a token that
        // opens a wrapped line never asks for another break, even when its
        // indentation pushes it past the page width.
        if length + self.column > self.config.page_width {
            self.handle_line_too_long()?;
        }
        self.last_number_of_new_lines = 0;
        if self.indentation_level != 0 {
            self.print_indentation_if_necessary();
        }
        if space_before {
            self.space();
        }
        if self.pending_space {
            self.add_insert_edit(self.scanner.start(), " ");
        }
        self.pending_space = false;
        match text.rfind(['\n', '\r']) {
            // Multi-line template literals continue on their last line.
            Some(last_break) => {
                self.line += text.matches('\n').count();
                self.column = text[last_break + 1..].chars().count() + 1;
            }
            None => self.column += length,
        }
        self.need_space = true;
        Ok(())
    }

    /// A string followed on the same line by a `//$NON-NLS-n$` comment keeps
    /// its line unbroken until that comment is printed.
    fn check_nls_tag(&mut self) {
        let mut lookahead = self.scanner;
        while let Some(token) = lookahead.next_token() {
            let text = &self.source[token.start..token.end];
            match token.kind {
                SyntaxKind::LINE_COMMENT => {
                    if text.contains(NLS_TAG) {
                        self.nls_tag_counter += 1;
                    }
                    return;
                }
                SyntaxKind::WHITESPACE if text.contains(['\n', '\r']) => return,
                SyntaxKind::EOF => return,
                _ => {}
            }
        }
    }

    pub(crate) fn indentation_string(&mut self) -> String {
        let mut buffer = String::new();
        let tab_length = self.config.tab_size.max(1);
        let indentation_size = self.metrics.indentation_size.max(1);
        let level = self.indentation_level;
        let leading_only = self.config.use_tabs_only_for_leading_indentations;
        match self.config.indent_style {
            IndentStyle::Tab => {
                let mut tabs_printed = 0;
                while self.column <= level {
                    if !leading_only || tabs_printed < self.number_of_indentations {
                        buffer.push('\t');
                        tabs_printed += 1;
                        self.column += tab_length - ((self.column - 1) % tab_length);
                    } else {
                        buffer.push(' ');
                        self.column += 1;
                    }
                    self.need_space = false;
                }
            }
            IndentStyle::Space => {
                while self.column <= level {
                    buffer.push(' ');
                    self.column += 1;
                    self.need_space = false;
                }
            }
            IndentStyle::Mixed => {
                let leading_columns = if leading_only {
                    self.number_of_indentations * indentation_size
                } else {
                    usize::MAX
                };
                while self.column <= level {
                    if self.column <= leading_columns {
                        if self.column - 1 + tab_length <= level {
                            buffer.push('\t');
                            self.column += tab_length;
                        } else if self.column - 1 + indentation_size <= level {
                            for _ in 0..indentation_size {
                                buffer.push(' ');
                            }
                            self.column += indentation_size;
                        } else {
                            buffer.push(' ');
                            self.column += 1;
                        }
                    } else {
                        while self.column <= level {
                            buffer.push(' ');
                            self.column += 1;
                        }
                    }
                    self.need_space = false;
                }
            }
        }
        buffer
    }

    fn print_indentation_if_necessary(&mut self) {
        let indentation = self.indentation_string();
        if !indentation.is_empty() {
            self.add_insert_edit(self.scanner.start(), &indentation);
            self.pending_space = false;
        }
    }

    // ── New lines ──────────────────────────────────────────────────────

    /// Break the line after the current token, unless already at a line start.
    pub(crate) fn print_new_line(&mut self) {
        self.print_new_line_at(self.scanner.end());
    }

    fn print_new_line_at(&mut self, position: usize) {
        if self.nls_tag_counter > 0 {
            return;
        }
        if self.last_number_of_new_lines >= 1 {
            self.column = 1;
            return;
        }
        self.add_insert_edit(position, self.line_separator);
        self.line += 1;
        self.last_number_of_new_lines = 1;
        self.column = 1;
        self.need_space = false;
        self.pending_space = false;
    }

    /// Make sure `lines` blank lines follow the current token.
    pub(crate) fn print_empty_lines(&mut self, lines: usize) {
        self.print_empty_lines_at(lines, self.scanner.end());
    }

    fn print_empty_lines_at(&mut self, lines: usize, position: usize) {
        let buffer = self.empty_lines(lines);
        if !buffer.is_empty() {
            self.add_insert_edit(position, &buffer);
        }
    }

    fn empty_lines(&mut self, lines: usize) -> String {
        let new_lines = match self.last_number_of_new_lines {
            0 => lines + 1,
            1 => lines,
            already => {
                if already - 1 >= lines {
                    return String::new();
                }
                lines - already + 1
            }
        };
        self.last_number_of_new_lines += new_lines;
        self.line += new_lines;
        self.column = 1;
        self.need_space = false;
        self.pending_space = false;
        self.line_separator.repeat(new_lines)
    }

    fn new_line_text(&mut self) -> String {
        if self.last_number_of_new_lines >= 1 {
            self.column = 1;
            return String::new();
        }
        self.line += 1;
        self.last_number_of_new_lines = 1;
        self.column = 1;
        self.need_space = false;
        self.pending_space = false;
        self.line_separator.to_string()
    }

    fn preserved_empty_lines(&mut self, count: usize) -> String {
        if count == 0 {
            return String::new();
        }
        match self.config.number_of_empty_lines_to_preserve {
            0 => self.new_line_text(),
            preserve => self.empty_lines(count.min(preserve)),
        }
    }

    fn preserve_empty_lines(&mut self, count: usize, position: usize) {
        if count == 0 {
            return;
        }
        match self.config.number_of_empty_lines_to_preserve {
            0 => self.print_new_line_at(position),
            preserve => self.print_empty_lines_at(count.min(preserve), position),
        }
    }

    // ── Comments ───────────────────────────────────────────────────────

    /// Print the whitespace and comments between the last printed token and
    /// the next significant one.
    pub(crate) fn print_comment(&mut self) -> FmtResult {
        let mut resume = self.scanner.position();
        let mut has_comment = false;
        let mut has_line_comment = false;
        let mut has_whitespace = false;
        let mut count = 0;
        while let Some(token) = self.scanner.next_token() {
            match token.kind {
                SyntaxKind::WHITESPACE => {
                    count = count_line_breaks(&self.source[token.start..token.end]);
                    if count == 0 {
                        has_whitespace = true;
                    } else if has_comment {
                        if count == 1 {
                            self.print_new_line_at(token.start);
                        } else {
                            self.preserve_empty_lines(count - 1, token.start);
                        }
                    } else if has_line_comment {
                        self.preserve_empty_lines(count, token.start);
                    } else if self.config.number_of_empty_lines_to_preserve != 0 {
                        let lines = self.preserved_empty_lines(count - 1);
                        self.add_replace_edit(token.start, token.end, &lines);
                        resume = self.scanner.position();
                        continue;
                    }
                    self.add_delete_edit(token.start, token.end);
                    resume = self.scanner.position();
                }
                SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT | SyntaxKind::DOC_COMMENT => {
                    if count > 1 {
                        self.preserve_empty_lines(count - 1, token.start);
                    } else if count == 1 {
                        self.print_new_line_at(token.start);
                    } else if has_whitespace {
                        self.space();
                    }
                    has_whitespace = false;
                    if token.kind == SyntaxKind::LINE_COMMENT {
                        self.print_line_comment(token);
                        has_line_comment = true;
                    } else {
                        self.print_block_comment(token, token.kind == SyntaxKind::DOC_COMMENT);
                        has_line_comment = false;
                        has_comment = true;
                    }
                    resume = self.scanner.position();
                    count = 0;
                }
                SyntaxKind::ERROR => {
                    return Err(FormatSignal::abort(format!(
                        "invalid input at offset {}",
                        token.start
                    )));
                }
                _ => break,
            }
        }
        self.scanner.reset_to(resume);
        Ok(())
    }

    /// Print comments that sit on the same line as the last printed token.
    pub(crate) fn print_trailing_comment(&mut self) -> FmtResult {
        let mut resume = self.scanner.position();
        let mut has_whitespace = false;
        let mut has_comment = false;
        let mut has_line_comment = false;
        while let Some(token) = self.scanner.next_token() {
            match token.kind {
                SyntaxKind::WHITESPACE => {
                    let count = count_line_breaks(&self.source[token.start..token.end]);
                    if has_line_comment {
                        if count >= 1 {
                            self.preserve_empty_lines(count, token.start);
                            self.add_delete_edit(token.start, token.end);
                            resume = self.scanner.position();
                        }
                        break;
                    } else if count >= 1 {
                        if has_comment {
                            self.print_new_line_at(token.start);
                        }
                        break;
                    }
                    has_whitespace = true;
                    self.add_delete_edit(token.start, token.end);
                    resume = self.scanner.position();
                }
                SyntaxKind::LINE_COMMENT => {
                    if has_whitespace {
                        self.space();
                    }
                    self.print_line_comment(token);
                    resume = self.scanner.position();
                    has_line_comment = true;
                }
                SyntaxKind::BLOCK_COMMENT | SyntaxKind::DOC_COMMENT => {
                    if has_line_comment {
                        break;
                    }
                    if has_whitespace {
                        self.space();
                    }
                    self.print_block_comment(token, false);
                    resume = self.scanner.position();
                    has_comment = true;
                }
                _ => break,
            }
        }
        self.scanner.reset_to(resume);
        Ok(())
    }

    fn is_on_first_column(&self, offset: usize) -> bool {
        offset == 0 || self.source[..offset].ends_with(['\n', '\r'])
    }

    /// Column (0-based, tabs expanded) a comment starts at in the source.
    fn comment_indentation(&self, start: usize) -> usize {
        let line_start = self.source[..start]
            .rfind(['\n', '\r'])
            .map(|i| i + 1)
            .unwrap_or(0);
        let tab_length = self.config.tab_size;
        let mut indentation = 0;
        for c in self.source[line_start..start].chars() {
            match c {
                '\t' if tab_length != 0 => {
                    indentation = tab_length * (indentation / tab_length + 1);
                }
                '\t' => {}
                _ => indentation += 1,
            }
        }
        indentation
    }

    fn print_line_comment(&mut self, token: ScanToken) {
        let text = &self.source[token.start..token.end];
        if text.contains(NLS_TAG) {
            self.nls_tag_counter = 0;
        }
        if self.indentation_level != 0
            && (!self.config.never_indent_line_comments_on_first_column
                || !self.is_on_first_column(token.start))
        {
            self.print_indentation_if_necessary();
        }
        if self.pending_space {
            self.add_insert_edit(token.start, " ");
        }
        self.need_space = false;
        self.pending_space = false;

        let body = text.trim_end_matches(['\n', '\r']);
        if body.len() < text.len() {
            self.add_replace_edit(token.start + body.len(), token.end, self.line_separator);
            self.line += 1;
            self.column = 1;
            self.last_number_of_new_lines = 1;
        } else {
            self.column += body.chars().count();
        }
        self.need_space = false;
        self.pending_space = false;
        self.realign_after_line_comment();
    }

    /// After a line comment forced a break inside an alignment, continue at
    /// that alignment's break indentation.
    fn realign_after_line_comment(&mut self) {
        let Some(current_offset) = self.alignments.last().map(|a| a.location.scanner_pos) else {
            return;
        };
        let member = self
            .member_alignments
            .last()
            .map(|m| (m.location.scanner_pos, m.break_indentation_level));
        match member {
            Some((member_offset, member_break)) if current_offset <= member_offset => {
                self.indentation_level = self.indentation_level.max(member_break);
            }
            _ => {
                let Some(current) = self.alignments.last_mut() else {
                    return;
                };
                if current.could_break() && current.was_split {
                    let (brk, indentation) = (current.current_break(), current.current_indentation());
                    self.perform_fragment_effect(brk, indentation);
                }
            }
        }
    }

    fn print_block_comment(&mut self, token: ScanToken, is_doc: bool) {
        let text = &self.source[token.start..token.end];
        let on_first_column = self.is_on_first_column(token.start);
        let indent_comment = self.indentation_level != 0
            && (is_doc || !self.config.never_indent_block_comments_on_first_column || !on_first_column);
        if indent_comment {
            self.print_indentation_if_necessary();
        }
        if self.pending_space {
            self.add_insert_edit(token.start, " ");
        }
        self.need_space = false;
        self.pending_space = false;

        let comment_column = self.column;
        let saved_indentation = self.indentation_level;
        if comment_column - 1 > self.indentation_level {
            self.indentation_level = comment_column - 1;
        }
        let source_indentation = if on_first_column {
            0
        } else {
            self.comment_indentation(token.start)
        };
        let format_comment = if is_doc {
            self.config.comment_format_doc_comments
        } else {
            self.config.comment_format_block_comments
        };

        let mut offset = 0;
        let mut first = true;
        for line in split_lines(text) {
            if first {
                self.column += line.content.chars().count();
                first = false;
            } else {
                let content = line.content;
                let (skip, add_space) = if on_first_column {
                    if format_comment {
                        let trimmed = content.trim_start_matches([' ', '\t']);
                        (content.len() - trimmed.len(), !trimmed.is_empty())
                    } else {
                        (0, false)
                    }
                } else {
                    let mut skip = strip_columns(content, source_indentation, self.config.tab_size);
                    let mut add_space = false;
                    if format_comment {
                        let rest = &content[skip..];
                        let trimmed = rest.trim_start_matches([' ', '\t']);
                        if trimmed.starts_with('*') {
                            skip += rest.len() - trimmed.len();
                            add_space = true;
                        }
                    }
                    (skip, add_space)
                };
                self.column = 1;
                self.line += 1;
                let mut replacement = self.line_separator.to_string();
                if indent_comment && self.indentation_level > 0 {
                    replacement.push_str(&self.indentation_string());
                }
                if add_space {
                    replacement.push(' ');
                    self.column += 1;
                }
                let break_start = token.start + offset - line.break_len;
                self.add_replace_edit(break_start, token.start + offset + skip, &replacement);
                self.column += content[skip..].chars().count();
            }
            offset += line.content.len() + line.next_break_len;
        }

        self.last_number_of_new_lines = 0;
        self.need_space = false;
        self.indentation_level = saved_indentation;
        if is_doc {
            self.print_new_line_at(token.end);
        }
    }

    /// Print what follows the last token of a compilation unit.
    pub(crate) fn print_end_of_compilation_unit(&mut self) -> FmtResult {
        let mut has_comment = false;
        let mut has_line_comment = false;
        let mut has_whitespace = false;
        let mut count = 0;
        loop {
            let token = self.next_token()?;
            match token.kind {
                SyntaxKind::WHITESPACE => {
                    count = count_line_breaks(&self.source[token.start..token.end]);
                    if count == 0 {
                        has_whitespace = true;
                    } else if has_comment {
                        if count == 1 {
                            self.print_new_line_at(token.start);
                        } else {
                            self.preserve_empty_lines(count - 1, token.start);
                        }
                    } else if has_line_comment {
                        self.preserve_empty_lines(count, token.start);
                    }
                    self.add_delete_edit(token.start, token.end);
                }
                SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT | SyntaxKind::DOC_COMMENT => {
                    if count > 1 {
                        self.preserve_empty_lines(count - 1, token.start);
                    } else if count == 1 {
                        self.print_new_line_at(token.start);
                    } else if has_whitespace {
                        self.space();
                    }
                    has_whitespace = false;
                    if token.kind == SyntaxKind::LINE_COMMENT {
                        self.print_line_comment(token);
                        has_line_comment = true;
                    } else {
                        self.print_block_comment(token, token.kind == SyntaxKind::DOC_COMMENT);
                        has_line_comment = false;
                        has_comment = true;
                    }
                    count = 0;
                }
                SyntaxKind::SEMICOLON => {
                    let text = &self.source[token.start..token.end];
                    self.print_text(text, self.config.insert_space_before_semicolon)?;
                }
                SyntaxKind::EOF => {
                    if count >= 1 || self.config.insert_new_line_at_end_of_file_if_missing {
                        self.print_new_line_at(self.source.len());
                    }
                    return Ok(());
                }
                kind => {
                    return Err(FormatSignal::abort(format!(
                        "unexpected {kind:?} at offset {} after the last statement",
                        token.start
                    )));
                }
            }
        }
    }

    // ── Alignments ─────────────────────────────────────────────────────

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_alignment_id;
        self.next_alignment_id += 1;
        id
    }

    /// Create and enter an alignment.
    ///
    /// With `adjust`, an alignment opened inside a laid-out member list
    /// breaks relative to the member rather than the current column.
    pub(crate) fn enter_alignment(
        &mut self,
        name: &'static str,
        mode: Mode,
        tie_break: TieBreak,
        fragment_count: usize,
        continuation_indent: usize,
        adjust: bool,
    ) -> AlignmentId {
        let id = self.alloc_id();
        let mut alignment = Alignment::new(
            id,
            name,
            mode,
            tie_break,
            fragment_count,
            self.location(),
            continuation_indent,
            self.metrics,
        );
        if adjust {
            if let Some(outermost) = self.member_alignments.first() {
                if outermost.has_fragment_effects() {
                    let base = match outermost.chunk_kind {
                        ChunkKind::Method => Some(self.indentation_level),
                        ChunkKind::Field => Some(outermost.original_indentation_level),
                        ChunkKind::Unset => None,
                    };
                    if let Some(base) = base {
                        alignment.break_indentation_level = if mode.contains(Mode::INDENT_BY_ONE) {
                            base + self.metrics.indentation_size
                        } else {
                            base + continuation_indent * self.metrics.indentation_size
                        };
                        alignment.update();
                    }
                }
            }
        }
        trace!(alignment = %alignment, "enter alignment");
        self.alignments.push(alignment);
        AlignmentId(id)
    }

    pub(crate) fn enter_member_alignment(
        &mut self,
        name: &'static str,
        mode: Mode,
        fragment_count: usize,
    ) -> AlignmentId {
        let id = self.alloc_id();
        let alignment = Alignment::new(
            id,
            name,
            mode,
            TieBreak::Innermost,
            fragment_count,
            self.location(),
            self.config.continuation_indentation,
            self.metrics,
        );
        trace!(alignment = %alignment, "enter member alignment");
        self.member_alignments.push(alignment);
        AlignmentId(id)
    }

    fn position_of(stack: &[Alignment], id: AlignmentId) -> FmtResult<usize> {
        stack
            .iter()
            .rposition(|a| a.id == id.0)
            .ok_or_else(|| FormatSignal::abort(format!("could not find matching alignment #{}", id.0)))
    }

    /// Leave an alignment, restoring the indentation it was entered with.
    pub(crate) fn exit_alignment(&mut self, id: AlignmentId) -> FmtResult {
        let index = Self::position_of(&self.alignments, id)?;
        let location = self.alignments[index].location;
        self.indentation_level = location.indentation_level;
        self.number_of_indentations = location.number_of_indentations;
        trace!(alignment = %self.alignments[index], "exit alignment");
        self.alignments.truncate(index);
        Ok(())
    }

    pub(crate) fn exit_member_alignment(&mut self, id: AlignmentId) -> FmtResult {
        let index = Self::position_of(&self.member_alignments, id)?;
        trace!(alignment = %self.member_alignments[index], "exit member alignment");
        self.member_alignments.truncate(index);
        Ok(())
    }

    /// Move `id` to fragment `index` and apply that fragment's break and
    /// indentation.
    pub(crate) fn align_fragment(&mut self, id: AlignmentId, index: usize) -> FmtResult {
        let position = Self::position_of(&self.alignments, id)?;
        let alignment = &mut self.alignments[position];
        alignment.fragment_index = index;
        if alignment.has_fragment_effects() {
            let (brk, indentation) = (alignment.current_break(), alignment.current_indentation());
            self.perform_fragment_effect(brk, indentation);
        }
        Ok(())
    }

    /// Move a member alignment to fragment `index`, widening its column if
    /// the output already went past it.
    pub(crate) fn align_member_fragment(&mut self, id: AlignmentId, index: usize) -> FmtResult {
        let position = Self::position_of(&self.member_alignments, id)?;
        let reached = self.next_indentation_level(self.column + usize::from(self.need_space));
        let alignment = &mut self.member_alignments[position];
        alignment.fragment_index = index;
        if alignment.check_column(reached) {
            let relative_depth = self.member_alignments.len() - 1 - position;
            return Err(FormatSignal::restart(RestartReason::AlignTooSmall, relative_depth));
        }
        if alignment.has_fragment_effects() {
            let (brk, indentation) = (alignment.current_break(), alignment.current_indentation());
            self.perform_fragment_effect(brk, indentation);
        }
        Ok(())
    }

    fn perform_fragment_effect(&mut self, brk: FragmentBreak, indentation: usize) {
        if brk == FragmentBreak::Break {
            self.print_new_line();
        }
        if indentation > 0 {
            self.indentation_level = indentation;
        }
    }

    /// Indent the first fragment at the break level without breaking
    /// before it, for initializers that already opened a new line.
    pub(crate) fn indent_first_fragment(&mut self, id: AlignmentId) -> FmtResult {
        let position = Self::position_of(&self.alignments, id)?;
        let alignment = &mut self.alignments[position];
        let level = alignment.break_indentation_level;
        if let Some(first) = alignment.fragment_indentations.first_mut() {
            *first = level;
        }
        Ok(())
    }

    pub(crate) fn check_chunk_start(
        &mut self,
        id: AlignmentId,
        kind: ChunkKind,
        start_index: usize,
    ) -> FmtResult<bool> {
        let location = self.location();
        let position = Self::position_of(&self.member_alignments, id)?;
        Ok(self.member_alignments[position].check_chunk_start(kind, start_index, location))
    }

    fn count_restart(&mut self) -> FmtResult {
        self.restarts += 1;
        if self.restarts > MAX_RESTARTS {
            debug!(restarts = self.restarts, "restart budget exhausted");
            return Err(FormatSignal::abort("too many alignment restarts"));
        }
        Ok(())
    }

    /// Handle a restart reaching the frame of alignment `id`: either pass it
    /// outward one level, or rewind to the alignment's checkpoint.
    pub(crate) fn redo_alignment(&mut self, id: AlignmentId, restart: AlignmentRestart) -> FmtResult {
        let index = Self::position_of(&self.alignments, id)?;
        if restart.reason == RestartReason::AlignTooSmall {
            // Targets a member alignment; this frame is abandoned.
            self.alignments.truncate(index);
            return Err(FormatSignal::Restart(restart));
        }
        if restart.relative_depth > 0 {
            self.alignments.truncate(index);
            return Err(FormatSignal::restart(restart.reason, restart.relative_depth - 1));
        }
        self.count_restart()?;
        self.alignments.truncate(index + 1);
        let alignment = &mut self.alignments[index];
        alignment.chunk_kind = ChunkKind::Unset;
        alignment.restarts += 1;
        debug!(alignment = %alignment, reason = %restart.reason, "restart alignment");
        let location = alignment.location;
        self.reset_at(location);
        Ok(())
    }

    /// Member-alignment counterpart of [`Scribe::redo_alignment`]. Returns
    /// the member index the chunk restarts from.
    pub(crate) fn redo_member_alignment(
        &mut self,
        id: AlignmentId,
        restart: AlignmentRestart,
    ) -> FmtResult<usize> {
        let index = Self::position_of(&self.member_alignments, id)?;
        if restart.reason == RestartReason::LineTooLong {
            self.member_alignments.truncate(index);
            return Err(FormatSignal::Restart(restart));
        }
        if restart.relative_depth > 0 {
            self.member_alignments.truncate(index);
            return Err(FormatSignal::restart(restart.reason, restart.relative_depth - 1));
        }
        self.count_restart()?;
        self.member_alignments.truncate(index + 1);
        let alignment = &mut self.member_alignments[index];
        alignment.chunk_kind = ChunkKind::Unset;
        alignment.restarts += 1;
        debug!(alignment = %alignment, reason = %restart.reason, "restart member alignment");
        let location = alignment.location;
        let start = alignment.chunk_start_index.unwrap_or(0);
        self.reset_at(location);
        Ok(start)
    }

    /// Pick the alignment that absorbs an overflow. Any outermost-rule
    /// alignment that can still break wins over innermost-rule ones.
    fn handle_line_too_long(&mut self) -> FmtResult {
        let mut outermost = None;
        for (depth, alignment) in self.alignments.iter_mut().rev().enumerate() {
            if alignment.tie_break == TieBreak::Outermost && alignment.could_break() {
                outermost = Some(depth);
            }
        }
        if let Some(depth) = outermost {
            return Err(FormatSignal::restart(RestartReason::LineTooLong, depth));
        }
        for (depth, alignment) in self.alignments.iter_mut().rev().enumerate() {
            if alignment.could_break() {
                return Err(FormatSignal::restart(RestartReason::LineTooLong, depth));
            }
        }
        Ok(())
    }
}

/// Number of line breaks in a whitespace run (`\r\n` counts once).
fn count_line_breaks(text: &str) -> usize {
    let mut count = 0;
    let mut rest = text;
    while let Some(i) = rest.find(['\n', '\r']) {
        count += 1;
        let len = line_break_len(&rest[i..]);
        rest = &rest[i + len.max(1)..];
    }
    count
}

struct CommentLine<'t> {
    content: &'t str,
    /// Length of the break before this line.
    break_len: usize,
    /// Length of the break after this line.
    next_break_len: usize,
}

fn split_lines(text: &str) -> Vec<CommentLine<'_>> {
    let mut lines = Vec::new();
    let mut rest = text;
    let mut break_len = 0;
    loop {
        match rest.find(['\n', '\r']) {
            Some(i) => {
                let next = line_break_len(&rest[i..]).max(1);
                lines.push(CommentLine {
                    content: &rest[..i],
                    break_len,
                    next_break_len: next,
                });
                break_len = next;
                rest = &rest[i + next..];
            }
            None => {
                lines.push(CommentLine {
                    content: rest,
                    break_len,
                    next_break_len: 0,
                });
                return lines;
            }
        }
    }
}

/// Bytes of leading whitespace covering at most `columns` columns.
fn strip_columns(line: &str, columns: usize, tab_length: usize) -> usize {
    let mut width = 0;
    let mut bytes = 0;
    for c in line.chars() {
        if width >= columns || !(c == ' ' || c == '\t') {
            break;
        }
        width += if c == '\t' { tab_length } else { 1 };
        bytes += 1;
    }
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;
    use crate::scanner::scan_tokens;

    fn with_scribe(source: &str, config: &FormatConfig, f: impl FnOnce(&mut Scribe<'_>)) -> String {
        let tokens = scan_tokens(source);
        let mut scribe = Scribe::new(source, &tokens, config, 0, "\n");
        f(&mut scribe);
        let edits = scribe.into_edits(0..source.len());
        apply_edits(source, &edits)
    }

    #[test]
    fn reprints_tokens_with_requested_spacing() {
        let config = FormatConfig::default();
        let out = with_scribe("a   =b ;", &config, |s| {
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::EQ, true).unwrap();
            s.print_next_token(SyntaxKind::IDENT, true).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_end_of_compilation_unit().unwrap();
        });
        assert_eq!(out, "a = b;");
    }

    #[test]
    fn unexpected_token_aborts() {
        let config = FormatConfig::default();
        with_scribe("a", &config, |s| {
            let err = s.print_next_token(SyntaxKind::NUMBER, false).unwrap_err();
            assert!(matches!(err, FormatSignal::Abort(_)));
        });
    }

    #[test]
    fn new_lines_do_not_stack() {
        let config = FormatConfig::default();
        let out = with_scribe("a;b;", &config, |s| {
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_new_line();
            s.print_new_line();
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_end_of_compilation_unit().unwrap();
        });
        assert_eq!(out, "a;\nb;");
    }

    #[test]
    fn blank_lines_are_capped() {
        let config = FormatConfig::default();
        let out = with_scribe("a;\n\n\n\nb;", &config, |s| {
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_new_line();
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_end_of_compilation_unit().unwrap();
        });
        assert_eq!(out, "a;\n\nb;");
    }

    #[test]
    fn indentation_is_inserted_before_tokens() {
        let config = FormatConfig::default();
        let out = with_scribe("{\nx;\n}", &config, |s| {
            s.print_next_token(SyntaxKind::L_BRACE, false).unwrap();
            s.indent();
            s.print_new_line();
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.unindent();
            s.print_new_line();
            s.print_next_token(SyntaxKind::R_BRACE, false).unwrap();
            s.print_end_of_compilation_unit().unwrap();
        });
        assert_eq!(out, "{\n    x;\n}");
    }

    #[test]
    fn block_comment_continuation_lines_follow_indentation() {
        let config = FormatConfig::default();
        let source = "{\n/*\n * a\n */\nx;\n}";
        let out = with_scribe(source, &config, |s| {
            s.print_next_token(SyntaxKind::L_BRACE, false).unwrap();
            s.indent();
            s.print_new_line();
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.unindent();
            s.print_new_line();
            s.print_next_token(SyntaxKind::R_BRACE, false).unwrap();
            s.print_end_of_compilation_unit().unwrap();
        });
        assert_eq!(out, "{\n    /*\n     * a\n     */\n    x;\n}");
    }

    #[test]
    fn trailing_line_comment_stays_on_its_line() {
        let config = FormatConfig::default();
        let out = with_scribe("a;   // done\nb;", &config, |s| {
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_trailing_comment().unwrap();
            s.print_new_line();
            s.print_next_token(SyntaxKind::IDENT, false).unwrap();
            s.print_next_token(SyntaxKind::SEMICOLON, false).unwrap();
            s.print_end_of_compilation_unit().unwrap();
        });
        assert_eq!(out, "a; // done\nb;");
    }

    #[test]
    fn overflow_restarts_the_enclosing_alignment() {
        let config = FormatConfig {
            page_width: 8,
            ..FormatConfig::default()
        };
        let source = "aaaa+bbbb";
        let tokens = scan_tokens(source);
        let mut scribe = Scribe::new(source, &tokens, &config, 0, "\n");
        let id = scribe.enter_alignment("test", Mode::COMPACT_SPLIT, TieBreak::Outermost, 2, 2, false);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = (|| -> FmtResult {
                scribe.align_fragment(id, 0)?;
                scribe.print_next_token(SyntaxKind::IDENT, false)?;
                scribe.print_next_token(SyntaxKind::PLUS, true)?;
                scribe.align_fragment(id, 1)?;
                scribe.print_next_token(SyntaxKind::IDENT, true)
            })();
            match result {
                Ok(()) => break,
                Err(FormatSignal::Restart(r)) => scribe.redo_alignment(id, r).unwrap(),
                Err(other) => panic!("{other:?}"),
            }
        }
        scribe.exit_alignment(id).unwrap();
        assert_eq!(attempts, 2);
        assert!(scribe.alignments.is_empty());
        let edits = scribe.into_edits(0..source.len());
        assert_eq!(apply_edits(source, &edits), "aaaa +\n        bbbb");
    }

    #[test]
    fn exiting_unknown_alignment_aborts() {
        let config = FormatConfig::default();
        with_scribe("a", &config, |s| {
            let err = s.exit_alignment(AlignmentId(42)).unwrap_err();
            assert!(matches!(err, FormatSignal::Abort(_)));
        });
    }

    #[test]
    fn line_break_counting() {
        assert_eq!(count_line_breaks("  "), 0);
        assert_eq!(count_line_breaks("\r\n\n"), 2);
        assert_eq!(count_line_breaks("\r\r"), 2);
    }
}
