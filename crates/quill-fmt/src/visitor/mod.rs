//! Syntax-tree walk driving the scribe.
//!
//! Every node kind knows its token sequence. The walker prints those tokens
//! through the scribe in source order, recursing into children, and wraps
//! lists that may break across lines in alignments.

mod declarations;
mod expressions;
mod statements;

use quill_parser::ast::item::Name;
use quill_parser::ast::stmt::Stmt;
use quill_parser::{SyntaxKind, SyntaxNode};

use crate::alignment::{Mode, TieBreak};
use crate::config::{BracePosition, FormatConfig, Wrap};
use crate::scribe::{AlignmentId, Scribe};
use crate::signal::{FmtResult, FormatSignal};

pub(crate) struct Walker<'a> {
    pub(crate) scribe: Scribe<'a>,
    config: &'a FormatConfig,
}

/// Parameters of an alignment about to be entered.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AlignmentSpec {
    name: &'static str,
    mode: Mode,
    tie_break: TieBreak,
    fragments: usize,
    continuation: usize,
    adjust: bool,
}

impl AlignmentSpec {
    pub(crate) fn outermost(mut self) -> Self {
        self.tie_break = TieBreak::Outermost;
        self
    }

    pub(crate) fn continuation(mut self, units: usize) -> Self {
        self.continuation = units;
        self
    }

    /// Break relative to an enclosing member column layout.
    pub(crate) fn adjusted(mut self) -> Self {
        self.adjust = true;
        self
    }
}

/// Unwrap a child the parser guarantees for an error-free tree.
pub(crate) fn required<T>(child: Option<T>, what: &str) -> FmtResult<T> {
    child.ok_or_else(|| FormatSignal::abort(format!("malformed syntax tree: missing {what}")))
}

impl<'a> Walker<'a> {
    pub(crate) fn new(scribe: Scribe<'a>, config: &'a FormatConfig) -> Self {
        Self { scribe, config }
    }

    pub(crate) fn into_scribe(self) -> Scribe<'a> {
        self.scribe
    }

    fn token(&mut self, kind: SyntaxKind, space_before: bool) -> FmtResult {
        self.scribe.print_next_token(kind, space_before)
    }

    fn optional_token(&mut self, kind: SyntaxKind, space_before: bool) -> FmtResult<bool> {
        self.scribe.print_optional_next_token(kind, space_before)
    }

    /// Print a declared name, which may be spelled as a keyword.
    fn name(&mut self, name: &Name, space_before: bool) -> FmtResult {
        let token = required(name.ident(), "name")?;
        self.token(token.kind(), space_before)
    }

    fn alignment(&self, name: &'static str, wrap: Wrap, fragments: usize) -> AlignmentSpec {
        AlignmentSpec {
            name,
            mode: wrap.mode(),
            tie_break: TieBreak::Innermost,
            fragments,
            continuation: self.config.continuation_indentation,
            adjust: false,
        }
    }

    /// Run `body` inside an alignment, laying it out again each time an
    /// overflow restarts this alignment.
    fn aligned(
        &mut self,
        spec: AlignmentSpec,
        mut body: impl FnMut(&mut Self, AlignmentId) -> FmtResult,
    ) -> FmtResult {
        let id = self.scribe.enter_alignment(
            spec.name,
            spec.mode,
            spec.tie_break,
            spec.fragments,
            spec.continuation,
            spec.adjust,
        );
        loop {
            match body(self, id) {
                Ok(()) => break,
                Err(FormatSignal::Restart(restart)) => self.scribe.redo_alignment(id, restart)?,
                Err(abort) => return Err(abort),
            }
        }
        self.scribe.exit_alignment(id)
    }

    // ── Roots ──────────────────────────────────────────────────────────

    pub(crate) fn format_compilation_unit(&mut self, root: &SyntaxNode) -> FmtResult {
        let statements: Vec<Stmt> = quill_parser::ast::stmt::statements_of(root).collect();
        self.format_statements(&statements, false, true)?;
        self.scribe.print_end_of_compilation_unit()
    }

    pub(crate) fn format_statement_list(&mut self, root: &SyntaxNode) -> FmtResult {
        let statements: Vec<Stmt> = quill_parser::ast::stmt::statements_of(root).collect();
        self.format_statements(&statements, false, false)?;
        self.scribe.print_end_of_compilation_unit()
    }

    pub(crate) fn format_class_body_declarations(&mut self, root: &SyntaxNode) -> FmtResult {
        let members: Vec<_> = quill_parser::ast::item::members_of(root).collect();
        self.format_class_members(&members)?;
        self.scribe.print_end_of_compilation_unit()
    }

    pub(crate) fn format_expression_root(&mut self, root: &SyntaxNode) -> FmtResult {
        let expr = required(
            root.children().find_map(quill_parser::ast::expr::Expr::cast),
            "expression",
        )?;
        self.format_expr(&expr)?;
        self.scribe.print_end_of_compilation_unit()
    }

    // ── Shared layout ──────────────────────────────────────────────────

    /// Print statements one per line. `top_level` separates function and
    /// class declarations by blank lines.
    fn format_statements(
        &mut self,
        statements: &[Stmt],
        new_line_after_last: bool,
        top_level: bool,
    ) -> FmtResult {
        let count = statements.len();
        for (i, statement) in statements.iter().enumerate() {
            if i > 0 {
                let previous = &statements[i - 1];
                if matches!(previous, Stmt::EmptyStmt(_)) && !matches!(statement, Stmt::EmptyStmt(_)) {
                    self.scribe.print_new_line();
                }
                if top_level && (is_declaration(previous) || is_declaration(statement)) {
                    self.scribe
                        .print_empty_lines(self.config.blank_lines_between_top_level_declarations);
                }
            }
            self.format_statement(statement)?;
            if i + 1 < count {
                if !matches!(statement, Stmt::EmptyStmt(_)) {
                    self.scribe.print_new_line();
                }
            } else if new_line_after_last {
                self.scribe.print_new_line();
            }
        }
        Ok(())
    }

    /// Print `{`, honouring a brace position. `header_line` is the line the
    /// construct started on, for `next_line_on_wrap`.
    fn format_opening_brace(
        &mut self,
        position: BracePosition,
        space_before: bool,
        header_line: usize,
    ) -> FmtResult {
        match position {
            BracePosition::SameLine => {}
            BracePosition::NextLine => self.scribe.print_new_line(),
            BracePosition::NextLineShifted => {
                self.scribe.print_new_line();
                self.scribe.indent();
            }
            BracePosition::NextLineOnWrap => {
                if self.scribe.line > header_line
                    || self.scribe.column + 2 > self.scribe.page_width()
                {
                    self.scribe.print_new_line();
                }
            }
        }
        self.token(SyntaxKind::L_BRACE, space_before)?;
        self.scribe.print_trailing_comment()
    }

    /// Print a braced statement list: a block, a function body or a switch.
    fn format_braced_statements(&mut self, statements: &[Stmt], braces: Braces) -> FmtResult {
        self.format_opening_brace(braces.position, braces.space_before, braces.header_line)?;
        if !statements.is_empty() {
            self.scribe.print_new_line();
            if braces.blank_lines_at_start > 0 {
                self.scribe.print_empty_lines(braces.blank_lines_at_start);
            }
            if braces.indent {
                self.scribe.indent();
            }
            self.format_statements(statements, true, false)?;
            self.scribe.print_comment()?;
            if braces.indent {
                self.scribe.unindent();
            }
        } else {
            if braces.new_line_when_empty {
                self.scribe.print_new_line();
            }
            if braces.indent {
                self.scribe.indent();
            }
            self.scribe.print_comment()?;
            if braces.indent {
                self.scribe.unindent();
            }
        }
        self.token(SyntaxKind::R_BRACE, false)?;
        self.scribe.print_trailing_comment()?;
        if braces.position == BracePosition::NextLineShifted {
            self.scribe.unindent();
        }
        Ok(())
    }
}

/// Layout of a braced statement list.
#[derive(Debug, Clone, Copy)]
struct Braces {
    position: BracePosition,
    space_before: bool,
    /// Line the owning construct started on.
    header_line: usize,
    indent: bool,
    new_line_when_empty: bool,
    blank_lines_at_start: usize,
}

fn is_declaration(statement: &Stmt) -> bool {
    matches!(statement, Stmt::FnDecl(_) | Stmt::ClassDecl(_))
}

/// Whether `node` holds a comment anywhere inside it.
fn contains_comment(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .any(|token| {
            matches!(
                token.kind(),
                SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT | SyntaxKind::DOC_COMMENT
            )
        })
}
