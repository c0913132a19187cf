//! Event-based parser for JavaScript.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction.
//!
//! # Architecture
//!
//! The parser uses matklad's event-based approach (as in rust-analyzer):
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! The `open_before()` method enables wrapping a previously completed node
//! (e.g., turning `ident` into `call_expr(ident, arg_list)`) using the
//! "forward parent" technique.
//!
//! # Trivia
//!
//! Whitespace and comments are invisible to `current()`/`nth()`. They are
//! emitted into the tree by `advance()` and `open()`, and `open()` flushes
//! pending trivia first, so every node below the root starts at its first
//! significant token. The root is opened with `open_root()` and owns any
//! leading trivia.

pub(crate) mod declarations;
pub(crate) mod expressions;
pub(crate) mod statements;

use quill_common::span::Span;
use quill_common::token::Token;

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

/// A parser event. Events are collected during parsing and later converted
/// into a rowan green tree by [`Parser::build_tree`].
#[derive(Debug, Clone, Copy)]
enum Event {
    /// Start a new CST node. The `kind` is initially TOMBSTONE and gets
    /// patched by `close()` with the real node kind.
    ///
    /// `forward_parent` is used by `open_before()` to indicate that this
    /// node should be opened before the node at the specified event index.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    /// Finish the current CST node.
    Close,
    /// Consume the current token, advancing the token position.
    Advance,
}

/// An opaque marker for a started but not-yet-closed CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// An opaque marker for a completed (opened and closed) CST node.
/// Used by `open_before()` to wrap a previously completed node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

/// Event-based parser for JavaScript source code.
pub(crate) struct Parser<'src> {
    /// All tokens from the lexer (including trivia and Eof).
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Collected parser events.
    events: Vec<Event>,
    /// Original source text (for extracting token text via spans).
    source: &'src str,
    /// While set, `in` is not treated as a binary operator (for-in headers).
    no_in: bool,
    /// Collected parse errors.
    errors: Vec<ParseError>,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source text.
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            no_in: false,
            errors: Vec::new(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// Returns the SyntaxKind of the current significant token.
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Returns the SyntaxKind of the Nth significant token ahead.
    ///
    /// `nth(0)` is equivalent to `current()`. Returns `SyntaxKind::EOF` if
    /// past the end.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        let mut remaining = n;
        for token in &self.tokens[self.pos.min(self.tokens.len())..] {
            if token.kind.is_trivia() {
                continue;
            }
            if remaining == 0 {
                return SyntaxKind::from(token.kind);
            }
            remaining -= 1;
        }
        SyntaxKind::EOF
    }

    /// Returns the span of the current significant token.
    pub(crate) fn current_span(&self) -> Span {
        let pos = self.skip_trivia(self.pos);
        if pos < self.tokens.len() {
            self.tokens[pos].span
        } else {
            let end = self.source.len() as u32;
            Span::new(end, end)
        }
    }

    /// Check if the current significant token matches the given kind.
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if the current significant token matches any of the given kinds.
    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Whether a line break separates the previous token from the current
    /// significant one. Used for the restricted productions (`return`,
    /// `break`, `continue`, postfix `++`).
    pub(crate) fn at_line_break(&self) -> bool {
        let end = self.skip_trivia(self.pos);
        self.tokens[self.pos.min(end)..end]
            .iter()
            .any(|tok| tok.text(self.source).contains('\n'))
    }

    // ── Mutation: node management ──────────────────────────────────────

    /// Start a new CST node. Pending trivia is emitted before the node.
    pub(crate) fn open(&mut self) -> MarkOpened {
        self.eat_trivia();
        self.open_root()
    }

    /// Start the root node. Leading trivia must land inside it, since rowan
    /// only accepts tokens under an open node.
    pub(crate) fn open_root(&mut self) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a new CST node BEFORE a previously completed node.
    ///
    /// Instead of physically inserting into the events vec (which would
    /// invalidate indices), this sets a `forward_parent` link on the
    /// completed node's Open event.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    /// Close a CST node, patching its Open event with the actual kind.
    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open {
            kind: slot_kind, ..
        } = &mut self.events[m.index]
        {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    /// Drop a started node without closing it. Its children are re-parented
    /// to the enclosing node.
    pub(crate) fn abandon(&mut self, m: MarkOpened) {
        if let Event::Open { kind, .. } = &mut self.events[m.index] {
            *kind = SyntaxKind::TOMBSTONE;
        }
    }

    // ── Mutation: token consumption ────────────────────────────────────

    /// Consume the current significant token, emitting Advance events for
    /// the trivia in front of it first.
    pub(crate) fn advance(&mut self) {
        self.eat_trivia();
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    fn eat_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise, record an error and return false.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            self.error(&format!("expected {:?}", kind));
            false
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Run `f` with `in` disabled as a binary operator.
    pub(crate) fn without_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.no_in, true);
        let result = f(self);
        self.no_in = saved;
        result
    }

    /// Run `f` with `in` allowed again (inside brackets and parentheses).
    pub(crate) fn with_in<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.no_in, false);
        let result = f(self);
        self.no_in = saved;
        result
    }

    pub(crate) fn in_allowed(&self) -> bool {
        !self.no_in
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Record a parse error at the current position.
    ///
    /// Only the first error is kept; parse functions bail out once
    /// [`Parser::has_error`] is set.
    pub(crate) fn error(&mut self, message: &str) {
        if self.errors.is_empty() {
            let span = self.current_span();
            self.errors.push(ParseError::new(message, span));
        }
    }

    /// Record a parse error pointing back at an opening delimiter.
    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        if self.errors.is_empty() {
            let span = self.current_span();
            self.errors.push(ParseError::with_related(
                message,
                span,
                related_msg,
                related_span,
            ));
        }
    }

    /// Whether the parser has encountered an error.
    pub(crate) fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Wrap everything up to EOF in an ERROR_NODE so the tree stays lossless.
    pub(crate) fn recover_to_eof(&mut self) {
        if self.at(SyntaxKind::EOF) {
            return;
        }
        let m = self.open();
        while !self.at(SyntaxKind::EOF) {
            self.advance();
        }
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    fn skip_trivia(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && self.tokens[pos].kind.is_trivia() {
            pos += 1;
        }
        pos
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Convert collected events into a rowan `GreenNode` and errors.
    ///
    /// When an Open event has a forward parent chain, the chain is followed,
    /// the nodes are opened outermost first, and the wrapper Open events are
    /// marked TOMBSTONE so they are skipped when reached later.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<(usize, SyntaxKind)> = Vec::new();

        for i in 0..self.events.len() {
            match self.events[i] {
                Event::Open {
                    forward_parent: Some(_),
                    ..
                } => {
                    forward_parents.clear();
                    let mut current = i;
                    while let Event::Open {
                        kind,
                        forward_parent,
                    } = self.events[current]
                    {
                        forward_parents.push((current, kind));
                        match forward_parent {
                            Some(next) => current = next,
                            None => break,
                        }
                    }
                    for &(idx, _) in &forward_parents {
                        self.events[idx] = Event::Open {
                            kind: SyntaxKind::TOMBSTONE,
                            forward_parent: None,
                        };
                    }
                    // Outermost wrapper first.
                    for &(_, kind) in forward_parents.iter().rev() {
                        if kind != SyntaxKind::TOMBSTONE {
                            builder.start_node(rowan::SyntaxKind(kind as u16));
                        }
                    }
                }
                Event::Open { kind, .. } => {
                    if kind != SyntaxKind::TOMBSTONE {
                        builder.start_node(rowan::SyntaxKind(kind as u16));
                    }
                }
                Event::Close => builder.finish_node(),
                Event::Advance => {
                    if let Some(token) = self.tokens.get(token_pos) {
                        let kind = SyntaxKind::from(token.kind);
                        builder.token(rowan::SyntaxKind(kind as u16), token.text(self.source));
                        token_pos += 1;
                    }
                }
            }
        }

        (builder.finish(), self.errors)
    }
}

// ── Entry points ───────────────────────────────────────────────────────

/// Parse a compilation unit: statements and declarations until EOF.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open_root();
    statements::statement_list(p, &[SyntaxKind::EOF]);
    finish_root(p, root);
}

/// Parse a single expression that must span the whole input.
pub(crate) fn parse_expression_root(p: &mut Parser) {
    let root = p.open_root();
    expressions::expr(p);
    if !p.has_error() && !p.at(SyntaxKind::EOF) {
        p.error("expected end of input after expression");
    }
    finish_root(p, root);
}

/// Parse a run of class members (the inside of a class body).
pub(crate) fn parse_class_members_root(p: &mut Parser) {
    let root = p.open_root();
    declarations::class_members(p, SyntaxKind::EOF);
    if !p.has_error() && !p.at(SyntaxKind::EOF) {
        p.error("expected class member");
    }
    finish_root(p, root);
}

fn finish_root(p: &mut Parser, root: MarkOpened) {
    p.recover_to_eof();
    p.advance(); // EOF
    p.close(root, SyntaxKind::SOURCE_FILE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_lexer::Lexer;

    #[test]
    fn smoke_test_parser_produces_green_node() {
        let source = "x = 5";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open_root();
        let assign = parser.open();
        parser.advance(); // x
        parser.advance(); // =
        parser.advance(); // 5
        parser.close(assign, SyntaxKind::ASSIGN_EXPR);
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty(), "expected no errors: {:?}", errors);

        let root_node = crate::cst::SyntaxNode::new_root(green);
        assert_eq!(root_node.kind(), SyntaxKind::SOURCE_FILE);
        // Trivia is kept, so the tree text is the source text.
        assert_eq!(root_node.text().to_string(), "x = 5");
        let children: Vec<_> = root_node.children().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind(), SyntaxKind::ASSIGN_EXPR);
    }

    #[test]
    fn lookahead_skips_trivia() {
        let source = "a /* c */\n// d\n b";
        let tokens = Lexer::tokenize(source);
        let parser = Parser::new(tokens, source);
        assert_eq!(parser.current(), SyntaxKind::IDENT);
        assert_eq!(parser.nth(1), SyntaxKind::IDENT);
        assert_eq!(parser.nth(2), SyntaxKind::EOF);
        assert_eq!(parser.nth(7), SyntaxKind::EOF);
    }

    #[test]
    fn line_break_detection() {
        let source = "return\nx";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);
        assert!(!parser.at_line_break());
        parser.advance();
        assert!(parser.at_line_break());
    }

    #[test]
    fn open_flushes_leading_trivia() {
        let source = "  f(1)";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);

        let root = parser.open_root();
        let name = parser.open();
        parser.advance(); // f
        let name_closed = parser.close(name, SyntaxKind::NAME_REF);
        let call = parser.open_before(name_closed);
        parser.advance(); // (
        parser.advance(); // 1
        parser.advance(); // )
        parser.close(call, SyntaxKind::CALL_EXPR);
        parser.advance(); // Eof
        parser.close(root, SyntaxKind::SOURCE_FILE);

        let (green, errors) = parser.build_tree();
        assert!(errors.is_empty());

        let root_node = crate::cst::SyntaxNode::new_root(green);
        let call_node = root_node.children().next().unwrap();
        assert_eq!(call_node.kind(), SyntaxKind::CALL_EXPR);
        assert_eq!(u32::from(call_node.text_range().start()), 2);
        let name_ref = call_node.children().next().unwrap();
        assert_eq!(name_ref.kind(), SyntaxKind::NAME_REF);
    }

    #[test]
    fn expect_records_only_first_error() {
        let source = "a";
        let tokens = Lexer::tokenize(source);
        let mut parser = Parser::new(tokens, source);
        assert!(!parser.expect(SyntaxKind::L_PAREN));
        assert!(!parser.expect(SyntaxKind::R_PAREN));
        assert!(parser.has_error());
        assert_eq!(parser.errors.len(), 1);
        assert_eq!(parser.errors[0].message, "expected L_PAREN");
    }
}
