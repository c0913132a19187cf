//! Token cursor the scribe walks in lockstep with the syntax tree.
//!
//! The scanner is a `Copy` view over an immutable token vector, so lookahead
//! is a copy of the cursor and rollback is `reset_to` a remembered index.

use quill_lexer::Lexer;
use quill_parser::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScanToken {
    pub kind: SyntaxKind,
    pub start: usize,
    pub end: usize,
}

/// Lex `source` for the scribe.
///
/// A line comment owns the line break that ends it: the first `\n`, `\r\n`
/// or `\r` of the following whitespace moves into the comment token.
pub(crate) fn scan_tokens(source: &str) -> Vec<ScanToken> {
    let mut tokens: Vec<ScanToken> = Vec::new();
    let mut owns_break = false;
    for token in Lexer::tokenize(source) {
        let mut scanned = ScanToken {
            kind: SyntaxKind::from(token.kind),
            start: token.span.start as usize,
            end: token.span.end as usize,
        };
        if owns_break && scanned.kind == SyntaxKind::WHITESPACE {
            let text = &source[scanned.start..scanned.end];
            let terminator = line_break_len(text);
            if terminator > 0 {
                if let Some(comment) = tokens.last_mut() {
                    comment.end += terminator;
                }
                scanned.start += terminator;
            }
        }
        owns_break = scanned.kind == SyntaxKind::LINE_COMMENT;
        if scanned.start < scanned.end || scanned.kind == SyntaxKind::EOF {
            tokens.push(scanned);
        }
    }
    tokens
}

/// Length of the line break `text` starts with, if any.
pub(crate) fn line_break_len(text: &str) -> usize {
    if text.starts_with("\r\n") {
        2
    } else if text.starts_with('\n') || text.starts_with('\r') {
        1
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Scanner<'a> {
    tokens: &'a [ScanToken],
    /// Index of the token the next `next_token` call returns.
    pos: usize,
    start: usize,
    end: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(tokens: &'a [ScanToken]) -> Self {
        let mut scanner = Self {
            tokens,
            pos: 0,
            start: 0,
            end: 0,
        };
        scanner.reset_to(0);
        scanner
    }

    /// Advance one token; `None` past the end of input.
    pub(crate) fn next_token(&mut self) -> Option<ScanToken> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        self.start = token.start;
        self.end = token.end;
        Some(token)
    }

    /// Kind of the next token that is not whitespace or a comment.
    pub(crate) fn peek_significant(&self) -> SyntaxKind {
        self.tokens[self.pos.min(self.tokens.len())..]
            .iter()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    pub(crate) fn reset_to(&mut self, pos: usize) {
        self.pos = pos;
        let offset = self
            .tokens
            .get(pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.start)
            .unwrap_or(0);
        self.start = offset;
        self.end = offset;
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// Start offset of the token last returned.
    pub(crate) fn start(&self) -> usize {
        self.start
    }

    /// Exclusive end offset of the token last returned.
    pub(crate) fn end(&self) -> usize {
        self.end
    }

    /// The token before the one last returned, skipping whitespace only.
    pub(crate) fn token_before_current(&self) -> Option<ScanToken> {
        let current = self.pos.checked_sub(1)?;
        self.tokens[..current]
            .iter()
            .rev()
            .find(|t| t.kind != SyntaxKind::WHITESPACE)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[ScanToken]) -> Vec<SyntaxKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn line_comment_owns_its_line_break() {
        let source = "a // note\r\n  b";
        let tokens = scan_tokens(source);
        assert_eq!(
            kinds(&tokens),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::LINE_COMMENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::IDENT,
                SyntaxKind::EOF,
            ]
        );
        assert_eq!(&source[tokens[2].start..tokens[2].end], "// note\r\n");
        assert_eq!(&source[tokens[3].start..tokens[3].end], "  ");
    }

    #[test]
    fn whitespace_consumed_entirely_by_comment_is_dropped() {
        let tokens = scan_tokens("// x\nb");
        assert_eq!(
            kinds(&tokens),
            vec![SyntaxKind::LINE_COMMENT, SyntaxKind::IDENT, SyntaxKind::EOF]
        );
    }

    #[test]
    fn copies_are_independent_lookahead() {
        let tokens = scan_tokens("a + b");
        let mut scanner = Scanner::new(&tokens);
        scanner.next_token();
        let mut copy = scanner;
        assert_eq!(copy.next_token().map(|t| t.kind), Some(SyntaxKind::WHITESPACE));
        assert_eq!(copy.next_token().map(|t| t.kind), Some(SyntaxKind::PLUS));
        assert_eq!(scanner.position(), 1);
        assert_eq!(scanner.peek_significant(), SyntaxKind::PLUS);
    }

    #[test]
    fn previous_token_skips_whitespace_only() {
        let tokens = scan_tokens("a /* c */ - b");
        let mut scanner = Scanner::new(&tokens);
        while scanner.next_token().map(|t| t.kind) != Some(SyntaxKind::MINUS) {}
        assert_eq!(
            scanner.token_before_current().map(|t| t.kind),
            Some(SyntaxKind::BLOCK_COMMENT)
        );
        scanner.next_token();
        scanner.next_token();
        assert_eq!(
            scanner.token_before_current().map(|t| t.kind),
            Some(SyntaxKind::MINUS)
        );
    }

    #[test]
    fn reset_rewinds_offsets() {
        let tokens = scan_tokens("a + b");
        let mut scanner = Scanner::new(&tokens);
        while scanner.next_token().is_some() {}
        scanner.reset_to(2);
        assert_eq!(scanner.start(), 2);
        assert_eq!(scanner.end(), 2);
        assert_eq!(scanner.next_token().map(|t| t.kind), Some(SyntaxKind::PLUS));
    }
}
