// quill lexer -- trivia-preserving tokenizer for JavaScript source.

mod cursor;

use cursor::Cursor;
use quill_common::token::{keyword_from_str, Token, TokenKind};

/// The quill lexer. Converts source text into a stream of tokens.
///
/// Unlike a compiler lexer, whitespace and comments come out as tokens so the
/// formatter can see, keep, or rewrite every byte of the input. The tokens
/// tile the source exactly; the stream ends with a zero-width `Eof`.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Kind of the last non-trivia token, for regex/division disambiguation.
    last_significant: Option<TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            last_significant: None,
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Trivia ───────────────────────────────────────────────────
            c if is_whitespace(c) => {
                self.cursor.eat_while(is_whitespace);
                Token::new(TokenKind::Whitespace, start, self.cursor.pos())
            }
            '/' if self.cursor.peek_next() == Some('/') => self.lex_line_comment(start),
            '/' if self.cursor.peek_next() == Some('*') => self.lex_block_comment(start),

            // ── Single-character delimiters ───────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '[' => self.single_char_token(TokenKind::LBracket, start),
            ']' => self.single_char_token(TokenKind::RBracket, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '?' => self.single_char_token(TokenKind::Question, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            '~' => self.single_char_token(TokenKind::Tilde, start),

            // ── Operators ────────────────────────────────────────────────
            '=' => self.lex_eq(start),
            '!' => self.lex_bang(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),
            '&' => self.lex_doubling(
                '&',
                TokenKind::Amp,
                TokenKind::AmpAmp,
                TokenKind::AmpEq,
                start,
            ),
            '|' => self.lex_doubling(
                '|',
                TokenKind::Pipe,
                TokenKind::PipePipe,
                TokenKind::PipeEq,
                start,
            ),
            '+' => self.lex_doubling(
                '+',
                TokenKind::Plus,
                TokenKind::PlusPlus,
                TokenKind::PlusEq,
                start,
            ),
            '-' => self.lex_doubling(
                '-',
                TokenKind::Minus,
                TokenKind::MinusMinus,
                TokenKind::MinusEq,
                start,
            ),
            '*' => self.lex_with_eq(TokenKind::Star, TokenKind::StarEq, start),
            '%' => self.lex_with_eq(TokenKind::Percent, TokenKind::PercentEq, start),
            '^' => self.lex_with_eq(TokenKind::Caret, TokenKind::CaretEq, start),
            '/' => {
                if self.regex_allowed() {
                    self.lex_regex(start)
                } else {
                    self.lex_with_eq(TokenKind::Slash, TokenKind::SlashEq, start)
                }
            }
            '.' => {
                if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number(start)
                } else {
                    self.single_char_token(TokenKind::Dot, start)
                }
            }

            // ── Literals ─────────────────────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '"' | '\'' => self.lex_string(c, start),
            '`' => self.lex_template(start),

            // ── Identifiers and keywords ─────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.cursor.advance();
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    fn token_from(&self, kind: TokenKind, start: u32) -> Token {
        Token::new(kind, start, self.cursor.pos())
    }

    /// A `/` starts a regex unless the previous token can end an expression.
    fn regex_allowed(&self) -> bool {
        !self.last_significant.is_some_and(|k| k.ends_expression())
    }

    // ── Operator lexing ──────────────────────────────────────────────────

    /// `X` -> `single`, `X=` -> `with_eq`
    fn lex_with_eq(&mut self, single: TokenKind, with_eq: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            self.token_from(with_eq, start)
        } else {
            self.token_from(single, start)
        }
    }

    /// `X` -> `single`, `XX` -> `double`, `X=` -> `with_eq`
    fn lex_doubling(
        &mut self,
        c: char,
        single: TokenKind,
        double: TokenKind,
        with_eq: TokenKind,
        start: u32,
    ) -> Token {
        self.cursor.advance();
        if self.cursor.eat(c) {
            self.token_from(double, start)
        } else if self.cursor.eat('=') {
            self.token_from(with_eq, start)
        } else {
            self.token_from(single, start)
        }
    }

    /// `=` -> `Eq`, `==` -> `EqEq`, `===` -> `EqEqEq`
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '='
        if !self.cursor.eat('=') {
            return self.token_from(TokenKind::Eq, start);
        }
        if self.cursor.eat('=') {
            self.token_from(TokenKind::EqEqEq, start)
        } else {
            self.token_from(TokenKind::EqEq, start)
        }
    }

    /// `!` -> `Bang`, `!=` -> `NotEq`, `!==` -> `NotEqEq`
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '!'
        if !self.cursor.eat('=') {
            return self.token_from(TokenKind::Bang, start);
        }
        if self.cursor.eat('=') {
            self.token_from(TokenKind::NotEqEq, start)
        } else {
            self.token_from(TokenKind::NotEq, start)
        }
    }

    /// `<` -> `Lt`, `<=` -> `LtEq`, `<<` -> `Shl`, `<<=` -> `ShlEq`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '<'
        if self.cursor.eat('=') {
            return self.token_from(TokenKind::LtEq, start);
        }
        if self.cursor.eat('<') {
            if self.cursor.eat('=') {
                return self.token_from(TokenKind::ShlEq, start);
            }
            return self.token_from(TokenKind::Shl, start);
        }
        self.token_from(TokenKind::Lt, start)
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`, `>>` -> `Shr`, `>>=` -> `ShrEq`,
    /// `>>>` -> `UShr`, `>>>=` -> `UShrEq`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '>'
        if self.cursor.eat('=') {
            return self.token_from(TokenKind::GtEq, start);
        }
        if !self.cursor.eat('>') {
            return self.token_from(TokenKind::Gt, start);
        }
        if self.cursor.eat('=') {
            return self.token_from(TokenKind::ShrEq, start);
        }
        if self.cursor.eat('>') {
            if self.cursor.eat('=') {
                return self.token_from(TokenKind::UShrEq, start);
            }
            return self.token_from(TokenKind::UShr, start);
        }
        self.token_from(TokenKind::Shr, start)
    }

    // ── Comments ─────────────────────────────────────────────────────────

    /// `// ...` up to, not including, the line break.
    fn lex_line_comment(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
        self.token_from(TokenKind::LineComment, start)
    }

    /// `/* ... */` or `/** ... */`. Unterminated comments are errors.
    fn lex_block_comment(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '/'
        self.cursor.advance(); // '*'
        // `/**/` is an empty block comment, not a doc comment.
        let is_doc = self.cursor.peek() == Some('*') && self.cursor.peek_next() != Some('/');
        loop {
            match self.cursor.advance() {
                Some('*') if self.cursor.peek() == Some('/') => {
                    self.cursor.advance();
                    let kind = if is_doc {
                        TokenKind::DocComment
                    } else {
                        TokenKind::BlockComment
                    };
                    return self.token_from(kind, start);
                }
                Some(_) => {}
                None => return self.token_from(TokenKind::Error, start),
            }
        }
    }

    // ── Literals ─────────────────────────────────────────────────────────

    fn lex_number(&mut self, start: u32) -> Token {
        if self.cursor.peek() == Some('0') && matches!(self.cursor.peek_next(), Some('x' | 'X')) {
            self.cursor.advance();
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            return self.token_from(TokenKind::Number, start);
        }
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let signed = matches!(self.cursor.peek_next(), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.cursor.peek_nth(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.cursor.advance();
                if signed {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }
        self.token_from(TokenKind::Number, start)
    }

    /// Quoted string with backslash escapes. A line break or EOF before the
    /// closing quote yields an `Error` token.
    fn lex_string(&mut self, quote: char, start: u32) -> Token {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.peek() {
                Some(c) if c == quote => {
                    self.cursor.advance();
                    return self.token_from(TokenKind::String, start);
                }
                Some('\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some('\n') | None => return self.token_from(TokenKind::Error, start),
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    /// Backtick template, kept whole. Interpolations are not split out.
    fn lex_template(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening backtick
        loop {
            match self.cursor.advance() {
                Some('`') => return self.token_from(TokenKind::Template, start),
                Some('\\') => {
                    self.cursor.advance();
                }
                Some(_) => {}
                None => return self.token_from(TokenKind::Error, start),
            }
        }
    }

    /// `/pattern/flags`; a `/` inside a character class does not close it.
    fn lex_regex(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '/'
        let mut in_class = false;
        loop {
            match self.cursor.advance() {
                Some('\\') => {
                    self.cursor.advance();
                }
                Some('[') => in_class = true,
                Some(']') => in_class = false,
                Some('/') if !in_class => break,
                Some('\n') | None => return self.token_from(TokenKind::Error, start),
                Some(_) => {}
            }
        }
        self.cursor.eat_while(is_ident_continue);
        self.token_from(TokenKind::Regex, start)
    }

    // ── Identifiers ──────────────────────────────────────────────────────

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        self.token_from(kind, start)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        } else if !token.kind.is_trivia() {
            self.last_significant = Some(token.kind);
        }
        Some(token)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t' | '\r' | '\n' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}'
    )
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lex_simple_statement() {
        assert_eq!(
            kinds("var x = 1;"),
            vec![
                TokenKind::Var,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Eq,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokens_tile_the_source() {
        let source = "a /* c */ + b // end\n\t/** doc */ c >>>= 2;";
        let tokens = Lexer::tokenize(source);
        let mut rebuilt = String::new();
        let mut expected_start = 0;
        for tok in &tokens {
            assert_eq!(tok.span.start, expected_start);
            expected_start = tok.span.end;
            rebuilt.push_str(tok.text(source));
        }
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn regex_versus_division() {
        assert_eq!(
            kinds("a / b"),
            vec![
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Slash,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("x = /[/]+/g"),
            vec![
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Eq,
                TokenKind::Whitespace,
                TokenKind::Regex,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn empty_block_comment_is_not_doc() {
        assert_eq!(kinds("/**/"), vec![TokenKind::BlockComment, TokenKind::Eof]);
        assert_eq!(kinds("/** a */"), vec![TokenKind::DocComment, TokenKind::Eof]);
    }

    #[test]
    fn unterminated_input_is_error() {
        assert_eq!(kinds("/* open"), vec![TokenKind::Error, TokenKind::Eof]);
        assert_eq!(
            kinds("'open\n"),
            vec![TokenKind::Error, TokenKind::Whitespace, TokenKind::Eof]
        );
        assert_eq!(kinds("#"), vec![TokenKind::Error, TokenKind::Eof]);
    }

    #[test]
    fn numbers() {
        for source in ["0", "42", "3.14", ".5", "1e10", "2E-3", "0xFF"] {
            assert_eq!(kinds(source), vec![TokenKind::Number, TokenKind::Eof], "{source}");
        }
    }
}
