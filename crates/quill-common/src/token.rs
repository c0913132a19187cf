use serde::Serialize;

use crate::span::Span;

/// A token produced by the quill lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// The token's text within `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.range()]
    }
}

/// Every kind of token in the JavaScript subset quill formats.
///
/// Trivia (whitespace and comments) are real tokens: the formatter walks them
/// in lockstep with the significant tokens and decides what to do with each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords (33) ──────────────────────────────────────────────────
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Default,
    Delete,
    Do,
    Else,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    In,
    Instanceof,
    Let,
    New,
    Null,
    Return,
    Static,
    Switch,
    This,
    Throw,
    True,
    Try,
    Typeof,
    Undefined,
    Var,
    Void,
    While,

    // ── Arithmetic and update operators (7) ────────────────────────────
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    // ── Assignment operators (12) ──────────────────────────────────────
    /// `=`
    Eq,
    /// `+=`
    PlusEq,
    /// `-=`
    MinusEq,
    /// `*=`
    StarEq,
    /// `/=`
    SlashEq,
    /// `%=`
    PercentEq,
    /// `&=`
    AmpEq,
    /// `|=`
    PipeEq,
    /// `^=`
    CaretEq,
    /// `<<=`
    ShlEq,
    /// `>>=`
    ShrEq,
    /// `>>>=`
    UShrEq,

    // ── Comparison operators (8) ───────────────────────────────────────
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `===`
    EqEqEq,
    /// `!==`
    NotEqEq,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,

    // ── Logical and bitwise operators (10) ─────────────────────────────
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // ── Punctuation (5) ────────────────────────────────────────────────
    Comma,
    Dot,
    Semicolon,
    Question,
    Colon,

    // ── Literals (4) ───────────────────────────────────────────────────
    /// Decimal, hexadecimal, fractional or exponent number literal.
    Number,
    /// Single- or double-quoted string literal, quotes included.
    String,
    /// Backtick template literal, kept as one opaque token.
    Template,
    /// `/pattern/flags` regular expression literal.
    Regex,

    // ── Identifiers (1) ────────────────────────────────────────────────
    Ident,

    // ── Trivia (4) ─────────────────────────────────────────────────────
    /// A run of spaces, tabs and line breaks.
    Whitespace,
    /// `// ...` up to, not including, the line break.
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// `/** ... */`
    DocComment,

    // ── Special (2) ────────────────────────────────────────────────────
    Eof,
    /// Unrecognised or unterminated input.
    Error,
}

impl TokenKind {
    /// Whitespace or any comment.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::DocComment
        )
    }

    /// Any comment kind.
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::DocComment
        )
    }

    /// Whether a token of this kind can end an expression.
    ///
    /// A `/` after such a token is division; anywhere else it starts a regex.
    pub fn ends_expression(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Template
                | TokenKind::Regex
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::This
                | TokenKind::Null
                | TokenKind::Undefined
                | TokenKind::True
                | TokenKind::False
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }
}

/// Map a keyword string to its corresponding `TokenKind`.
///
/// Returns `None` if the string is not a keyword.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    match s {
        "break" => Some(TokenKind::Break),
        "case" => Some(TokenKind::Case),
        "catch" => Some(TokenKind::Catch),
        "class" => Some(TokenKind::Class),
        "const" => Some(TokenKind::Const),
        "continue" => Some(TokenKind::Continue),
        "default" => Some(TokenKind::Default),
        "delete" => Some(TokenKind::Delete),
        "do" => Some(TokenKind::Do),
        "else" => Some(TokenKind::Else),
        "extends" => Some(TokenKind::Extends),
        "false" => Some(TokenKind::False),
        "finally" => Some(TokenKind::Finally),
        "for" => Some(TokenKind::For),
        "function" => Some(TokenKind::Function),
        "if" => Some(TokenKind::If),
        "in" => Some(TokenKind::In),
        "instanceof" => Some(TokenKind::Instanceof),
        "let" => Some(TokenKind::Let),
        "new" => Some(TokenKind::New),
        "null" => Some(TokenKind::Null),
        "return" => Some(TokenKind::Return),
        "static" => Some(TokenKind::Static),
        "switch" => Some(TokenKind::Switch),
        "this" => Some(TokenKind::This),
        "throw" => Some(TokenKind::Throw),
        "true" => Some(TokenKind::True),
        "try" => Some(TokenKind::Try),
        "typeof" => Some(TokenKind::Typeof),
        "undefined" => Some(TokenKind::Undefined),
        "var" => Some(TokenKind::Var),
        "void" => Some(TokenKind::Void),
        "while" => Some(TokenKind::While),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_from_str_recognizes_all_keywords() {
        let keywords = [
            ("break", TokenKind::Break),
            ("case", TokenKind::Case),
            ("catch", TokenKind::Catch),
            ("class", TokenKind::Class),
            ("const", TokenKind::Const),
            ("continue", TokenKind::Continue),
            ("default", TokenKind::Default),
            ("delete", TokenKind::Delete),
            ("do", TokenKind::Do),
            ("else", TokenKind::Else),
            ("extends", TokenKind::Extends),
            ("false", TokenKind::False),
            ("finally", TokenKind::Finally),
            ("for", TokenKind::For),
            ("function", TokenKind::Function),
            ("if", TokenKind::If),
            ("in", TokenKind::In),
            ("instanceof", TokenKind::Instanceof),
            ("let", TokenKind::Let),
            ("new", TokenKind::New),
            ("null", TokenKind::Null),
            ("return", TokenKind::Return),
            ("static", TokenKind::Static),
            ("switch", TokenKind::Switch),
            ("this", TokenKind::This),
            ("throw", TokenKind::Throw),
            ("true", TokenKind::True),
            ("try", TokenKind::Try),
            ("typeof", TokenKind::Typeof),
            ("undefined", TokenKind::Undefined),
            ("var", TokenKind::Var),
            ("void", TokenKind::Void),
            ("while", TokenKind::While),
        ];
        for (s, expected) in &keywords {
            assert_eq!(
                keyword_from_str(s),
                Some(*expected),
                "keyword_from_str({:?}) failed",
                s
            );
        }
        assert_eq!(keywords.len(), 33);
    }

    #[test]
    fn keyword_from_str_rejects_non_keywords() {
        assert_eq!(keyword_from_str("foo"), None);
        assert_eq!(keyword_from_str("Function"), None);
        assert_eq!(keyword_from_str("of"), None);
        assert_eq!(keyword_from_str(""), None);
    }

    #[test]
    fn trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::DocComment.is_trivia());
        assert!(!TokenKind::Whitespace.is_comment());
        assert!(TokenKind::LineComment.is_comment());
        assert!(!TokenKind::Ident.is_trivia());
    }

    #[test]
    fn token_text_slices_source() {
        let tok = Token::new(TokenKind::Ident, 4, 7);
        assert_eq!(tok.text("var foo;"), "foo");
        assert_eq!(tok.span.len(), 3);
    }
}
