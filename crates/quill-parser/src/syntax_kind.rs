//! SyntaxKind enum for the quill CST.
//!
//! Token kinds map 1:1 from [`TokenKind`] (in SCREAMING_SNAKE_CASE); the rest
//! are composite node kinds produced by the parser.

use quill_common::token::TokenKind;

/// Every kind of syntax element in the quill CST.
///
/// The first two values are sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (33) ──────────────────────────────────────────────────
    BREAK_KW,
    CASE_KW,
    CATCH_KW,
    CLASS_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DELETE_KW,
    DO_KW,
    ELSE_KW,
    EXTENDS_KW,
    FALSE_KW,
    FINALLY_KW,
    FOR_KW,
    FUNCTION_KW,
    IF_KW,
    IN_KW,
    INSTANCEOF_KW,
    LET_KW,
    NEW_KW,
    NULL_KW,
    RETURN_KW,
    STATIC_KW,
    SWITCH_KW,
    THIS_KW,
    THROW_KW,
    TRUE_KW,
    TRY_KW,
    TYPEOF_KW,
    UNDEFINED_KW,
    VAR_KW,
    VOID_KW,
    WHILE_KW,

    // ── Arithmetic and update operators (7) ────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    PERCENT,
    PLUS_PLUS,
    MINUS_MINUS,

    // ── Assignment operators (12) ──────────────────────────────────────
    EQ,
    PLUS_EQ,
    MINUS_EQ,
    STAR_EQ,
    SLASH_EQ,
    PERCENT_EQ,
    AMP_EQ,
    PIPE_EQ,
    CARET_EQ,
    SHL_EQ,
    SHR_EQ,
    USHR_EQ,

    // ── Comparison operators (8) ───────────────────────────────────────
    EQ_EQ,
    NOT_EQ,
    EQ_EQ_EQ,
    NOT_EQ_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,

    // ── Logical and bitwise operators (10) ─────────────────────────────
    AMP_AMP,
    PIPE_PIPE,
    BANG,
    TILDE,
    AMP,
    PIPE,
    CARET,
    SHL,
    SHR,
    USHR,

    // ── Delimiters (6) ─────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,

    // ── Punctuation (5) ────────────────────────────────────────────────
    COMMA,
    DOT,
    SEMICOLON,
    QUESTION,
    COLON,

    // ── Literals (4) ───────────────────────────────────────────────────
    NUMBER,
    STRING,
    TEMPLATE,
    REGEX,

    // ── Identifiers (1) ────────────────────────────────────────────────
    IDENT,

    // ── Trivia (4) ─────────────────────────────────────────────────────
    WHITESPACE,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DOC_COMMENT,

    // ── Special (2) ────────────────────────────────────────────────────
    EOF,
    ERROR,

    // ── Statements ─────────────────────────────────────────────────────
    /// Root node of every parse.
    SOURCE_FILE,
    /// `var a = 1, b` (also `let` and `const`)
    VAR_DECL,
    /// One `name [= init]` inside a variable declaration.
    VAR_DECLARATOR,
    /// Name in a binding position.
    NAME,
    /// Expression followed by an optional `;`
    EXPR_STMT,
    /// `{ stmts }`
    BLOCK,
    /// A lone `;`
    EMPTY_STMT,
    /// `if (cond) stmt [else stmt]`
    IF_STMT,
    /// `for (init; test; update) stmt`
    FOR_STMT,
    FOR_INIT,
    FOR_TEST,
    FOR_UPDATE,
    /// `for (x in obj) stmt`
    FOR_IN_STMT,
    WHILE_STMT,
    /// `do stmt while (cond);`
    DO_WHILE_STMT,
    RETURN_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    THROW_STMT,
    /// `switch (expr) { clauses }`
    SWITCH_STMT,
    /// `case expr: stmts`
    CASE_CLAUSE,
    /// `default: stmts`
    DEFAULT_CLAUSE,
    /// `try block [catch] [finally]`
    TRY_STMT,
    /// `catch (name) block`
    CATCH_CLAUSE,
    /// `finally block`
    FINALLY_CLAUSE,
    /// `label: stmt`
    LABELED_STMT,

    // ── Declarations ───────────────────────────────────────────────────
    /// `function name(params) { body }`
    FN_DECL,
    /// `(a, b, c)` in a function or method header.
    PARAM_LIST,
    /// `class Name [extends Base] { members }`
    CLASS_DECL,
    /// `extends expr`
    EXTENDS_CLAUSE,
    /// `{ members }` of a class.
    CLASS_BODY,
    /// `[static] name [= init];`
    FIELD_DEF,
    /// `[static] name(params) { body }`
    METHOD_DEF,

    // ── Expressions ────────────────────────────────────────────────────
    /// Number, string, template, regex, `true`, `false`, `null`, `undefined`.
    LITERAL,
    /// Identifier used as an expression.
    NAME_REF,
    THIS_EXPR,
    /// `( expr )`
    PAREN_EXPR,
    /// `[a, b]`
    ARRAY_EXPR,
    /// `{ key: value }`
    OBJECT_EXPR,
    /// `key: value` or shorthand `key` inside an object literal.
    PROPERTY,
    /// `function [name](params) { body }` in expression position.
    FN_EXPR,
    /// `class [Name] [extends Base] { members }` in expression position.
    CLASS_EXPR,
    /// `callee(args)`
    CALL_EXPR,
    /// `(a, b)` after a callee.
    ARG_LIST,
    /// `new Callee[(args)]`
    NEW_EXPR,
    /// `object.name`
    MEMBER_EXPR,
    /// `object[index]`
    INDEX_EXPR,
    /// Prefix operator: `!x`, `-x`, `++x`, `typeof x`, ...
    UNARY_EXPR,
    /// `x++`, `x--`
    POSTFIX_EXPR,
    /// `a op b`
    BINARY_EXPR,
    /// `"a" + "b" + "c"`: a flat run of string literals.
    STRING_CONCAT,
    /// `cond ? a : b`
    CONDITIONAL_EXPR,
    /// `target = value` and compound forms.
    ASSIGN_EXPR,
}

impl SyntaxKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE
                | SyntaxKind::LINE_COMMENT
                | SyntaxKind::BLOCK_COMMENT
                | SyntaxKind::DOC_COMMENT
        )
    }

    /// Reserved words, which may still appear as property names.
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::BREAK_KW && self <= SyntaxKind::WHILE_KW
    }

    /// `=` and the compound assignment operators.
    pub fn is_assign_op(self) -> bool {
        self >= SyntaxKind::EQ && self <= SyntaxKind::USHR_EQ
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::Break => SyntaxKind::BREAK_KW,
            TokenKind::Case => SyntaxKind::CASE_KW,
            TokenKind::Catch => SyntaxKind::CATCH_KW,
            TokenKind::Class => SyntaxKind::CLASS_KW,
            TokenKind::Const => SyntaxKind::CONST_KW,
            TokenKind::Continue => SyntaxKind::CONTINUE_KW,
            TokenKind::Default => SyntaxKind::DEFAULT_KW,
            TokenKind::Delete => SyntaxKind::DELETE_KW,
            TokenKind::Do => SyntaxKind::DO_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::Extends => SyntaxKind::EXTENDS_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::Finally => SyntaxKind::FINALLY_KW,
            TokenKind::For => SyntaxKind::FOR_KW,
            TokenKind::Function => SyntaxKind::FUNCTION_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::Instanceof => SyntaxKind::INSTANCEOF_KW,
            TokenKind::Let => SyntaxKind::LET_KW,
            TokenKind::New => SyntaxKind::NEW_KW,
            TokenKind::Null => SyntaxKind::NULL_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Static => SyntaxKind::STATIC_KW,
            TokenKind::Switch => SyntaxKind::SWITCH_KW,
            TokenKind::This => SyntaxKind::THIS_KW,
            TokenKind::Throw => SyntaxKind::THROW_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::Try => SyntaxKind::TRY_KW,
            TokenKind::Typeof => SyntaxKind::TYPEOF_KW,
            TokenKind::Undefined => SyntaxKind::UNDEFINED_KW,
            TokenKind::Var => SyntaxKind::VAR_KW,
            TokenKind::Void => SyntaxKind::VOID_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,
            // Arithmetic and update operators
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Percent => SyntaxKind::PERCENT,
            TokenKind::PlusPlus => SyntaxKind::PLUS_PLUS,
            TokenKind::MinusMinus => SyntaxKind::MINUS_MINUS,
            // Assignment operators
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::PlusEq => SyntaxKind::PLUS_EQ,
            TokenKind::MinusEq => SyntaxKind::MINUS_EQ,
            TokenKind::StarEq => SyntaxKind::STAR_EQ,
            TokenKind::SlashEq => SyntaxKind::SLASH_EQ,
            TokenKind::PercentEq => SyntaxKind::PERCENT_EQ,
            TokenKind::AmpEq => SyntaxKind::AMP_EQ,
            TokenKind::PipeEq => SyntaxKind::PIPE_EQ,
            TokenKind::CaretEq => SyntaxKind::CARET_EQ,
            TokenKind::ShlEq => SyntaxKind::SHL_EQ,
            TokenKind::ShrEq => SyntaxKind::SHR_EQ,
            TokenKind::UShrEq => SyntaxKind::USHR_EQ,
            // Comparison operators
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::EqEqEq => SyntaxKind::EQ_EQ_EQ,
            TokenKind::NotEqEq => SyntaxKind::NOT_EQ_EQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            // Logical and bitwise operators
            TokenKind::AmpAmp => SyntaxKind::AMP_AMP,
            TokenKind::PipePipe => SyntaxKind::PIPE_PIPE,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Tilde => SyntaxKind::TILDE,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Pipe => SyntaxKind::PIPE,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Shl => SyntaxKind::SHL,
            TokenKind::Shr => SyntaxKind::SHR,
            TokenKind::UShr => SyntaxKind::USHR,
            // Delimiters
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBracket => SyntaxKind::L_BRACKET,
            TokenKind::RBracket => SyntaxKind::R_BRACKET,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            // Punctuation
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Question => SyntaxKind::QUESTION,
            TokenKind::Colon => SyntaxKind::COLON,
            // Literals
            TokenKind::Number => SyntaxKind::NUMBER,
            TokenKind::String => SyntaxKind::STRING,
            TokenKind::Template => SyntaxKind::TEMPLATE,
            TokenKind::Regex => SyntaxKind::REGEX,
            // Identifiers
            TokenKind::Ident => SyntaxKind::IDENT,
            // Trivia
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::LineComment => SyntaxKind::LINE_COMMENT,
            TokenKind::BlockComment => SyntaxKind::BLOCK_COMMENT,
            TokenKind::DocComment => SyntaxKind::DOC_COMMENT,
            // Special
            TokenKind::Eof => SyntaxKind::EOF,
            TokenKind::Error => SyntaxKind::ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_token_kinds_convert_to_syntax_kind() {
        let pairs = [
            (TokenKind::Break, SyntaxKind::BREAK_KW),
            (TokenKind::Case, SyntaxKind::CASE_KW),
            (TokenKind::Catch, SyntaxKind::CATCH_KW),
            (TokenKind::Class, SyntaxKind::CLASS_KW),
            (TokenKind::Const, SyntaxKind::CONST_KW),
            (TokenKind::Continue, SyntaxKind::CONTINUE_KW),
            (TokenKind::Default, SyntaxKind::DEFAULT_KW),
            (TokenKind::Delete, SyntaxKind::DELETE_KW),
            (TokenKind::Do, SyntaxKind::DO_KW),
            (TokenKind::Else, SyntaxKind::ELSE_KW),
            (TokenKind::Extends, SyntaxKind::EXTENDS_KW),
            (TokenKind::False, SyntaxKind::FALSE_KW),
            (TokenKind::Finally, SyntaxKind::FINALLY_KW),
            (TokenKind::For, SyntaxKind::FOR_KW),
            (TokenKind::Function, SyntaxKind::FUNCTION_KW),
            (TokenKind::If, SyntaxKind::IF_KW),
            (TokenKind::In, SyntaxKind::IN_KW),
            (TokenKind::Instanceof, SyntaxKind::INSTANCEOF_KW),
            (TokenKind::Let, SyntaxKind::LET_KW),
            (TokenKind::New, SyntaxKind::NEW_KW),
            (TokenKind::Null, SyntaxKind::NULL_KW),
            (TokenKind::Return, SyntaxKind::RETURN_KW),
            (TokenKind::Static, SyntaxKind::STATIC_KW),
            (TokenKind::Switch, SyntaxKind::SWITCH_KW),
            (TokenKind::This, SyntaxKind::THIS_KW),
            (TokenKind::Throw, SyntaxKind::THROW_KW),
            (TokenKind::True, SyntaxKind::TRUE_KW),
            (TokenKind::Try, SyntaxKind::TRY_KW),
            (TokenKind::Typeof, SyntaxKind::TYPEOF_KW),
            (TokenKind::Undefined, SyntaxKind::UNDEFINED_KW),
            (TokenKind::Var, SyntaxKind::VAR_KW),
            (TokenKind::Void, SyntaxKind::VOID_KW),
            (TokenKind::While, SyntaxKind::WHILE_KW),
            (TokenKind::Plus, SyntaxKind::PLUS),
            (TokenKind::Minus, SyntaxKind::MINUS),
            (TokenKind::Star, SyntaxKind::STAR),
            (TokenKind::Slash, SyntaxKind::SLASH),
            (TokenKind::Percent, SyntaxKind::PERCENT),
            (TokenKind::PlusPlus, SyntaxKind::PLUS_PLUS),
            (TokenKind::MinusMinus, SyntaxKind::MINUS_MINUS),
            (TokenKind::Eq, SyntaxKind::EQ),
            (TokenKind::PlusEq, SyntaxKind::PLUS_EQ),
            (TokenKind::MinusEq, SyntaxKind::MINUS_EQ),
            (TokenKind::StarEq, SyntaxKind::STAR_EQ),
            (TokenKind::SlashEq, SyntaxKind::SLASH_EQ),
            (TokenKind::PercentEq, SyntaxKind::PERCENT_EQ),
            (TokenKind::AmpEq, SyntaxKind::AMP_EQ),
            (TokenKind::PipeEq, SyntaxKind::PIPE_EQ),
            (TokenKind::CaretEq, SyntaxKind::CARET_EQ),
            (TokenKind::ShlEq, SyntaxKind::SHL_EQ),
            (TokenKind::ShrEq, SyntaxKind::SHR_EQ),
            (TokenKind::UShrEq, SyntaxKind::USHR_EQ),
            (TokenKind::EqEq, SyntaxKind::EQ_EQ),
            (TokenKind::NotEq, SyntaxKind::NOT_EQ),
            (TokenKind::EqEqEq, SyntaxKind::EQ_EQ_EQ),
            (TokenKind::NotEqEq, SyntaxKind::NOT_EQ_EQ),
            (TokenKind::Lt, SyntaxKind::LT),
            (TokenKind::Gt, SyntaxKind::GT),
            (TokenKind::LtEq, SyntaxKind::LT_EQ),
            (TokenKind::GtEq, SyntaxKind::GT_EQ),
            (TokenKind::AmpAmp, SyntaxKind::AMP_AMP),
            (TokenKind::PipePipe, SyntaxKind::PIPE_PIPE),
            (TokenKind::Bang, SyntaxKind::BANG),
            (TokenKind::Tilde, SyntaxKind::TILDE),
            (TokenKind::Amp, SyntaxKind::AMP),
            (TokenKind::Pipe, SyntaxKind::PIPE),
            (TokenKind::Caret, SyntaxKind::CARET),
            (TokenKind::Shl, SyntaxKind::SHL),
            (TokenKind::Shr, SyntaxKind::SHR),
            (TokenKind::UShr, SyntaxKind::USHR),
            (TokenKind::LParen, SyntaxKind::L_PAREN),
            (TokenKind::RParen, SyntaxKind::R_PAREN),
            (TokenKind::LBracket, SyntaxKind::L_BRACKET),
            (TokenKind::RBracket, SyntaxKind::R_BRACKET),
            (TokenKind::LBrace, SyntaxKind::L_BRACE),
            (TokenKind::RBrace, SyntaxKind::R_BRACE),
            (TokenKind::Comma, SyntaxKind::COMMA),
            (TokenKind::Dot, SyntaxKind::DOT),
            (TokenKind::Semicolon, SyntaxKind::SEMICOLON),
            (TokenKind::Question, SyntaxKind::QUESTION),
            (TokenKind::Colon, SyntaxKind::COLON),
            (TokenKind::Number, SyntaxKind::NUMBER),
            (TokenKind::String, SyntaxKind::STRING),
            (TokenKind::Template, SyntaxKind::TEMPLATE),
            (TokenKind::Regex, SyntaxKind::REGEX),
            (TokenKind::Ident, SyntaxKind::IDENT),
            (TokenKind::Whitespace, SyntaxKind::WHITESPACE),
            (TokenKind::LineComment, SyntaxKind::LINE_COMMENT),
            (TokenKind::BlockComment, SyntaxKind::BLOCK_COMMENT),
            (TokenKind::DocComment, SyntaxKind::DOC_COMMENT),
            (TokenKind::Eof, SyntaxKind::EOF),
            (TokenKind::Error, SyntaxKind::ERROR),
        ];
        for (token, expected) in pairs {
            assert_eq!(SyntaxKind::from(token), expected, "{token:?}");
        }
        assert_eq!(pairs.len(), 92);
    }

    #[test]
    fn keyword_and_assignment_ranges() {
        assert!(SyntaxKind::BREAK_KW.is_keyword());
        assert!(SyntaxKind::WHILE_KW.is_keyword());
        assert!(SyntaxKind::DEFAULT_KW.is_keyword());
        assert!(!SyntaxKind::PLUS.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(SyntaxKind::EQ.is_assign_op());
        assert!(SyntaxKind::USHR_EQ.is_assign_op());
        assert!(!SyntaxKind::EQ_EQ.is_assign_op());
        assert!(!SyntaxKind::MINUS_MINUS.is_assign_op());
    }

    #[test]
    fn trivia_kinds_identified() {
        assert!(SyntaxKind::WHITESPACE.is_trivia());
        assert!(SyntaxKind::DOC_COMMENT.is_trivia());
        assert!(!SyntaxKind::SEMICOLON.is_trivia());
    }

    #[test]
    fn sentinel_kinds_are_first_values() {
        assert_eq!(SyntaxKind::TOMBSTONE as u16, 0);
        assert_eq!(SyntaxKind::ERROR_NODE as u16, 1);
    }
}
