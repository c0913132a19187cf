use insta::assert_yaml_snapshot;
use quill_common::token::TokenKind;
use quill_lexer::Lexer;
use serde::Serialize;

/// A human-readable representation of a token for snapshot testing.
#[derive(Serialize)]
struct TokenSnapshot {
    kind: String,
    start: u32,
    end: u32,
}

fn tokenize_snapshot(source: &str) -> Vec<TokenSnapshot> {
    Lexer::tokenize(source)
        .into_iter()
        .map(|tok| TokenSnapshot {
            kind: format!("{:?}", tok.kind),
            start: tok.span.start,
            end: tok.span.end,
        })
        .collect()
}

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
}

#[test]
fn lex_comment_then_declaration() {
    let tokens = tokenize_snapshot("// hi\nlet a = b;");
    assert_yaml_snapshot!(tokens);
}

#[test]
fn lex_all_operators() {
    let ops = [
        "+", "-", "*", "/", "%", "++", "--", "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
        "^=", "<<=", ">>=", ">>>=", "==", "!=", "===", "!==", "<", ">", "<=", ">=", "&&", "||",
        "!", "~", "&", "|", "^", "<<", ">>", ">>>", "?", ":",
    ];
    // Operands between operators keep `/` lexing as division.
    let source = format!("a {}", ops.join(" a "));
    let significant: Vec<TokenKind> = kinds(&source)
        .into_iter()
        .filter(|k| !k.is_trivia() && *k != TokenKind::Ident)
        .collect();
    assert_eq!(
        significant,
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::PlusPlus,
            TokenKind::MinusMinus,
            TokenKind::Eq,
            TokenKind::PlusEq,
            TokenKind::MinusEq,
            TokenKind::StarEq,
            TokenKind::SlashEq,
            TokenKind::PercentEq,
            TokenKind::AmpEq,
            TokenKind::PipeEq,
            TokenKind::CaretEq,
            TokenKind::ShlEq,
            TokenKind::ShrEq,
            TokenKind::UShrEq,
            TokenKind::EqEq,
            TokenKind::NotEq,
            TokenKind::EqEqEq,
            TokenKind::NotEqEq,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::LtEq,
            TokenKind::GtEq,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::Bang,
            TokenKind::Tilde,
            TokenKind::Amp,
            TokenKind::Pipe,
            TokenKind::Caret,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::UShr,
            TokenKind::Question,
            TokenKind::Colon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_strings_and_templates() {
    let source = r#"'a\'b' "c\"d" `e ${f}`"#;
    let significant: Vec<TokenKind> = kinds(source)
        .into_iter()
        .filter(|k| !k.is_trivia())
        .collect();
    assert_eq!(
        significant,
        vec![
            TokenKind::String,
            TokenKind::String,
            TokenKind::Template,
            TokenKind::Eof
        ]
    );
}

#[test]
fn lex_keywords_and_identifiers() {
    let significant: Vec<TokenKind> = kinds("function $f(_a) { return this; }")
        .into_iter()
        .filter(|k| !k.is_trivia())
        .collect();
    assert_eq!(
        significant,
        vec![
            TokenKind::Function,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::This,
            TokenKind::Semicolon,
            TokenKind::RBrace,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_division_after_paren_and_regex_after_return() {
    let significant: Vec<TokenKind> = kinds("(a) / 2; return /x/;")
        .into_iter()
        .filter(|k| !k.is_trivia())
        .collect();
    assert_eq!(
        significant,
        vec![
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Slash,
            TokenKind::Number,
            TokenKind::Semicolon,
            TokenKind::Return,
            TokenKind::Regex,
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lex_crlf_is_one_whitespace_token() {
    let tokens = Lexer::tokenize("a\r\n\r\nb");
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[1].kind, TokenKind::Whitespace);
    assert_eq!(tokens[1].span.len(), 4);
}
