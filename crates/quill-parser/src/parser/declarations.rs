//! Function and class declarations, shared with their expression forms.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, statements, MarkClosed, Parser};

/// `function [name](params) { body }`.
///
/// `kind` is FN_DECL (name required) or FN_EXPR (name optional).
pub(crate) fn function(p: &mut Parser, kind: SyntaxKind) -> MarkClosed {
    let m = p.open();
    p.advance(); // function
    if p.at(SyntaxKind::IDENT) {
        name(p);
    } else if kind == SyntaxKind::FN_DECL {
        p.error("expected function name");
    }
    if !p.has_error() {
        param_list(p);
    }
    if !p.has_error() {
        function_body(p);
    }
    p.close(m, kind)
}

/// `class [Name] [extends Base] { members }`.
pub(crate) fn class(p: &mut Parser, kind: SyntaxKind) -> MarkClosed {
    let m = p.open();
    p.advance(); // class
    if p.at(SyntaxKind::IDENT) {
        name(p);
    } else if kind == SyntaxKind::CLASS_DECL {
        p.error("expected class name");
    }
    if !p.has_error() && p.at(SyntaxKind::EXTENDS_KW) {
        let ext = p.open();
        p.advance(); // extends
        expressions::conditional_expr(p);
        p.close(ext, SyntaxKind::EXTENDS_CLAUSE);
    }
    if !p.has_error() {
        class_body(p);
    }
    p.close(m, kind)
}

fn class_body(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    if !p.expect(SyntaxKind::L_BRACE) {
        p.close(m, SyntaxKind::CLASS_BODY);
        return;
    }
    class_members(p, SyntaxKind::R_BRACE);
    if !p.has_error() && !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}`", open_span, "class body opened here");
    }
    p.close(m, SyntaxKind::CLASS_BODY);
}

/// Fields, methods and stray `;` up to `end`.
pub(crate) fn class_members(p: &mut Parser, end: SyntaxKind) {
    while !p.at(end) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        if p.eat(SyntaxKind::SEMICOLON) {
            continue;
        }
        member(p);
    }
}

fn member(p: &mut Parser) {
    let m = p.open();
    // `static` followed by a name is a modifier; on its own it names a member.
    if p.at(SyntaxKind::STATIC_KW) && matches!(p.nth(1), SyntaxKind::IDENT) {
        p.advance();
    }
    if p.at(SyntaxKind::IDENT) || p.current().is_keyword() {
        let n = p.open();
        p.advance();
        p.close(n, SyntaxKind::NAME);
    } else {
        p.error("expected class member");
        p.close(m, SyntaxKind::FIELD_DEF);
        return;
    }
    if p.at(SyntaxKind::L_PAREN) {
        param_list(p);
        if !p.has_error() {
            function_body(p);
        }
        p.close(m, SyntaxKind::METHOD_DEF);
        return;
    }
    if p.eat(SyntaxKind::EQ) {
        expressions::expr(p);
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::FIELD_DEF);
}

/// `(a, b, c)` parameter names.
pub(crate) fn param_list(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    if !p.expect(SyntaxKind::L_PAREN) {
        p.close(m, SyntaxKind::PARAM_LIST);
        return;
    }
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        if p.at(SyntaxKind::IDENT) {
            name(p);
        } else {
            p.error("expected parameter name");
            break;
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if !p.has_error() && !p.eat(SyntaxKind::R_PAREN) {
        p.error_with_related("expected `)`", open_span, "parameter list opened here");
    }
    p.close(m, SyntaxKind::PARAM_LIST);
}

fn function_body(p: &mut Parser) {
    if p.at(SyntaxKind::L_BRACE) {
        statements::block(p);
    } else {
        p.error("expected `{` to start function body");
    }
}

/// A binding name (NAME wrapping an IDENT).
pub(crate) fn name(p: &mut Parser) {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::NAME);
}
