//! Pratt expression parser.
//!
//! Implements operator precedence parsing using binding power tables. Covers
//! literals, names, `this`, grouping, array and object literals, function and
//! class expressions, calls, `new`, member and index access, prefix/postfix
//! updates, unary and binary operators, string-literal concatenation runs,
//! conditionals and assignments.

use crate::syntax_kind::SyntaxKind;

use super::{declarations, MarkClosed, Parser};

// ── Binding Power Tables ───────────────────────────────────────────────

/// Binding power of `=` and the compound assignments (right-associative).
const ASSIGN_BP: (u8, u8) = (2, 1);

/// Binding power of `? :` (right-associative, looser than `||`).
const CONDITIONAL_BP: (u8, u8) = (4, 3);

/// Left binding power of `+`/`-`; string concatenation runs only start when
/// the caller would accept an additive operator.
const ADDITIVE_LBP: u8 = 21;

/// Returns (left_bp, right_bp) for binary operators.
///
/// Left < right means left-associative.
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    match op {
        SyntaxKind::PIPE_PIPE => Some((5, 6)),
        SyntaxKind::AMP_AMP => Some((7, 8)),
        SyntaxKind::PIPE => Some((9, 10)),
        SyntaxKind::CARET => Some((11, 12)),
        SyntaxKind::AMP => Some((13, 14)),

        SyntaxKind::EQ_EQ | SyntaxKind::NOT_EQ | SyntaxKind::EQ_EQ_EQ | SyntaxKind::NOT_EQ_EQ => {
            Some((15, 16))
        }

        SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::INSTANCEOF_KW
        | SyntaxKind::IN_KW => Some((17, 18)),

        SyntaxKind::SHL | SyntaxKind::SHR | SyntaxKind::USHR => Some((19, 20)),

        SyntaxKind::PLUS | SyntaxKind::MINUS => Some((ADDITIVE_LBP, 22)),

        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => Some((23, 24)),

        _ => None,
    }
}

fn is_prefix_op(op: SyntaxKind) -> bool {
    matches!(
        op,
        SyntaxKind::BANG
            | SyntaxKind::TILDE
            | SyntaxKind::PLUS
            | SyntaxKind::MINUS
            | SyntaxKind::PLUS_PLUS
            | SyntaxKind::MINUS_MINUS
            | SyntaxKind::TYPEOF_KW
            | SyntaxKind::VOID_KW
            | SyntaxKind::DELETE_KW
    )
}

/// Prefix operators bind tighter than every binary operator.
const PREFIX_BP: u8 = 25;

/// Postfix `++`/`--`.
const POSTFIX_BP: u8 = 27;

/// Tokens after a string literal that bind tighter than `+`, ending a
/// concatenation run before that literal.
const BREAKS_CONCAT: &[SyntaxKind] = &[
    SyntaxKind::STAR,
    SyntaxKind::SLASH,
    SyntaxKind::PERCENT,
    SyntaxKind::DOT,
    SyntaxKind::L_PAREN,
    SyntaxKind::L_BRACKET,
    SyntaxKind::PLUS_PLUS,
    SyntaxKind::MINUS_MINUS,
];

// ── Expression Entry Point ─────────────────────────────────────────────

/// Parse a full expression, including assignments.
pub(crate) fn expr(p: &mut Parser) -> Option<MarkClosed> {
    expr_bp(p, 0)
}

/// Parse an expression that binds at least as tight as `? :`.
pub(crate) fn conditional_expr(p: &mut Parser) -> Option<MarkClosed> {
    expr_bp(p, CONDITIONAL_BP.1)
}

/// Whether the current token can start an expression.
pub(crate) fn at_expr_start(p: &Parser) -> bool {
    let current = p.current();
    is_prefix_op(current)
        || matches!(
            current,
            SyntaxKind::IDENT
                | SyntaxKind::NUMBER
                | SyntaxKind::STRING
                | SyntaxKind::TEMPLATE
                | SyntaxKind::REGEX
                | SyntaxKind::TRUE_KW
                | SyntaxKind::FALSE_KW
                | SyntaxKind::NULL_KW
                | SyntaxKind::UNDEFINED_KW
                | SyntaxKind::THIS_KW
                | SyntaxKind::L_PAREN
                | SyntaxKind::L_BRACKET
                | SyntaxKind::L_BRACE
                | SyntaxKind::FUNCTION_KW
                | SyntaxKind::CLASS_KW
                | SyntaxKind::NEW_KW
        )
}

/// The core Pratt loop: parse a prefix/atom, then fold in postfix and infix
/// operators whose binding power exceeds `min_bp`.
fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = if min_bp <= ADDITIVE_LBP && at_string_concat(p) {
        string_concat(p)
    } else {
        lhs(p)?
    };

    loop {
        if p.has_error() {
            break;
        }

        let current = p.current();

        // ── Postfix: `x++` / `x--` (no line break before the operator) ──
        if matches!(current, SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS)
            && POSTFIX_BP >= min_bp
            && !p.at_line_break()
        {
            let m = p.open_before(lhs);
            p.advance();
            lhs = p.close(m, SyntaxKind::POSTFIX_EXPR);
            continue;
        }

        // ── Conditional ──
        if current == SyntaxKind::QUESTION {
            if CONDITIONAL_BP.0 < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // ?
            p.with_in(expr);
            p.expect(SyntaxKind::COLON);
            expr_bp(p, CONDITIONAL_BP.1);
            lhs = p.close(m, SyntaxKind::CONDITIONAL_EXPR);
            continue;
        }

        // ── Assignment ──
        if current.is_assign_op() {
            if ASSIGN_BP.0 < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // operator
            expr_bp(p, ASSIGN_BP.1);
            lhs = p.close(m, SyntaxKind::ASSIGN_EXPR);
            continue;
        }

        // ── Binary operators ──
        if current == SyntaxKind::IN_KW && !p.in_allowed() {
            break;
        }
        if let Some((l_bp, r_bp)) = infix_binding_power(current) {
            if l_bp < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // operator
            expr_bp(p, r_bp);
            lhs = p.close(m, SyntaxKind::BINARY_EXPR);
            continue;
        }

        break;
    }

    Some(lhs)
}

/// Parse a prefix operator application or a postfix-extended atom.
fn lhs(p: &mut Parser) -> Option<MarkClosed> {
    if is_prefix_op(p.current()) {
        let m = p.open();
        p.advance(); // operator
        expr_bp(p, PREFIX_BP);
        return Some(p.close(m, SyntaxKind::UNARY_EXPR));
    }
    let atom = if p.at(SyntaxKind::NEW_KW) {
        new_expr(p)?
    } else {
        atom(p)?
    };
    Some(postfix_chain(p, atom, true))
}

/// Fold calls, member access and index access onto `lhs`.
fn postfix_chain(p: &mut Parser, mut lhs: MarkClosed, allow_calls: bool) -> MarkClosed {
    loop {
        if p.has_error() {
            break;
        }
        match p.current() {
            SyntaxKind::L_PAREN if allow_calls => {
                let m = p.open_before(lhs);
                arg_list(p);
                lhs = p.close(m, SyntaxKind::CALL_EXPR);
            }
            SyntaxKind::DOT => {
                let m = p.open_before(lhs);
                p.advance(); // .
                let name = p.current();
                if name == SyntaxKind::IDENT || name.is_keyword() {
                    p.advance();
                } else {
                    p.error("expected property name after `.`");
                }
                lhs = p.close(m, SyntaxKind::MEMBER_EXPR);
            }
            SyntaxKind::L_BRACKET => {
                let m = p.open_before(lhs);
                p.advance(); // [
                p.with_in(expr);
                p.expect(SyntaxKind::R_BRACKET);
                lhs = p.close(m, SyntaxKind::INDEX_EXPR);
            }
            _ => break,
        }
    }
    lhs
}

/// `new Callee` with optional arguments. The callee takes member and index
/// access but not calls, so `new a.B(1)` passes `(1)` to the constructor.
fn new_expr(p: &mut Parser) -> Option<MarkClosed> {
    let m = p.open();
    p.advance(); // new
    let callee = if p.at(SyntaxKind::NEW_KW) {
        new_expr(p)?
    } else {
        atom(p)?
    };
    postfix_chain(p, callee, false);
    if p.at(SyntaxKind::L_PAREN) {
        arg_list(p);
    }
    Some(p.close(m, SyntaxKind::NEW_EXPR))
}

/// Parse an atom: literal, name, `this`, group, array, object, function or
/// class expression.
fn atom(p: &mut Parser) -> Option<MarkClosed> {
    let current = p.current();
    match current {
        SyntaxKind::NUMBER
        | SyntaxKind::STRING
        | SyntaxKind::TEMPLATE
        | SyntaxKind::REGEX
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::NULL_KW
        | SyntaxKind::UNDEFINED_KW => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::LITERAL))
        }
        SyntaxKind::IDENT => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::NAME_REF))
        }
        SyntaxKind::THIS_KW => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::THIS_EXPR))
        }
        SyntaxKind::L_PAREN => {
            let m = p.open();
            let open_span = p.current_span();
            p.advance(); // (
            p.with_in(expr);
            if !p.eat(SyntaxKind::R_PAREN) {
                p.error_with_related("expected `)`", open_span, "parenthesis opened here");
            }
            Some(p.close(m, SyntaxKind::PAREN_EXPR))
        }
        SyntaxKind::L_BRACKET => Some(array_expr(p)),
        SyntaxKind::L_BRACE => Some(object_expr(p)),
        SyntaxKind::FUNCTION_KW => Some(declarations::function(p, SyntaxKind::FN_EXPR)),
        SyntaxKind::CLASS_KW => Some(declarations::class(p, SyntaxKind::CLASS_EXPR)),
        _ => {
            p.error("expected expression");
            None
        }
    }
}

/// `[a, b, c]`, with an optional trailing comma.
fn array_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // [
    while !p.at(SyntaxKind::R_BRACKET) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        p.with_in(expr);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if !p.has_error() && !p.eat(SyntaxKind::R_BRACKET) {
        p.error_with_related("expected `]`", open_span, "array opened here");
    }
    p.close(m, SyntaxKind::ARRAY_EXPR)
}

/// `{ key: value, shorthand }`, with an optional trailing comma.
fn object_expr(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // {
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        property(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if !p.has_error() && !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}`", open_span, "object opened here");
    }
    p.close(m, SyntaxKind::OBJECT_EXPR)
}

fn property(p: &mut Parser) {
    let m = p.open();
    let key = p.current();
    let shorthand_ok = key == SyntaxKind::IDENT;
    if matches!(key, SyntaxKind::IDENT | SyntaxKind::STRING | SyntaxKind::NUMBER) || key.is_keyword()
    {
        p.advance();
    } else {
        p.error("expected property name");
        p.close(m, SyntaxKind::PROPERTY);
        return;
    }
    if p.eat(SyntaxKind::COLON) {
        p.with_in(expr);
    } else if !shorthand_ok {
        p.error("expected `:` after property name");
    }
    p.close(m, SyntaxKind::PROPERTY);
}

/// `(a, b, c)` argument list.
pub(crate) fn arg_list(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // (
    while !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        p.with_in(expr);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if !p.has_error() && !p.eat(SyntaxKind::R_PAREN) {
        p.error_with_related("expected `)`", open_span, "argument list opened here");
    }
    p.close(m, SyntaxKind::ARG_LIST);
}

// ── String concatenation runs ──────────────────────────────────────────

/// `"a" + "b"` where the second literal is not claimed by a tighter operator.
fn at_string_concat(p: &Parser) -> bool {
    p.at(SyntaxKind::STRING) && concat_continues(p, 1)
}

/// Whether `+ STRING` starts at significant offset `n` and the string after
/// it is not the left operand of something tighter than `+`.
fn concat_continues(p: &Parser, n: usize) -> bool {
    p.nth(n) == SyntaxKind::PLUS
        && p.nth(n + 1) == SyntaxKind::STRING
        && !BREAKS_CONCAT.contains(&p.nth(n + 2))
}

/// A flat `STRING_CONCAT` node: LITERAL (PLUS LITERAL)+.
fn string_concat(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    literal(p);
    while concat_continues(p, 0) {
        p.advance(); // +
        literal(p);
    }
    p.close(m, SyntaxKind::STRING_CONCAT)
}

fn literal(p: &mut Parser) {
    let m = p.open();
    p.advance();
    p.close(m, SyntaxKind::LITERAL);
}
