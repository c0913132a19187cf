//! Statement parsing.

use crate::syntax_kind::SyntaxKind;

use super::{declarations, expressions, Parser};

/// Parse statements until one of `ends` (or EOF, or the first error).
pub(crate) fn statement_list(p: &mut Parser, ends: &[SyntaxKind]) {
    while !p.at_any(ends) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        statement(p);
    }
}

/// Parse one statement, dispatching on the current token.
pub(crate) fn statement(p: &mut Parser) {
    match p.current() {
        SyntaxKind::L_BRACE => block(p),
        SyntaxKind::SEMICOLON => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::EMPTY_STMT);
        }
        SyntaxKind::VAR_KW | SyntaxKind::LET_KW | SyntaxKind::CONST_KW => {
            var_decl(p, true);
        }
        SyntaxKind::FUNCTION_KW => {
            declarations::function(p, SyntaxKind::FN_DECL);
        }
        SyntaxKind::CLASS_KW => {
            declarations::class(p, SyntaxKind::CLASS_DECL);
        }
        SyntaxKind::IF_KW => if_stmt(p),
        SyntaxKind::FOR_KW => for_stmt(p),
        SyntaxKind::WHILE_KW => while_stmt(p),
        SyntaxKind::DO_KW => do_while_stmt(p),
        SyntaxKind::RETURN_KW => return_or_throw(p, SyntaxKind::RETURN_STMT),
        SyntaxKind::THROW_KW => return_or_throw(p, SyntaxKind::THROW_STMT),
        SyntaxKind::BREAK_KW => jump(p, SyntaxKind::BREAK_STMT),
        SyntaxKind::CONTINUE_KW => jump(p, SyntaxKind::CONTINUE_STMT),
        SyntaxKind::SWITCH_KW => switch_stmt(p),
        SyntaxKind::TRY_KW => try_stmt(p),
        SyntaxKind::IDENT if p.nth(1) == SyntaxKind::COLON => {
            let m = p.open();
            p.advance(); // label
            p.advance(); // :
            statement(p);
            p.close(m, SyntaxKind::LABELED_STMT);
        }
        _ => {
            if !expressions::at_expr_start(p) {
                p.error("expected statement");
                return;
            }
            let m = p.open();
            expressions::expr(p);
            p.eat(SyntaxKind::SEMICOLON);
            p.close(m, SyntaxKind::EXPR_STMT);
        }
    }
}

/// `{ stmts }`
pub(crate) fn block(p: &mut Parser) {
    let m = p.open();
    let open_span = p.current_span();
    p.advance(); // {
    statement_list(p, &[SyntaxKind::R_BRACE]);
    if !p.has_error() && !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}`", open_span, "block opened here");
    }
    p.close(m, SyntaxKind::BLOCK);
}

/// `var a = 1, b;`. For headers pass `terminated = false` and keep the `;`
/// for the loop itself.
fn var_decl(p: &mut Parser, terminated: bool) {
    let m = p.open();
    p.advance(); // var / let / const
    loop {
        let d = p.open();
        if p.at(SyntaxKind::IDENT) {
            declarations::name(p);
        } else {
            p.error("expected variable name");
            p.close(d, SyntaxKind::VAR_DECLARATOR);
            break;
        }
        if p.eat(SyntaxKind::EQ) {
            expressions::expr(p);
        }
        p.close(d, SyntaxKind::VAR_DECLARATOR);
        if p.has_error() || !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if terminated {
        p.eat(SyntaxKind::SEMICOLON);
    }
    p.close(m, SyntaxKind::VAR_DECL);
}

fn if_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // if
    paren_condition(p);
    if !p.has_error() {
        statement(p);
    }
    if !p.has_error() && p.eat(SyntaxKind::ELSE_KW) {
        statement(p);
    }
    p.close(m, SyntaxKind::IF_STMT);
}

/// `( expr )` around a control-statement condition.
fn paren_condition(p: &mut Parser) {
    if !p.expect(SyntaxKind::L_PAREN) {
        return;
    }
    p.with_in(expressions::expr);
    p.expect(SyntaxKind::R_PAREN);
}

/// `for (init; test; update) stmt` or `for (x in obj) stmt`.
fn for_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // for
    if !p.expect(SyntaxKind::L_PAREN) {
        p.close(m, SyntaxKind::FOR_STMT);
        return;
    }

    let init = p.open();
    p.without_in(|p| {
        if p.at_any(&[SyntaxKind::VAR_KW, SyntaxKind::LET_KW, SyntaxKind::CONST_KW]) {
            var_decl(p, false);
        } else if !p.at(SyntaxKind::SEMICOLON) {
            expressions::expr(p);
        }
    });

    if p.at(SyntaxKind::IN_KW) {
        // for-in keeps its target as a direct child.
        p.abandon(init);
        p.advance(); // in
        p.with_in(expressions::expr);
        p.expect(SyntaxKind::R_PAREN);
        if !p.has_error() {
            statement(p);
        }
        p.close(m, SyntaxKind::FOR_IN_STMT);
        return;
    }
    p.close(init, SyntaxKind::FOR_INIT);
    p.expect(SyntaxKind::SEMICOLON);

    let test = p.open();
    if !p.has_error() && !p.at(SyntaxKind::SEMICOLON) {
        p.with_in(expressions::expr);
    }
    p.close(test, SyntaxKind::FOR_TEST);
    if !p.has_error() {
        p.expect(SyntaxKind::SEMICOLON);
    }

    let update = p.open();
    if !p.has_error() && !p.at(SyntaxKind::R_PAREN) {
        p.with_in(expressions::expr);
    }
    p.close(update, SyntaxKind::FOR_UPDATE);
    if !p.has_error() {
        p.expect(SyntaxKind::R_PAREN);
    }
    if !p.has_error() {
        statement(p);
    }
    p.close(m, SyntaxKind::FOR_STMT);
}

fn while_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // while
    paren_condition(p);
    if !p.has_error() {
        statement(p);
    }
    p.close(m, SyntaxKind::WHILE_STMT);
}

fn do_while_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // do
    statement(p);
    if !p.has_error() {
        p.expect(SyntaxKind::WHILE_KW);
    }
    if !p.has_error() {
        paren_condition(p);
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::DO_WHILE_STMT);
}

/// `return [expr];` / `throw expr;`. A line break after `return` ends it.
fn return_or_throw(p: &mut Parser, kind: SyntaxKind) {
    let m = p.open();
    p.advance(); // return / throw
    let has_operand = kind == SyntaxKind::THROW_STMT
        || (!p.at_line_break() && expressions::at_expr_start(p));
    if has_operand {
        expressions::expr(p);
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, kind);
}

/// `break [label];` / `continue [label];`
fn jump(p: &mut Parser, kind: SyntaxKind) {
    let m = p.open();
    p.advance(); // break / continue
    if p.at(SyntaxKind::IDENT) && !p.at_line_break() {
        p.advance();
    }
    p.eat(SyntaxKind::SEMICOLON);
    p.close(m, kind);
}

fn switch_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // switch
    paren_condition(p);
    let open_span = p.current_span();
    if p.has_error() || !p.expect(SyntaxKind::L_BRACE) {
        p.close(m, SyntaxKind::SWITCH_STMT);
        return;
    }
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        let clause = p.open();
        let kind = if p.eat(SyntaxKind::CASE_KW) {
            p.with_in(expressions::expr);
            SyntaxKind::CASE_CLAUSE
        } else if p.eat(SyntaxKind::DEFAULT_KW) {
            SyntaxKind::DEFAULT_CLAUSE
        } else {
            p.error("expected `case` or `default`");
            SyntaxKind::ERROR_NODE
        };
        if !p.has_error() {
            p.expect(SyntaxKind::COLON);
        }
        statement_list(
            p,
            &[
                SyntaxKind::CASE_KW,
                SyntaxKind::DEFAULT_KW,
                SyntaxKind::R_BRACE,
            ],
        );
        p.close(clause, kind);
    }
    if !p.has_error() && !p.eat(SyntaxKind::R_BRACE) {
        p.error_with_related("expected `}`", open_span, "switch body opened here");
    }
    p.close(m, SyntaxKind::SWITCH_STMT);
}

fn try_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // try
    expect_block(p);
    if !p.has_error() && p.at(SyntaxKind::CATCH_KW) {
        let c = p.open();
        p.advance(); // catch
        if p.expect(SyntaxKind::L_PAREN) {
            if p.at(SyntaxKind::IDENT) {
                declarations::name(p);
            } else {
                p.error("expected catch parameter");
            }
            if !p.has_error() {
                p.expect(SyntaxKind::R_PAREN);
            }
        }
        expect_block(p);
        p.close(c, SyntaxKind::CATCH_CLAUSE);
    }
    if !p.has_error() && p.at(SyntaxKind::FINALLY_KW) {
        let f = p.open();
        p.advance(); // finally
        expect_block(p);
        p.close(f, SyntaxKind::FINALLY_CLAUSE);
    }
    p.close(m, SyntaxKind::TRY_STMT);
}

fn expect_block(p: &mut Parser) {
    if p.has_error() {
        return;
    }
    if p.at(SyntaxKind::L_BRACE) {
        block(p);
    } else {
        p.error("expected `{`");
    }
}
