//! Parser integration tests.
//!
//! Each test parses a JavaScript fragment and checks the tree shape through
//! the typed AST or a kind-only outline of the CST.

use quill_parser::ast::expr::Expr;
use quill_parser::ast::item::{members_of, ClassMember};
use quill_parser::ast::stmt::{ForInTarget, SourceFile, Stmt, SwitchClause};
use quill_parser::ast::AstNode;
use quill_parser::{
    parse, parse_class_members, parse_expression, parse_statements, SyntaxKind, SyntaxNode,
};

/// Node kinds only, two spaces per level, tokens omitted.
fn outline(node: &SyntaxNode) -> String {
    fn walk(node: &SyntaxNode, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{:?}\n", node.kind()));
        for child in node.children() {
            walk(&child, depth + 1, out);
        }
    }
    let mut out = String::new();
    walk(node, 0, &mut out);
    out
}

fn expr_of(source: &str) -> Expr {
    let parse = parse_expression(source);
    assert!(parse.ok(), "errors: {:?}", parse.errors());
    parse
        .syntax()
        .children()
        .find_map(Expr::cast)
        .expect("expression root")
}

fn statements(source: &str) -> Vec<Stmt> {
    let parse = parse(source);
    assert!(parse.ok(), "errors: {:?}", parse.errors());
    SourceFile::cast(parse.syntax())
        .expect("source file")
        .statements()
        .collect()
}

// ── Losslessness ───────────────────────────────────────────────────────

#[test]
fn tree_text_is_source_text() {
    let source = "// lead\nvar a = 1 ,b=2;\n\n/** doc */\nfunction f( x ){ return x+1 }  \n";
    let parse = parse(source);
    assert!(parse.ok());
    assert_eq!(parse.syntax().text().to_string(), source);
}

#[test]
fn leading_trivia_belongs_to_the_root() {
    for source in ["  a;", "// c\na;", "/** doc */\n", "/* x */\n", "// x\n", "\n\n"] {
        let parse = parse(source);
        assert!(parse.ok(), "{source:?}: {:?}", parse.errors());
        assert_eq!(parse.syntax().kind(), SyntaxKind::SOURCE_FILE);
        assert_eq!(parse.syntax().text().to_string(), source);
    }
}

#[test]
fn leading_trivia_in_every_entry_point() {
    let expression = parse_expression(" /* x */ a + b");
    assert!(expression.ok(), "{:?}", expression.errors());
    assert_eq!(expression.syntax().text().to_string(), " /* x */ a + b");

    let members = parse_class_members("\n  // m\n  a = 1;");
    assert!(members.ok(), "{:?}", members.errors());
    assert_eq!(members_of(&members.syntax()).count(), 1);

    let statements = parse_statements("\t\ta();");
    assert!(statements.ok());
    let call = statements.syntax().children().next().expect("statement");
    assert_eq!(u32::from(call.text_range().start()), 2);
}

#[test]
fn error_keeps_tree_lossless() {
    let source = "var a = ;\nfoo();";
    let parse = parse(source);
    assert!(!parse.ok());
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.syntax().text().to_string(), source);
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn binary_is_left_associative() {
    let Expr::BinaryExpr(outer) = expr_of("a - b - c") else {
        panic!("expected binary expression");
    };
    assert_eq!(outer.op_kind(), Some(SyntaxKind::MINUS));
    assert!(matches!(outer.lhs(), Some(Expr::BinaryExpr(_))));
    assert!(matches!(outer.rhs(), Some(Expr::NameRef(_))));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let parse = parse_expression("a + b * c");
    assert_eq!(
        outline(&parse.syntax()),
        "SOURCE_FILE\n  BINARY_EXPR\n    NAME_REF\n    BINARY_EXPR\n      NAME_REF\n      NAME_REF\n"
    );
}

#[test]
fn assignment_is_right_associative() {
    let Expr::AssignExpr(outer) = expr_of("a = b += c") else {
        panic!("expected assignment");
    };
    assert!(matches!(outer.lhs(), Some(Expr::NameRef(_))));
    assert!(matches!(outer.rhs(), Some(Expr::AssignExpr(_))));
}

#[test]
fn conditional_nests_in_else_branch() {
    let Expr::ConditionalExpr(cond) = expr_of("a ? b : c ? d : e") else {
        panic!("expected conditional");
    };
    assert!(matches!(cond.condition(), Some(Expr::NameRef(_))));
    assert!(matches!(cond.else_expr(), Some(Expr::ConditionalExpr(_))));
}

#[test]
fn string_literal_run_is_flat() {
    let Expr::StringConcat(concat) = expr_of("'a' + 'b' + \"c\"") else {
        panic!("expected string concatenation");
    };
    assert_eq!(concat.literals().count(), 3);
}

#[test]
fn string_run_stops_before_tighter_operator() {
    // The second literal is the receiver of `.length`, so no flat run forms.
    let Expr::BinaryExpr(bin) = expr_of("'a' + 'b'.length") else {
        panic!("expected binary expression");
    };
    assert!(matches!(bin.rhs(), Some(Expr::MemberExpr(_))));
}

#[test]
fn paren_depth_counts_nested_groups() {
    let expr = expr_of("((a + b))");
    assert_eq!(expr.paren_depth(), 2);
    assert!(matches!(expr.unparenthesized(), Expr::BinaryExpr(_)));
}

#[test]
fn call_chain_nests_receivers() {
    let Expr::CallExpr(call) = expr_of("a.f(1).g(2, 3)") else {
        panic!("expected call");
    };
    assert_eq!(call.arg_list().map(|a| a.args().count()), Some(2));
    let Some(Expr::MemberExpr(member)) = call.callee() else {
        panic!("expected member callee");
    };
    assert_eq!(member.name().map(|t| t.text().to_string()).as_deref(), Some("g"));
    assert!(matches!(member.object(), Some(Expr::CallExpr(_))));
}

#[test]
fn new_takes_arguments_after_member_access() {
    let Expr::NewExpr(new) = expr_of("new a.B(1)") else {
        panic!("expected new expression");
    };
    assert!(matches!(new.callee(), Some(Expr::MemberExpr(_))));
    assert_eq!(new.arg_list().map(|a| a.args().count()), Some(1));
}

#[test]
fn object_and_array_literals() {
    let Expr::ObjectExpr(obj) = expr_of("{ a: 1, 'b': [1, 2,], c, default: x, }") else {
        panic!("expected object");
    };
    assert!(obj.has_trailing_comma());
    let props: Vec<_> = obj.properties().collect();
    assert_eq!(props.len(), 4);
    assert!(props[2].value().is_none());
    let Some(Expr::ArrayExpr(arr)) = props[1].value() else {
        panic!("expected array value");
    };
    assert!(arr.has_trailing_comma());
    assert_eq!(arr.elements().count(), 2);
}

#[test]
fn unary_and_postfix() {
    let Expr::UnaryExpr(unary) = expr_of("-x++") else {
        panic!("expected unary");
    };
    assert!(matches!(unary.operand(), Some(Expr::PostfixExpr(_))));
    assert!(matches!(expr_of("typeof a === 'b'"), Expr::BinaryExpr(_)));
}

#[test]
fn regex_after_operator() {
    assert!(parse_expression("a = /x+/g").ok());
    assert!(parse_expression("a / b / c").ok());
}

#[test]
fn expression_must_span_input() {
    assert!(!parse_expression("a b").ok());
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn var_declaration_with_several_declarators() {
    let stmts = statements("let a = 1, b, c = d;");
    let Stmt::VarDecl(decl) = &stmts[0] else {
        panic!("expected var decl");
    };
    assert!(decl.has_semicolon());
    let names: Vec<_> = decl
        .declarators()
        .filter_map(|d| d.name().and_then(|n| n.text()))
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn if_else_chain() {
    let stmts = statements("if (a) b(); else if (c) { d } else e;");
    let Stmt::IfStmt(outer) = &stmts[0] else {
        panic!("expected if");
    };
    assert!(matches!(outer.then_branch(), Some(Stmt::ExprStmt(_))));
    let Some(Stmt::IfStmt(inner)) = outer.else_branch() else {
        panic!("expected else-if");
    };
    assert!(matches!(inner.then_branch(), Some(Stmt::Block(_))));
    assert!(inner.else_branch().is_some());
}

#[test]
fn for_statement_parts() {
    let stmts = statements("for (var i = 0; i < n; i++) sum += i;");
    let Stmt::ForStmt(for_stmt) = &stmts[0] else {
        panic!("expected for");
    };
    assert!(for_stmt.init().and_then(|i| i.var_decl()).is_some());
    assert!(for_stmt.test().is_some());
    assert!(matches!(for_stmt.update(), Some(Expr::PostfixExpr(_))));
    assert!(matches!(for_stmt.body(), Some(Stmt::ExprStmt(_))));
}

#[test]
fn for_statement_with_empty_parts() {
    let stmts = statements("for (;;) {}");
    let Stmt::ForStmt(for_stmt) = &stmts[0] else {
        panic!("expected for");
    };
    assert!(for_stmt.init().is_some_and(|i| i.is_empty()));
    assert!(for_stmt.test().is_none());
    assert!(for_stmt.update().is_none());
}

#[test]
fn for_in_with_declaration_and_expression() {
    let stmts = statements("for (var k in obj) f(k);\nfor (x in y) {}");
    let Stmt::ForInStmt(first) = &stmts[0] else {
        panic!("expected for-in");
    };
    assert!(matches!(first.target(), Some(ForInTarget::VarDecl(_))));
    assert!(matches!(first.object(), Some(Expr::NameRef(_))));
    assert!(matches!(first.body(), Some(Stmt::ExprStmt(_))));
    let Stmt::ForInStmt(second) = &stmts[1] else {
        panic!("expected for-in");
    };
    assert!(matches!(second.target(), Some(ForInTarget::Expr(_))));
    assert!(matches!(second.body(), Some(Stmt::Block(_))));
}

#[test]
fn return_stops_at_line_break() {
    let stmts = statements("function f() { return\nx }");
    let Stmt::FnDecl(func) = &stmts[0] else {
        panic!("expected function");
    };
    let body: Vec<_> = func.body().expect("body").statements().collect();
    assert_eq!(body.len(), 2);
    let Stmt::ReturnStmt(ret) = &body[0] else {
        panic!("expected return");
    };
    assert!(ret.expr().is_none());
}

#[test]
fn switch_clauses() {
    let stmts = statements("switch (x) { case 1: a(); break; default: b(); }");
    let Stmt::SwitchStmt(switch) = &stmts[0] else {
        panic!("expected switch");
    };
    let clauses: Vec<_> = switch.clauses().collect();
    assert_eq!(clauses.len(), 2);
    assert!(matches!(clauses[0], SwitchClause::Case(_)));
    assert_eq!(clauses[0].statements().count(), 2);
    assert!(clauses[1].test().is_none());
}

#[test]
fn try_catch_finally() {
    let stmts = statements("try { a() } catch (e) { b(e) } finally { c() }");
    let Stmt::TryStmt(try_stmt) = &stmts[0] else {
        panic!("expected try");
    };
    assert!(try_stmt.block().is_some());
    let catch = try_stmt.catch_clause().expect("catch");
    assert_eq!(catch.param().and_then(|p| p.text()).as_deref(), Some("e"));
    assert!(try_stmt.finally_clause().and_then(|f| f.body()).is_some());
}

#[test]
fn labeled_loop_with_continue() {
    let stmts = statements("outer: while (a) { continue outer; }");
    let Stmt::LabeledStmt(labeled) = &stmts[0] else {
        panic!("expected labeled statement");
    };
    assert_eq!(labeled.label().map(|t| t.text().to_string()).as_deref(), Some("outer"));
    assert!(matches!(labeled.body(), Some(Stmt::WhileStmt(_))));
}

#[test]
fn do_while_statement() {
    let stmts = statements("do x++; while (x < 3);");
    let Stmt::DoWhileStmt(do_while) = &stmts[0] else {
        panic!("expected do-while");
    };
    assert!(do_while.has_semicolon());
    assert!(do_while.condition().is_some());
}

// ── Classes and members ────────────────────────────────────────────────

#[test]
fn class_with_fields_and_methods() {
    let stmts = statements("class A extends B { x = 1; static y; m(a, b) { return a; } }");
    let Stmt::ClassDecl(class) = &stmts[0] else {
        panic!("expected class");
    };
    assert!(class.extends_clause().and_then(|e| e.base()).is_some());
    let members: Vec<_> = class.body().expect("body").members().collect();
    assert_eq!(members.len(), 3);
    assert!(matches!(&members[0], ClassMember::Field(f) if f.initializer().is_some()));
    assert!(members[1].is_static());
    let ClassMember::Method(method) = &members[2] else {
        panic!("expected method");
    };
    assert_eq!(method.param_list().map(|p| p.params().count()), Some(2));
}

#[test]
fn class_members_entry_point() {
    let parse = parse_class_members("a = 1;\nb() {}\n;\nstatic c() {}");
    assert!(parse.ok(), "errors: {:?}", parse.errors());
    assert_eq!(members_of(&parse.syntax()).count(), 3);
}

#[test]
fn statements_entry_point() {
    let parse = parse_statements("a();\nreturn b;");
    assert!(parse.ok());
    assert_eq!(parse.syntax().children().count(), 2);
}

#[test]
fn missing_brace_reports_related_span() {
    let parse = parse("function f() {\n  a();\n");
    assert!(!parse.ok());
    let error = &parse.errors()[0];
    assert_eq!(error.message, "expected `}`");
    assert!(error.related.is_some());
}
