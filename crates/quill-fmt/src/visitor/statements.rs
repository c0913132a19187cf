//! Statement layout.

use quill_parser::ast::expr::Expr;
use quill_parser::ast::stmt::{
    Block, DoWhileStmt, ForInStmt, ForInTarget, ForStmt, IfStmt, LabeledStmt, Stmt, SwitchClause,
    SwitchStmt, TryStmt, VarDecl, VarDeclarator, WhileStmt,
};
use quill_parser::ast::AstNode;
use quill_parser::SyntaxKind;

use super::{contains_comment, required, Braces, Walker};
use crate::config::BracePosition;
use crate::signal::FmtResult;

impl Walker<'_> {
    pub(super) fn format_statement(&mut self, statement: &Stmt) -> FmtResult {
        match statement {
            Stmt::VarDecl(decl) => {
                self.format_var_decl(decl)?;
                self.finish_statement(decl.has_semicolon())
            }
            Stmt::FnDecl(decl) => self.format_fn_decl(decl),
            Stmt::ClassDecl(decl) => self.format_class_decl(decl),
            Stmt::ExprStmt(stmt) => {
                let expr = required(stmt.expr(), "expression")?;
                self.format_expr(&expr)?;
                self.finish_statement(stmt.has_semicolon())
            }
            Stmt::Block(block) => self.format_block(block),
            Stmt::EmptyStmt(_) => {
                if self.config.put_empty_statement_on_new_line {
                    self.scribe.print_new_line();
                }
                self.token(SyntaxKind::SEMICOLON, self.config.insert_space_before_semicolon)?;
                self.scribe.print_trailing_comment()
            }
            Stmt::IfStmt(stmt) => self.format_if(stmt),
            Stmt::ForStmt(stmt) => self.format_for(stmt),
            Stmt::ForInStmt(stmt) => self.format_for_in(stmt),
            Stmt::WhileStmt(stmt) => self.format_while(stmt),
            Stmt::DoWhileStmt(stmt) => self.format_do_while(stmt),
            Stmt::ReturnStmt(stmt) => {
                self.token(SyntaxKind::RETURN_KW, false)?;
                if let Some(expr) = stmt.expr() {
                    self.format_keyword_operand(
                        &expr,
                        self.config.insert_space_before_parenthesized_expression_in_return,
                    )?;
                }
                self.finish_statement(stmt.has_semicolon())
            }
            Stmt::ThrowStmt(stmt) => {
                self.token(SyntaxKind::THROW_KW, false)?;
                if let Some(expr) = stmt.expr() {
                    self.format_keyword_operand(
                        &expr,
                        self.config.insert_space_before_parenthesized_expression_in_throw,
                    )?;
                }
                self.finish_statement(stmt.has_semicolon())
            }
            Stmt::BreakStmt(stmt) => {
                self.token(SyntaxKind::BREAK_KW, false)?;
                if let Some(label) = stmt.label() {
                    self.token(label.kind(), true)?;
                }
                self.finish_statement(stmt.has_semicolon())
            }
            Stmt::ContinueStmt(stmt) => {
                self.token(SyntaxKind::CONTINUE_KW, false)?;
                if let Some(label) = stmt.label() {
                    self.token(label.kind(), true)?;
                }
                self.finish_statement(stmt.has_semicolon())
            }
            Stmt::SwitchStmt(stmt) => self.format_switch(stmt),
            Stmt::TryStmt(stmt) => self.format_try(stmt),
            Stmt::LabeledStmt(stmt) => self.format_labeled(stmt),
        }
    }

    /// Print the optional `;` and whatever comment trails the statement.
    fn finish_statement(&mut self, has_semicolon: bool) -> FmtResult {
        if has_semicolon {
            self.token(SyntaxKind::SEMICOLON, self.config.insert_space_before_semicolon)?;
        }
        self.scribe.print_trailing_comment()
    }

    /// Operand of `return` or `throw`.
    fn format_keyword_operand(&mut self, expr: &Expr, space_before_parens: bool) -> FmtResult {
        if !matches!(expr, Expr::ParenExpr(_)) || space_before_parens {
            self.scribe.space();
        }
        self.format_expr(expr)
    }

    pub(super) fn format_block(&mut self, block: &Block) -> FmtResult {
        let header_line = self.scribe.line;
        self.format_block_with(block, header_line)
    }

    fn format_block_with(&mut self, block: &Block, header_line: usize) -> FmtResult {
        let statements: Vec<Stmt> = block.statements().collect();
        let braces = Braces {
            position: self.config.brace_position_for_block,
            space_before: self.config.insert_space_before_opening_brace_in_block,
            header_line,
            indent: self.config.indent_statements_compare_to_block,
            new_line_when_empty: self.config.insert_new_line_in_empty_block,
            blank_lines_at_start: 0,
        };
        self.format_braced_statements(&statements, braces)
    }

    /// A body that is not a block goes on its own, indented line.
    fn format_nested_statement(&mut self, body: &Stmt) -> FmtResult {
        if let Stmt::EmptyStmt(_) = body {
            if !self.config.put_empty_statement_on_new_line {
                self.token(SyntaxKind::SEMICOLON, self.config.insert_space_before_semicolon)?;
                return self.scribe.print_trailing_comment();
            }
        }
        self.scribe.print_trailing_comment()?;
        self.scribe.print_new_line();
        self.scribe.indent();
        self.format_statement(body)?;
        self.scribe.unindent();
        Ok(())
    }

    /// The body of a loop: blocks stay on the header line.
    fn format_loop_body(&mut self, body: &Stmt, header_line: usize) -> FmtResult {
        match body {
            Stmt::Block(block) => self.format_block_with(block, header_line),
            other => self.format_nested_statement(other),
        }
    }

    /// `(` condition `)` of a control statement.
    fn format_condition(&mut self, expr: &Expr, space_before_paren: bool) -> FmtResult {
        self.token(SyntaxKind::L_PAREN, space_before_paren)?;
        if self.config.insert_space_after_opening_paren_in_control_statement {
            self.scribe.space();
        }
        self.format_expr(expr)?;
        self.token(
            SyntaxKind::R_PAREN,
            self.config.insert_space_before_closing_paren_in_control_statement,
        )
    }

    fn format_if(&mut self, stmt: &IfStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::IF_KW, false)?;
        let condition = required(stmt.condition(), "if condition")?;
        self.format_condition(&condition, self.config.insert_space_before_opening_paren_in_if)?;

        let then_branch = required(stmt.then_branch(), "if body")?;
        let else_branch = stmt.else_branch();
        let mut then_is_block = false;
        match &then_branch {
            Stmt::Block(block) => {
                then_is_block = true;
                if else_branch.is_none()
                    && self.config.keep_guardian_clause_on_one_line
                    && is_guard_clause(block)
                {
                    self.format_guard_clause(block)?;
                } else {
                    self.format_block_with(block, header_line)?;
                    if else_branch.is_some() && self.config.insert_new_line_before_else_in_if_statement
                    {
                        self.scribe.print_new_line();
                    }
                }
            }
            body if else_branch.is_none() && self.config.keep_simple_if_on_one_line => {
                let spec = self
                    .alignment("compactIf", self.config.alignment_for_compact_if, 1)
                    .outermost()
                    .continuation(1);
                self.aligned(spec, |walker, id| {
                    walker.scribe.align_fragment(id, 0)?;
                    walker.scribe.space();
                    walker.format_statement(body)
                })?;
            }
            body if self.config.keep_then_statement_on_same_line => {
                self.scribe.space();
                self.format_statement(body)?;
                if else_branch.is_some() {
                    self.scribe.print_new_line();
                }
            }
            body => {
                self.format_nested_statement(body)?;
                if else_branch.is_some() {
                    self.scribe.print_new_line();
                }
            }
        }

        let Some(else_branch) = else_branch else {
            return Ok(());
        };
        let space_before_else = !then_is_block || self.config.insert_space_after_closing_brace_in_block;
        self.token(SyntaxKind::ELSE_KW, space_before_else)?;
        match &else_branch {
            Stmt::Block(block) => self.format_block_with(block, self.scribe.line),
            Stmt::IfStmt(nested) => {
                if self.config.compact_else_if {
                    self.scribe.space();
                    self.format_if(nested)
                } else {
                    self.scribe.print_new_line();
                    self.scribe.indent();
                    self.format_if(nested)?;
                    self.scribe.unindent();
                    Ok(())
                }
            }
            body if self.config.keep_else_statement_on_same_line => {
                self.scribe.space();
                self.format_statement(body)
            }
            body => self.format_nested_statement(body),
        }
    }

    /// `{ return x; }` kept on one line.
    fn format_guard_clause(&mut self, block: &Block) -> FmtResult {
        self.token(
            SyntaxKind::L_BRACE,
            self.config.insert_space_before_opening_brace_in_block,
        )?;
        self.scribe.space();
        let statement = required(block.statements().next(), "guard statement")?;
        self.format_statement(&statement)?;
        self.token(SyntaxKind::R_BRACE, true)?;
        self.scribe.print_trailing_comment()
    }

    fn format_for(&mut self, stmt: &ForStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::FOR_KW, false)?;
        self.token(SyntaxKind::L_PAREN, self.config.insert_space_before_opening_paren_in_for)?;
        if self.config.insert_space_after_opening_paren_in_control_statement {
            self.scribe.space();
        }
        if let Some(init) = stmt.init() {
            if let Some(decl) = init.var_decl() {
                self.format_var_decl(&decl)?;
            } else if let Some(expr) = init.expr() {
                self.format_expr(&expr)?;
            }
        }
        self.token(
            SyntaxKind::SEMICOLON,
            self.config.insert_space_before_semicolon_in_for,
        )?;
        if let Some(test) = stmt.test() {
            if self.config.insert_space_after_semicolon_in_for {
                self.scribe.space();
            }
            self.format_expr(&test)?;
        }
        self.token(
            SyntaxKind::SEMICOLON,
            self.config.insert_space_before_semicolon_in_for,
        )?;
        if let Some(update) = stmt.update() {
            if self.config.insert_space_after_semicolon_in_for {
                self.scribe.space();
            }
            self.format_expr(&update)?;
        }
        self.token(
            SyntaxKind::R_PAREN,
            self.config.insert_space_before_closing_paren_in_control_statement,
        )?;
        let body = required(stmt.body(), "for body")?;
        self.format_loop_body(&body, header_line)
    }

    fn format_for_in(&mut self, stmt: &ForInStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::FOR_KW, false)?;
        self.token(SyntaxKind::L_PAREN, self.config.insert_space_before_opening_paren_in_for)?;
        if self.config.insert_space_after_opening_paren_in_control_statement {
            self.scribe.space();
        }
        match required(stmt.target(), "for-in target")? {
            ForInTarget::VarDecl(decl) => self.format_var_decl(&decl)?,
            ForInTarget::Expr(expr) => self.format_expr(&expr)?,
        }
        self.token(SyntaxKind::IN_KW, true)?;
        self.scribe.space();
        let object = required(stmt.object(), "for-in object")?;
        self.format_expr(&object)?;
        self.token(
            SyntaxKind::R_PAREN,
            self.config.insert_space_before_closing_paren_in_control_statement,
        )?;
        let body = required(stmt.body(), "for-in body")?;
        self.format_loop_body(&body, header_line)
    }

    fn format_while(&mut self, stmt: &WhileStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::WHILE_KW, false)?;
        let condition = required(stmt.condition(), "while condition")?;
        self.format_condition(&condition, self.config.insert_space_before_opening_paren_in_while)?;
        let body = required(stmt.body(), "while body")?;
        self.format_loop_body(&body, header_line)
    }

    fn format_do_while(&mut self, stmt: &DoWhileStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::DO_KW, false)?;
        let body = required(stmt.body(), "do body")?;
        let body_is_block = matches!(body, Stmt::Block(_));
        self.format_loop_body(&body, header_line)?;
        if !body_is_block || self.config.insert_new_line_before_while_in_do_statement {
            self.scribe.print_new_line();
        }
        self.token(
            SyntaxKind::WHILE_KW,
            self.config.insert_space_after_closing_brace_in_block,
        )?;
        let condition = required(stmt.condition(), "do-while condition")?;
        self.format_condition(&condition, self.config.insert_space_before_opening_paren_in_while)?;
        self.finish_statement(stmt.has_semicolon())
    }

    fn format_switch(&mut self, stmt: &SwitchStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::SWITCH_KW, false)?;
        let discriminant = required(stmt.discriminant(), "switch discriminant")?;
        self.format_condition(
            &discriminant,
            self.config.insert_space_before_opening_paren_in_switch,
        )?;
        let position = self.config.brace_position_for_switch;
        self.format_opening_brace(
            position,
            self.config.insert_space_before_opening_brace_in_switch,
            header_line,
        )?;
        self.scribe.print_new_line();
        let indent_cases = self.config.indent_switchstatements_compare_to_switch;
        if indent_cases {
            self.scribe.indent();
        }
        let clauses: Vec<SwitchClause> = stmt.clauses().collect();
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                self.scribe.print_new_line();
            }
            self.format_switch_clause(clause)?;
        }
        self.scribe.print_new_line();
        self.scribe.print_comment()?;
        if indent_cases {
            self.scribe.unindent();
        }
        self.token(SyntaxKind::R_BRACE, false)?;
        self.scribe.print_trailing_comment()?;
        if position == BracePosition::NextLineShifted {
            self.scribe.unindent();
        }
        Ok(())
    }

    fn format_switch_clause(&mut self, clause: &SwitchClause) -> FmtResult {
        match clause {
            SwitchClause::Case(_) => {
                self.token(SyntaxKind::CASE_KW, false)?;
                let test = required(clause.test(), "case test")?;
                self.scribe.space();
                self.format_expr(&test)?;
                self.token(SyntaxKind::COLON, self.config.insert_space_before_colon_in_case)?;
            }
            SwitchClause::Default(_) => {
                self.token(SyntaxKind::DEFAULT_KW, false)?;
                self.token(SyntaxKind::COLON, self.config.insert_space_before_colon_in_default)?;
            }
        }
        self.scribe.print_trailing_comment()?;

        let statements: Vec<Stmt> = clause.statements().collect();
        if statements.is_empty() {
            return Ok(());
        }
        let indent_statements = self.config.indent_switchstatements_compare_to_cases;
        if indent_statements {
            self.scribe.indent();
        }
        for statement in &statements {
            self.scribe.print_new_line();
            let outdent_break = matches!(statement, Stmt::BreakStmt(_))
                && indent_statements
                && !self.config.indent_breaks_compare_to_cases;
            if outdent_break {
                self.scribe.unindent();
            }
            self.format_statement(statement)?;
            if outdent_break {
                self.scribe.indent();
            }
        }
        if indent_statements {
            self.scribe.unindent();
        }
        Ok(())
    }

    fn format_try(&mut self, stmt: &TryStmt) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::TRY_KW, false)?;
        let block = required(stmt.block(), "try block")?;
        self.format_block_with(&block, header_line)?;

        if let Some(catch) = stmt.catch_clause() {
            if self.config.insert_new_line_before_catch_in_try_statement {
                self.scribe.print_new_line();
            }
            let catch_line = self.scribe.line;
            self.token(
                SyntaxKind::CATCH_KW,
                self.config.insert_space_after_closing_brace_in_block,
            )?;
            self.token(
                SyntaxKind::L_PAREN,
                self.config.insert_space_before_opening_paren_in_catch,
            )?;
            if self.config.insert_space_after_opening_paren_in_control_statement {
                self.scribe.space();
            }
            if let Some(param) = catch.param() {
                self.name(&param, false)?;
            }
            self.token(
                SyntaxKind::R_PAREN,
                self.config.insert_space_before_closing_paren_in_control_statement,
            )?;
            let body = required(catch.body(), "catch body")?;
            self.format_block_with(&body, catch_line)?;
        }

        if let Some(finally) = stmt.finally_clause() {
            if self.config.insert_new_line_before_finally_in_try_statement {
                self.scribe.print_new_line();
            }
            let finally_line = self.scribe.line;
            self.token(
                SyntaxKind::FINALLY_KW,
                self.config.insert_space_after_closing_brace_in_block,
            )?;
            let body = required(finally.body(), "finally body")?;
            self.format_block_with(&body, finally_line)?;
        }
        Ok(())
    }

    fn format_labeled(&mut self, stmt: &LabeledStmt) -> FmtResult {
        let label = required(stmt.label(), "label")?;
        self.token(label.kind(), false)?;
        self.token(
            SyntaxKind::COLON,
            self.config.insert_space_before_colon_in_labeled_statement,
        )?;
        if self.config.insert_space_after_colon_in_labeled_statement {
            self.scribe.space();
        }
        let body = required(stmt.body(), "labeled statement")?;
        self.format_statement(&body)
    }

    /// `var a = 1, b` without the terminating `;`.
    pub(super) fn format_var_decl(&mut self, decl: &VarDecl) -> FmtResult {
        let keyword = required(decl.keyword(), "declaration keyword")?;
        self.token(keyword.kind(), false)?;
        let declarators: Vec<_> = decl.declarators().collect();
        if declarators.len() < 2 {
            if let Some(declarator) = declarators.first() {
                self.scribe.space();
                self.format_declarator(declarator)?;
            }
            return Ok(());
        }
        let spec = self.alignment(
            "multipleDeclarations",
            self.config.alignment_for_multiple_declarations,
            declarators.len(),
        );
        self.aligned(spec, |walker, id| {
            walker.scribe.space();
            for (i, declarator) in declarators.iter().enumerate() {
                if i > 0 {
                    walker.token(
                        SyntaxKind::COMMA,
                        walker.config.insert_space_before_comma_in_multiple_local_declarations,
                    )?;
                    walker.scribe.print_trailing_comment()?;
                    walker.scribe.align_fragment(id, i)?;
                    if walker.config.insert_space_after_comma_in_multiple_local_declarations {
                        walker.scribe.space();
                    }
                }
                walker.format_declarator(declarator)?;
            }
            Ok(())
        })
    }

    /// `name` or `name = initializer`.
    fn format_declarator(&mut self, declarator: &VarDeclarator) -> FmtResult {
        let name = required(declarator.name(), "declared name")?;
        self.name(&name, false)?;
        match declarator.initializer() {
            Some(init) => {
                self.format_assigned_value(SyntaxKind::EQ, &init, "localDeclarationAssignment")
            }
            None => Ok(()),
        }
    }
}

/// A block holding a lone `return` or `throw` and no comments.
fn is_guard_clause(block: &Block) -> bool {
    let mut statements = block.statements();
    let first = statements.next();
    statements.next().is_none()
        && matches!(first, Some(Stmt::ReturnStmt(_) | Stmt::ThrowStmt(_)))
        && !contains_comment(block.syntax())
}
