//! Expression layout and the wrapping alignments around operator chains,
//! calls and initializers.

use quill_parser::ast::expr::{
    ArgList, ArrayExpr, AssignExpr, BinaryExpr, CallExpr, ConditionalExpr, Expr, IndexExpr,
    MemberExpr, NewExpr, ObjectExpr, Property, StringConcat, UnaryExpr,
};
use quill_parser::SyntaxKind;

use super::{required, Walker};
use crate::config::{BracePosition, Wrap};
use crate::fragments::{flatten_binary, flatten_cascade, flatten_string_concat, Cascade};
use crate::scribe::AlignmentId;
use crate::signal::{FmtResult, FormatSignal};

/// Spacing and wrapping of a parenthesized, comma-separated list.
#[derive(Debug, Clone, Copy)]
pub(super) struct ListStyle {
    pub name: &'static str,
    pub wrap: Wrap,
    pub space_before_open: bool,
    pub space_after_open: bool,
    pub space_before_close: bool,
    pub space_between_empty: bool,
    pub space_before_comma: bool,
    pub space_after_comma: bool,
}

impl Walker<'_> {
    pub(super) fn format_expr(&mut self, expr: &Expr) -> FmtResult {
        match expr {
            Expr::Literal(literal) => {
                let token = required(literal.token(), "literal")?;
                self.token(token.kind(), false)
            }
            Expr::NameRef(name) => {
                let token = required(name.ident(), "name")?;
                self.token(token.kind(), false)
            }
            Expr::ThisExpr(_) => self.token(SyntaxKind::THIS_KW, false),
            Expr::ParenExpr(paren) => {
                self.token(SyntaxKind::L_PAREN, false)?;
                if self.config.insert_space_after_opening_paren_in_parenthesized_expression {
                    self.scribe.space();
                }
                let inner = required(paren.expr(), "parenthesized expression")?;
                self.format_expr(&inner)?;
                self.token(
                    SyntaxKind::R_PAREN,
                    self.config.insert_space_before_closing_paren_in_parenthesized_expression,
                )
            }
            Expr::ArrayExpr(array) => self.format_array(array),
            Expr::ObjectExpr(object) => self.format_object(object),
            Expr::FnExpr(function) => self.format_fn_expr(function),
            Expr::ClassExpr(class) => self.format_class_expr(class),
            Expr::CallExpr(call) => self.format_call(call),
            Expr::NewExpr(new) => self.format_new(new),
            Expr::MemberExpr(member) => {
                let object = required(member.object(), "member object")?;
                self.format_expr(&object)?;
                self.token(SyntaxKind::DOT, false)?;
                self.format_member_name(member)
            }
            Expr::IndexExpr(index) => self.format_index(index),
            Expr::UnaryExpr(unary) => self.format_unary(unary),
            Expr::PostfixExpr(postfix) => {
                let operand = required(postfix.operand(), "postfix operand")?;
                self.format_expr(&operand)?;
                let op = required(postfix.op(), "postfix operator")?;
                self.token(op.kind(), self.config.insert_space_before_postfix_operator)
            }
            Expr::BinaryExpr(binary) => self.format_binary(binary),
            Expr::StringConcat(concat) => self.format_string_concat(concat),
            Expr::ConditionalExpr(conditional) => self.format_conditional(conditional),
            Expr::AssignExpr(assign) => self.format_assign(assign),
        }
    }

    fn format_member_name(&mut self, member: &MemberExpr) -> FmtResult {
        let name = required(member.name(), "member name")?;
        self.token(name.kind(), false)
    }

    fn format_index(&mut self, index: &IndexExpr) -> FmtResult {
        let object = required(index.object(), "indexed object")?;
        self.format_expr(&object)?;
        self.token(SyntaxKind::L_BRACKET, false)?;
        if self.config.insert_space_after_opening_bracket_in_array_reference {
            self.scribe.space();
        }
        let key = required(index.index(), "index")?;
        self.format_expr(&key)?;
        self.token(
            SyntaxKind::R_BRACKET,
            self.config.insert_space_before_closing_bracket_in_array_reference,
        )
    }

    fn format_unary(&mut self, unary: &UnaryExpr) -> FmtResult {
        let op = required(unary.op(), "unary operator")?;
        let kind = op.kind();
        self.token(kind, false)?;
        let space_after = match kind {
            SyntaxKind::TYPEOF_KW | SyntaxKind::VOID_KW | SyntaxKind::DELETE_KW => true,
            SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                self.config.insert_space_after_prefix_operator
            }
            _ => self.config.insert_space_after_unary_operator,
        };
        if space_after {
            self.scribe.space();
        }
        let operand = required(unary.operand(), "unary operand")?;
        self.format_expr(&operand)
    }

    // ── Operator chains ────────────────────────────────────────────────

    fn format_binary(&mut self, binary: &BinaryExpr) -> FmtResult {
        let run = match flatten_binary(binary) {
            Some(run) if run.wants_alignment() => run,
            _ => return self.format_plain_binary(binary),
        };
        let spec = self
            .alignment(
                "binaryExpressionAlignment",
                self.config.alignment_for_binary_expression,
                run.len(),
            )
            .outermost();
        self.aligned(spec, |walker, id| {
            let last = run.len() - 1;
            for (i, operand) in run.operands.iter().enumerate() {
                if i > 0 {
                    walker.format_chain_operator(id, i, run.operators[i - 1])?;
                }
                walker.format_expr(operand)?;
                if i < last {
                    walker.scribe.print_trailing_comment()?;
                }
            }
            Ok(())
        })
    }

    /// The operator in front of fragment `index`, wrapping on the side the
    /// configuration asks for.
    fn format_chain_operator(
        &mut self,
        id: AlignmentId,
        index: usize,
        op: SyntaxKind,
    ) -> FmtResult {
        if self.config.wrap_before_binary_operator {
            self.scribe.align_fragment(id, index)?;
            self.token(op, self.config.insert_space_before_binary_operator)?;
        } else {
            self.token(op, self.config.insert_space_before_binary_operator)?;
            self.scribe.align_fragment(id, index)?;
        }
        if self.config.insert_space_after_binary_operator {
            self.scribe.space();
        }
        Ok(())
    }

    fn format_plain_binary(&mut self, binary: &BinaryExpr) -> FmtResult {
        let lhs = required(binary.lhs(), "left operand")?;
        self.format_expr(&lhs)?;
        let op = required(binary.op_kind(), "binary operator")?;
        self.token(op, self.config.insert_space_before_binary_operator)?;
        if self.config.insert_space_after_binary_operator {
            self.scribe.space();
        }
        let rhs = required(binary.rhs(), "right operand")?;
        self.format_expr(&rhs)
    }

    fn format_string_concat(&mut self, concat: &StringConcat) -> FmtResult {
        let literals = flatten_string_concat(concat);
        let spec = self
            .alignment(
                "stringConcatenation",
                self.config.alignment_for_string_concatenation,
                literals.len(),
            )
            .outermost();
        self.aligned(spec, |walker, id| {
            for (i, literal) in literals.iter().enumerate() {
                if i > 0 {
                    walker.format_chain_operator(id, i, SyntaxKind::PLUS)?;
                }
                let token = required(literal.token(), "string literal")?;
                walker.token(token.kind(), false)?;
                if i + 1 < literals.len() {
                    walker.scribe.print_trailing_comment()?;
                }
            }
            Ok(())
        })
    }

    fn format_conditional(&mut self, conditional: &ConditionalExpr) -> FmtResult {
        let condition = required(conditional.condition(), "condition")?;
        let then_expr = required(conditional.then_expr(), "conditional branch")?;
        let else_expr = required(conditional.else_expr(), "conditional branch")?;
        self.format_expr(&condition)?;
        let spec = self.alignment(
            "conditionalExpression",
            self.config.alignment_for_conditional_expression,
            2,
        );
        self.aligned(spec, |walker, id| {
            walker.scribe.align_fragment(id, 0)?;
            walker.token(
                SyntaxKind::QUESTION,
                walker.config.insert_space_before_question_in_conditional,
            )?;
            if walker.config.insert_space_after_question_in_conditional {
                walker.scribe.space();
            }
            walker.format_expr(&then_expr)?;
            walker.scribe.print_trailing_comment()?;
            walker.scribe.align_fragment(id, 1)?;
            walker.token(
                SyntaxKind::COLON,
                walker.config.insert_space_before_colon_in_conditional,
            )?;
            if walker.config.insert_space_after_colon_in_conditional {
                walker.scribe.space();
            }
            walker.format_expr(&else_expr)
        })
    }

    fn format_assign(&mut self, assign: &AssignExpr) -> FmtResult {
        let lhs = required(assign.lhs(), "assignment target")?;
        self.format_expr(&lhs)?;
        let op = required(assign.op(), "assignment operator")?;
        let rhs = required(assign.rhs(), "assigned value")?;
        self.format_assigned_value(op.kind(), &rhs, "assignmentAlignment")
    }

    /// `= value` after an assignment target, declarator or field name.
    pub(super) fn format_assigned_value(
        &mut self,
        op: SyntaxKind,
        value: &Expr,
        name: &'static str,
    ) -> FmtResult {
        self.token(op, self.config.insert_space_before_assignment_operator)?;
        let spec = self
            .alignment(name, self.config.alignment_for_assignment, 1)
            .outermost();
        self.aligned(spec, |walker, id| {
            walker.scribe.align_fragment(id, 0)?;
            if walker.config.insert_space_after_assignment_operator {
                walker.scribe.space();
            }
            walker.format_expr(value)
        })
    }

    // ── Calls ──────────────────────────────────────────────────────────

    fn format_call(&mut self, call: &CallExpr) -> FmtResult {
        if let Some(cascade) = flatten_cascade(call) {
            return self.format_cascade(&cascade);
        }
        let callee = required(call.callee(), "callee")?;
        match &callee {
            Expr::MemberExpr(member) => self.format_message_send(member)?,
            other => self.format_expr(other)?,
        }
        let args = required(call.arg_list(), "arguments")?;
        self.format_arguments(&args, self.invocation_style())
    }

    /// `object.name` as the callee of a call, breakable before the `.`.
    fn format_message_send(&mut self, member: &MemberExpr) -> FmtResult {
        let object = required(member.object(), "receiver")?;
        let spec = self.alignment(
            "messageAlignment",
            self.config.alignment_for_selector_in_method_invocation,
            2,
        );
        self.aligned(spec, |walker, id| {
            walker.format_expr(&object)?;
            walker.scribe.align_fragment(id, 1)?;
            walker.token(SyntaxKind::DOT, false)?;
            walker.format_member_name(member)
        })
    }

    fn format_cascade(&mut self, cascade: &Cascade) -> FmtResult {
        let spec = self.alignment(
            "cascadingMessageSendAlignment",
            self.config.alignment_for_selector_in_method_invocation,
            cascade.fragment_count(),
        );
        let style = self.invocation_style();
        self.aligned(spec, |walker, id| {
            walker.format_expr(&cascade.receiver)?;
            for (i, call) in cascade.calls.iter().enumerate() {
                walker.scribe.align_fragment(id, i + 1)?;
                walker.token(SyntaxKind::DOT, false)?;
                let Some(Expr::MemberExpr(member)) = call.callee() else {
                    return Err(FormatSignal::abort(
                        "malformed syntax tree: cascade call without selector",
                    ));
                };
                walker.format_member_name(&member)?;
                let args = required(call.arg_list(), "arguments")?;
                walker.format_arguments(&args, style)?;
            }
            Ok(())
        })
    }

    fn invocation_style(&self) -> ListStyle {
        let config = self.config;
        ListStyle {
            name: "messageArguments",
            wrap: config.alignment_for_arguments_in_method_invocation,
            space_before_open: config.insert_space_before_opening_paren_in_method_invocation,
            space_after_open: config.insert_space_after_opening_paren_in_method_invocation,
            space_before_close: config.insert_space_before_closing_paren_in_method_invocation,
            space_between_empty: config.insert_space_between_empty_parens_in_method_invocation,
            space_before_comma: config.insert_space_before_comma_in_method_invocation_arguments,
            space_after_comma: config.insert_space_after_comma_in_method_invocation_arguments,
        }
    }

    fn format_new(&mut self, new: &NewExpr) -> FmtResult {
        self.token(SyntaxKind::NEW_KW, false)?;
        self.scribe.space();
        let callee = required(new.callee(), "constructor")?;
        self.format_expr(&callee)?;
        let Some(args) = new.arg_list() else {
            return Ok(());
        };
        let config = self.config;
        let style = ListStyle {
            name: "allocation",
            wrap: config.alignment_for_arguments_in_allocation_expression,
            space_before_comma: config.insert_space_before_comma_in_allocation_expression,
            space_after_comma: config.insert_space_after_comma_in_allocation_expression,
            ..self.invocation_style()
        };
        self.format_arguments(&args, style)
    }

    fn format_arguments(&mut self, args: &ArgList, style: ListStyle) -> FmtResult {
        let args: Vec<Expr> = args.args().collect();
        self.format_paren_list(&args, style, |walker, arg| walker.format_expr(arg))
    }

    /// `(a, b, c)` with one wrapping fragment per item. A trailing comma in
    /// the source is kept.
    pub(super) fn format_paren_list<T>(
        &mut self,
        items: &[T],
        style: ListStyle,
        mut item: impl FnMut(&mut Self, &T) -> FmtResult,
    ) -> FmtResult {
        self.token(SyntaxKind::L_PAREN, style.space_before_open)?;
        if items.is_empty() {
            return self.token(SyntaxKind::R_PAREN, style.space_between_empty);
        }
        let spec = self.alignment(style.name, style.wrap, items.len());
        self.aligned(spec, |walker, id| {
            for (i, value) in items.iter().enumerate() {
                if i > 0 {
                    walker.token(SyntaxKind::COMMA, style.space_before_comma)?;
                    walker.scribe.print_trailing_comment()?;
                }
                walker.scribe.align_fragment(id, i)?;
                let space = if i == 0 {
                    style.space_after_open
                } else {
                    style.space_after_comma
                };
                if space {
                    walker.scribe.space();
                }
                item(walker, value)?;
            }
            walker.optional_token(SyntaxKind::COMMA, style.space_before_comma)?;
            Ok(())
        })?;
        self.token(SyntaxKind::R_PAREN, style.space_before_close)
    }

    // ── Initializers ───────────────────────────────────────────────────

    /// Position an initializer's opening bracket. Returns whether the
    /// bracket was shifted one level in.
    fn open_initializer(&mut self, position: BracePosition, open: SyntaxKind) -> FmtResult<bool> {
        let shifted = match position {
            BracePosition::SameLine => false,
            BracePosition::NextLine => {
                self.scribe.print_new_line();
                false
            }
            BracePosition::NextLineShifted => {
                self.scribe.print_new_line();
                self.scribe.indent();
                true
            }
            BracePosition::NextLineOnWrap => {
                if self.scribe.column + 2 > self.scribe.page_width() {
                    self.scribe.print_new_line();
                }
                false
            }
        };
        self.token(open, false)?;
        Ok(shifted)
    }

    fn format_array(&mut self, array: &ArrayExpr) -> FmtResult {
        let config = self.config;
        let elements: Vec<Expr> = array.elements().collect();
        let shifted =
            self.open_initializer(config.brace_position_for_array_initializer, SyntaxKind::L_BRACKET)?;
        if elements.is_empty() {
            if !config.keep_empty_array_initializer_on_one_line {
                self.scribe.print_new_line();
            }
            self.token(
                SyntaxKind::R_BRACKET,
                config.insert_space_between_empty_brackets_in_array_initializer,
            )?;
        } else {
            let spec = self
                .alignment(
                    "array_initializer",
                    config.alignment_for_expressions_in_array_initializer,
                    elements.len(),
                )
                .outermost()
                .continuation(config.continuation_indentation_for_array_initializer)
                .adjusted();
            self.aligned(spec, |walker, id| {
                if config.insert_new_line_after_opening_brace_in_array_initializer {
                    walker.scribe.print_new_line();
                    walker.scribe.indent_first_fragment(id)?;
                }
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        walker.token(
                            SyntaxKind::COMMA,
                            config.insert_space_before_comma_in_array_initializer,
                        )?;
                        walker.scribe.print_trailing_comment()?;
                    }
                    walker.scribe.align_fragment(id, i)?;
                    let space = if i == 0 {
                        config.insert_space_after_opening_bracket_in_array_initializer
                    } else {
                        config.insert_space_after_comma_in_array_initializer
                    };
                    if space {
                        walker.scribe.space();
                    }
                    walker.format_expr(element)?;
                }
                walker.optional_token(
                    SyntaxKind::COMMA,
                    config.insert_space_before_comma_in_array_initializer,
                )?;
                Ok(())
            })?;
            if config.insert_new_line_before_closing_brace_in_array_initializer {
                self.scribe.print_new_line();
            }
            self.token(
                SyntaxKind::R_BRACKET,
                config.insert_space_before_closing_bracket_in_array_initializer,
            )?;
        }
        if shifted {
            self.scribe.unindent();
        }
        Ok(())
    }

    fn format_object(&mut self, object: &ObjectExpr) -> FmtResult {
        let config = self.config;
        let properties: Vec<Property> = object.properties().collect();
        let shifted =
            self.open_initializer(config.brace_position_for_object_initializer, SyntaxKind::L_BRACE)?;
        if properties.is_empty() {
            if !config.keep_empty_object_initializer_on_one_line {
                self.scribe.print_new_line();
            }
            self.token(
                SyntaxKind::R_BRACE,
                config.insert_space_between_empty_braces_in_object_initializer,
            )?;
        } else {
            let spec = self
                .alignment(
                    "objlit_initializer",
                    config.alignment_for_expressions_in_object_initializer,
                    properties.len(),
                )
                .outermost()
                .continuation(config.continuation_indentation_for_object_initializer)
                .adjusted();
            self.aligned(spec, |walker, id| {
                if config.insert_new_line_after_opening_brace_in_object_initializer {
                    walker.scribe.print_new_line();
                    walker.scribe.indent_first_fragment(id)?;
                } else {
                    walker.scribe.space();
                }
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        walker.token(
                            SyntaxKind::COMMA,
                            config.insert_space_before_comma_in_object_initializer,
                        )?;
                        walker.scribe.print_trailing_comment()?;
                        if config.insert_new_line_after_comma_in_object_initializer {
                            walker.scribe.print_new_line();
                        }
                    }
                    walker.scribe.align_fragment(id, i)?;
                    if i > 0 && config.insert_space_after_comma_in_object_initializer {
                        walker.scribe.space();
                    }
                    walker.format_property(property)?;
                }
                walker.optional_token(
                    SyntaxKind::COMMA,
                    config.insert_space_before_comma_in_object_initializer,
                )?;
                walker.scribe.print_trailing_comment()
            })?;
            let new_line = config.insert_new_line_before_closing_brace_in_object_initializer;
            if new_line {
                self.scribe.print_new_line();
            }
            self.token(SyntaxKind::R_BRACE, !new_line)?;
        }
        if shifted {
            self.scribe.unindent();
        }
        Ok(())
    }

    fn format_property(&mut self, property: &Property) -> FmtResult {
        let key = required(property.key(), "property key")?;
        self.token(key.kind(), false)?;
        let Some(value) = property.value() else {
            return Ok(());
        };
        self.token(
            SyntaxKind::COLON,
            self.config.insert_space_before_colon_in_object_initializer,
        )?;
        if self.config.insert_space_after_colon_in_object_initializer {
            self.scribe.space();
        }
        self.format_expr(&value)
    }
}
