//! Functions, classes and class members.

use quill_parser::ast::item::{
    ClassBody, ClassDecl, ClassExpr, ClassMember, ExtendsClause, FieldDef, FnDecl, FnExpr,
    MethodDef, Name, ParamList,
};
use quill_parser::ast::stmt::{Block, Stmt};
use quill_parser::SyntaxKind;

use super::expressions::ListStyle;
use super::{required, Braces, Walker};
use crate::alignment::{ChunkKind, Mode};
use crate::config::BracePosition;
use crate::scribe::AlignmentId;
use crate::signal::{FmtResult, FormatSignal};

/// Column fragments of a field: modifier, name, initializer, trailing comment.
const FIELD_FRAGMENTS: usize = 4;

impl Walker<'_> {
    // ── Functions ──────────────────────────────────────────────────────

    pub(super) fn format_fn_decl(&mut self, decl: &FnDecl) -> FmtResult {
        self.format_function(decl.name(), decl.param_list(), decl.body())
    }

    pub(super) fn format_fn_expr(&mut self, expr: &FnExpr) -> FmtResult {
        self.format_function(expr.name(), expr.param_list(), expr.body())
    }

    fn format_function(
        &mut self,
        name: Option<Name>,
        params: Option<ParamList>,
        body: Option<Block>,
    ) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::FUNCTION_KW, false)?;
        if let Some(name) = name {
            self.name(&name, true)?;
        }
        let params = required(params, "parameter list")?;
        self.format_parameters(&params)?;
        let body = required(body, "function body")?;
        self.format_function_body(&body, header_line)
    }

    fn format_parameters(&mut self, params: &ParamList) -> FmtResult {
        let config = self.config;
        let style = ListStyle {
            name: "methodArguments",
            wrap: config.alignment_for_parameters_in_method_declaration,
            space_before_open: config.insert_space_before_opening_paren_in_method_declaration,
            space_after_open: config.insert_space_after_opening_paren_in_method_declaration,
            space_before_close: config.insert_space_before_closing_paren_in_method_declaration,
            space_between_empty: config.insert_space_between_empty_parens_in_method_declaration,
            space_before_comma: config.insert_space_before_comma_in_method_declaration_parameters,
            space_after_comma: config.insert_space_after_comma_in_method_declaration_parameters,
        };
        let names: Vec<Name> = params.params().collect();
        self.format_paren_list(&names, style, |walker, name| walker.name(name, false))
    }

    fn format_function_body(&mut self, body: &Block, header_line: usize) -> FmtResult {
        let statements: Vec<Stmt> = body.statements().collect();
        let braces = Braces {
            position: self.config.brace_position_for_method_declaration,
            space_before: self.config.insert_space_before_opening_brace_in_method_declaration,
            header_line,
            indent: self.config.indent_statements_compare_to_body,
            new_line_when_empty: self.config.insert_new_line_in_empty_method_body,
            blank_lines_at_start: self.config.blank_lines_at_beginning_of_method_body,
        };
        self.format_braced_statements(&statements, braces)
    }

    // ── Classes ────────────────────────────────────────────────────────

    pub(super) fn format_class_decl(&mut self, decl: &ClassDecl) -> FmtResult {
        self.format_class(decl.name(), decl.extends_clause(), decl.body())
    }

    pub(super) fn format_class_expr(&mut self, expr: &ClassExpr) -> FmtResult {
        self.format_class(expr.name(), expr.extends_clause(), expr.body())
    }

    fn format_class(
        &mut self,
        name: Option<Name>,
        extends: Option<ExtendsClause>,
        body: Option<ClassBody>,
    ) -> FmtResult {
        let header_line = self.scribe.line;
        self.token(SyntaxKind::CLASS_KW, false)?;
        if let Some(name) = name {
            self.name(&name, true)?;
        }
        if let Some(extends) = extends {
            let base = required(extends.base(), "superclass")?;
            let spec = self.alignment(
                "superclass",
                self.config.alignment_for_superclass_in_type_declaration,
                2,
            );
            self.aligned(spec, |walker, id| {
                walker.scribe.align_fragment(id, 0)?;
                walker.token(SyntaxKind::EXTENDS_KW, true)?;
                walker.scribe.align_fragment(id, 1)?;
                walker.scribe.space();
                walker.format_expr(&base)
            })?;
        }
        let body = required(body, "class body")?;
        self.format_class_body(&body, header_line)
    }

    fn format_class_body(&mut self, body: &ClassBody, header_line: usize) -> FmtResult {
        let position = self.config.brace_position_for_type_declaration;
        self.format_opening_brace(
            position,
            self.config.insert_space_before_opening_brace_in_type_declaration,
            header_line,
        )?;
        let members: Vec<ClassMember> = body.members().collect();
        let indent = self.config.indent_body_declarations_compare_to_type_header;
        if indent {
            self.scribe.indent();
        }
        let empty = members.is_empty() && !self.scribe.is_next(SyntaxKind::SEMICOLON);
        if empty {
            if self.config.insert_new_line_in_empty_type_declaration {
                self.scribe.print_new_line();
            }
            self.scribe.print_comment()?;
        } else {
            self.scribe.print_new_line();
            self.format_class_members(&members)?;
            self.scribe.print_new_line();
            self.scribe.print_comment()?;
        }
        if indent {
            self.scribe.unindent();
        }
        self.token(SyntaxKind::R_BRACE, false)?;
        self.scribe.print_trailing_comment()?;
        if position == BracePosition::NextLineShifted {
            self.scribe.unindent();
        }
        Ok(())
    }

    /// Lay out class members in chunks of fields and methods. With column
    /// alignment on, the field columns of a chunk widen until every field
    /// fits, restarting the chunk each time.
    pub(super) fn format_class_members(&mut self, members: &[ClassMember]) -> FmtResult {
        let mode = if self.config.align_type_members_on_columns {
            Mode::MULTICOLUMN
        } else {
            Mode::NO_ALIGNMENT
        };
        let id = self
            .scribe
            .enter_member_alignment("typeMembers", mode, FIELD_FRAGMENTS);
        let mut start = 0;
        loop {
            match self.format_members_from(members, start, id) {
                Ok(()) => break,
                Err(FormatSignal::Restart(restart)) => {
                    start = self.scribe.redo_member_alignment(id, restart)?;
                }
                Err(abort) => return Err(abort),
            }
        }
        self.scribe.exit_member_alignment(id)
    }

    fn format_members_from(
        &mut self,
        members: &[ClassMember],
        start: usize,
        id: AlignmentId,
    ) -> FmtResult {
        for (i, member) in members.iter().enumerate().skip(start) {
            self.format_stray_semicolons()?;
            let kind = match member {
                ClassMember::Field(_) => ChunkKind::Field,
                ClassMember::Method(_) => ChunkKind::Method,
            };
            let chunk_start = self.scribe.check_chunk_start(id, kind, i)?;
            let blank_lines = if i == 0 {
                self.config.blank_lines_before_first_class_body_declaration
            } else if chunk_start {
                self.config.blank_lines_before_new_chunk
            } else if kind == ChunkKind::Field {
                self.config.blank_lines_before_field
            } else {
                self.config.blank_lines_before_method
            };
            if blank_lines > 0 {
                self.scribe.print_empty_lines(blank_lines);
            }
            match member {
                ClassMember::Field(field) => self.format_field(field, member.is_static(), id)?,
                ClassMember::Method(method) => self.format_method(method, member.is_static())?,
            }
            if i + 1 < members.len() {
                self.scribe.print_new_line();
            }
        }
        self.format_stray_semicolons()
    }

    /// Empty members: a `;` standing alone in a class body.
    fn format_stray_semicolons(&mut self) -> FmtResult {
        while self.scribe.is_next(SyntaxKind::SEMICOLON) {
            self.scribe.print_new_line();
            self.token(SyntaxKind::SEMICOLON, false)?;
            self.scribe.print_trailing_comment()?;
            self.scribe.print_new_line();
        }
        Ok(())
    }

    fn format_field(&mut self, field: &FieldDef, is_static: bool, id: AlignmentId) -> FmtResult {
        let indentation_level = self.scribe.indentation_level;
        self.scribe.align_member_fragment(id, 0)?;
        if is_static {
            self.token(SyntaxKind::STATIC_KW, false)?;
        }
        self.scribe.align_member_fragment(id, 1)?;
        let name = required(field.name(), "field name")?;
        self.name(&name, is_static)?;
        if let Some(initializer) = field.initializer() {
            self.scribe.align_member_fragment(id, 2)?;
            self.format_assigned_value(
                SyntaxKind::EQ,
                &initializer,
                "fieldDeclarationAssignmentAlignment",
            )?;
        }
        if field.has_semicolon() {
            self.token(SyntaxKind::SEMICOLON, self.config.insert_space_before_semicolon)?;
        }
        self.scribe.align_member_fragment(id, 3)?;
        self.scribe.print_trailing_comment()?;
        self.scribe.indentation_level = indentation_level;
        Ok(())
    }

    fn format_method(&mut self, method: &MethodDef, is_static: bool) -> FmtResult {
        let header_line = self.scribe.line;
        if is_static {
            self.token(SyntaxKind::STATIC_KW, false)?;
        }
        let name = required(method.name(), "method name")?;
        self.name(&name, is_static)?;
        let params = required(method.param_list(), "parameter list")?;
        self.format_parameters(&params)?;
        let body = required(method.body(), "method body")?;
        self.format_function_body(&body, header_line)
    }
}
