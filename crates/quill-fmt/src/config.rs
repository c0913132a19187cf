//! Formatter configuration.
//!
//! `FormatConfig` is the opaque preference record the scribe and the tree
//! walker look options up in. Every field has a default, so a `quill.toml`
//! only needs to name the options it changes:
//!
//! ```toml
//! page_width = 100
//! indent_style = "tab"
//! brace_position_for_block = "next_line"
//!
//! [alignment_for_arguments_in_method_invocation]
//! style = "one_per_line"
//! indent = "on_column"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::alignment::Mode;

/// How indentation whitespace is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentStyle {
    Space,
    Tab,
    /// Tabs for whole tab widths, spaces for the remainder.
    Mixed,
}

/// Where an opening brace goes relative to its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracePosition {
    SameLine,
    NextLine,
    NextLineShifted,
    /// Next line only when the header wrapped or reached the page width.
    NextLineOnWrap,
}

/// How a wrappable group splits once it no longer fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapStyle {
    NoSplit,
    Compact,
    CompactFirstBreak,
    OnePerLine,
    NextShifted,
    NextPerLine,
}

/// Indentation of wrapped fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapIndent {
    /// Continuation indentation below the line the group started on.
    Default,
    /// Aligned on the column where the group started.
    OnColumn,
    /// One indentation unit below the line the group started on.
    ByOne,
}

/// Line-wrapping policy for one kind of group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Wrap {
    pub style: WrapStyle,
    pub indent: WrapIndent,
    /// Break even when the group would fit.
    pub force: bool,
}

impl Default for Wrap {
    fn default() -> Self {
        Self::new(WrapStyle::Compact)
    }
}

impl Wrap {
    pub const fn new(style: WrapStyle) -> Self {
        Self {
            style,
            indent: WrapIndent::Default,
            force: false,
        }
    }

    pub const fn indented(style: WrapStyle, indent: WrapIndent) -> Self {
        Self {
            style,
            indent,
            force: false,
        }
    }

    /// The alignment mode bits this policy selects.
    pub(crate) fn mode(&self) -> Mode {
        let mut mode = match self.style {
            WrapStyle::NoSplit => Mode::NO_ALIGNMENT,
            WrapStyle::Compact => Mode::COMPACT_SPLIT,
            WrapStyle::CompactFirstBreak => Mode::COMPACT_FIRST_BREAK_SPLIT,
            WrapStyle::OnePerLine => Mode::ONE_PER_LINE_SPLIT,
            WrapStyle::NextShifted => Mode::NEXT_SHIFTED_SPLIT,
            WrapStyle::NextPerLine => Mode::NEXT_PER_LINE_SPLIT,
        };
        match self.indent {
            WrapIndent::Default => {}
            WrapIndent::OnColumn => mode |= Mode::INDENT_ON_COLUMN,
            WrapIndent::ByOne => mode |= Mode::INDENT_BY_ONE,
        }
        if self.force {
            mode |= Mode::FORCE;
        }
        mode
    }
}

/// Failure to load a `quill.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Every formatting preference, keyed by snake_case option name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatConfig {
    // ── Indentation ────────────────────────────────────────────────────
    pub indent_style: IndentStyle,
    pub tab_size: usize,
    pub indentation_size: usize,
    /// Continuation indentation, in indentation units.
    pub continuation_indentation: usize,
    pub continuation_indentation_for_array_initializer: usize,
    pub continuation_indentation_for_object_initializer: usize,
    pub use_tabs_only_for_leading_indentations: bool,
    pub page_width: usize,
    pub indent_statements_compare_to_block: bool,
    pub indent_statements_compare_to_body: bool,
    pub indent_body_declarations_compare_to_type_header: bool,
    pub indent_switchstatements_compare_to_switch: bool,
    pub indent_switchstatements_compare_to_cases: bool,
    pub indent_breaks_compare_to_cases: bool,

    // ── Braces ─────────────────────────────────────────────────────────
    pub brace_position_for_block: BracePosition,
    pub brace_position_for_method_declaration: BracePosition,
    pub brace_position_for_type_declaration: BracePosition,
    pub brace_position_for_switch: BracePosition,
    pub brace_position_for_array_initializer: BracePosition,
    pub brace_position_for_object_initializer: BracePosition,

    // ── Blank lines ────────────────────────────────────────────────────
    pub number_of_empty_lines_to_preserve: usize,
    pub blank_lines_before_first_class_body_declaration: usize,
    pub blank_lines_before_new_chunk: usize,
    pub blank_lines_before_field: usize,
    pub blank_lines_before_method: usize,
    pub blank_lines_at_beginning_of_method_body: usize,
    pub blank_lines_between_top_level_declarations: usize,

    // ── New lines ──────────────────────────────────────────────────────
    pub insert_new_line_in_empty_block: bool,
    pub insert_new_line_in_empty_method_body: bool,
    pub insert_new_line_in_empty_type_declaration: bool,
    pub insert_new_line_before_else_in_if_statement: bool,
    pub insert_new_line_before_catch_in_try_statement: bool,
    pub insert_new_line_before_finally_in_try_statement: bool,
    pub insert_new_line_before_while_in_do_statement: bool,
    pub insert_new_line_after_opening_brace_in_array_initializer: bool,
    pub insert_new_line_before_closing_brace_in_array_initializer: bool,
    pub insert_new_line_after_opening_brace_in_object_initializer: bool,
    pub insert_new_line_after_comma_in_object_initializer: bool,
    pub insert_new_line_before_closing_brace_in_object_initializer: bool,
    pub insert_new_line_at_end_of_file_if_missing: bool,
    pub put_empty_statement_on_new_line: bool,
    pub keep_simple_if_on_one_line: bool,
    pub keep_guardian_clause_on_one_line: bool,
    pub keep_then_statement_on_same_line: bool,
    pub keep_else_statement_on_same_line: bool,
    pub keep_empty_array_initializer_on_one_line: bool,
    pub keep_empty_object_initializer_on_one_line: bool,
    pub compact_else_if: bool,

    // ── Comments ───────────────────────────────────────────────────────
    pub comment_format_block_comments: bool,
    pub comment_format_doc_comments: bool,
    pub never_indent_block_comments_on_first_column: bool,
    pub never_indent_line_comments_on_first_column: bool,

    // ── White space ────────────────────────────────────────────────────
    pub insert_space_before_assignment_operator: bool,
    pub insert_space_after_assignment_operator: bool,
    pub insert_space_before_binary_operator: bool,
    pub insert_space_after_binary_operator: bool,
    pub insert_space_after_prefix_operator: bool,
    pub insert_space_before_postfix_operator: bool,
    pub insert_space_after_unary_operator: bool,
    pub insert_space_before_question_in_conditional: bool,
    pub insert_space_after_question_in_conditional: bool,
    pub insert_space_before_colon_in_conditional: bool,
    pub insert_space_after_colon_in_conditional: bool,
    pub insert_space_before_semicolon: bool,
    pub insert_space_before_semicolon_in_for: bool,
    pub insert_space_after_semicolon_in_for: bool,
    pub insert_space_before_colon_in_case: bool,
    pub insert_space_after_colon_in_case: bool,
    pub insert_space_before_colon_in_default: bool,
    pub insert_space_before_colon_in_labeled_statement: bool,
    pub insert_space_after_colon_in_labeled_statement: bool,
    pub insert_space_before_colon_in_object_initializer: bool,
    pub insert_space_after_colon_in_object_initializer: bool,
    pub insert_space_before_comma_in_method_invocation_arguments: bool,
    pub insert_space_after_comma_in_method_invocation_arguments: bool,
    pub insert_space_before_comma_in_method_declaration_parameters: bool,
    pub insert_space_after_comma_in_method_declaration_parameters: bool,
    pub insert_space_before_comma_in_allocation_expression: bool,
    pub insert_space_after_comma_in_allocation_expression: bool,
    pub insert_space_before_comma_in_array_initializer: bool,
    pub insert_space_after_comma_in_array_initializer: bool,
    pub insert_space_before_comma_in_object_initializer: bool,
    pub insert_space_after_comma_in_object_initializer: bool,
    pub insert_space_before_comma_in_multiple_local_declarations: bool,
    pub insert_space_after_comma_in_multiple_local_declarations: bool,
    pub insert_space_before_opening_paren_in_method_invocation: bool,
    pub insert_space_after_opening_paren_in_method_invocation: bool,
    pub insert_space_before_closing_paren_in_method_invocation: bool,
    pub insert_space_between_empty_parens_in_method_invocation: bool,
    pub insert_space_before_opening_paren_in_method_declaration: bool,
    pub insert_space_after_opening_paren_in_method_declaration: bool,
    pub insert_space_before_closing_paren_in_method_declaration: bool,
    pub insert_space_between_empty_parens_in_method_declaration: bool,
    pub insert_space_before_opening_paren_in_if: bool,
    pub insert_space_before_opening_paren_in_for: bool,
    pub insert_space_before_opening_paren_in_while: bool,
    pub insert_space_before_opening_paren_in_switch: bool,
    pub insert_space_before_opening_paren_in_catch: bool,
    pub insert_space_after_opening_paren_in_control_statement: bool,
    pub insert_space_before_closing_paren_in_control_statement: bool,
    pub insert_space_after_opening_paren_in_parenthesized_expression: bool,
    pub insert_space_before_closing_paren_in_parenthesized_expression: bool,
    pub insert_space_before_parenthesized_expression_in_return: bool,
    pub insert_space_before_parenthesized_expression_in_throw: bool,
    pub insert_space_before_opening_brace_in_block: bool,
    pub insert_space_before_opening_brace_in_method_declaration: bool,
    pub insert_space_before_opening_brace_in_type_declaration: bool,
    pub insert_space_before_opening_brace_in_switch: bool,
    pub insert_space_after_closing_brace_in_block: bool,
    pub insert_space_after_opening_bracket_in_array_initializer: bool,
    pub insert_space_before_closing_bracket_in_array_initializer: bool,
    pub insert_space_between_empty_brackets_in_array_initializer: bool,
    pub insert_space_between_empty_braces_in_object_initializer: bool,
    pub insert_space_after_opening_bracket_in_array_reference: bool,
    pub insert_space_before_closing_bracket_in_array_reference: bool,

    // ── Line wrapping ──────────────────────────────────────────────────
    pub wrap_before_binary_operator: bool,
    pub align_type_members_on_columns: bool,
    pub alignment_for_binary_expression: Wrap,
    pub alignment_for_string_concatenation: Wrap,
    pub alignment_for_arguments_in_method_invocation: Wrap,
    pub alignment_for_parameters_in_method_declaration: Wrap,
    pub alignment_for_arguments_in_allocation_expression: Wrap,
    pub alignment_for_selector_in_method_invocation: Wrap,
    pub alignment_for_expressions_in_array_initializer: Wrap,
    pub alignment_for_expressions_in_object_initializer: Wrap,
    pub alignment_for_conditional_expression: Wrap,
    pub alignment_for_assignment: Wrap,
    pub alignment_for_multiple_declarations: Wrap,
    pub alignment_for_compact_if: Wrap,
    pub alignment_for_superclass_in_type_declaration: Wrap,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_style: IndentStyle::Space,
            tab_size: 4,
            indentation_size: 4,
            continuation_indentation: 2,
            continuation_indentation_for_array_initializer: 2,
            continuation_indentation_for_object_initializer: 1,
            use_tabs_only_for_leading_indentations: false,
            page_width: 80,
            indent_statements_compare_to_block: true,
            indent_statements_compare_to_body: true,
            indent_body_declarations_compare_to_type_header: true,
            indent_switchstatements_compare_to_switch: true,
            indent_switchstatements_compare_to_cases: true,
            indent_breaks_compare_to_cases: true,

            brace_position_for_block: BracePosition::SameLine,
            brace_position_for_method_declaration: BracePosition::SameLine,
            brace_position_for_type_declaration: BracePosition::SameLine,
            brace_position_for_switch: BracePosition::SameLine,
            brace_position_for_array_initializer: BracePosition::SameLine,
            brace_position_for_object_initializer: BracePosition::SameLine,

            number_of_empty_lines_to_preserve: 1,
            blank_lines_before_first_class_body_declaration: 0,
            blank_lines_before_new_chunk: 1,
            blank_lines_before_field: 0,
            blank_lines_before_method: 1,
            blank_lines_at_beginning_of_method_body: 0,
            blank_lines_between_top_level_declarations: 1,

            insert_new_line_in_empty_block: true,
            insert_new_line_in_empty_method_body: true,
            insert_new_line_in_empty_type_declaration: true,
            insert_new_line_before_else_in_if_statement: false,
            insert_new_line_before_catch_in_try_statement: false,
            insert_new_line_before_finally_in_try_statement: false,
            insert_new_line_before_while_in_do_statement: false,
            insert_new_line_after_opening_brace_in_array_initializer: false,
            insert_new_line_before_closing_brace_in_array_initializer: false,
            insert_new_line_after_opening_brace_in_object_initializer: true,
            insert_new_line_after_comma_in_object_initializer: true,
            insert_new_line_before_closing_brace_in_object_initializer: true,
            insert_new_line_at_end_of_file_if_missing: false,
            put_empty_statement_on_new_line: true,
            keep_simple_if_on_one_line: false,
            keep_guardian_clause_on_one_line: false,
            keep_then_statement_on_same_line: false,
            keep_else_statement_on_same_line: false,
            keep_empty_array_initializer_on_one_line: true,
            keep_empty_object_initializer_on_one_line: true,
            compact_else_if: true,

            comment_format_block_comments: true,
            comment_format_doc_comments: true,
            never_indent_block_comments_on_first_column: false,
            never_indent_line_comments_on_first_column: false,

            insert_space_before_assignment_operator: true,
            insert_space_after_assignment_operator: true,
            insert_space_before_binary_operator: true,
            insert_space_after_binary_operator: true,
            insert_space_after_prefix_operator: false,
            insert_space_before_postfix_operator: false,
            insert_space_after_unary_operator: false,
            insert_space_before_question_in_conditional: true,
            insert_space_after_question_in_conditional: true,
            insert_space_before_colon_in_conditional: true,
            insert_space_after_colon_in_conditional: true,
            insert_space_before_semicolon: false,
            insert_space_before_semicolon_in_for: false,
            insert_space_after_semicolon_in_for: true,
            insert_space_before_colon_in_case: false,
            insert_space_after_colon_in_case: true,
            insert_space_before_colon_in_default: false,
            insert_space_before_colon_in_labeled_statement: false,
            insert_space_after_colon_in_labeled_statement: true,
            insert_space_before_colon_in_object_initializer: false,
            insert_space_after_colon_in_object_initializer: true,
            insert_space_before_comma_in_method_invocation_arguments: false,
            insert_space_after_comma_in_method_invocation_arguments: true,
            insert_space_before_comma_in_method_declaration_parameters: false,
            insert_space_after_comma_in_method_declaration_parameters: true,
            insert_space_before_comma_in_allocation_expression: false,
            insert_space_after_comma_in_allocation_expression: true,
            insert_space_before_comma_in_array_initializer: false,
            insert_space_after_comma_in_array_initializer: true,
            insert_space_before_comma_in_object_initializer: false,
            insert_space_after_comma_in_object_initializer: true,
            insert_space_before_comma_in_multiple_local_declarations: false,
            insert_space_after_comma_in_multiple_local_declarations: true,
            insert_space_before_opening_paren_in_method_invocation: false,
            insert_space_after_opening_paren_in_method_invocation: false,
            insert_space_before_closing_paren_in_method_invocation: false,
            insert_space_between_empty_parens_in_method_invocation: false,
            insert_space_before_opening_paren_in_method_declaration: false,
            insert_space_after_opening_paren_in_method_declaration: false,
            insert_space_before_closing_paren_in_method_declaration: false,
            insert_space_between_empty_parens_in_method_declaration: false,
            insert_space_before_opening_paren_in_if: true,
            insert_space_before_opening_paren_in_for: true,
            insert_space_before_opening_paren_in_while: true,
            insert_space_before_opening_paren_in_switch: true,
            insert_space_before_opening_paren_in_catch: true,
            insert_space_after_opening_paren_in_control_statement: false,
            insert_space_before_closing_paren_in_control_statement: false,
            insert_space_after_opening_paren_in_parenthesized_expression: false,
            insert_space_before_closing_paren_in_parenthesized_expression: false,
            insert_space_before_parenthesized_expression_in_return: true,
            insert_space_before_parenthesized_expression_in_throw: true,
            insert_space_before_opening_brace_in_block: true,
            insert_space_before_opening_brace_in_method_declaration: true,
            insert_space_before_opening_brace_in_type_declaration: true,
            insert_space_before_opening_brace_in_switch: true,
            insert_space_after_closing_brace_in_block: true,
            insert_space_after_opening_bracket_in_array_initializer: false,
            insert_space_before_closing_bracket_in_array_initializer: false,
            insert_space_between_empty_brackets_in_array_initializer: false,
            insert_space_between_empty_braces_in_object_initializer: false,
            insert_space_after_opening_bracket_in_array_reference: false,
            insert_space_before_closing_bracket_in_array_reference: false,

            wrap_before_binary_operator: true,
            align_type_members_on_columns: false,
            alignment_for_binary_expression: Wrap::new(WrapStyle::Compact),
            alignment_for_string_concatenation: Wrap::new(WrapStyle::Compact),
            alignment_for_arguments_in_method_invocation: Wrap::new(WrapStyle::Compact),
            alignment_for_parameters_in_method_declaration: Wrap::new(WrapStyle::Compact),
            alignment_for_arguments_in_allocation_expression: Wrap::new(WrapStyle::Compact),
            alignment_for_selector_in_method_invocation: Wrap::new(WrapStyle::Compact),
            alignment_for_expressions_in_array_initializer: Wrap::new(WrapStyle::Compact),
            alignment_for_expressions_in_object_initializer: Wrap::new(WrapStyle::Compact),
            alignment_for_conditional_expression: Wrap::new(WrapStyle::OnePerLine),
            alignment_for_assignment: Wrap::new(WrapStyle::NoSplit),
            alignment_for_multiple_declarations: Wrap::new(WrapStyle::Compact),
            alignment_for_compact_if: Wrap::indented(WrapStyle::OnePerLine, WrapIndent::ByOne),
            alignment_for_superclass_in_type_declaration: Wrap::new(WrapStyle::NextShifted),
        }
    }
}

impl FormatConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse a `quill.toml` file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_the_default() {
        let config = FormatConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormatConfig::default());
        assert_eq!(config.page_width, 80);
        assert_eq!(config.indent_style, IndentStyle::Space);
    }

    #[test]
    fn partial_document_overrides_named_options() {
        let config = FormatConfig::from_toml_str(
            r#"
page_width = 100
indent_style = "mixed"
brace_position_for_block = "next_line_shifted"

[alignment_for_arguments_in_method_invocation]
style = "one_per_line"
indent = "on_column"
force = true
"#,
        )
        .unwrap();
        assert_eq!(config.page_width, 100);
        assert_eq!(config.indent_style, IndentStyle::Mixed);
        assert_eq!(
            config.brace_position_for_block,
            BracePosition::NextLineShifted
        );
        let wrap = config.alignment_for_arguments_in_method_invocation;
        assert_eq!(wrap.style, WrapStyle::OnePerLine);
        assert_eq!(wrap.indent, WrapIndent::OnColumn);
        assert!(wrap.force);
        assert_eq!(config.tab_size, 4);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = FormatConfig::from_toml_str("page_widht = 100").unwrap_err();
        assert!(err.to_string().contains("page_widht"));
    }

    #[test]
    fn wrap_mode_bits() {
        let wrap = Wrap {
            style: WrapStyle::NextShifted,
            indent: WrapIndent::ByOne,
            force: true,
        };
        let mode = wrap.mode();
        assert_eq!(mode.split(), Mode::NEXT_SHIFTED_SPLIT);
        assert!(mode.contains(Mode::INDENT_BY_ONE));
        assert!(mode.contains(Mode::FORCE));
        assert_eq!(Wrap::new(WrapStyle::NoSplit).mode().split(), Mode::NO_ALIGNMENT);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let err = FormatConfig::from_file(Path::new("/nonexistent/quill.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/quill.toml"));
    }
}
