//! Quill JavaScript formatter.
//!
//! Formatting never builds the output text directly. The driver walks the
//! syntax tree produced by `quill-parser` and prints each token through a
//! scribe, which records the whitespace changes as [`TextEdit`]s against the
//! original source:
//!
//! 1. The source is parsed for the requested [`FormatKind`].
//! 2. The tree walk prints every token in order. Lists that may wrap run
//!    inside alignments; when a line overflows, the responsible alignment
//!    rolls the edit buffer back and lays its fragments out again.
//! 3. The edits inside the requested region are returned.
//!
//! Any desynchronization between tree and tokens aborts the whole request,
//! so the caller either gets a complete edit list or none at all.

mod alignment;
mod config;
mod edit;
mod fragments;
mod scanner;
mod scribe;
mod signal;
mod visitor;

pub use config::{BracePosition, ConfigError, FormatConfig, IndentStyle, Wrap, WrapIndent, WrapStyle};
pub use edit::{apply_edits, TextEdit};
pub use signal::{AbortFormatting, AlignmentRestart, FmtResult, FormatSignal, RestartReason};

use quill_parser::{Parse, SyntaxNode};
use tracing::debug;

use crate::scribe::Scribe;
use crate::visitor::Walker;

/// Which syntactic unit the formatted source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    CompilationUnit,
    ClassBodyDeclarations,
    Statements,
    Expression,
    /// Try each of the above, most specific first.
    Unknown,
}

/// Format `source` and return the edits that fall inside
/// `offset..offset + length`.
///
/// `None` means the source could not be formatted and should be left as it
/// is: it did not parse as `kind`, the region lies outside the source, or
/// the layout aborted.
pub fn format(
    kind: FormatKind,
    source: &str,
    offset: usize,
    length: usize,
    indentation_level: usize,
    line_separator: &str,
    config: &FormatConfig,
) -> Option<Vec<TextEdit>> {
    let end = offset.checked_add(length)?;
    if end > source.len() {
        debug!(offset, length, source_len = source.len(), "format region out of range");
        return None;
    }
    debug!(?kind, offset, length, source_len = source.len(), "format");
    let (kind, root) = parse_as(kind, source)?;
    let tokens = scanner::scan_tokens(source);
    let scribe = Scribe::new(source, &tokens, config, indentation_level, line_separator);
    let mut walker = Walker::new(scribe, config);
    let walked = match kind {
        FormatKind::Statements => walker.format_statement_list(&root),
        FormatKind::ClassBodyDeclarations => walker.format_class_body_declarations(&root),
        FormatKind::Expression => walker.format_expression_root(&root),
        FormatKind::CompilationUnit | FormatKind::Unknown => walker.format_compilation_unit(&root),
    };
    match walked {
        Ok(()) => {
            let edits = walker.into_scribe().into_edits(offset..end);
            debug!(edits = edits.len(), "format finished");
            Some(edits)
        }
        Err(FormatSignal::Abort(abort)) => {
            debug!(message = %abort.message, "format aborted");
            None
        }
        Err(FormatSignal::Restart(restart)) => {
            debug!(%restart, "restart escaped every alignment");
            None
        }
    }
}

/// Parse `source` as `kind`, resolving [`FormatKind::Unknown`] to the first
/// kind that parses cleanly.
fn parse_as(kind: FormatKind, source: &str) -> Option<(FormatKind, SyntaxNode)> {
    let parse_kind = |kind: FormatKind| -> Parse {
        match kind {
            FormatKind::Expression => quill_parser::parse_expression(source),
            FormatKind::ClassBodyDeclarations => quill_parser::parse_class_members(source),
            FormatKind::Statements => quill_parser::parse_statements(source),
            FormatKind::CompilationUnit | FormatKind::Unknown => quill_parser::parse(source),
        }
    };
    let candidates: &[FormatKind] = match kind {
        FormatKind::Unknown => &[
            FormatKind::Expression,
            FormatKind::ClassBodyDeclarations,
            FormatKind::Statements,
            FormatKind::CompilationUnit,
        ],
        FormatKind::CompilationUnit => &[FormatKind::CompilationUnit],
        FormatKind::ClassBodyDeclarations => &[FormatKind::ClassBodyDeclarations],
        FormatKind::Statements => &[FormatKind::Statements],
        FormatKind::Expression => &[FormatKind::Expression],
    };
    for &candidate in candidates {
        let parse = parse_kind(candidate);
        if parse.ok() {
            return Some((candidate, parse.syntax()));
        }
        debug!(kind = ?candidate, errors = parse.errors().len(), "source does not parse");
    }
    None
}

/// Format a whole compilation unit.
///
/// # Example
///
/// ```
/// use quill_fmt::{format_source, FormatConfig};
///
/// let formatted = format_source("var a=1,b=2;", &FormatConfig::default());
/// assert_eq!(formatted.as_deref(), Some("var a = 1, b = 2;"));
/// ```
pub fn format_source(source: &str, config: &FormatConfig) -> Option<String> {
    let edits = format(
        FormatKind::CompilationUnit,
        source,
        0,
        source.len(),
        0,
        "\n",
        config,
    )?;
    Some(apply_edits(source, &edits))
}

/// Leading whitespace for `level` indentation units under `config`.
pub fn create_indentation_string(level: usize, config: &FormatConfig) -> String {
    let tokens = scanner::scan_tokens("");
    let mut scribe = Scribe::new("", &tokens, config, level, "\n");
    scribe.indentation_string()
}

#[cfg(test)]
mod idempotency_tests {
    use super::{format_source, FormatConfig};

    fn assert_idempotent(name: &str, source: &str) {
        let config = FormatConfig::default();
        let formatted = format_source(source, &config)
            .unwrap_or_else(|| panic!("{name}: first pass failed"));
        let double_formatted = format_source(&formatted, &config)
            .unwrap_or_else(|| panic!("{name}: second pass failed"));
        assert_eq!(
            formatted, double_formatted,
            "Idempotency failed for: {}\nFirst:  {:?}\nSecond: {:?}",
            name, formatted, double_formatted
        );
    }

    #[test]
    fn idempotent_empty_file() {
        assert_idempotent("empty file", "");
    }

    #[test]
    fn idempotent_var_declarations() {
        assert_idempotent("var", "var a=1,b=2;let c;const d=a+b;");
    }

    #[test]
    fn idempotent_function_declaration() {
        assert_idempotent(
            "function",
            "function add(a,b){return a+b;}\nfunction noop(){}",
        );
    }

    #[test]
    fn idempotent_if_else_chain() {
        assert_idempotent(
            "if/else",
            "if(a){b();}else if(c){d();}else{e();}",
        );
    }

    #[test]
    fn idempotent_loops() {
        assert_idempotent(
            "loops",
            "for(var i=0;i<n;i++){sum+=i;}\nfor(var k in o)f(k);\nwhile(x)x--;\ndo{y++;}while(y<3);",
        );
    }

    #[test]
    fn idempotent_switch() {
        assert_idempotent(
            "switch",
            "switch(x){case 1:a();break;case 2:case 3:b();break;default:c();}",
        );
    }

    #[test]
    fn idempotent_try_catch_finally() {
        assert_idempotent("try", "try{a();}catch(e){b(e);}finally{c();}");
    }

    #[test]
    fn idempotent_class() {
        assert_idempotent(
            "class",
            "class Point extends Base{x=0;static y=1;constructor(a,b){this.a=a;}get(){return this.a;}}",
        );
    }

    #[test]
    fn idempotent_object_and_array_literals() {
        assert_idempotent(
            "literals",
            "var o={a:1,'b':[1,2,3],c:{d:null}};var e=[];var f={};",
        );
    }

    #[test]
    fn idempotent_comments() {
        assert_idempotent(
            "comments",
            "// leading\nvar a = 1; // trailing\n/* block\n   body */\nfunction f() {\n  /** doc */\n  return a;\n}\n",
        );
    }

    #[test]
    fn idempotent_long_binary_chain() {
        assert_idempotent(
            "long chain",
            "var total = alpha + beta + gamma + delta + epsilon + zeta + eta + theta + iota + kappa + lambda;",
        );
    }

    #[test]
    fn idempotent_long_call_arguments() {
        assert_idempotent(
            "long call",
            "callSomething(firstArgument, secondArgument, thirdArgument, fourthArgument, fifth);",
        );
    }

    #[test]
    fn idempotent_cascade() {
        assert_idempotent(
            "cascade",
            "builder.withName(name).withAge(age).withAddress(address).withPhone(phone).build();",
        );
    }

    #[test]
    fn idempotent_blank_line_preservation() {
        assert_idempotent("blank lines", "a();\n\n\n\nb();\n");
    }
}
