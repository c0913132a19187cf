//! quill parser: event-based recursive descent parser producing a rowan CST.
//!
//! This crate turns the token stream from `quill-lexer` into a lossless
//! concrete syntax tree. Every token, including whitespace and comments, is
//! kept in the tree, so the formatter can rebuild the exact input text from
//! it and compute edits against source offsets.

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use parser::Parser;

/// Result of parsing a JavaScript source fragment.
///
/// Contains the green tree and at most one error (parsing stops at the
/// first problem and wraps the rest of the input in an ERROR_NODE).
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Parse errors encountered during parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

fn run(source: &str, entry: fn(&mut Parser)) -> Parse {
    let tokens = quill_lexer::Lexer::tokenize(source);
    let mut parser = Parser::new(tokens, source);
    entry(&mut parser);
    let (green, errors) = parser.build_tree();
    Parse { green, errors }
}

/// Parse a complete compilation unit.
pub fn parse(source: &str) -> Parse {
    run(source, parser::parse_source_file)
}

/// Parse a sequence of statements (a function body without braces).
pub fn parse_statements(source: &str) -> Parse {
    run(source, parser::parse_source_file)
}

/// Parse a single expression spanning the whole input.
pub fn parse_expression(source: &str) -> Parse {
    run(source, parser::parse_expression_root)
}

/// Parse the members of a class body without the surrounding braces.
pub fn parse_class_members(source: &str) -> Parse {
    run(source, parser::parse_class_members_root)
}
