//! Typed AST nodes for expressions.

use crate::ast::item::{ClassExpr, FnExpr};
use crate::ast::{ast_node, child_node, child_nodes, significant_tokens, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Expr enum ────────────────────────────────────────────────────────────

/// Any expression node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    ThisExpr(ThisExpr),
    ParenExpr(ParenExpr),
    ArrayExpr(ArrayExpr),
    ObjectExpr(ObjectExpr),
    FnExpr(FnExpr),
    ClassExpr(ClassExpr),
    CallExpr(CallExpr),
    NewExpr(NewExpr),
    MemberExpr(MemberExpr),
    IndexExpr(IndexExpr),
    UnaryExpr(UnaryExpr),
    PostfixExpr(PostfixExpr),
    BinaryExpr(BinaryExpr),
    StringConcat(StringConcat),
    ConditionalExpr(ConditionalExpr),
    AssignExpr(AssignExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let expr = match node.kind() {
            SyntaxKind::LITERAL => Expr::Literal(Literal { syntax: node }),
            SyntaxKind::NAME_REF => Expr::NameRef(NameRef { syntax: node }),
            SyntaxKind::THIS_EXPR => Expr::ThisExpr(ThisExpr { syntax: node }),
            SyntaxKind::PAREN_EXPR => Expr::ParenExpr(ParenExpr { syntax: node }),
            SyntaxKind::ARRAY_EXPR => Expr::ArrayExpr(ArrayExpr { syntax: node }),
            SyntaxKind::OBJECT_EXPR => Expr::ObjectExpr(ObjectExpr { syntax: node }),
            SyntaxKind::FN_EXPR => Expr::FnExpr(FnExpr { syntax: node }),
            SyntaxKind::CLASS_EXPR => Expr::ClassExpr(ClassExpr { syntax: node }),
            SyntaxKind::CALL_EXPR => Expr::CallExpr(CallExpr { syntax: node }),
            SyntaxKind::NEW_EXPR => Expr::NewExpr(NewExpr { syntax: node }),
            SyntaxKind::MEMBER_EXPR => Expr::MemberExpr(MemberExpr { syntax: node }),
            SyntaxKind::INDEX_EXPR => Expr::IndexExpr(IndexExpr { syntax: node }),
            SyntaxKind::UNARY_EXPR => Expr::UnaryExpr(UnaryExpr { syntax: node }),
            SyntaxKind::POSTFIX_EXPR => Expr::PostfixExpr(PostfixExpr { syntax: node }),
            SyntaxKind::BINARY_EXPR => Expr::BinaryExpr(BinaryExpr { syntax: node }),
            SyntaxKind::STRING_CONCAT => Expr::StringConcat(StringConcat { syntax: node }),
            SyntaxKind::CONDITIONAL_EXPR => {
                Expr::ConditionalExpr(ConditionalExpr { syntax: node })
            }
            SyntaxKind::ASSIGN_EXPR => Expr::AssignExpr(AssignExpr { syntax: node }),
            _ => return None,
        };
        Some(expr)
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => &n.syntax,
            Expr::NameRef(n) => &n.syntax,
            Expr::ThisExpr(n) => &n.syntax,
            Expr::ParenExpr(n) => &n.syntax,
            Expr::ArrayExpr(n) => &n.syntax,
            Expr::ObjectExpr(n) => &n.syntax,
            Expr::FnExpr(n) => n.syntax(),
            Expr::ClassExpr(n) => n.syntax(),
            Expr::CallExpr(n) => &n.syntax,
            Expr::NewExpr(n) => &n.syntax,
            Expr::MemberExpr(n) => &n.syntax,
            Expr::IndexExpr(n) => &n.syntax,
            Expr::UnaryExpr(n) => &n.syntax,
            Expr::PostfixExpr(n) => &n.syntax,
            Expr::BinaryExpr(n) => &n.syntax,
            Expr::StringConcat(n) => &n.syntax,
            Expr::ConditionalExpr(n) => &n.syntax,
            Expr::AssignExpr(n) => &n.syntax,
        }
    }

    /// How many parentheses directly wrap the innermost expression.
    ///
    /// `((a))` has depth 2; `(a) + b` has depth 0 at the binary node.
    pub fn paren_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.clone();
        while let Expr::ParenExpr(paren) = current {
            depth += 1;
            match paren.expr() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        depth
    }

    /// Strip every wrapping parenthesis.
    pub fn unparenthesized(&self) -> Expr {
        let mut current = self.clone();
        while let Expr::ParenExpr(ref paren) = current {
            match paren.expr() {
                Some(inner) => current = inner,
                None => break,
            }
        }
        current
    }
}

fn nth_expr(node: &SyntaxNode, n: usize) -> Option<Expr> {
    node.children().filter_map(Expr::cast).nth(n)
}

/// The single significant token owned directly by `node` (an operator).
fn operator_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    significant_tokens(node).next()
}

// ── Leaves ───────────────────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

impl Literal {
    /// The literal token (NUMBER, STRING, REGEX, TRUE_KW, ...).
    pub fn token(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).next()
    }
}

ast_node!(NameRef, NAME_REF);

impl NameRef {
    pub fn ident(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).next()
    }
}

ast_node!(ThisExpr, THIS_EXPR);

// ── Grouping ─────────────────────────────────────────────────────────────

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

ast_node!(ArrayExpr, ARRAY_EXPR);

impl ArrayExpr {
    pub fn elements(&self) -> impl Iterator<Item = Expr> {
        self.syntax.children().filter_map(Expr::cast)
    }

    /// Whether a `,` directly precedes the closing `]`.
    pub fn has_trailing_comma(&self) -> bool {
        let tokens: Vec<_> = significant_tokens(&self.syntax).map(|t| t.kind()).collect();
        tokens.len() >= 2 && tokens[tokens.len() - 2] == SyntaxKind::COMMA
    }
}

ast_node!(ObjectExpr, OBJECT_EXPR);

impl ObjectExpr {
    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn has_trailing_comma(&self) -> bool {
        let tokens: Vec<_> = significant_tokens(&self.syntax).map(|t| t.kind()).collect();
        tokens.len() >= 2 && tokens[tokens.len() - 2] == SyntaxKind::COMMA
    }
}

ast_node!(Property, PROPERTY);

impl Property {
    /// The key token (identifier, keyword, string or number).
    pub fn key(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).next()
    }

    /// The value after `:`; `None` for shorthand properties.
    pub fn value(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

// ── Calls and access ─────────────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Expr> {
        self.syntax.children().filter_map(Expr::cast)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    pub fn callee(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    /// `None` for `new Foo` without parentheses.
    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(MemberExpr, MEMBER_EXPR);

impl MemberExpr {
    pub fn object(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    /// The property name after `.`.
    pub fn name(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).nth(1)
    }
}

ast_node!(IndexExpr, INDEX_EXPR);

impl IndexExpr {
    pub fn object(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn index(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }
}

// ── Operators ────────────────────────────────────────────────────────────

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        operator_token(&self.syntax)
    }

    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

ast_node!(PostfixExpr, POSTFIX_EXPR);

impl PostfixExpr {
    pub fn operand(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        operator_token(&self.syntax)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        operator_token(&self.syntax)
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.op().map(|t| t.kind())
    }
}

ast_node!(StringConcat, STRING_CONCAT);

impl StringConcat {
    /// The flat operand list, in source order.
    pub fn literals(&self) -> impl Iterator<Item = Literal> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(ConditionalExpr, CONDITIONAL_EXPR);

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn then_expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn else_expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 2)
    }
}

ast_node!(AssignExpr, ASSIGN_EXPR);

impl AssignExpr {
    pub fn lhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn rhs(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 1)
    }

    pub fn op(&self) -> Option<SyntaxToken> {
        operator_token(&self.syntax)
    }
}
