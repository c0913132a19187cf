//! Typed AST nodes for functions, classes and their members.

use crate::ast::expr::Expr;
use crate::ast::stmt::Block;
use crate::ast::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn text(&self) -> Option<String> {
        self.ident().map(|t| t.text().to_string())
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Name> + '_ {
        child_nodes(&self.syntax)
    }
}

/// Accessors shared by function declarations and function expressions.
macro_rules! function_like {
    ($name:ident) => {
        impl $name {
            pub fn name(&self) -> Option<Name> {
                child_node(&self.syntax)
            }

            pub fn param_list(&self) -> Option<ParamList> {
                child_node(&self.syntax)
            }

            pub fn body(&self) -> Option<Block> {
                child_node(&self.syntax)
            }
        }
    };
}

ast_node!(FnDecl, FN_DECL);
function_like!(FnDecl);

ast_node!(FnExpr, FN_EXPR);
function_like!(FnExpr);

/// Accessors shared by class declarations and class expressions.
macro_rules! class_like {
    ($name:ident) => {
        impl $name {
            pub fn name(&self) -> Option<Name> {
                child_node(&self.syntax)
            }

            pub fn extends_clause(&self) -> Option<ExtendsClause> {
                child_node(&self.syntax)
            }

            pub fn body(&self) -> Option<ClassBody> {
                child_node(&self.syntax)
            }
        }
    };
}

ast_node!(ClassDecl, CLASS_DECL);
class_like!(ClassDecl);

ast_node!(ClassExpr, CLASS_EXPR);
class_like!(ClassExpr);

ast_node!(ExtendsClause, EXTENDS_CLAUSE);

impl ExtendsClause {
    pub fn base(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(ClassBody, CLASS_BODY);

impl ClassBody {
    pub fn members(&self) -> impl Iterator<Item = ClassMember> {
        members_of(&self.syntax)
    }
}

/// Members directly under `node` (a class body or a members-only root).
pub fn members_of(node: &SyntaxNode) -> impl Iterator<Item = ClassMember> {
    node.children().filter_map(ClassMember::cast)
}

/// A field or method inside a class body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassMember {
    Field(FieldDef),
    Method(MethodDef),
}

impl ClassMember {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::FIELD_DEF => Some(ClassMember::Field(FieldDef { syntax: node })),
            SyntaxKind::METHOD_DEF => Some(ClassMember::Method(MethodDef { syntax: node })),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            ClassMember::Field(n) => &n.syntax,
            ClassMember::Method(n) => &n.syntax,
        }
    }

    pub fn is_static(&self) -> bool {
        child_token(self.syntax(), SyntaxKind::STATIC_KW).is_some()
    }
}

ast_node!(FieldDef, FIELD_DEF);

impl FieldDef {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn initializer(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn has_semicolon(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::SEMICOLON).is_some()
    }
}

ast_node!(MethodDef, METHOD_DEF);

impl MethodDef {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}
