//! Typed AST nodes for statements and the source file root.

use crate::ast::expr::Expr;
use crate::ast::item::{ClassDecl, FnDecl, Name};
use crate::ast::{ast_node, child_node, child_nodes, child_token, significant_tokens, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> {
        statements_of(&self.syntax)
    }
}

/// Statements directly under `node`.
pub fn statements_of(node: &SyntaxNode) -> impl Iterator<Item = Stmt> {
    node.children().filter_map(Stmt::cast)
}

/// Any statement node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stmt {
    VarDecl(VarDecl),
    FnDecl(FnDecl),
    ClassDecl(ClassDecl),
    ExprStmt(ExprStmt),
    Block(Block),
    EmptyStmt(EmptyStmt),
    IfStmt(IfStmt),
    ForStmt(ForStmt),
    ForInStmt(ForInStmt),
    WhileStmt(WhileStmt),
    DoWhileStmt(DoWhileStmt),
    ReturnStmt(ReturnStmt),
    BreakStmt(BreakStmt),
    ContinueStmt(ContinueStmt),
    ThrowStmt(ThrowStmt),
    SwitchStmt(SwitchStmt),
    TryStmt(TryStmt),
    LabeledStmt(LabeledStmt),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        let stmt = match node.kind() {
            SyntaxKind::VAR_DECL => Stmt::VarDecl(VarDecl { syntax: node }),
            SyntaxKind::FN_DECL => Stmt::FnDecl(FnDecl { syntax: node }),
            SyntaxKind::CLASS_DECL => Stmt::ClassDecl(ClassDecl { syntax: node }),
            SyntaxKind::EXPR_STMT => Stmt::ExprStmt(ExprStmt { syntax: node }),
            SyntaxKind::BLOCK => Stmt::Block(Block { syntax: node }),
            SyntaxKind::EMPTY_STMT => Stmt::EmptyStmt(EmptyStmt { syntax: node }),
            SyntaxKind::IF_STMT => Stmt::IfStmt(IfStmt { syntax: node }),
            SyntaxKind::FOR_STMT => Stmt::ForStmt(ForStmt { syntax: node }),
            SyntaxKind::FOR_IN_STMT => Stmt::ForInStmt(ForInStmt { syntax: node }),
            SyntaxKind::WHILE_STMT => Stmt::WhileStmt(WhileStmt { syntax: node }),
            SyntaxKind::DO_WHILE_STMT => Stmt::DoWhileStmt(DoWhileStmt { syntax: node }),
            SyntaxKind::RETURN_STMT => Stmt::ReturnStmt(ReturnStmt { syntax: node }),
            SyntaxKind::BREAK_STMT => Stmt::BreakStmt(BreakStmt { syntax: node }),
            SyntaxKind::CONTINUE_STMT => Stmt::ContinueStmt(ContinueStmt { syntax: node }),
            SyntaxKind::THROW_STMT => Stmt::ThrowStmt(ThrowStmt { syntax: node }),
            SyntaxKind::SWITCH_STMT => Stmt::SwitchStmt(SwitchStmt { syntax: node }),
            SyntaxKind::TRY_STMT => Stmt::TryStmt(TryStmt { syntax: node }),
            SyntaxKind::LABELED_STMT => Stmt::LabeledStmt(LabeledStmt { syntax: node }),
            _ => return None,
        };
        Some(stmt)
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Stmt::VarDecl(n) => &n.syntax,
            Stmt::FnDecl(n) => n.syntax(),
            Stmt::ClassDecl(n) => n.syntax(),
            Stmt::ExprStmt(n) => &n.syntax,
            Stmt::Block(n) => &n.syntax,
            Stmt::EmptyStmt(n) => &n.syntax,
            Stmt::IfStmt(n) => &n.syntax,
            Stmt::ForStmt(n) => &n.syntax,
            Stmt::ForInStmt(n) => &n.syntax,
            Stmt::WhileStmt(n) => &n.syntax,
            Stmt::DoWhileStmt(n) => &n.syntax,
            Stmt::ReturnStmt(n) => &n.syntax,
            Stmt::BreakStmt(n) => &n.syntax,
            Stmt::ContinueStmt(n) => &n.syntax,
            Stmt::ThrowStmt(n) => &n.syntax,
            Stmt::SwitchStmt(n) => &n.syntax,
            Stmt::TryStmt(n) => &n.syntax,
            Stmt::LabeledStmt(n) => &n.syntax,
        }
    }
}

fn nth_stmt(node: &SyntaxNode, n: usize) -> Option<Stmt> {
    node.children().filter_map(Stmt::cast).nth(n)
}

fn nth_expr(node: &SyntaxNode, n: usize) -> Option<Expr> {
    node.children().filter_map(Expr::cast).nth(n)
}

fn has_semicolon(node: &SyntaxNode) -> bool {
    child_token(node, SyntaxKind::SEMICOLON).is_some()
}

// ── Declarations ─────────────────────────────────────────────────────────

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    /// `var`, `let` or `const`.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        significant_tokens(&self.syntax).next()
    }

    pub fn declarators(&self) -> impl Iterator<Item = VarDeclarator> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(VarDeclarator, VAR_DECLARATOR);

impl VarDeclarator {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn initializer(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }
}

// ── Simple statements ────────────────────────────────────────────────────

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(Block, BLOCK);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = Stmt> {
        statements_of(&self.syntax)
    }
}

ast_node!(EmptyStmt, EMPTY_STMT);

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(ThrowStmt, THROW_STMT);

impl ThrowStmt {
    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(BreakStmt, BREAK_STMT);

impl BreakStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(ContinueStmt, CONTINUE_STMT);

impl ContinueStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(LabeledStmt, LABELED_STMT);

impl LabeledStmt {
    pub fn label(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn body(&self) -> Option<Stmt> {
        nth_stmt(&self.syntax, 0)
    }
}

// ── Control flow ─────────────────────────────────────────────────────────

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn then_branch(&self) -> Option<Stmt> {
        nth_stmt(&self.syntax, 0)
    }

    pub fn else_branch(&self) -> Option<Stmt> {
        nth_stmt(&self.syntax, 1)
    }
}

ast_node!(ForStmt, FOR_STMT);

impl ForStmt {
    pub fn init(&self) -> Option<ForInit> {
        child_node(&self.syntax)
    }

    pub fn test(&self) -> Option<Expr> {
        child_node::<ForTest>(&self.syntax).and_then(|t| nth_expr(&t.syntax, 0))
    }

    pub fn update(&self) -> Option<Expr> {
        child_node::<ForUpdate>(&self.syntax).and_then(|u| nth_expr(&u.syntax, 0))
    }

    pub fn body(&self) -> Option<Stmt> {
        nth_stmt(&self.syntax, 0)
    }
}

ast_node!(ForInit, FOR_INIT);

impl ForInit {
    pub fn var_decl(&self) -> Option<VarDecl> {
        child_node(&self.syntax)
    }

    pub fn expr(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.syntax.children().next().is_none()
    }
}

ast_node!(ForTest, FOR_TEST);
ast_node!(ForUpdate, FOR_UPDATE);

ast_node!(ForInStmt, FOR_IN_STMT);

/// The left-hand side of `for (x in obj)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ForInTarget {
    VarDecl(VarDecl),
    Expr(Expr),
}

impl ForInStmt {
    pub fn target(&self) -> Option<ForInTarget> {
        let first = self.syntax.children().next()?;
        if let Some(decl) = VarDecl::cast(first.clone()) {
            return Some(ForInTarget::VarDecl(decl));
        }
        Expr::cast(first).map(ForInTarget::Expr)
    }

    pub fn object(&self) -> Option<Expr> {
        match self.target()? {
            ForInTarget::VarDecl(_) => nth_expr(&self.syntax, 0),
            ForInTarget::Expr(_) => nth_expr(&self.syntax, 1),
        }
    }

    pub fn body(&self) -> Option<Stmt> {
        // The target may itself be a VAR_DECL statement node.
        let skip = match self.target()? {
            ForInTarget::VarDecl(_) => 1,
            ForInTarget::Expr(_) => 0,
        };
        nth_stmt(&self.syntax, skip)
    }
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn body(&self) -> Option<Stmt> {
        nth_stmt(&self.syntax, 0)
    }
}

ast_node!(DoWhileStmt, DO_WHILE_STMT);

impl DoWhileStmt {
    pub fn body(&self) -> Option<Stmt> {
        nth_stmt(&self.syntax, 0)
    }

    pub fn condition(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn has_semicolon(&self) -> bool {
        has_semicolon(&self.syntax)
    }
}

ast_node!(SwitchStmt, SWITCH_STMT);

impl SwitchStmt {
    pub fn discriminant(&self) -> Option<Expr> {
        nth_expr(&self.syntax, 0)
    }

    pub fn clauses(&self) -> impl Iterator<Item = SwitchClause> {
        self.syntax.children().filter_map(SwitchClause::cast)
    }
}

/// `case expr:` or `default:` with its statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SwitchClause {
    Case(CaseClause),
    Default(DefaultClause),
}

impl SwitchClause {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::CASE_CLAUSE => Some(SwitchClause::Case(CaseClause { syntax: node })),
            SyntaxKind::DEFAULT_CLAUSE => {
                Some(SwitchClause::Default(DefaultClause { syntax: node }))
            }
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            SwitchClause::Case(n) => &n.syntax,
            SwitchClause::Default(n) => &n.syntax,
        }
    }

    pub fn test(&self) -> Option<Expr> {
        match self {
            SwitchClause::Case(n) => nth_expr(&n.syntax, 0),
            SwitchClause::Default(_) => None,
        }
    }

    pub fn statements(&self) -> impl Iterator<Item = Stmt> {
        statements_of(self.syntax())
    }
}

ast_node!(CaseClause, CASE_CLAUSE);
ast_node!(DefaultClause, DEFAULT_CLAUSE);

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    pub fn block(&self) -> Option<Block> {
        child_node(&self.syntax)
    }

    pub fn catch_clause(&self) -> Option<CatchClause> {
        child_node(&self.syntax)
    }

    pub fn finally_clause(&self) -> Option<FinallyClause> {
        child_node(&self.syntax)
    }
}

ast_node!(CatchClause, CATCH_CLAUSE);

impl CatchClause {
    pub fn param(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

ast_node!(FinallyClause, FINALLY_CLAUSE);

impl FinallyClause {
    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}
