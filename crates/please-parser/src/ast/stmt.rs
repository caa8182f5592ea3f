//! Typed AST nodes for the file, statements and block structure.

use crate::ast::expr::{Expression, FunctionCall, ValueKind};
use crate::ast::{
    ast_node, child_node, child_nodes, child_token, child_tokens, required, AstNode,
    StructureError,
};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── File ─────────────────────────────────────────────────────────────────

ast_node!(File, FILE);

impl File {
    /// Top-level statements, in order. Malformed ones are not included.
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        child_nodes(&self.syntax)
    }

    /// Top-level regions that could not be parsed.
    pub fn errors(&self) -> impl Iterator<Item = ErrorNode> + '_ {
        child_nodes(&self.syntax)
    }

    /// Top-level `def`s.
    pub fn function_defs(&self) -> impl Iterator<Item = FunctionDef> + '_ {
        self.statements().filter_map(|stmt| match stmt.kind() {
            Ok(StatementKind::FunctionDef(def)) => Some(def),
            _ => None,
        })
    }

    /// Top-level statements that are a bare call, such as build rule
    /// invocations (`go_library(name = "x")`).
    pub fn function_calls(&self) -> impl Iterator<Item = FunctionCall> + '_ {
        self.statements().filter_map(|stmt| match stmt.kind() {
            Ok(StatementKind::Expression(expr)) if expr.is_single_value() => {
                match expr.value().ok()?.kind().ok()? {
                    ValueKind::Call(call) => Some(call),
                    _ => None,
                }
            }
            _ => None,
        })
    }
}

// ── Statement ────────────────────────────────────────────────────────────

ast_node!(Statement, STATEMENT);

/// What a statement holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    FunctionDef(FunctionDef),
    If(IfStatement),
    Assignment(Assignment),
    Expression(Expression),
    Pass(SyntaxToken),
    Continue(SyntaxToken),
}

impl Statement {
    pub fn kind(&self) -> Result<StatementKind, StructureError> {
        if let Some(node) = self.syntax.first_child() {
            let kind = match node.kind() {
                SyntaxKind::FUNCTION_DEF => FunctionDef::cast(node).map(StatementKind::FunctionDef),
                SyntaxKind::IF_STATEMENT => IfStatement::cast(node).map(StatementKind::If),
                SyntaxKind::ASSIGNMENT => Assignment::cast(node).map(StatementKind::Assignment),
                SyntaxKind::EXPRESSION => Expression::cast(node).map(StatementKind::Expression),
                _ => None,
            };
            return required(kind, &self.syntax, "statement body");
        }
        if let Some(token) = child_token(&self.syntax, SyntaxKind::PASS_KW) {
            return Ok(StatementKind::Pass(token));
        }
        let token = child_token(&self.syntax, SyntaxKind::CONTINUE_KW);
        required(token, &self.syntax, "statement body").map(StatementKind::Continue)
    }

    pub fn function_def(&self) -> Option<FunctionDef> {
        child_node(&self.syntax)
    }

    pub fn if_statement(&self) -> Option<IfStatement> {
        child_node(&self.syntax)
    }

    pub fn assignment(&self) -> Option<Assignment> {
        child_node(&self.syntax)
    }

    pub fn expression(&self) -> Option<Expression> {
        child_node(&self.syntax)
    }
}

// ── Error node ───────────────────────────────────────────────────────────

ast_node!(ErrorNode, ERROR_NODE);

// ── def ──────────────────────────────────────────────────────────────────

ast_node!(FunctionDef, FUNCTION_DEF);

impl FunctionDef {
    /// The function name.
    pub fn name(&self) -> Result<SyntaxToken, StructureError> {
        required(
            child_token(&self.syntax, SyntaxKind::IDENT),
            &self.syntax,
            "name",
        )
    }

    pub fn params(&self) -> impl Iterator<Item = FunctionDefParam> + '_ {
        child_nodes(&self.syntax)
    }

    /// Statements of the body. Malformed ones are not included.
    pub fn body(&self) -> impl Iterator<Item = Statement> + '_ {
        child_nodes(&self.syntax)
    }

    /// A triple-quoted string on the first line of the body.
    pub fn docstring(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .skip_while(|it| it.kind() != SyntaxKind::OPEN_BLOCK)
            .skip(1)
            .take_while(|it| it.kind() != SyntaxKind::STATEMENT)
            .filter_map(|it| it.into_token())
            .find(|it| it.kind() == SyntaxKind::DOC_COMMENT)
    }
}

ast_node!(FunctionDefParam, FUNCTION_DEF_PARAM);

impl FunctionDefParam {
    pub fn name(&self) -> Result<SyntaxToken, StructureError> {
        required(
            child_token(&self.syntax, SyntaxKind::IDENT),
            &self.syntax,
            "name",
        )
    }

    /// Accepted types, `str | list` giving two. Empty for untyped params.
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        child_nodes(&self.syntax)
    }

    /// The default value after `=`.
    pub fn default(&self) -> Option<Expression> {
        child_node(&self.syntax)
    }
}

ast_node!(Type, TYPE);

impl Type {
    pub fn name(&self) -> Result<SyntaxToken, StructureError> {
        required(
            child_token(&self.syntax, SyntaxKind::IDENT),
            &self.syntax,
            "type name",
        )
    }
}

// ── if / elif / else ─────────────────────────────────────────────────────

ast_node!(IfStatement, IF_STATEMENT);

/// Which keyword opened an [`IfBranch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IfBranchKind {
    If,
    Elif,
    Else,
}

/// One branch of an `if` statement. Branches have no node of their own, so
/// this is a view over a run of `IF_STATEMENT` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfBranch {
    pub kind: IfBranchKind,
    pub keyword: SyntaxToken,
    /// Always present for `if` and `elif`, usually absent for `else`.
    pub condition: Option<Expression>,
    pub body: Vec<Statement>,
}

impl IfStatement {
    pub fn branches(&self) -> Vec<IfBranch> {
        let mut branches: Vec<IfBranch> = Vec::new();
        for element in self.syntax.children_with_tokens() {
            let kind = match element.kind() {
                SyntaxKind::IF_KW => Some(IfBranchKind::If),
                SyntaxKind::ELIF_KW => Some(IfBranchKind::Elif),
                SyntaxKind::ELSE_KW => Some(IfBranchKind::Else),
                _ => None,
            };
            match (kind, element) {
                (Some(kind), rowan::NodeOrToken::Token(keyword)) => branches.push(IfBranch {
                    kind,
                    keyword,
                    condition: None,
                    body: Vec::new(),
                }),
                (None, rowan::NodeOrToken::Node(node)) => {
                    let Some(branch) = branches.last_mut() else {
                        continue;
                    };
                    if let Some(stmt) = Statement::cast(node.clone()) {
                        branch.body.push(stmt);
                    } else if branch.body.is_empty() && branch.condition.is_none() {
                        branch.condition = Expression::cast(node);
                    }
                }
                _ => {}
            }
        }
        branches
    }

    /// Branch conditions, in order.
    pub fn conditions(&self) -> impl Iterator<Item = Expression> + '_ {
        child_nodes(&self.syntax)
    }

    /// Statements of every branch body, in order.
    pub fn statements(&self) -> impl Iterator<Item = Statement> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn else_branch(&self) -> Option<IfBranch> {
        self.branches()
            .into_iter()
            .find(|branch| branch.kind == IfBranchKind::Else)
    }
}

// ── Assignment ───────────────────────────────────────────────────────────

ast_node!(Assignment, ASSIGNMENT);

impl Assignment {
    /// Names on the left of `=`.
    pub fn targets(&self) -> impl Iterator<Item = SyntaxToken> {
        child_tokens(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn value(&self) -> Result<Expression, StructureError> {
        required(child_node(&self.syntax), &self.syntax, "value")
    }
}
