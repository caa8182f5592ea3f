//! Typed AST nodes for expressions.
//!
//! Covers expressions with their operator chains and ternaries, values,
//! function calls and their arguments, list, dict and bool literals.

use please_common::token::{int_value, unescape_string};

use crate::ast::{ast_node, child_node, child_nodes, child_token, required, AstNode, StructureError};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Expression ───────────────────────────────────────────────────────────

ast_node!(Expression, EXPRESSION);

/// Prefix operator on the first operand of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `not`
    Not,
}

impl Expression {
    /// `-` or `not` before the value.
    pub fn unary_op(&self) -> Option<UnaryOp> {
        self.syntax
            .children_with_tokens()
            .take_while(|it| it.kind() != SyntaxKind::VALUE)
            .find_map(|it| match it.kind() {
                SyntaxKind::MINUS => Some(UnaryOp::Neg),
                SyntaxKind::NOT_KW => Some(UnaryOp::Not),
                _ => None,
            })
    }

    /// The first operand.
    pub fn value(&self) -> Result<Value, StructureError> {
        required(child_node(&self.syntax), &self.syntax, "value")
    }

    /// The binary operator after the first operand.
    pub fn operator(&self) -> Option<Operator> {
        child_node(&self.syntax)
    }

    /// Everything after the operator. Chains nest to the right, so in
    /// `1 + 2 + 3` this is `2 + 3`.
    pub fn rhs(&self) -> Option<Expression> {
        self.expression_after(SyntaxKind::OPERATOR)
    }

    /// The condition of a trailing `if ... else ...`.
    pub fn condition(&self) -> Option<Expression> {
        self.expression_after(SyntaxKind::IF_KW)
    }

    /// The alternative of a trailing `if ... else ...`.
    pub fn else_branch(&self) -> Option<Expression> {
        self.expression_after(SyntaxKind::ELSE_KW)
    }

    /// Whether this is a lone value: no unary or binary operator, no ternary.
    pub fn is_single_value(&self) -> bool {
        self.unary_op().is_none()
            && self.operator().is_none()
            && child_token(&self.syntax, SyntaxKind::IF_KW).is_none()
    }

    fn expression_after(&self, marker: SyntaxKind) -> Option<Expression> {
        self.syntax
            .children_with_tokens()
            .skip_while(|it| it.kind() != marker)
            .skip(1)
            .find_map(|it| it.into_node().and_then(Expression::cast))
    }
}

// ── Operator ─────────────────────────────────────────────────────────────

ast_node!(Operator, OPERATOR);

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    And,
    Or,
    Is,
    IsNot,
    In,
    NotIn,
    /// `|`, used for dict and set union.
    Union,
}

impl Operator {
    pub fn kind(&self) -> Result<OperatorKind, StructureError> {
        let mut tokens = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|it| !it.kind().is_trivia())
            .map(|it| it.kind());
        let kind = match (tokens.next(), tokens.next()) {
            (Some(SyntaxKind::IS_KW), Some(SyntaxKind::NOT_KW)) => Some(OperatorKind::IsNot),
            (Some(SyntaxKind::NOT_KW), Some(SyntaxKind::IN_KW)) => Some(OperatorKind::NotIn),
            (Some(first), None) => match first {
                SyntaxKind::PLUS => Some(OperatorKind::Add),
                SyntaxKind::MINUS => Some(OperatorKind::Sub),
                SyntaxKind::STAR => Some(OperatorKind::Mul),
                SyntaxKind::SLASH => Some(OperatorKind::Div),
                SyntaxKind::PERCENT => Some(OperatorKind::Mod),
                SyntaxKind::LT => Some(OperatorKind::Lt),
                SyntaxKind::GT => Some(OperatorKind::Gt),
                SyntaxKind::LT_EQ => Some(OperatorKind::LtEq),
                SyntaxKind::GT_EQ => Some(OperatorKind::GtEq),
                SyntaxKind::EQ_EQ => Some(OperatorKind::Eq),
                SyntaxKind::NOT_EQ => Some(OperatorKind::NotEq),
                SyntaxKind::AND_KW => Some(OperatorKind::And),
                SyntaxKind::OR_KW => Some(OperatorKind::Or),
                SyntaxKind::IS_KW => Some(OperatorKind::Is),
                SyntaxKind::IN_KW => Some(OperatorKind::In),
                SyntaxKind::PIPE => Some(OperatorKind::Union),
                _ => None,
            },
            _ => None,
        };
        required(kind, &self.syntax, "operator token")
    }
}

// ── Value ────────────────────────────────────────────────────────────────

ast_node!(Value, VALUE);

/// What a value holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Call(FunctionCall),
    Ident(SyntaxToken),
    Int(SyntaxToken),
    Str(SyntaxToken),
    List(ListLit),
    Dict(DictLit),
    Bool(BoolLit),
}

impl Value {
    pub fn kind(&self) -> Result<ValueKind, StructureError> {
        if let Some(node) = self.syntax.first_child() {
            let kind = match node.kind() {
                SyntaxKind::FUNCTION_CALL => FunctionCall::cast(node).map(ValueKind::Call),
                SyntaxKind::LIST_LIT => ListLit::cast(node).map(ValueKind::List),
                SyntaxKind::DICT_LIT => DictLit::cast(node).map(ValueKind::Dict),
                SyntaxKind::BOOL_LIT => BoolLit::cast(node).map(ValueKind::Bool),
                _ => None,
            };
            return required(kind, &self.syntax, "value");
        }
        let kind = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find_map(|token| match token.kind() {
                SyntaxKind::IDENT => Some(ValueKind::Ident(token)),
                SyntaxKind::INT_LITERAL => Some(ValueKind::Int(token)),
                SyntaxKind::STRING_LITERAL => Some(ValueKind::Str(token)),
                _ => None,
            });
        required(kind, &self.syntax, "value")
    }

    /// The decoded integer, if this is an integer literal that fits `i64`.
    pub fn int_value(&self) -> Option<i64> {
        let token = child_token(&self.syntax, SyntaxKind::INT_LITERAL)?;
        int_value(token.text())
    }

    /// The unescaped contents, if this is a string literal.
    pub fn string_value(&self) -> Option<String> {
        let token = child_token(&self.syntax, SyntaxKind::STRING_LITERAL)?;
        unescape_string(token.text())
    }
}

// ── Function call ────────────────────────────────────────────────────────

ast_node!(FunctionCall, FUNCTION_CALL);

impl FunctionCall {
    /// The called name.
    pub fn name(&self) -> Result<SyntaxToken, StructureError> {
        required(
            child_token(&self.syntax, SyntaxKind::IDENT),
            &self.syntax,
            "callee",
        )
    }

    pub fn params(&self) -> impl Iterator<Item = FunctionCallParam> + '_ {
        child_nodes(&self.syntax)
    }

    /// The keyword argument with the given name.
    pub fn named_param(&self, name: &str) -> Option<FunctionCallParam> {
        self.params()
            .find(|param| param.name().is_some_and(|token| token.text() == name))
    }
}

ast_node!(FunctionCallParam, FUNCTION_CALL_PARAM);

impl FunctionCallParam {
    /// The keyword, for `name = value` arguments.
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn value(&self) -> Result<Expression, StructureError> {
        required(child_node(&self.syntax), &self.syntax, "value")
    }
}

// ── Literals ─────────────────────────────────────────────────────────────

ast_node!(ListLit, LIST_LIT);

impl ListLit {
    pub fn elements(&self) -> impl Iterator<Item = Expression> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(DictLit, DICT_LIT);

/// A `"key": value` pair. Entries have no node of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictEntry {
    pub key: SyntaxToken,
    pub value: Expression,
}

impl DictEntry {
    /// The unescaped key.
    pub fn key_text(&self) -> Option<String> {
        unescape_string(self.key.text())
    }
}

impl DictLit {
    pub fn entries(&self) -> Vec<DictEntry> {
        let mut entries = Vec::new();
        let mut key = None;
        for element in self.syntax.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(token) if token.kind() == SyntaxKind::STRING_LITERAL => {
                    key = Some(token);
                }
                rowan::NodeOrToken::Node(node) => {
                    if let (Some(key), Some(value)) = (key.take(), Expression::cast(node)) {
                        entries.push(DictEntry { key, value });
                    }
                }
                rowan::NodeOrToken::Token(_) => {}
            }
        }
        entries
    }
}

ast_node!(BoolLit, BOOL_LIT);

impl BoolLit {
    pub fn value(&self) -> Result<bool, StructureError> {
        if child_token(&self.syntax, SyntaxKind::TRUE_KW).is_some() {
            return Ok(true);
        }
        required(
            child_token(&self.syntax, SyntaxKind::FALSE_KW),
            &self.syntax,
            "`True` or `False`",
        )
        .map(|_| false)
    }
}
