//! Syntax tree produced by the parser.
//!
//! Every node owns its children and can report the source span of
//! its whole subtree through [`Node::start`] and [`Node::end`].

use crate::token::{Position, Token};

/// One syntactic construct.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `INT` or `FLOAT` literal.
    Number(Token),
    /// `STRING` literal.
    String(Token),
    /// Read of a variable.
    VarAccess(Token),
    VarAssign(VarAssign),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),
    If(If),
    For(For),
    While(While),
    FuncDef(FuncDef),
    Call(Call),
    StatementList(StatementList),
}

/// `let name = value`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarAssign {
    pub name: Token,
    pub value: Box<Node>,
    /// Start of the `let` keyword.
    pub start: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Box<Node>,
    pub op: Token,
    pub right: Box<Node>,
}

/// Prefix `+`, `-` or `!`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOp {
    pub op: Token,
    pub operand: Box<Node>,
}

/// One `(condition) { body }` arm of an `if`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfCase {
    pub condition: Node,
    pub body: Node,
}

/// `if (c) { ... } [else { ... }]`.
///
/// `cases` is a list so that `else if` chains fit the same shape; the
/// parser currently fills exactly one case.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub cases: Vec<IfCase>,
    pub else_case: Option<Box<Node>>,
    pub start: Position,
    pub end: Position,
}

/// `for (let i = a, cond, update) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub init: VarAssign,
    pub condition: Box<Node>,
    pub update: Box<Node>,
    pub body: Box<Node>,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub start: Position,
    pub end: Position,
}

/// `func name(params) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncDef {
    pub name: Token,
    pub params: Vec<Token>,
    pub body: Box<Node>,
    pub start: Position,
    pub end: Position,
}

/// `callee(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Box<Node>,
    pub args: Vec<Node>,
    /// End of the closing `)`.
    pub end: Position,
}

/// Ordered statements, the root of every parse.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementList {
    pub statements: Vec<Node>,
    pub start: Position,
    pub end: Position,
}

impl Node {
    /// Start of the subtree's source span.
    #[must_use]
    pub fn start(&self) -> &Position {
        match self {
            Self::Number(tok) | Self::String(tok) | Self::VarAccess(tok) => &tok.start,
            Self::VarAssign(n) => &n.start,
            Self::BinaryOp(n) => n.left.start(),
            Self::UnaryOp(n) => &n.op.start,
            Self::If(n) => &n.start,
            Self::For(n) => &n.start,
            Self::While(n) => &n.start,
            Self::FuncDef(n) => &n.start,
            Self::Call(n) => n.callee.start(),
            Self::StatementList(n) => &n.start,
        }
    }

    /// End of the subtree's source span.
    #[must_use]
    pub fn end(&self) -> &Position {
        match self {
            Self::Number(tok) | Self::String(tok) | Self::VarAccess(tok) => &tok.end,
            Self::VarAssign(n) => n.value.end(),
            Self::BinaryOp(n) => n.right.end(),
            Self::UnaryOp(n) => n.operand.end(),
            Self::If(n) => &n.end,
            Self::For(n) => &n.end,
            Self::While(n) => &n.end,
            Self::FuncDef(n) => &n.end,
            Self::Call(n) => &n.end,
            Self::StatementList(n) => &n.end,
        }
    }

    /// Variable or function name for nodes that carry one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::VarAccess(tok) => tok.text(),
            Self::VarAssign(n) => n.name.text(),
            Self::FuncDef(n) => n.name.text(),
            _ => None,
        }
    }
}

impl VarAssign {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.text().unwrap_or_default()
    }

    /// Wraps this assignment back into a [`Node`].
    #[must_use]
    pub fn into_node(self) -> Node {
        Node::VarAssign(self)
    }
}

impl FuncDef {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.text().unwrap_or_default()
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().filter_map(Token::text)
    }
}

impl StatementList {
    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}
