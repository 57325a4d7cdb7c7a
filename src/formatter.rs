//! Structural printer that renders an AST as a parenthesised tree.
//!
//! Leaves print as their token (`INT:1`, `IDENTIFIER:x`); compound
//! nodes print their keyword and punctuation tokens around their
//! children. Statement lists nest to the right: `(a (b c))`.

use std::fmt::{self, Write as _};

use crate::ast::{Call, For, FuncDef, If, Node, StatementList, While};

/// Render `node` and its subtree on a single line.
#[must_use]
pub fn format(node: &Node) -> String {
    let mut out = String::new();
    format_node(&mut out, node);
    out
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format(self))
    }
}

fn format_node(out: &mut String, node: &Node) {
    match node {
        Node::Number(tok) | Node::String(tok) | Node::VarAccess(tok) => {
            let _ = write!(out, "{tok}");
        }
        Node::VarAssign(assign) => {
            let _ = write!(out, "({} EQ ", assign.name);
            format_node(out, &assign.value);
            out.push(')');
        }
        Node::BinaryOp(bin) => {
            out.push('(');
            format_node(out, &bin.left);
            let _ = write!(out, ", {}, ", bin.op);
            format_node(out, &bin.right);
            out.push(')');
        }
        Node::UnaryOp(unary) => {
            let _ = write!(out, "({}, ", unary.op);
            format_node(out, &unary.operand);
            out.push(')');
        }
        Node::If(node) => format_if(out, node),
        Node::For(node) => format_for(out, node),
        Node::While(node) => format_while(out, node),
        Node::FuncDef(node) => format_func_def(out, node),
        Node::Call(node) => format_call(out, node),
        Node::StatementList(list) => format_statements(out, list),
    }
}

fn format_body(out: &mut String, body: &Node) {
    out.push_str("LCURL ");
    format_node(out, body);
    out.push_str(" RCURL");
}

fn format_if(out: &mut String, node: &If) {
    out.push_str("(KEYWORD:if");
    for case in &node.cases {
        out.push_str(" LPAREN ");
        format_node(out, &case.condition);
        out.push_str(" RPAREN ");
        format_body(out, &case.body);
    }
    if let Some(else_case) = &node.else_case {
        out.push_str(" KEYWORD:else ");
        format_body(out, else_case);
    }
    out.push(')');
}

fn format_for(out: &mut String, node: &For) {
    let _ = write!(out, "(KEYWORD:for LPAREN ({} EQ ", node.init.name);
    format_node(out, &node.init.value);
    out.push_str(") COMMA ");
    format_node(out, &node.condition);
    out.push_str(" COMMA ");
    format_node(out, &node.update);
    out.push_str(" RPAREN ");
    format_body(out, &node.body);
    out.push(')');
}

fn format_while(out: &mut String, node: &While) {
    out.push_str("(KEYWORD:while LPAREN ");
    format_node(out, &node.condition);
    out.push_str(" RPAREN ");
    format_body(out, &node.body);
    out.push(')');
}

fn format_func_def(out: &mut String, node: &FuncDef) {
    let _ = write!(out, "(KEYWORD:func {} LPAREN [", node.name);
    for (i, param) in node.params.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{param}");
    }
    out.push_str("] RPAREN ");
    format_body(out, &node.body);
    out.push(')');
}

fn format_call(out: &mut String, node: &Call) {
    out.push('(');
    format_node(out, &node.callee);
    out.push_str(" LPAREN");
    for (i, arg) in node.args.iter().enumerate() {
        out.push_str(if i > 0 { " COMMA " } else { " " });
        format_node(out, arg);
    }
    out.push_str(" RPAREN)");
}

fn format_statements(out: &mut String, list: &StatementList) {
    format_nested(out, &list.statements);
}

/// `[a]` prints `a`; `[a, b, c]` prints `(a (b c))`.
fn format_nested(out: &mut String, statements: &[Node]) {
    match statements {
        [] => {}
        [only] => format_node(out, only),
        [first, rest @ ..] => {
            out.push('(');
            format_node(out, first);
            out.push(' ');
            format_nested(out, rest);
            out.push(')');
        }
    }
}
