#![allow(dead_code)]

use ourjs::{Node, TokenKind, compile, parse, tokenize};

pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize("<test>", input)
        .expect("tokenize failed")
        .iter()
        .map(|t| t.kind)
        .collect()
}

pub fn parse_input(input: &str) -> Node {
    let tokens = tokenize("<test>", input).expect("tokenize failed");
    parse(&tokens).unwrap_or_else(|e| panic!("parse failed: {e}\n--- input ---\n{input}"))
}

/// Top-level statements of a parsed program.
pub fn statements(root: &Node) -> &[Node] {
    match root {
        Node::StatementList(list) => &list.statements,
        other => panic!("expected statement list, got {other}"),
    }
}

/// Compile `input` and compare against `expected` line by line.
pub fn assert_ir(input: &str, expected: &str) {
    let output = compile("<test>", input).unwrap_or_else(|e| panic!("compile failed: {e}"));
    assert_eq!(
        output, expected,
        "IR mismatch:\n--- expected ---\n{expected}\n--- got ---\n{output}"
    );
}
