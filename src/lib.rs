//! Lexer, parser, and intermediate-code generator for a small
//! scripting language.
//!
//! Source text is tokenized, parsed by recursive descent into a
//! typed AST, and lowered into linear three-address code.
//!
//! # Quick start
//!
//! ## Compile a program to intermediate code
//!
//! ```
//! use ourjs::{tokenize, parse, lower};
//!
//! let tokens = tokenize("<example>", "let x = 1 + 2").unwrap();
//! let root = parse(&tokens).unwrap();
//! assert_eq!(lower(&root), "t0 = 1\nt1 = 2\nt2 = t0 + t1\nx = t2\n");
//! ```
//!
//! ## Inspect the syntax tree
//!
//! ```
//! let root = ourjs::parse_str("<example>", "f(1, x)").unwrap();
//! assert_eq!(
//!     ourjs::format(&root),
//!     "(IDENTIFIER:f LPAREN INT:1 COMMA IDENTIFIER:x RPAREN)"
//! );
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod diagnostic;
pub mod formatter;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod scope;
pub mod token;

pub use ast::{
    BinaryOp, Call, For, FuncDef, If, IfCase, Node, StatementList, UnaryOp, VarAssign, While,
};
pub use formatter::format;
pub use ir::{Generator, Instruction, Label, Temp, generate, lower};
pub use lexer::{LexError, LexErrorKind, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse};
pub use scope::SymbolTable;
pub use token::{KEYWORDS, Keyword, Position, Source, Token, TokenKind, Value};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    #[must_use]
    pub const fn start(&self) -> &Position {
        match self {
            Self::Lex(e) => &e.start,
            Self::Parse(e) => &e.start,
        }
    }

    #[must_use]
    pub const fn end(&self) -> &Position {
        match self {
            Self::Lex(e) => &e.end,
            Self::Parse(e) => &e.end,
        }
    }

    /// The error message followed by the offending source excerpt.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{self}\n\n{}",
            diagnostic::render(self.start(), self.end())
        )
    }
}

/// Tokenize and parse a source string in one step.
pub fn parse_str(source_name: &str, text: &str) -> Result<Node, Error> {
    let tokens = tokenize(source_name, text)?;
    Ok(parse(&tokens)?)
}

/// Tokenize, parse, and lower a source string to intermediate code.
pub fn compile(source_name: &str, text: &str) -> Result<String, Error> {
    let root = parse_str(source_name, text)?;
    Ok(lower(&root))
}
