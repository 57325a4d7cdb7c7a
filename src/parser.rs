use std::fmt;
use std::sync::Arc;

use crate::ast::{
    BinaryOp, Call, For, FuncDef, If, IfCase, Node, StatementList, UnaryOp, VarAssign, While,
};
use crate::token::{Keyword, Position, Token, TokenKind};

/// Classifies an invalid-syntax error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A specific token was required.
    Expected(&'static str),
    /// Nothing that can start an atom.
    ExpectedAtom,
    /// Nothing that can start a comparison operand.
    ExpectedOperand,
    /// Nothing that can start an expression.
    ExpectedExpression,
    /// Nothing that can start a call's first argument, and no `)`.
    ExpectedArgument,
    /// A complete program was followed by more tokens.
    TrailingInput,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(what) => write!(f, "Expected {what}"),
            Self::ExpectedAtom => {
                write!(f, "Expected number, identifier, 'if', 'for', 'while', 'func'")
            }
            Self::ExpectedOperand => {
                write!(f, "Expected int, float, identifier, '+', '-', '(' or '!'")
            }
            Self::ExpectedExpression => {
                write!(
                    f,
                    "Expected let, if, for, while, func, number or identifier"
                )
            }
            Self::ExpectedArgument => {
                write!(
                    f,
                    "Expected ')', 'let', 'if', 'for', 'while', 'func', int, float, \
                     identifier, '+', '-', '(' or '!'"
                )
            }
            Self::TrailingInput => write!(f, "Expected '+', '-', '*' or '/'"),
        }
    }
}

/// Invalid-syntax error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Invalid Syntax: {kind}{} at {}, line {}, column {}",
    found.as_ref().map_or_else(String::new, |t| format!(", got '{t}'")),
    start.source.name,
    start.line,
    start.column
)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Offending lexeme, `None` at end of input.
    pub found: Option<String>,
    pub start: Position,
    pub end: Position,
}

/// Parse a token stream into a `StatementList` root.
///
/// # Errors
///
/// Returns `ParseError` on any grammar mismatch, including input left
/// over after the last statement.
pub fn parse(tokens: &[Token]) -> Result<Node, ParseError> {
    Parser::new(tokens).parse()
}

/// A failed rule together with how many tokens it consumed before failing.
#[derive(Debug)]
struct Failure {
    error: ParseError,
    advanced: usize,
}

type Rule<'a> = fn(&mut Parser<'a>) -> Result<Node, ParseError>;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    /// Returned by `current` once the slice is exhausted.
    eof: Token,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        let end = tokens.last().map_or_else(
            || Position::start(Arc::default()),
            |last| last.end.clone(),
        );
        Self {
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, end.clone(), end),
        }
    }

    fn parse(mut self) -> Result<Node, ParseError> {
        let root = self.statements()?;
        if self.current().kind != TokenKind::Eof {
            return Err(self.error(ParseErrorKind::TrailingInput));
        }
        Ok(root)
    }

    // -- cursor ----------------------------------------------------------

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn previous_end(&self) -> Option<Position> {
        let index = self.pos.checked_sub(1)?;
        self.tokens.get(index).map(|t| t.end.clone())
    }

    /// Runs `rule`, reporting on failure how far it moved the cursor.
    fn attempt(&mut self, rule: Rule<'a>) -> Result<Node, Failure> {
        let start = self.pos;
        rule(self).map_err(|error| Failure {
            error,
            advanced: self.pos - start,
        })
    }

    /// Replaces a failure with `kind` at the cursor only when the failing
    /// rule consumed nothing; otherwise the deeper error stands.
    fn pin(&self, failure: Failure, kind: ParseErrorKind) -> ParseError {
        if failure.advanced == 0 {
            self.error(kind)
        } else {
            failure.error
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        let token = self.current();
        let found = (token.kind != TokenKind::Eof).then(|| token.lexeme());
        ParseError {
            kind,
            found,
            start: token.start.clone(),
            end: token.end.clone(),
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &'static str) -> Result<Token, ParseError> {
        if self.current().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(ParseErrorKind::Expected(what)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword, what: &'static str) -> Result<Token, ParseError> {
        if self.current().is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.error(ParseErrorKind::Expected(what)))
        }
    }

    fn skip_newlines(&mut self) -> usize {
        let mut count = 0;
        while self.current().kind == TokenKind::Newline {
            self.advance();
            count += 1;
        }
        count
    }

    // -- statements ------------------------------------------------------

    /// `NEWLINE* expression (NEWLINE+ expression)*`
    ///
    /// After a run of newlines the next expression is parsed
    /// speculatively: if it fails without consuming anything the list
    /// ends there, with the cursor still on the token that stopped it.
    fn statements(&mut self) -> Result<Node, ParseError> {
        let start = self.current().start.clone();
        self.skip_newlines();

        let mut statements = vec![self.expression()?];

        while self.skip_newlines() > 0 {
            match self.attempt(Self::expression) {
                Ok(statement) => statements.push(statement),
                Err(failure) if failure.advanced == 0 => break,
                Err(failure) => return Err(failure.error),
            }
        }

        let end = self.previous_end().unwrap_or_else(|| start.clone());
        Ok(Node::StatementList(StatementList {
            statements,
            start,
            end,
        }))
    }

    /// `'{' statements '}'`, returning the body and the end of `}`.
    fn block(&mut self) -> Result<(Node, Position), ParseError> {
        self.expect(TokenKind::LCurl, "'{'")?;
        let body = self.statements()?;
        let close = self.expect(TokenKind::RCurl, "'}'")?;
        Ok((body, close.end))
    }

    // -- expressions -----------------------------------------------------

    fn expression(&mut self) -> Result<Node, ParseError> {
        if self.current().is_keyword(Keyword::Let) {
            let start = self.advance().start;
            let name = self.expect(TokenKind::Identifier, "identifier")?;
            self.expect(TokenKind::Eq, "'='")?;
            let value = self.expression()?;
            return Ok(Node::VarAssign(VarAssign {
                name,
                value: Box::new(value),
                start,
            }));
        }

        self.attempt(Self::logical)
            .map_err(|failure| self.pin(failure, ParseErrorKind::ExpectedExpression))
    }

    fn logical(&mut self) -> Result<Node, ParseError> {
        self.binary_op(Self::comparison, &[TokenKind::And, TokenKind::Or])
    }

    fn comparison(&mut self) -> Result<Node, ParseError> {
        if self.current().kind == TokenKind::Not {
            let op = self.advance();
            let operand = self.comparison()?;
            return Ok(Node::UnaryOp(UnaryOp {
                op,
                operand: Box::new(operand),
            }));
        }

        self.attempt(Self::relational)
            .map_err(|failure| self.pin(failure, ParseErrorKind::ExpectedOperand))
    }

    fn relational(&mut self) -> Result<Node, ParseError> {
        self.binary_op(
            Self::arithmetic,
            &[
                TokenKind::Ee,
                TokenKind::Ne,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Lte,
                TokenKind::Gte,
            ],
        )
    }

    fn arithmetic(&mut self) -> Result<Node, ParseError> {
        self.binary_op(Self::term, &[TokenKind::Plus, TokenKind::Minus])
    }

    fn term(&mut self) -> Result<Node, ParseError> {
        self.binary_op(Self::factor, &[TokenKind::Mul, TokenKind::Div])
    }

    fn factor(&mut self) -> Result<Node, ParseError> {
        if matches!(self.current().kind, TokenKind::Plus | TokenKind::Minus) {
            let op = self.advance();
            let operand = self.factor()?;
            return Ok(Node::UnaryOp(UnaryOp {
                op,
                operand: Box::new(operand),
            }));
        }
        self.call()
    }

    /// Left-associative chain of `operand (op operand)*`.
    fn binary_op(&mut self, operand: Rule<'a>, ops: &[TokenKind]) -> Result<Node, ParseError> {
        let mut left = operand(self)?;

        while ops.contains(&self.current().kind) {
            let op = self.advance();
            let right = operand(self)?;
            left = Node::BinaryOp(BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn call(&mut self) -> Result<Node, ParseError> {
        let atom = self.atom()?;
        if self.current().kind != TokenKind::LParen {
            return Ok(atom);
        }
        self.advance();

        let mut args = Vec::new();
        if self.current().kind != TokenKind::RParen {
            let first = self
                .attempt(Self::expression)
                .map_err(|failure| self.pin(failure, ParseErrorKind::ExpectedArgument))?;
            args.push(first);
            while self.current().kind == TokenKind::Comma {
                self.advance();
                args.push(self.expression()?);
            }
        }
        let close = self.expect(TokenKind::RParen, "',' or ')'")?;

        Ok(Node::Call(Call {
            callee: Box::new(atom),
            args,
            end: close.end,
        }))
    }

    fn atom(&mut self) -> Result<Node, ParseError> {
        let token = self.current();
        match token.kind {
            TokenKind::Int | TokenKind::Float => Ok(Node::Number(self.advance())),
            TokenKind::String => Ok(Node::String(self.advance())),
            TokenKind::Identifier => Ok(Node::VarAccess(self.advance())),
            TokenKind::LParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Keyword => match token.keyword() {
                Some(Keyword::If) => self.if_expr(),
                Some(Keyword::For) => self.for_expr(),
                Some(Keyword::While) => self.while_expr(),
                Some(Keyword::Func) => self.func_def(),
                _ => Err(self.error(ParseErrorKind::ExpectedAtom)),
            },
            _ => Err(self.error(ParseErrorKind::ExpectedAtom)),
        }
    }

    // -- compound expressions --------------------------------------------

    fn if_expr(&mut self) -> Result<Node, ParseError> {
        let start = self.expect_keyword(Keyword::If, "'if'")?.start;
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let (body, mut end) = self.block()?;

        let else_case = if self.current().is_keyword(Keyword::Else) {
            self.advance();
            let (else_body, else_end) = self.block()?;
            end = else_end;
            Some(Box::new(else_body))
        } else {
            None
        };

        Ok(Node::If(If {
            cases: vec![IfCase { condition, body }],
            else_case,
            start,
            end,
        }))
    }

    fn for_expr(&mut self) -> Result<Node, ParseError> {
        let start = self.expect_keyword(Keyword::For, "'for'")?.start;
        self.expect(TokenKind::LParen, "'('")?;

        let init = match self.expression()? {
            Node::VarAssign(assign) => assign,
            other => {
                return Err(ParseError {
                    kind: ParseErrorKind::Expected("'let' assignment"),
                    found: None,
                    start: other.start().clone(),
                    end: other.end().clone(),
                });
            }
        };

        self.expect(TokenKind::Comma, "','")?;
        let condition = self.comparison()?;
        self.expect(TokenKind::Comma, "','")?;
        let update = self.arithmetic()?;
        self.expect(TokenKind::RParen, "')'")?;
        let (body, end) = self.block()?;

        Ok(Node::For(For {
            init,
            condition: Box::new(condition),
            update: Box::new(update),
            body: Box::new(body),
            start,
            end,
        }))
    }

    fn while_expr(&mut self) -> Result<Node, ParseError> {
        let start = self.expect_keyword(Keyword::While, "'while'")?.start;
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RParen, "')'")?;
        let (body, end) = self.block()?;

        Ok(Node::While(While {
            condition: Box::new(condition),
            body: Box::new(body),
            start,
            end,
        }))
    }

    fn func_def(&mut self) -> Result<Node, ParseError> {
        let start = self.expect_keyword(Keyword::Func, "'func'")?.start;
        let name = self.expect(TokenKind::Identifier, "identifier")?;
        self.expect(TokenKind::LParen, "'('")?;

        let mut params = Vec::new();
        if self.current().kind == TokenKind::Identifier {
            params.push(self.advance());
            while self.current().kind == TokenKind::Comma {
                self.advance();
                params.push(self.expect(TokenKind::Identifier, "identifier")?);
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
        } else {
            self.expect(TokenKind::RParen, "identifier or ')'")?;
        }

        let (body, end) = self.block()?;

        Ok(Node::FuncDef(FuncDef {
            name,
            params,
            body: Box::new(body),
            start,
            end,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_input(input: &str) -> Result<Node, ParseError> {
        let tokens = tokenize("<test>", input).expect("tokenize failed");
        parse(&tokens)
    }

    fn statements(node: &Node) -> &[Node] {
        match node {
            Node::StatementList(list) => &list.statements,
            other => panic!("expected statement list, got {other:?}"),
        }
    }

    #[test]
    fn precedence() {
        let root = parse_input("1 + 2 * 3").expect("parse failed");
        let Node::BinaryOp(add) = &statements(&root)[0] else {
            panic!("expected binary op");
        };
        assert_eq!(add.op.kind, TokenKind::Plus);
        assert!(matches!(&*add.right, Node::BinaryOp(mul) if mul.op.kind == TokenKind::Mul));
    }

    #[test]
    fn left_associative() {
        let root = parse_input("1 - 2 - 3").expect("parse failed");
        let Node::BinaryOp(outer) = &statements(&root)[0] else {
            panic!("expected binary op");
        };
        assert!(matches!(&*outer.left, Node::BinaryOp(_)));
        assert!(matches!(&*outer.right, Node::Number(_)));
    }

    #[test]
    fn not_binds_looser_than_comparison() {
        let root = parse_input("!a == b").expect("parse failed");
        let Node::UnaryOp(not) = &statements(&root)[0] else {
            panic!("expected unary op");
        };
        assert_eq!(not.op.kind, TokenKind::Not);
        assert!(matches!(&*not.operand, Node::BinaryOp(_)));
    }

    #[test]
    fn let_is_right_recursive() {
        let root = parse_input("let a = let b = 2").expect("parse failed");
        let Node::VarAssign(a) = &statements(&root)[0] else {
            panic!("expected assignment");
        };
        assert_eq!(a.name(), "a");
        assert!(matches!(&*a.value, Node::VarAssign(b) if b.name() == "b"));
    }

    #[test]
    fn if_with_else() {
        let root = parse_input("if (a) { 1 } else { 2 }").expect("parse failed");
        let Node::If(node) = &statements(&root)[0] else {
            panic!("expected if");
        };
        assert_eq!(node.cases.len(), 1);
        assert!(node.else_case.is_some());
        assert_eq!(node.end.index, 23);
    }

    #[test]
    fn call_arguments() {
        let root = parse_input("f(1, g(), x)").expect("parse failed");
        let Node::Call(call) = &statements(&root)[0] else {
            panic!("expected call");
        };
        assert_eq!(call.callee.name(), Some("f"));
        assert_eq!(call.args.len(), 3);
        assert!(matches!(&call.args[1], Node::Call(inner) if inner.args.is_empty()));
    }

    #[test]
    fn for_requires_assignment() {
        let err = parse_input("for (i, i < 3, i + 1) { i }").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Expected("'let' assignment"));
        assert_eq!(err.start.index, 5);
    }

    #[test]
    fn func_without_params() {
        let root = parse_input("func main() { 0 }").expect("parse failed");
        let Node::FuncDef(def) = &statements(&root)[0] else {
            panic!("expected func def");
        };
        assert_eq!(def.name(), "main");
        assert!(def.params.is_empty());
    }

    #[test]
    fn trailing_token() {
        let err = parse_input("1 2").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::TrailingInput);
        assert_eq!(err.found.as_deref(), Some("2"));
    }

    #[test]
    fn unconsumed_failure_is_generalised() {
        let err = parse_input(")").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
    }

    #[test]
    fn deep_error_is_pinned() {
        // `(` is consumed before the failure, so the atom-level error wins.
        let err = parse_input("(1 +").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedAtom);
        assert_eq!(err.found, None);
    }

    #[test]
    fn rewind_after_newline() {
        let root = parse_input("if (a) { 1\n}").expect("parse failed");
        let Node::If(node) = &statements(&root)[0] else {
            panic!("expected if");
        };
        // the body list ends after the newline, right before `}`
        assert_eq!(node.cases[0].body.end().index, 11);
    }

    #[test]
    fn missing_first_argument() {
        let err = parse_input("f(,)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedArgument);
        assert_eq!(err.found.as_deref(), Some(","));
        assert_eq!(err.start.index, 2);
    }

    #[test]
    fn bad_first_argument_keeps_deep_error() {
        let err = parse_input("f((1 +)").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedAtom);
        assert_eq!(err.found.as_deref(), Some(")"));
    }

    #[test]
    fn empty_token_slice() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::ExpectedExpression);
    }
}
