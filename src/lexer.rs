use std::fmt;
use std::sync::Arc;

use crate::token::{Keyword, Position, Source, Token, TokenKind, Value};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    IllegalCharacter(char),
    /// Two-character operator missing its second character (`&&`, `||`).
    ExpectedCharacter { expected: char, after: char },
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IllegalCharacter(ch) => {
                write!(f, "Illegal Character: '{ch}'")
            }
            Self::ExpectedCharacter { expected, after } => {
                write!(f, "Expected Character: '{expected}' (after '{after}')")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{kind} at {}, line {}, column {}",
    start.source.name,
    start.line,
    start.column
)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub start: Position,
    pub end: Position,
}

/// Tokenize `text` into a sequence of tokens ending with one `Eof`.
///
/// `source_name` labels positions (a file path or `<stdin>`).
///
/// # Errors
///
/// Returns `LexError` on an illegal character or a lone `&` or `|`.
pub fn tokenize(source_name: &str, text: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(Source::new(source_name, text)).tokenize()
}

struct Lexer {
    source: Arc<Source>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    const fn new(source: Arc<Source>) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => self.advance(),
                ';' | '\n' => tokens.push(self.single(TokenKind::Newline)),
                '0'..='9' => tokens.push(self.read_number()),
                '.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                    tokens.push(self.read_number());
                }
                c if c.is_ascii_alphabetic() => tokens.push(self.read_identifier()),
                '"' => tokens.push(self.read_string()),
                '+' => tokens.push(self.single(TokenKind::Plus)),
                '-' => tokens.push(self.single(TokenKind::Minus)),
                '*' => tokens.push(self.single(TokenKind::Mul)),
                '/' => tokens.push(self.single(TokenKind::Div)),
                '(' => tokens.push(self.single(TokenKind::LParen)),
                ')' => tokens.push(self.single(TokenKind::RParen)),
                '{' => tokens.push(self.single(TokenKind::LCurl)),
                '}' => tokens.push(self.single(TokenKind::RCurl)),
                ',' => tokens.push(self.single(TokenKind::Comma)),
                '!' => tokens.push(self.read_pair(TokenKind::Not, TokenKind::Ne)),
                '=' => tokens.push(self.read_pair(TokenKind::Eq, TokenKind::Ee)),
                '<' => tokens.push(self.read_pair(TokenKind::Lt, TokenKind::Lte)),
                '>' => tokens.push(self.read_pair(TokenKind::Gt, TokenKind::Gte)),
                '&' => tokens.push(self.read_doubled('&', TokenKind::And)?),
                '|' => tokens.push(self.read_doubled('|', TokenKind::Or)?),
                other => {
                    let start = self.position();
                    self.advance();
                    return Err(LexError {
                        kind: LexErrorKind::IllegalCharacter(other),
                        start,
                        end: self.position(),
                    });
                }
            }
        }

        let end = self.position();
        tokens.push(Token::new(TokenKind::Eof, end.clone(), end));
        Ok(tokens)
    }

    fn position(&self) -> Position {
        Position {
            index: self.pos,
            line: self.line,
            column: self.col,
            source: Arc::clone(&self.source),
        }
    }

    fn peek(&self) -> Option<char> {
        self.source.text[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.source.text[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let start = self.position();
        self.advance();
        Token::new(kind, start, self.position())
    }

    /// `=`-suffixed operators: `!`/`!=`, `=`/`==`, `<`/`<=`, `>`/`>=`.
    fn read_pair(&mut self, alone: TokenKind, with_eq: TokenKind) -> Token {
        let start = self.position();
        self.advance();

        let kind = if self.peek() == Some('=') {
            self.advance();
            with_eq
        } else {
            alone
        };

        Token::new(kind, start, self.position())
    }

    fn read_doubled(&mut self, ch: char, kind: TokenKind) -> Result<Token, LexError> {
        let start = self.position();
        self.advance();

        if self.peek() == Some(ch) {
            self.advance();
            return Ok(Token::new(kind, start, self.position()));
        }

        // span covers the character that should have been `ch`
        self.advance();
        Err(LexError {
            kind: LexErrorKind::ExpectedCharacter {
                expected: ch,
                after: ch,
            },
            start,
            end: self.position(),
        })
    }

    fn read_number(&mut self) -> Token {
        let start = self.position();
        let begin = self.pos;
        let mut seen_dot = false;

        while let Some(ch) = self.peek() {
            match ch {
                '0'..='9' => self.advance(),
                '.' if !seen_dot => {
                    seen_dot = true;
                    self.advance();
                }
                _ => break,
            }
        }

        let literal = &self.source.text[begin..self.pos];
        let end = self.position();

        if seen_dot {
            // `1.` and `.5` are both valid `f64` syntax.
            let value = literal.parse::<f64>().unwrap_or_default();
            return Token::with_value(TokenKind::Float, Value::Float(value), start, end);
        }

        // Any run of digits is an integer; only its storage depends on width.
        let value = literal
            .parse::<i64>()
            .map_or_else(|_| Value::WideInt(literal.to_string()), Value::Int);
        Token::with_value(TokenKind::Int, value, start, end)
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.position();
        let begin = self.pos;

        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }

        let word = self.source.text[begin..self.pos].to_string();
        let kind = if Keyword::lookup(&word).is_some() {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Token::with_value(kind, Value::Text(word), start, self.position())
    }

    /// Reads a double-quoted string. An unterminated string runs to
    /// end of input and is still accepted.
    fn read_string(&mut self) -> Token {
        let start = self.position();
        self.advance(); // skip opening quote

        let mut value = String::new();
        while let Some(ch) = self.peek() {
            match ch {
                '"' => break,
                '\\' => {
                    self.advance();
                    match self.peek() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(other) => value.push(other),
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    value.push(ch);
                    self.advance();
                }
            }
        }

        self.advance(); // skip closing quote, no-op at end of input
        Token::with_value(TokenKind::String, Value::Text(value), start, self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize("<test>", input)
            .expect("should tokenize")
            .iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        let tokens = tokenize("<test>", "").expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokens[0].start.index, 0);
    }

    #[test]
    fn let_statement() {
        assert_eq!(
            kinds("let x = 1 + 2"),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::Int,
                TokenKind::Plus,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn semicolon_and_newline_separate_statements() {
        assert_eq!(
            kinds("a;b\nc"),
            vec![
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn second_dot_ends_number() {
        let tokens = tokenize("<test>", "1.2.3").expect("should tokenize");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].value, Some(Value::Float(1.2)));
        assert_eq!(tokens[1].kind, TokenKind::Float);
        assert_eq!(tokens[1].value, Some(Value::Float(0.3)));
        assert_eq!(tokens[2].kind, TokenKind::Eof);
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![
                TokenKind::Not,
                TokenKind::Ne,
                TokenKind::Eq,
                TokenKind::Ee,
                TokenKind::Lt,
                TokenKind::Lte,
                TokenKind::Gt,
                TokenKind::Gte,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lone_ampersand() {
        let err = tokenize("<test>", "a & b").unwrap_err();
        assert_eq!(
            err.kind,
            LexErrorKind::ExpectedCharacter {
                expected: '&',
                after: '&'
            }
        );
        assert_eq!(err.start.column, 3);
        assert_eq!(err.end.column, 5);
    }

    #[test]
    fn string_escapes() {
        let tokens = tokenize("<test>", r#""a\tb\nc\\d\"e""#).expect("should tokenize");
        assert_eq!(tokens[0].text(), Some("a\tb\nc\\d\"e"));
    }

    #[test]
    fn unterminated_string_runs_to_end() {
        let tokens = tokenize("<test>", "\"abc").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text(), Some("abc"));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn illegal_character() {
        let err = tokenize("<test>", "let x = 1 # 2").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::IllegalCharacter('#'));
        assert_eq!(err.start.index, 10);
        assert_eq!(err.end.index, 11);
    }

    #[test]
    fn integer_wider_than_i64() {
        let tokens = tokenize("<test>", "99999999999999999999").expect("should tokenize");
        assert_eq!(tokens[0].kind, TokenKind::Int);
        assert_eq!(
            tokens[0].value,
            Some(Value::WideInt("99999999999999999999".to_string()))
        );
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn i64_max_still_fits() {
        let tokens = tokenize("<test>", "9223372036854775807").expect("should tokenize");
        assert_eq!(tokens[0].value, Some(Value::Int(i64::MAX)));
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("<test>", "a\n  bc").expect("should tokenize");
        assert_eq!((tokens[0].start.line, tokens[0].start.column), (1, 1));
        assert_eq!((tokens[2].start.line, tokens[2].start.column), (2, 3));
        assert_eq!(tokens[2].end.column, 5);
        assert_eq!(tokens[3].start.index, 6);
    }
}
