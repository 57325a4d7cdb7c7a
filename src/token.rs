use std::fmt;
use std::sync::Arc;

/// A named piece of source text (a file or a REPL line).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub text: String,
}

impl Source {
    #[must_use]
    pub fn new(name: &str, text: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            text: text.to_string(),
        })
    }
}

/// Source location: byte index plus 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub index: usize,
    pub line: usize,
    pub column: usize,
    pub source: Arc<Source>,
}

impl Position {
    /// First character of `source`.
    #[must_use]
    pub const fn start(source: Arc<Source>) -> Self {
        Self {
            index: 0,
            line: 1,
            column: 1,
            source,
        }
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Int,
    Float,
    String,
    Identifier,
    Keyword,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `=` (assignment)
    Eq,
    /// `==`
    Ee,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LCurl,
    /// `}`
    RCurl,
    /// `,`
    Comma,
    /// `!`
    Not,
    /// `&&`
    And,
    /// `||`
    Or,
    /// Statement separator: newline or `;`.
    Newline,
    Eof,
}

impl TokenKind {
    /// Source spelling of fixed-text tokens.
    #[must_use]
    pub const fn symbol(self) -> Option<&'static str> {
        let s = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "=",
            Self::Ee => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Lte => "<=",
            Self::Gte => ">=",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LCurl => "{",
            Self::RCurl => "}",
            Self::Comma => ",",
            Self::Not => "!",
            Self::And => "&&",
            Self::Or => "||",
            Self::Newline => "newline",
            Self::Eof => "end of input",
            Self::Int | Self::Float | Self::String | Self::Identifier | Self::Keyword => {
                return None;
            }
        };
        Some(s)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::String => "STRING",
            Self::Identifier => "IDENTIFIER",
            Self::Keyword => "KEYWORD",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Mul => "MUL",
            Self::Div => "DIV",
            Self::Eq => "EQ",
            Self::Ee => "EE",
            Self::Ne => "NE",
            Self::Lt => "LT",
            Self::Gt => "GT",
            Self::Lte => "LTE",
            Self::Gte => "GTE",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LCurl => "LCURL",
            Self::RCurl => "RCURL",
            Self::Comma => "COMMA",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Newline => "NEWLINE",
            Self::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// Reserved words. Lexed as `TokenKind::Keyword` with the word as text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Let,
    If,
    Else,
    While,
    For,
    Func,
}

/// The fixed keyword table.
pub const KEYWORDS: [Keyword; 6] = [
    Keyword::Let,
    Keyword::If,
    Keyword::Else,
    Keyword::While,
    Keyword::For,
    Keyword::Func,
];

impl Keyword {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::If => "if",
            Self::Else => "else",
            Self::While => "while",
            Self::For => "for",
            Self::Func => "func",
        }
    }

    #[must_use]
    pub fn lookup(word: &str) -> Option<Self> {
        KEYWORDS.into_iter().find(|kw| kw.as_str() == word)
    }
}

/// Literal payload carried by value-bearing tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    /// Integer literal too wide for `i64`, kept as its digits.
    WideInt(String),
    Float(f64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::WideInt(digits) => f.write_str(digits),
            // Debug keeps the fractional part: `1.0`, not `1`.
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A single token with its kind, optional value, and source span.
///
/// Grammar decisions only look at kind and value; see [`Token::matches`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<Value>,
    pub start: Position,
    pub end: Position,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, start: Position, end: Position) -> Self {
        Self {
            kind,
            value: None,
            start,
            end,
        }
    }

    #[must_use]
    pub const fn with_value(kind: TokenKind, value: Value, start: Position, end: Position) -> Self {
        Self {
            kind,
            value: Some(value),
            start,
            end,
        }
    }

    /// Content equality, ignoring position.
    #[must_use]
    pub fn matches(&self, kind: TokenKind, value: Option<&Value>) -> bool {
        self.kind == kind && self.value.as_ref() == value
    }

    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.keyword() == Some(keyword)
    }

    #[must_use]
    pub fn keyword(&self) -> Option<Keyword> {
        if self.kind == TokenKind::Keyword {
            self.text().and_then(Keyword::lookup)
        } else {
            None
        }
    }

    /// Text payload of identifiers, keywords, and strings.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// How the token reads in source, for error messages.
    #[must_use]
    pub fn lexeme(&self) -> String {
        match (&self.value, self.kind) {
            (Some(Value::Text(s)), TokenKind::String) => format!("\"{s}\""),
            (Some(value), _) => value.to_string(),
            (None, kind) => kind.symbol().map_or_else(|| kind.to_string(), str::to_string),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{value}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}
