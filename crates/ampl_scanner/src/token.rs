//! Tokens produced by the scanner.

use ampl_core::text::SourcePos;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    // Literals and names
    Id,
    Num,
    Str,
    Eof,

    // Punctuation
    Arrow,
    Colon,
    Comma,
    DotDot,
    Semicolon,
    LBrack,
    RBrack,
    LParen,
    RParen,

    // Operators
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    Minus,
    Plus,
    Mul,
    Div,

    // Reserved words
    And,
    Array,
    Bool,
    Chillax,
    Elif,
    Else,
    End,
    False,
    If,
    Input,
    Int,
    Let,
    Main,
    Not,
    Or,
    Output,
    Program,
    Rem,
    Return,
    True,
    While,
}

/// Reserved words, sorted by spelling for binary search.
pub const RESERVED_WORDS: [(&str, TokenKind); 21] = [
    ("and", TokenKind::And),
    ("array", TokenKind::Array),
    ("bool", TokenKind::Bool),
    ("chillax", TokenKind::Chillax),
    ("elif", TokenKind::Elif),
    ("else", TokenKind::Else),
    ("end", TokenKind::End),
    ("false", TokenKind::False),
    ("if", TokenKind::If),
    ("input", TokenKind::Input),
    ("int", TokenKind::Int),
    ("let", TokenKind::Let),
    ("main", TokenKind::Main),
    ("not", TokenKind::Not),
    ("or", TokenKind::Or),
    ("output", TokenKind::Output),
    ("program", TokenKind::Program),
    ("rem", TokenKind::Rem),
    ("return", TokenKind::Return),
    ("true", TokenKind::True),
    ("while", TokenKind::While),
];

impl TokenKind {
    /// Look up a reserved word. Matching is case-sensitive.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        RESERVED_WORDS
            .binary_search_by(|(word, _)| (*word).cmp(text))
            .ok()
            .map(|index| RESERVED_WORDS[index].1)
    }

    /// Whether this kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        self >= TokenKind::And
    }

    /// Whether tokens of this kind carry a payload.
    pub fn has_payload(self) -> bool {
        matches!(self, TokenKind::Id | TokenKind::Num | TokenKind::Str)
    }

    /// A human-readable description, as used in parser diagnostics
    /// ("expected 'end', but found identifier").
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Id => "identifier",
            TokenKind::Num => "number",
            TokenKind::Str => "string",
            TokenKind::Eof => "end-of-file",
            TokenKind::Arrow => "'->'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
            TokenKind::DotDot => "'..'",
            TokenKind::Semicolon => "';'",
            TokenKind::LBrack => "'['",
            TokenKind::RBrack => "']'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Eq => "'='",
            TokenKind::Ne => "'/='",
            TokenKind::Ge => "'>='",
            TokenKind::Gt => "'>'",
            TokenKind::Le => "'<='",
            TokenKind::Lt => "'<'",
            TokenKind::Minus => "'-'",
            TokenKind::Plus => "'+'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::And => "'and'",
            TokenKind::Array => "'array'",
            TokenKind::Bool => "'bool'",
            TokenKind::Chillax => "'chillax'",
            TokenKind::Elif => "'elif'",
            TokenKind::Else => "'else'",
            TokenKind::End => "'end'",
            TokenKind::False => "'false'",
            TokenKind::If => "'if'",
            TokenKind::Input => "'input'",
            TokenKind::Int => "'int'",
            TokenKind::Let => "'let'",
            TokenKind::Main => "'main'",
            TokenKind::Not => "'not'",
            TokenKind::Or => "'or'",
            TokenKind::Output => "'output'",
            TokenKind::Program => "'program'",
            TokenKind::Rem => "'rem'",
            TokenKind::Return => "'return'",
            TokenKind::True => "'true'",
            TokenKind::While => "'while'",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// The payload of a token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenValue {
    #[default]
    None,
    /// Value of a numeric literal.
    Number(i32),
    /// Text of an identifier or string literal.
    Text(String),
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Literal value or identifier text, if any.
    pub value: TokenValue,
    /// Position of the first character of the lexeme.
    pub pos: SourcePos,
}

impl Token {
    pub fn new(kind: TokenKind, pos: SourcePos) -> Self {
        Self {
            kind,
            value: TokenValue::None,
            pos,
        }
    }

    pub fn with_number(mut self, value: i32) -> Self {
        self.value = TokenValue::Number(value);
        self
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.value = TokenValue::Text(text);
        self
    }

    /// The value of a numeric literal.
    pub fn number(&self) -> Option<i32> {
        match self.value {
            TokenValue::Number(value) => Some(value),
            _ => None,
        }
    }

    /// The text of an identifier or string literal.
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Take ownership of the text payload.
    pub fn into_text(self) -> Option<String> {
        match self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::None => write!(f, "{}", self.kind),
            TokenValue::Number(value) => write!(f, "{} {}", self.kind, value),
            TokenValue::Text(text) if self.kind == TokenKind::Str => {
                write!(f, "{} {:?}", self.kind, text)
            }
            TokenValue::Text(text) => write!(f, "{} {}", self.kind, text),
        }
    }
}
