use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::Chars;
use lazy_static::lazy_static;
use thiserror::Error;
use crate::util;


#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenPos {
    pub line: u32,
    pub column: u32,
}

impl TokenPos {
    pub fn new(line: u32, column: u32) -> TokenPos {
        TokenPos { line, column }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(1, 1)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[line {} column {}]", self.line, self.column)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    ParenthesisLeft, ParenthesisRight,
    Semicolon,

    Assign, Equal,
    NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide,

    Identifier,
    Int,

    // Keywords
    Print,
    If, Else, End,
    While,

    Eof,
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TokenType::ParenthesisLeft => "'('",
            TokenType::ParenthesisRight => "')'",
            TokenType::Semicolon => "';'",
            TokenType::Assign => "'='",
            TokenType::Equal => "'=='",
            TokenType::NotEqual => "'!='",
            TokenType::Greater => "'>'",
            TokenType::GreaterEqual => "'>='",
            TokenType::Less => "'<'",
            TokenType::LessEqual => "'<='",
            TokenType::Plus => "'+'",
            TokenType::Minus => "'-'",
            TokenType::Multiply => "'*'",
            TokenType::Divide => "'/'",
            TokenType::Identifier => "identifier",
            TokenType::Int => "integer",
            TokenType::Print => "'print'",
            TokenType::If => "'if'",
            TokenType::Else => "'else'",
            TokenType::End => "'end'",
            TokenType::While => "'while'",
            TokenType::Eof => "end of input",
        })
    }
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("print", TokenType::Print),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("end", TokenType::End),
        ("while", TokenType::While),
    ]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn eof(pos: TokenPos) -> Token {
        Token::new(TokenType::Eof, String::new(), pos, pos)
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("end of input"),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    #[error("{0} Unexpected end of input")]
    UnexpectedEof(TokenPos),

    #[error("{0} Unexpected character '{1}'")]
    UnexpectedCharacter(TokenPos, char),
    #[error("{pos} Unexpected character; expected '{expected}', got '{got}'")]
    ExpectedCharacter {
        pos: TokenPos,
        expected: char,
        got: char,
    },
}

impl LexerError {
    pub fn pos(&self) -> TokenPos {
        match self {
            LexerError::UnexpectedEof(pos) => *pos,
            LexerError::UnexpectedCharacter(pos, _) => *pos,
            LexerError::ExpectedCharacter { pos, .. } => *pos,
        }
    }
}

pub type LexerResult<T> = Result<T, LexerError>;

/// Scans tokens out of a source string on demand.
///
/// Every call to [`Lexer::scan_token`] yields exactly one token. Once the input
/// is exhausted, every further call yields another [`TokenType::Eof`] token at
/// the same position.
pub struct Lexer<'source> {
    input: &'source str,

    chars: Chars<'source>,
    peeked: Option<char>,

    // Byte offsets into `input`
    start_index: usize,
    current_index: usize,

    start_pos: TokenPos,
    current_pos: TokenPos,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,

            chars: source.chars(),
            peeked: None,

            start_index: 0,
            current_index: 0,

            start_pos: TokenPos::begin(),
            current_pos: TokenPos::begin(),
        }
    }

    pub fn scan_token(&mut self) -> LexerResult<Token> {
        self.skip_whitespace();
        self.start_index = self.current_index;
        self.start_pos = self.current_pos;

        let c = match self.consume() {
            Some(c) => c,
            None => return Ok(self.make_token(TokenType::Eof)),
        };

        match c {
            '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
            ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
            ';' => Ok(self.make_token(TokenType::Semicolon)),

            '+' => Ok(self.make_token(TokenType::Plus)),
            '-' => Ok(self.make_token(TokenType::Minus)),
            '*' => Ok(self.make_token(TokenType::Multiply)),
            '/' => Ok(self.make_token(TokenType::Divide)),

            '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                self.make_token(TokenType::Assign)
            }),
            '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                self.make_token(TokenType::Greater)
            }),
            '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                self.make_token(TokenType::Less)
            }),
            // `!` only exists as the first half of `!=`
            '!' => match self.peek() {
                Some('=') => {
                    self.consume();
                    Ok(self.make_token(TokenType::NotEqual))
                },
                Some(got) => Err(LexerError::ExpectedCharacter { pos: self.current_pos, expected: '=', got }),
                None => Err(LexerError::UnexpectedEof(self.current_pos)),
            },

            c if util::is_numeric(c) => Ok(self.scan_number()),
            c if util::is_alphabetic(c) => Ok(self.scan_identifier()),

            _ => Err(LexerError::UnexpectedCharacter(self.start_pos, c)),
        }
    }

    fn scan_number(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_numeric(c) {
                break;
            }

            self.consume();
        }

        self.make_token(TokenType::Int)
    }

    fn scan_identifier(&mut self) -> Token {
        while let Some(c) = self.peek() {
            if !util::is_alphanumeric(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        self.make_token(token_type)
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos, end: self.current_pos,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peeked.take().or_else(|| self.chars.next())?;
        self.current_index += c.len_utf8();

        if c == '\n' {
            self.current_pos.line += 1;
            self.current_pos.column = 1;
        } else {
            self.current_pos.column += 1;
        }

        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        if self.peeked.is_none() {
            self.peeked = self.chars.next();
        }

        self.peeked
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }
}

/// Scans the whole input, including the trailing [`TokenType::Eof`] token.
pub fn tokenize(source: &str) -> LexerResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.scan_token()?;
        let eof = token.token_type() == TokenType::Eof;
        tokens.push(token);

        if eof {
            return Ok(tokens);
        }
    }
}
