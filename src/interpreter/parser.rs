use std::num::ParseIntError;
use thiserror::Error;
use crate::interpreter::ast::{Expr, Operator, Stmt};
use crate::interpreter::lexer::{Lexer, LexerError, Token, TokenPos, TokenType};

#[cfg(test)]
mod tests;

// Additive and comparison operators deliberately share one precedence level
const EXPRESSION_OPERATORS: [Operator; 8] = [
    Operator::Add, Operator::Subtract,
    Operator::Greater, Operator::Less,
    Operator::GreaterEqual, Operator::LessEqual,
    Operator::Equal, Operator::NotEqual,
];

const TERM_OPERATORS: [Operator; 2] = [Operator::Multiply, Operator::Divide];

// Bounds both the height of an expression tree and the nesting of parentheses
// and blocks, so that parsing, evaluation and drop all stay within the stack
pub const MAX_DEPTH: usize = 256;

// An expression together with its height
type Parsed = (Expr, usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("{pos} Expected {expected} {context}, found {found}")]
    ExpectedToken {
        pos: TokenPos,
        expected: TokenType,
        context: &'static str,
        found: String,
    },
    #[error("{pos} Expected statement, found {found}")]
    ExpectedStatement {
        pos: TokenPos,
        found: String,
    },
    #[error("{pos} Expected expression, found {found}")]
    ExpectedExpression {
        pos: TokenPos,
        found: String,
    },
    #[error("{pos} Failed to parse int literal `{literal}`: {source}")]
    InvalidInt {
        pos: TokenPos,
        literal: String,
        source: ParseIntError,
    },
    #[error("{pos} Program nests too deeply (limit is {})", MAX_DEPTH)]
    TooDeep {
        pos: TokenPos,
    },
}

impl ParseError {
    pub fn pos(&self) -> TokenPos {
        match self {
            ParseError::Lexer(err) => err.pos(),
            ParseError::ExpectedToken { pos, .. } => *pos,
            ParseError::ExpectedStatement { pos, .. } => *pos,
            ParseError::ExpectedExpression { pos, .. } => *pos,
            ParseError::InvalidInt { pos, .. } => *pos,
            ParseError::TooDeep { pos } => *pos,
        }
    }
}

pub type ParserResult<T> = Result<T, ParseError>;

/// Recursive-descent parser with a single token of lookahead.
///
/// Tokens are pulled from the [`Lexer`] only as the lookahead is refilled;
/// the parser never backtracks.
pub struct Parser<'source> {
    lexer: Lexer<'source>,
    previous: Token, current: Token,

    nesting: usize,
}

impl<'source> Parser<'source> {
    pub fn new(lexer: Lexer<'source>) -> Parser<'source> {
        Parser {
            lexer,
            previous: Token::eof(TokenPos::begin()), current: Token::eof(TokenPos::begin()),
            nesting: 0,
        }
    }

    // Statement parsing

    pub fn parse_program(&mut self) -> ParserResult<Vec<Stmt>> {
        self.consume()?;

        let statements = self.parse_block(&[])?;
        tracing::trace!(count = statements.len(), "parsed program");

        Ok(statements)
    }

    /// Parses statements until end of input or one of `terminators`, which is
    /// left in the lookahead for the caller.
    fn parse_block(&mut self, terminators: &[TokenType]) -> ParserResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        loop {
            self.skip_separators()?;

            if self.is_eof() || terminators.contains(&self.current.token_type()) {
                return Ok(statements);
            }

            statements.push(self.parse_statement()?);
        }
    }

    fn parse_statement(&mut self) -> ParserResult<Stmt> {
        let stmt = if self.matches(TokenType::Identifier)? {
            self.parse_assignment()?
        } else if self.matches(TokenType::Print)? {
            Stmt::Print(self.parse_expression()?.0)
        } else if self.matches(TokenType::If)? {
            self.parse_if_statement()?
        } else if self.matches(TokenType::While)? {
            self.parse_while_statement()?
        } else {
            return Err(ParseError::ExpectedStatement { pos: *self.current.start(), found: self.current.to_string() });
        };

        tracing::trace!(statement = ?stmt, "parsed statement");
        Ok(stmt)
    }

    fn parse_assignment(&mut self) -> ParserResult<Stmt> {
        let name = self.previous.source().to_owned();

        self.expect(TokenType::Assign, "after variable name")?;
        let (expr, _) = self.parse_expression()?;

        Ok(Stmt::Assign { name, expr })
    }

    fn parse_if_statement(&mut self) -> ParserResult<Stmt> {
        let (condition, _) = self.parse_expression()?;

        self.enter_nesting()?;
        let then = self.parse_block(&[TokenType::Else, TokenType::End])?;

        let otherwise = if self.matches(TokenType::Else)? {
            self.parse_block(&[TokenType::End])?
        } else {
            Vec::new()
        };
        self.nesting -= 1;

        self.expect(TokenType::End, "to close 'if' block")?;
        Ok(Stmt::If { condition, then, otherwise })
    }

    fn parse_while_statement(&mut self) -> ParserResult<Stmt> {
        let (condition, _) = self.parse_expression()?;

        self.enter_nesting()?;
        let body = self.parse_block(&[TokenType::End])?;
        self.nesting -= 1;

        self.expect(TokenType::End, "to close 'while' block")?;
        Ok(Stmt::While { condition, body })
    }

    // Expression parsing

    fn parse_expression(&mut self) -> ParserResult<Parsed> {
        let (mut expr, mut height) = self.parse_term()?;

        while let Some(operator) = self.matches_operator(&EXPRESSION_OPERATORS)? {
            let (right, right_height) = self.parse_term()?;
            height = self.grow(height, right_height)?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok((expr, height))
    }

    fn parse_term(&mut self) -> ParserResult<Parsed> {
        let (mut expr, mut height) = self.parse_factor()?;

        while let Some(operator) = self.matches_operator(&TERM_OPERATORS)? {
            let (right, right_height) = self.parse_factor()?;
            height = self.grow(height, right_height)?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok((expr, height))
    }

    fn parse_factor(&mut self) -> ParserResult<Parsed> {
        if self.matches(TokenType::Int)? {
            let number = &self.previous;

            return number.source().parse().map(|value| (Expr::ConstantInt(value), 0)).map_err(|source| ParseError::InvalidInt {
                pos: *number.start(),
                literal: number.source().to_owned(),
                source,
            });
        } else if self.matches(TokenType::Identifier)? {
            return Ok((Expr::Variable(self.previous.source().to_owned()), 0));
        } else if self.matches(TokenType::ParenthesisLeft)? {
            self.enter_nesting()?;
            let parsed = self.parse_expression()?;
            self.nesting -= 1;

            self.expect(TokenType::ParenthesisRight, "after expression")?;
            return Ok(parsed);
        }

        Err(ParseError::ExpectedExpression { pos: *self.current.start(), found: self.current.to_string() })
    }

    // Depth limits

    fn grow(&self, left: usize, right: usize) -> ParserResult<usize> {
        let height = left.max(right) + 1;

        if height > MAX_DEPTH {
            return Err(ParseError::TooDeep { pos: *self.previous.start() });
        }

        Ok(height)
    }

    fn enter_nesting(&mut self) -> ParserResult<()> {
        self.nesting += 1;

        if self.nesting > MAX_DEPTH {
            return Err(ParseError::TooDeep { pos: *self.previous.start() });
        }

        Ok(())
    }

    // Token handling

    fn consume(&mut self) -> ParserResult<()> {
        let next = self.lexer.scan_token()?;
        self.previous = std::mem::replace(&mut self.current, next);

        Ok(())
    }

    fn expect(&mut self, token_type: TokenType, context: &'static str) -> ParserResult<()> {
        if self.check(token_type) {
            return self.consume();
        }

        Err(ParseError::ExpectedToken {
            pos: *self.current.start(),
            expected: token_type,
            context,
            found: self.current.to_string(),
        })
    }

    fn matches(&mut self, token_type: TokenType) -> ParserResult<bool> { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return Ok(false);
        }

        self.consume()?;
        Ok(true)
    }

    fn matches_operator(&mut self, operators: &[Operator]) -> ParserResult<Option<Operator>> {
        match Operator::from_token_type(self.current.token_type()) {
            Some(operator) if operators.contains(&operator) => {
                self.consume()?;
                Ok(Some(operator))
            },
            _ => Ok(None),
        }
    }

    fn skip_separators(&mut self) -> ParserResult<()> {
        while self.matches(TokenType::Semicolon)? {}
        Ok(())
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current.token_type() == token_type
    }

    fn is_eof(&self) -> bool {
        self.current.token_type() == TokenType::Eof
    }
}

/// Parses a complete program out of `source`.
pub fn parse(source: &str) -> ParserResult<Vec<Stmt>> {
    Parser::new(Lexer::new(source)).parse_program()
}
