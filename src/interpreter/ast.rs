use std::fmt::{Debug, Display, Formatter};
use crate::interpreter::lexer::TokenType;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add, Subtract,
    Multiply, Divide,

    Greater, Less,
    GreaterEqual, LessEqual,
    Equal, NotEqual,
}

impl Operator {
    pub fn from_token_type(token_type: TokenType) -> Option<Operator> {
        match token_type {
            TokenType::Plus => Some(Operator::Add),
            TokenType::Minus => Some(Operator::Subtract),
            TokenType::Multiply => Some(Operator::Multiply),
            TokenType::Divide => Some(Operator::Divide),
            TokenType::Greater => Some(Operator::Greater),
            TokenType::Less => Some(Operator::Less),
            TokenType::GreaterEqual => Some(Operator::GreaterEqual),
            TokenType::LessEqual => Some(Operator::LessEqual),
            TokenType::Equal => Some(Operator::Equal),
            TokenType::NotEqual => Some(Operator::NotEqual),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::GreaterEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Expr {
    ConstantInt(i64),
    Variable(String),

    BinaryOperator {
        left: Box<Expr>,
        operator: Operator,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, operator: Operator, right: Expr) -> Expr {
        Expr::BinaryOperator { left: Box::new(left), operator, right: Box::new(right) }
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::ConstantInt(value) => write!(f, "{}", value),
            Expr::Variable(name) => write!(f, "{}", name),
            Expr::BinaryOperator { left, operator, right } => write!(f, "({:?} {} {:?})", left, operator, right),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum Stmt {
    Assign {
        name: String,
        expr: Expr,
    },
    Print(Expr),

    If {
        condition: Expr,
        then: Vec<Stmt>,
        otherwise: Vec<Stmt>, // Empty when there is no `else`
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
}

fn block_to_string(statements: &[Stmt]) -> String {
    statements.iter().map(|stmt| format!("{:?}", stmt)).collect::<Vec<String>>().join("; ")
}

impl Debug for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Assign { name, expr } => write!(f, "{} = {:?}", name, expr),
            Stmt::Print(expr) => write!(f, "print {:?}", expr),
            Stmt::If { condition, then, otherwise } if otherwise.is_empty() =>
                write!(f, "if {:?} {{ {} }}", condition, block_to_string(then)),
            Stmt::If { condition, then, otherwise } =>
                write!(f, "if {:?} {{ {} }} else {{ {} }}", condition, block_to_string(then), block_to_string(otherwise)),
            Stmt::While { condition, body } => write!(f, "while {:?} {{ {} }}", condition, block_to_string(body)),
        }
    }
}
