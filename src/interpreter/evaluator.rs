use std::io::Write;
use thiserror::Error;
use crate::interpreter::ast::{Expr, Operator, Stmt};
use crate::interpreter::environment::Environment;


#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        name: String,
    },

    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow in `{left} {operator} {right}`")]
    Overflow {
        left: i64,
        operator: Operator,
        right: i64,
    },

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, RuntimeError::DivisionByZero | RuntimeError::Overflow { .. })
    }
}

pub type EvalResult<T> = Result<T, RuntimeError>;

/// Walks statements against an [`Environment`], writing `print` output to `out`.
///
/// The first error aborts the remaining statements. Assignments that already
/// ran stay in the environment.
pub struct Evaluator<'env, W: Write> {
    environment: &'env mut Environment,
    out: W,
}

impl<'env, W: Write> Evaluator<'env, W> {
    pub fn new(environment: &'env mut Environment, out: W) -> Evaluator<'env, W> {
        Evaluator {
            environment,
            out,
        }
    }

    pub fn execute(&mut self, statements: &[Stmt]) -> EvalResult<()> {
        for stmt in statements {
            self.execute_statement(stmt)?;
        }

        Ok(())
    }

    pub fn execute_statement(&mut self, stmt: &Stmt) -> EvalResult<()> {
        tracing::trace!(statement = ?stmt, "executing statement");

        match stmt {
            Stmt::Assign { name, expr } => {
                let value = self.evaluate(expr)?;
                self.environment.assign(name, value);
                tracing::trace!(name = %name, value, "assigned variable");
            },
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
            },
            Stmt::If { condition, then, otherwise } => {
                if self.evaluate(condition)? != 0 {
                    self.execute(then)?;
                } else {
                    self.execute(otherwise)?;
                }
            },
            // No iteration limit; a loop that never ends is the program's problem
            Stmt::While { condition, body } => {
                while self.evaluate(condition)? != 0 {
                    self.execute(body)?;
                }
            },
        }

        Ok(())
    }

    pub fn evaluate(&self, expr: &Expr) -> EvalResult<i64> {
        match expr {
            Expr::ConstantInt(value) => Ok(*value),
            Expr::Variable(name) => self.environment.get(name)
                .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.clone() }),
            Expr::BinaryOperator { left, operator, right } => {
                // Left operand first
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;

                apply_operator(*operator, left, right)
            },
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

/// Applies a binary operator. Comparisons yield `1` or `0`; division truncates toward zero.
pub fn apply_operator(operator: Operator, left: i64, right: i64) -> EvalResult<i64> {
    let overflow = || RuntimeError::Overflow { left, operator, right };

    match operator {
        Operator::Add => left.checked_add(right).ok_or_else(overflow),
        Operator::Subtract => left.checked_sub(right).ok_or_else(overflow),
        Operator::Multiply => left.checked_mul(right).ok_or_else(overflow),
        Operator::Divide => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero);
            }

            left.checked_div(right).ok_or_else(overflow)
        },

        Operator::Greater => Ok((left > right) as i64),
        Operator::Less => Ok((left < right) as i64),
        Operator::GreaterEqual => Ok((left >= right) as i64),
        Operator::LessEqual => Ok((left <= right) as i64),
        Operator::Equal => Ok((left == right) as i64),
        Operator::NotEqual => Ok((left != right) as i64),
    }
}

/// Runs `statements` in order against `environment`.
pub fn execute(statements: &[Stmt], environment: &mut Environment, out: &mut impl Write) -> EvalResult<()> {
    Evaluator::new(environment, out).execute(statements)
}
