use crate::ast::{Expr, Program, Stmt};
use crate::environment::Environment;
use crate::error::LoxError;
use crate::lexer::{Token, TokenType};
use crate::value::Value;
use std::io::{self, Write};

/// Tree-walking evaluator. `print` output goes to the injected sink, which
/// defaults to stdout; tests inject a buffer instead.
pub struct Interpreter<W: Write = io::Stdout> {
    environment: Environment,
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        Self {
            environment: Environment::new(),
            output,
        }
    }

    /// Executes statements in order. The first runtime error aborts the
    /// rest of this call; the environment survives for the next call, so a
    /// REPL session keeps its bindings.
    pub fn interpret(&mut self, program: &Program) -> Result<(), LoxError> {
        for statement in &program.statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    fn execute(&mut self, stmt: &Stmt) -> Result<(), LoxError> {
        match stmt {
            Stmt::Expression { expr } => {
                self.evaluate(expr)?;
                Ok(())
            }
            Stmt::Print { expr } => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value).ok();
                Ok(())
            }
            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.define(&name.lexeme, value);
                Ok(())
            }
            Stmt::Block { statements } => self.execute_block(statements),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(())
                }
            }
        }
    }

    fn execute_block(&mut self, statements: &[Stmt]) -> Result<(), LoxError> {
        let previous = self.environment.push_scope();

        let mut result = Ok(());
        for statement in statements {
            result = self.execute(statement);
            if result.is_err() {
                break;
            }
        }

        // The enclosing scope is restored even when a statement failed
        self.environment.pop_scope(previous);
        result
    }

    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value, LoxError> {
        match expr {
            Expr::Literal { value } => Ok(value.clone()),
            Expr::Grouping { expr } => self.evaluate(expr),
            Expr::Variable { name } => self.environment.get(name),
            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.environment.assign(name, value.clone())?;
                Ok(value)
            }
            Expr::Unary { operator, operand } => {
                let operand = self.evaluate(operand)?;
                self.evaluate_unary(operator, operand)
            }
            Expr::Binary {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                self.evaluate_binary(operator, left, right)
            }
            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                // Short-circuit: the result is one of the original operand
                // values, never a coerced boolean
                if operator.token_type == TokenType::Or {
                    if left.is_truthy() {
                        return Ok(left);
                    }
                } else if !left.is_truthy() {
                    return Ok(left);
                }

                self.evaluate(right)
            }
            Expr::Conditional {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.evaluate(then_branch)
                } else {
                    self.evaluate(else_branch)
                }
            }
        }
    }

    fn evaluate_unary(&self, operator: &Token, operand: Value) -> Result<Value, LoxError> {
        match operator.token_type {
            TokenType::Minus => match operand {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(LoxError::runtime_error_with_help(
                    operator,
                    "Operand must be a number.".to_string(),
                    format!("Cannot negate a value of type {}.", other.type_name()),
                )),
            },
            TokenType::Bang => Ok(Value::Bool(!operand.is_truthy())),
            _ => Err(LoxError::runtime_error(
                operator,
                format!("Unknown unary operator '{}'", operator.lexeme),
            )),
        }
    }

    fn evaluate_binary(
        &self,
        operator: &Token,
        left: Value,
        right: Value,
    ) -> Result<Value, LoxError> {
        match operator.token_type {
            TokenType::Plus => match (left, right) {
                (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
                (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
                (l, r) => Err(LoxError::runtime_error_with_help(
                    operator,
                    "Operands must be two numbers or two strings.".to_string(),
                    format!("Cannot add {} and {}.", l.type_name(), r.type_name()),
                )),
            },
            TokenType::Minus => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Number(l - r))
            }
            TokenType::Star => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Number(l * r))
            }
            TokenType::Slash => {
                let (l, r) = self.number_operands(operator, left, right)?;
                if r == 0.0 {
                    Err(LoxError::runtime_error(
                        operator,
                        "Division by zero.".to_string(),
                    ))
                } else {
                    Ok(Value::Number(l / r))
                }
            }
            TokenType::Mod => {
                let (l, r) = self.number_operands(operator, left, right)?;
                if r == 0.0 {
                    Err(LoxError::runtime_error(
                        operator,
                        "Division by zero.".to_string(),
                    ))
                } else {
                    Ok(Value::Number(l % r))
                }
            }
            TokenType::Greater => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Bool(l > r))
            }
            TokenType::GreaterEqual => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Bool(l >= r))
            }
            TokenType::Less => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Bool(l < r))
            }
            TokenType::LessEqual => {
                let (l, r) = self.number_operands(operator, left, right)?;
                Ok(Value::Bool(l <= r))
            }
            // Values of different types are never equal; nil == nil is true
            TokenType::EqualEqual => Ok(Value::Bool(left == right)),
            TokenType::BangEqual => Ok(Value::Bool(left != right)),
            _ => Err(LoxError::runtime_error(
                operator,
                format!("Unknown binary operator '{}'", operator.lexeme),
            )),
        }
    }

    fn number_operands(
        &self,
        operator: &Token,
        left: Value,
        right: Value,
    ) -> Result<(f64, f64), LoxError> {
        match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok((l, r)),
            (l, r) => Err(LoxError::runtime_error_with_help(
                operator,
                "Operands must be numbers.".to_string(),
                format!(
                    "'{}' is not defined for {} and {}.",
                    operator.lexeme,
                    l.type_name(),
                    r.type_name()
                ),
            )),
        }
    }
}
