use crate::ast::{Expr, Program, Stmt};
use crate::error::{ErrorKind, LoxError, Span};
use crate::lexer::{Literal, Token, TokenType};
use crate::value::Value;

/// Expressions may nest at most this many levels; deeper input gets a parse
/// error instead of exhausting the call stack.
const MAX_NESTING_DEPTH: usize = 200;

/// Boxed results keep the recursive-descent frames small, which matters for
/// deeply nested expressions.
type ExprResult = Result<Box<Expr>, Box<LoxError>>;
type StmtResult = Result<Stmt, Box<LoxError>>;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            depth: 0,
        }
    }

    /// Parses the token stream into a statement sequence. A parse error
    /// inside one declaration is collected and the parser synchronizes to
    /// the next statement boundary, so later statements still parse.
    pub fn parse(&mut self) -> (Program, Vec<LoxError>) {
        let mut statements = Vec::new();
        let mut errors = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(error) => {
                    errors.push(*error);
                    self.synchronize();
                }
            }
        }

        (Program { statements }, errors)
    }

    fn declaration(&mut self) -> StmtResult {
        if self.match_types(&[TokenType::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        }
    }

    fn var_declaration(&mut self) -> StmtResult {
        let name = self
            .consume_with_help(
                TokenType::Identifier,
                "Expected variable name",
                "Variable declarations take the form: var name = value;".to_string(),
            )?
            .clone();

        let initializer = if self.match_types(&[TokenType::Equal]) {
            Some(*self.expression()?)
        } else {
            None
        };

        self.consume(TokenType::Semicolon, "Expected ';' after variable declaration")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> StmtResult {
        if self.match_types(&[TokenType::Print]) {
            self.print_statement()
        } else if self.match_types(&[TokenType::LeftBrace]) {
            Ok(Stmt::Block {
                statements: self.block()?,
            })
        } else if self.match_types(&[TokenType::If]) {
            self.if_statement()
        } else {
            self.expression_statement()
        }
    }

    fn print_statement(&mut self) -> StmtResult {
        let expr = *self.expression()?;
        self.consume(TokenType::Semicolon, "Expected ';' after value")?;
        Ok(Stmt::Print { expr })
    }

    fn block(&mut self) -> Result<Vec<Stmt>, Box<LoxError>> {
        let mut statements = Vec::new();

        while !self.check(&TokenType::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume_with_help(
            TokenType::RightBrace,
            "Expected '}' after block",
            "Block statements must be closed with '}' after the opening '{'.".to_string(),
        )?;
        Ok(statements)
    }

    fn if_statement(&mut self) -> StmtResult {
        self.consume_with_help(
            TokenType::LeftParen,
            "Expected '(' after 'if'",
            "If statements require parentheses around the condition: if (condition) ...".to_string(),
        )?;
        let condition = *self.expression()?;
        self.consume_with_help(
            TokenType::RightParen,
            "Expected ')' after if condition",
            "If conditions must be enclosed in parentheses: if (condition) ...".to_string(),
        )?;

        let then_branch = Box::new(self.statement()?);
        // An `else` binds to the nearest unmatched `if`
        let else_branch = if self.match_types(&[TokenType::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn expression_statement(&mut self) -> StmtResult {
        let expr = *self.expression()?;
        self.consume(TokenType::Semicolon, "Expected ';' after expression")?;
        Ok(Stmt::Expression { expr })
    }

    fn expression(&mut self) -> ExprResult {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(LoxError::parse_error_with_help(
                self.peek(),
                "Expression nesting too deep".to_string(),
                format!(
                    "Expressions may nest at most {} levels deep.",
                    MAX_NESTING_DEPTH
                ),
            )
            .into());
        }

        self.depth += 1;
        let result = self.assignment();
        self.depth -= 1;
        result
    }

    fn assignment(&mut self) -> ExprResult {
        let expr = self.conditional()?;

        if self.match_types(&[TokenType::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            // The left side must be a bare variable; anything else is a
            // hard error rather than a silently dropped assignment.
            return match *expr {
                Expr::Variable { name } => Ok(Box::new(Expr::Assign { name, value })),
                _ => Err(LoxError::invalid_assignment(&equals).into()),
            };
        }

        Ok(expr)
    }

    fn conditional(&mut self) -> ExprResult {
        let expr = self.or()?;

        if self.match_types(&[TokenType::Question]) {
            let operator = self.previous().clone();
            let then_branch = self.expression()?;
            self.consume_with_help(
                TokenType::Colon,
                "Expected ':' after then branch of conditional expression",
                "Conditional expressions take the form: condition ? then : else".to_string(),
            )?;
            // Right-associative: a ? b : c ? d : e chains through the else arm
            let else_branch = self.conditional()?;

            return Ok(Box::new(Expr::Conditional {
                condition: expr,
                operator,
                then_branch,
                else_branch,
            }));
        }

        Ok(expr)
    }

    fn or(&mut self) -> ExprResult {
        let mut expr = self.and()?;

        while self.match_types(&[TokenType::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Box::new(Expr::Logical {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ExprResult {
        let mut expr = self.equality()?;

        while self.match_types(&[TokenType::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Box::new(Expr::Logical {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;

        while self.match_types(&[TokenType::BangEqual, TokenType::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison().map_err(|_| {
                self.missing_operand(
                    &operator,
                    "Equality operators like '==' and '!=' require expressions on both sides.",
                )
            })?;
            expr = Box::new(Expr::Binary {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ExprResult {
        let mut expr = self.term()?;

        while self.match_types(&[
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Less,
            TokenType::LessEqual,
        ]) {
            let operator = self.previous().clone();
            let right = self.term().map_err(|_| {
                self.missing_operand(
                    &operator,
                    "Comparison operators like '>', '<', '>=' and '<=' require expressions on both sides.",
                )
            })?;
            expr = Box::new(Expr::Binary {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;

        while self.match_types(&[TokenType::Minus, TokenType::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor().map_err(|_| {
                self.missing_operand(
                    &operator,
                    "Arithmetic operators like '+' and '-' require expressions on both sides.",
                )
            })?;
            expr = Box::new(Expr::Binary {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        let mut expr = self.unary()?;

        while self.match_types(&[TokenType::Slash, TokenType::Star, TokenType::Mod]) {
            let operator = self.previous().clone();
            let right = self.unary().map_err(|_| {
                self.missing_operand(
                    &operator,
                    "Multiplication, division and modulo operators require expressions on both sides.",
                )
            })?;
            expr = Box::new(Expr::Binary {
                left: expr,
                operator,
                right,
            });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        // Collect the prefix run iteratively, then apply right to left
        let mut operators = Vec::new();
        while self.match_types(&[TokenType::Bang, TokenType::Minus]) {
            operators.push(self.previous().clone());
        }

        let mut expr = self.primary()?;
        for operator in operators.into_iter().rev() {
            expr = Box::new(Expr::Unary {
                operator,
                operand: expr,
            });
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ExprResult {
        if self.is_at_end() {
            return Err(LoxError::parse_error_with_help(
                self.peek(),
                "Unexpected end of input".to_string(),
                "Expected an expression here. Check for unmatched parentheses or incomplete statements."
                    .to_string(),
            )
            .into());
        }

        let token = self.advance().clone();

        match token.token_type {
            TokenType::False => Ok(Box::new(Expr::Literal {
                value: Value::Bool(false),
            })),
            TokenType::True => Ok(Box::new(Expr::Literal {
                value: Value::Bool(true),
            })),
            TokenType::Nil => Ok(Box::new(Expr::Literal { value: Value::Nil })),
            TokenType::Number => {
                let value = match &token.literal {
                    Some(Literal::Number(n)) => *n,
                    _ => {
                        return Err(LoxError::parse_error(
                            &token,
                            "Invalid number literal".to_string(),
                        )
                        .into())
                    }
                };
                Ok(Box::new(Expr::Literal {
                    value: Value::Number(value),
                }))
            }
            TokenType::String => {
                let value = match &token.literal {
                    Some(Literal::String(s)) => s.clone(),
                    _ => {
                        return Err(LoxError::parse_error(
                            &token,
                            "Invalid string literal".to_string(),
                        )
                        .into())
                    }
                };
                Ok(Box::new(Expr::Literal {
                    value: Value::String(value),
                }))
            }
            TokenType::Identifier => Ok(Box::new(Expr::Variable { name: token })),
            TokenType::LeftParen => {
                let expr = self.expression()?;
                self.consume_with_help(
                    TokenType::RightParen,
                    "Expected ')' after expression",
                    "Every opening parenthesis '(' must have a matching closing parenthesis ')'."
                        .to_string(),
                )?;
                Ok(Box::new(Expr::Grouping { expr }))
            }
            _ => {
                let help_msg = match token.token_type {
                    TokenType::RightParen => {
                        "Found ')' without matching '('. Check for unbalanced parentheses."
                    }
                    TokenType::RightBrace => {
                        "Found '}' without matching '{'. Check for unbalanced braces."
                    }
                    TokenType::Eof => "Reached end of input while expecting an expression.",
                    _ => "Expected a literal value, variable, or parenthesized expression here.",
                };

                Err(LoxError::parse_error_with_help(
                    &token,
                    format!("Expected expression, found '{}'", token.lexeme),
                    help_msg.to_string(),
                )
                .into())
            }
        }
    }

    fn missing_operand(&self, operator: &Token, help: &str) -> Box<LoxError> {
        Box::new(LoxError::parse_error_with_help(
            operator,
            format!("Expected expression after '{}'", operator.lexeme),
            help.to_string(),
        ))
    }

    /// Discards tokens until a likely statement boundary so parsing can
    /// resume after an error.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().token_type == TokenType::Semicolon {
                return;
            }

            match self.peek().token_type {
                TokenType::Class
                | TokenType::Fun
                | TokenType::Var
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return => return,
                _ => {}
            }

            self.advance();
        }
    }

    fn match_types(&mut self, types: &[TokenType]) -> bool {
        for token_type in types {
            if self.check(token_type) {
                self.advance();
                return true;
            }
        }
        false
    }

    fn check(&self, token_type: &TokenType) -> bool {
        if self.is_at_end() {
            false
        } else {
            &self.peek().token_type == token_type
        }
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn consume(&mut self, token_type: TokenType, message: &str) -> Result<&Token, LoxError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_at_boundary(message.to_string()))
        }
    }

    fn consume_with_help(
        &mut self,
        token_type: TokenType,
        message: &str,
        help: String,
    ) -> Result<&Token, LoxError> {
        if self.check(&token_type) {
            Ok(self.advance())
        } else {
            Err(self.error_at_boundary(message.to_string()).with_help(help))
        }
    }

    /// At end of input the error points just past the last real token,
    /// otherwise at the unexpected token itself.
    fn error_at_boundary(&self, message: String) -> LoxError {
        if self.is_at_end() && self.current > 0 {
            let last = &self.tokens[self.current - 1];
            LoxError::new(
                ErrorKind::Parse,
                Span::single(last.span.end),
                last.line,
                message,
            )
        } else {
            LoxError::parse_error(self.peek(), message)
        }
    }
}
