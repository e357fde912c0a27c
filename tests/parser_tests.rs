// Parser robustness tests: malformed inputs must produce errors rather than
// panics, valid syntax must parse, and error recovery must keep collecting
// statements after a bad one.

use rlox::ast::{Expr, Program, Stmt};
use rlox::error::{ErrorKind, LoxError};
use rlox::lexer::{Lexer, TokenType};
use rlox::parser::Parser;

/// Individual test case
#[derive(Debug, Clone)]
struct TestCase {
    name: String,
    input: String,
    should_succeed: bool,
    expected_error_contains: Option<String>,
}

impl TestCase {
    fn should_succeed(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: true,
            expected_error_contains: None,
        }
    }

    fn should_fail(name: &str, input: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: None,
        }
    }

    fn should_fail_with_message(name: &str, input: &str, expected_msg: &str) -> Self {
        Self {
            name: name.to_string(),
            input: input.to_string(),
            should_succeed: false,
            expected_error_contains: Some(expected_msg.to_string()),
        }
    }
}

fn parse_input(input: &str) -> Result<Program, Vec<LoxError>> {
    let tokens = Lexer::new(input.to_string())
        .scan_tokens()
        .map_err(|e| vec![e])?;
    let mut parser = Parser::new(tokens);
    let (program, errors) = parser.parse();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors)
    }
}

fn run_suite(suite_name: &str, tests: &[TestCase]) {
    let mut failures = Vec::new();

    for test in tests {
        let result = parse_input(&test.input);
        match (&result, test.should_succeed) {
            (Ok(_), true) => {}
            (Ok(_), false) => {
                failures.push(format!("{}: expected failure, parse succeeded", test.name));
            }
            (Err(errors), false) => {
                if let Some(expected) = &test.expected_error_contains {
                    if !errors.iter().any(|e| e.message.contains(expected)) {
                        failures.push(format!(
                            "{}: no error containing {:?} in {:?}",
                            test.name, expected, errors
                        ));
                    }
                }
            }
            (Err(errors), true) => {
                failures.push(format!(
                    "{}: expected success, got errors {:?}",
                    test.name, errors
                ));
            }
        }
    }

    assert!(
        failures.is_empty(),
        "suite {:?} had failures:\n{}",
        suite_name,
        failures.join("\n")
    );
}

#[test]
fn malformed_expressions() {
    run_suite(
        "malformed expressions",
        &[
            TestCase::should_fail_with_message(
                "unmatched_opening_paren",
                "(1 + 2;",
                "Expected ')' after expression",
            ),
            TestCase::should_fail_with_message(
                "unmatched_opening_paren_at_eof",
                "((1 + 2)",
                "Expected ')' after expression",
            ),
            TestCase::should_fail_with_message(
                "unmatched_closing_paren",
                "1 + 2);",
                "Expected ';' after expression",
            ),
            TestCase::should_fail_with_message(
                "empty_parentheses",
                "();",
                "Expected expression, found ')'",
            ),
            TestCase::should_fail_with_message(
                "operand_missing_after_plus",
                "1 + ();",
                "Expected expression after '+'",
            ),
            TestCase::should_fail_with_message(
                "missing_left_operand",
                "+ 1;",
                "Expected expression",
            ),
            TestCase::should_fail("missing_right_operand", "1 +"),
            TestCase::should_fail("bare_operator", "*"),
            TestCase::should_fail("increment_has_no_production", "1 ++ 2;"),
            TestCase::should_fail("decrement_has_no_production", "1 -- 2;"),
            TestCase::should_fail_with_message(
                "missing_semicolon",
                "1 + 2",
                "Expected ';' after expression",
            ),
        ],
    );
}

#[test]
fn statement_grammar() {
    run_suite(
        "statement grammar",
        &[
            TestCase::should_succeed("print_statement", "print 1 + 1;"),
            TestCase::should_fail_with_message(
                "print_missing_semicolon",
                "print 1",
                "Expected ';' after value",
            ),
            TestCase::should_succeed("var_with_initializer", "var x = 5;"),
            TestCase::should_succeed("var_without_initializer", "var x;"),
            TestCase::should_fail_with_message(
                "var_missing_name",
                "var 5 = 3;",
                "Expected variable name",
            ),
            TestCase::should_fail_with_message(
                "var_missing_semicolon",
                "var x = 5",
                "Expected ';' after variable declaration",
            ),
            TestCase::should_succeed("empty_block", "{}"),
            TestCase::should_succeed("block_with_statements", "{ var x = 1; print x; }"),
            TestCase::should_fail_with_message(
                "unterminated_block",
                "{ var x = 1;",
                "Expected '}' after block",
            ),
            TestCase::should_succeed("if_statement", "if (true) print 1;"),
            TestCase::should_succeed("if_else", "if (1 > 0) print 5; else print 3;"),
            TestCase::should_fail_with_message(
                "if_missing_parens",
                "if true print 1;",
                "Expected '(' after 'if'",
            ),
            TestCase::should_fail_with_message(
                "if_unclosed_condition",
                "if (true print 1;",
                "Expected ')' after if condition",
            ),
            TestCase::should_succeed(
                "dangling_else",
                "if (1 > 0) if (0 > 1) print 1; else print 2;",
            ),
            TestCase::should_fail_with_message(
                "while_is_not_a_statement",
                "while (true) print 1;",
                "Expected expression, found 'while'",
            ),
            TestCase::should_fail_with_message(
                "fun_is_not_a_statement",
                "fun f() {}",
                "Expected expression, found 'fun'",
            ),
        ],
    );
}

#[test]
fn assignment_and_ternary() {
    run_suite(
        "assignment and ternary",
        &[
            TestCase::should_succeed("simple_assignment", "x = 1;"),
            TestCase::should_succeed("chained_assignment", "x = y = 1;"),
            TestCase::should_succeed("assignment_in_grouping", "var y = (x = 2);"),
            TestCase::should_fail_with_message(
                "literal_assignment_target",
                "1 = 2;",
                "Invalid assignment target",
            ),
            TestCase::should_fail_with_message(
                "expression_assignment_target",
                "a + b = 2;",
                "Invalid assignment target",
            ),
            TestCase::should_succeed("ternary", "x = (1 < 4) ? 5 : 4;"),
            TestCase::should_succeed("chained_ternary", "x = a ? 1 : b ? 2 : 3;"),
            TestCase::should_fail_with_message(
                "ternary_missing_colon",
                "x = a ? 1;",
                "Expected ':' after then branch",
            ),
        ],
    );
}

#[test]
fn edge_cases() {
    let deep = "(".repeat(100) + "1" + &")".repeat(100) + ";";
    // Past the nesting limit the parser must report an error, not crash
    let too_deep = "(".repeat(300) + "1" + &")".repeat(300) + ";";
    run_suite(
        "edge cases",
        &[
            TestCase::should_succeed("empty_input", ""),
            TestCase::should_succeed("only_whitespace", "   \n\t  "),
            TestCase::should_succeed("deeply_nested_parens", &deep),
            TestCase::should_fail_with_message(
                "pathologically_nested_parens",
                &too_deep,
                "Expression nesting too deep",
            ),
            TestCase::should_fail("unexpected_eof_after_operator", "1 +"),
            TestCase::should_fail("unexpected_eof_in_grouping", "1 + ("),
        ],
    );
}

#[test]
fn invalid_assignment_error_kind() {
    let errors = parse_input("1 = 2;").expect_err("expected a parse error");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::InvalidAssignment);
}

#[test]
fn parser_recovers_after_malformed_statement() {
    // One bad statement must not abort the parse; the good one still lands
    let tokens = Lexer::new("var = 5; print 1;".to_string())
        .scan_tokens()
        .expect("scan failed");
    let mut parser = Parser::new(tokens);
    let (program, errors) = parser.parse();

    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("Expected variable name"));
    assert_eq!(program.statements.len(), 1);
    assert!(matches!(program.statements[0], Stmt::Print { .. }));
}

#[test]
fn parser_collects_multiple_errors() {
    let tokens = Lexer::new("var = 1; var = 2; print 3;".to_string())
        .scan_tokens()
        .expect("scan failed");
    let mut parser = Parser::new(tokens);
    let (program, errors) = parser.parse();

    assert_eq!(errors.len(), 2);
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let program = parse_input("1 + 2 * 3;").expect("parse failed");
    let expr = match &program.statements[0] {
        Stmt::Expression { expr } => expr,
        other => panic!("expected expression statement, got {:?}", other),
    };

    // Must be Binary(1, +, Binary(2, *, 3)), never the flat left-to-right form
    match expr {
        Expr::Binary {
            left,
            operator,
            right,
        } => {
            assert_eq!(operator.token_type, TokenType::Plus);
            assert!(matches!(**left, Expr::Literal { .. }));
            match &**right {
                Expr::Binary { operator, .. } => {
                    assert_eq!(operator.token_type, TokenType::Star)
                }
                other => panic!("right operand should be the product, got {:?}", other),
            }
        }
        other => panic!("expected binary expression, got {:?}", other),
    }
}

#[test]
fn unary_is_right_associative() {
    let program = parse_input("!!true;").expect("parse failed");
    let expr = match &program.statements[0] {
        Stmt::Expression { expr } => expr,
        other => panic!("expected expression statement, got {:?}", other),
    };

    match expr {
        Expr::Unary { operand, .. } => {
            assert!(matches!(**operand, Expr::Unary { .. }))
        }
        other => panic!("expected unary expression, got {:?}", other),
    }
}

#[test]
fn assignment_is_right_associative() {
    let program = parse_input("x = y = 1;").expect("parse failed");
    let expr = match &program.statements[0] {
        Stmt::Expression { expr } => expr,
        other => panic!("expected expression statement, got {:?}", other),
    };

    match expr {
        Expr::Assign { name, value } => {
            assert_eq!(name.lexeme, "x");
            assert!(matches!(**value, Expr::Assign { .. }));
        }
        other => panic!("expected assignment, got {:?}", other),
    }
}
