use crate::ast::{Expr, Stmt};
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;
use std::io::{self, Write};

/// Interactive loop with a persistent interpreter, so variables defined on
/// one line are visible on the next.
pub fn start() {
    println!("rlox v0.1.0");
    println!("Type 'exit' or press Ctrl+D to quit");
    println!();

    let mut interpreter = Interpreter::new();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) => {
                // EOF (Ctrl+D or piped input ended)
                println!();
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "exit" || line == "quit" {
                    break;
                }

                run_line(line, &mut interpreter);
            }
            Err(error) => {
                eprintln!("Error reading input: {}", error);
                break;
            }
        }
    }
}

fn run_line(source: &str, interpreter: &mut Interpreter) {
    let lexer = Lexer::new(source.to_string());
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, None);
            return;
        }
    };

    let mut parser = Parser::new(tokens);
    let (program, errors) = parser.parse();
    if !errors.is_empty() {
        for error in &errors {
            error.report(source, None);
        }
        return;
    }

    // A single bare expression statement gets its value echoed, except for
    // assignments, which already have a visible effect
    if program.statements.len() == 1 {
        if let Stmt::Expression { expr } = &program.statements[0] {
            if !matches!(expr, Expr::Assign { .. }) {
                match interpreter.evaluate(expr) {
                    Ok(value) => println!("{}", value),
                    Err(error) => error.report(source, None),
                }
                return;
            }
        }
    }

    if let Err(error) = interpreter.interpret(&program) {
        error.report(source, None);
    }
}
