use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// How a one-shot run of a script ended; the CLI maps this to an exit code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Success,
    StaticError,
    RuntimeError,
}

/// Runs the full pipeline over one source string, reporting every error.
pub fn run(source: &str, filename: Option<&str>) -> Outcome {
    let lexer = Lexer::new(source.to_string());
    let tokens = match lexer.scan_tokens() {
        Ok(tokens) => tokens,
        Err(error) => {
            error.report(source, filename);
            return Outcome::StaticError;
        }
    };

    let mut parser = Parser::new(tokens);
    let (program, errors) = parser.parse();
    if !errors.is_empty() {
        for error in &errors {
            error.report(source, filename);
        }
        return Outcome::StaticError;
    }

    let mut interpreter = Interpreter::new();
    if let Err(error) = interpreter.interpret(&program) {
        error.report(source, filename);
        return Outcome::RuntimeError;
    }

    Outcome::Success
}
