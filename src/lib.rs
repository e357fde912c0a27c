// rlox interpreter library
//
// Front-to-back pipeline for a small dynamically-typed scripting language:
// a hand-written lexer, a recursive-descent parser with error recovery, and
// a tree-walking interpreter over a chained lexical-scope environment.

// Public modules
pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod value;

// Re-export commonly used items
pub use ast::{Expr, Program, Stmt};
pub use environment::Environment;
pub use error::{ErrorKind, LoxError, Span};
pub use interpreter::Interpreter;
pub use lexer::{Lexer, Literal, Token, TokenType};
pub use parser::Parser;
pub use value::Value;

// Re-export main entry points
pub use repl::start as start_repl;
pub use runner::{run, Outcome};
