use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

use crate::lexer::Token;

/// Byte range into the original source, used to anchor diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    Scan,
    Parse,
    InvalidAssignment,
    Runtime,
    UndefinedVariable,
}

/// Single error type for every stage of the pipeline. Each error carries a
/// span into the source, a 1-based line, and an optional help note.
#[derive(Debug, Clone)]
pub struct LoxError {
    pub kind: ErrorKind,
    pub span: Span,
    pub line: usize,
    pub message: String,
    pub help: Option<String>,
}

impl LoxError {
    pub fn new(kind: ErrorKind, span: Span, line: usize, message: String) -> Self {
        Self {
            kind,
            span,
            line,
            message,
            help: None,
        }
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn scan_error(span: Span, line: usize, message: String) -> Self {
        Self::new(ErrorKind::Scan, span, line, message)
    }

    pub fn parse_error(token: &Token, message: String) -> Self {
        Self::new(ErrorKind::Parse, token.span.clone(), token.line, message)
    }

    pub fn parse_error_with_help(token: &Token, message: String, help: String) -> Self {
        Self::parse_error(token, message).with_help(help)
    }

    pub fn invalid_assignment(equals: &Token) -> Self {
        Self::new(
            ErrorKind::InvalidAssignment,
            equals.span.clone(),
            equals.line,
            "Invalid assignment target".to_string(),
        )
        .with_help("Only variables can be assigned to. Example: x = 10".to_string())
    }

    pub fn runtime_error(token: &Token, message: String) -> Self {
        Self::new(ErrorKind::Runtime, token.span.clone(), token.line, message)
    }

    pub fn runtime_error_with_help(token: &Token, message: String, help: String) -> Self {
        Self::runtime_error(token, message).with_help(help)
    }

    pub fn undefined_variable(name: &Token) -> Self {
        Self::new(
            ErrorKind::UndefinedVariable,
            name.span.clone(),
            name.line,
            format!("Undefined variable '{}'", name.lexeme),
        )
    }

    fn kind_str(&self) -> &'static str {
        match self.kind {
            ErrorKind::Scan => "Scan Error",
            ErrorKind::Parse => "Parse Error",
            ErrorKind::InvalidAssignment => "Parse Error",
            ErrorKind::Runtime => "Runtime Error",
            ErrorKind::UndefinedVariable => "Runtime Error",
        }
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");

        let color = match self.kind {
            ErrorKind::Scan => Color::Red,
            ErrorKind::Parse | ErrorKind::InvalidAssignment => Color::Yellow,
            ErrorKind::Runtime | ErrorKind::UndefinedVariable => Color::Magenta,
        };

        let mut builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_message(format!("{}: {}", self.kind_str().fg(color), self.message))
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(color),
            );

        if let Some(ref help_text) = self.help {
            builder = builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        builder
            .finish()
            .print((filename, Source::from(source)))
            .ok();
    }
}

impl fmt::Display for LoxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[line {}] {}: {}",
            self.line,
            self.kind_str(),
            self.message
        )
    }
}

impl std::error::Error for LoxError {}
