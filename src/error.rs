// ABOUTME: Error types for parsing and evaluation failures, and the driver-facing wrapper

use crate::lexer::LexError;
use crate::token::{Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
    },

    #[error("line {line}: invalid assignment target")]
    InvalidAssignmentTarget { line: usize },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, token: &Token) -> Self {
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: describe(token),
            line: token.line,
        }
    }
}

fn describe(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        "end of input".to_string()
    } else {
        token.lexeme.clone()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("expected {expected} argument(s) but got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    #[error("can only call functions and classes")]
    NotCallable,

    #[error("only instances have properties")]
    NotAnInstance,

    #[error("'super' used in a class with no superclass")]
    SuperWithNoParent,

    #[error("undefined property '{0}'")]
    UndefinedProperty(String),

    #[error("operand(s) of '{operator}' must be {expected}")]
    TypeMismatch { operator: String, expected: String },

    #[error("undefined variable '{0}'")]
    UndefinedVariable(String),

    #[error("'{0}' is already defined in this scope")]
    Redefinition(String),

    #[error("cannot assign to '{0}' before it is defined")]
    AssignBeforeDefine(String),
}

/// The top-level error returned by the interpreter's single driver operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoxError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}
