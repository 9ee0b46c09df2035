// ABOUTME: Library module exposing internal components for testing and the CLI driver

pub mod ast;
pub mod config;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod natives;
pub mod parser;
pub mod token;
pub mod value;

use error::LoxError;
use interpreter::Interpreter;
use std::io::Write;

/// Lexes, parses, and evaluates `source` against a fresh interpreter,
/// writing `print` output to `output`. Returns `output` back so callers can
/// recover what was written even when the call succeeds with no further use
/// for the interpreter itself.
pub fn run<W: Write>(source: &str, output: W) -> Result<W, LoxError> {
    let tokens = lexer::scan_tokens(source)?;
    let statements = parser::parse(tokens)?;
    let interpreter = Interpreter::new(output);
    interpreter.interpret(&statements)?;
    Ok(interpreter.into_output())
}

/// Convenience wrapper for tests: runs `source` against an in-memory buffer
/// and returns everything it printed.
pub fn run_capturing(source: &str) -> Result<String, LoxError> {
    let buf = run(source, Vec::new())?;
    Ok(String::from_utf8(buf).expect("interpreter output is always valid UTF-8"))
}
