//! Glint - a small dynamically typed scripting language.
//!
//! Source text runs through a single-pass pipeline: the lexer turns it
//! into tokens, the Pratt parser into an AST, and the tree-walking
//! evaluator into a value. The runtime supports first-class closures
//! with lexical scoping, cooperative generators driven by `next`, and
//! async tasks awaited through `await`.

pub mod ast;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod sched;

use std::sync::Arc;

use interpreter::{Scope, Value};
use lexer::Lexer;
use parser::{ParseError, Parser};

/// Run the full pipeline over `source` against `env`.
///
/// Parse errors are reported as a batch without evaluating anything;
/// runtime failures come back as regular [`Value::Error`] values.
pub fn run(source: &str, env: &Arc<Scope>) -> Result<Value, Vec<ParseError>> {
    let lexer = Lexer::new(source);
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    if !parser.errors().is_empty() {
        return Err(parser.errors().to_vec());
    }
    Ok(program.eval(env))
}
