//! Tagged AST node variants for statements and expressions.
//!
//! Every node keeps its originating token, and every node renders a
//! source-like form through `Display`; the parser tests and function
//! inspection both lean on that rendering.

pub mod expression;
pub mod statement;

pub use expression::Expression;
pub use statement::{BlockStatement, Program, Statement};
