//! The tree-walking runtime: values, environments, evaluation, and the
//! builtin table.

mod builtins;
mod eval;
mod scope;
mod value;

pub use builtins::Builtin;
pub use eval::{apply_function, is_truthy, unwrap_return};
pub use scope::Scope;
pub use value::{
    fnv1a, Function, Generator, GeneratorState, HashKey, HashPair, Iteration, Kind, Value,
};
