use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::ast::expression::Ident;
use crate::ast::statement::BlockStatement;
use crate::sched::Task;

use super::builtins::Builtin;
use super::scope::Scope;

/// Runtime value kinds, rendered into error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Integer,
    Str,
    Boolean,
    Null,
    Array,
    Hash,
    Function,
    Builtin,
    Return,
    Yield,
    Error,
    Task,
    Generator,
    Iteration,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Integer => "INTEGER",
            Kind::Str => "STRING",
            Kind::Boolean => "BOOLEAN",
            Kind::Null => "NULL",
            Kind::Array => "ARRAY",
            Kind::Hash => "HASH",
            Kind::Function => "FUNCTION",
            Kind::Builtin => "BUILTIN",
            Kind::Return => "RETURN_VALUE",
            Kind::Yield => "YIELD_VALUE",
            Kind::Error => "ERROR",
            Kind::Task => "TASK",
            Kind::Generator => "GENERATOR",
            Kind::Iteration => "ITERATION",
        };
        f.write_str(name)
    }
}

/// A runtime value.
///
/// Heap-backed variants sit behind an `Arc` so clones are cheap and
/// the `==`/`!=` identity rule has something to compare. `Return`,
/// `Yield`, and `Error` are control-flow sentinels, not user data;
/// they unwrap at the program, call, and generator boundaries.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Str(Arc<str>),
    Boolean(bool),
    Null,
    Array(Arc<Vec<Value>>),
    Hash(Arc<HashMap<HashKey, HashPair>>),
    Function(Arc<Function>),
    Builtin(Builtin),
    Return(Box<Value>),
    Yield(Box<Value>),
    Error(String),
    Task(Arc<Task<Value>>),
    Generator(Arc<Generator>),
    Iteration(Iteration),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Integer(_) => Kind::Integer,
            Value::Str(_) => Kind::Str,
            Value::Boolean(_) => Kind::Boolean,
            Value::Null => Kind::Null,
            Value::Array(_) => Kind::Array,
            Value::Hash(_) => Kind::Hash,
            Value::Function(_) => Kind::Function,
            Value::Builtin(_) => Kind::Builtin,
            Value::Return(_) => Kind::Return,
            Value::Yield(_) => Kind::Yield,
            Value::Error(_) => Kind::Error,
            Value::Task(_) => Kind::Task,
            Value::Generator(_) => Kind::Generator,
            Value::Iteration(_) => Kind::Iteration,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// The hash-table key for this value, when the kind is hashable.
    ///
    /// Integers and booleans digest to their raw value; strings run
    /// through FNV-1a so equal byte sequences land on the same key.
    pub fn hash_key(&self) -> Option<HashKey> {
        match self {
            Value::Integer(value) => Some(HashKey {
                kind: Kind::Integer,
                value: *value as u64,
            }),
            Value::Boolean(value) => Some(HashKey {
                kind: Kind::Boolean,
                value: u64::from(*value),
            }),
            Value::Str(value) => Some(HashKey {
                kind: Kind::Str,
                value: fnv1a(value.as_bytes()),
            }),
            _ => None,
        }
    }

    /// Identity comparison backing `==`/`!=` outside the integer and
    /// string dispatch arms: singletons compare by value, heap values
    /// by pointer, mismatched kinds are never equal.
    pub fn identity_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Hash(a), Value::Hash(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Task(a), Value::Task(b)) => Arc::ptr_eq(a, b),
            (Value::Generator(a), Value::Generator(b)) => Arc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(value) => write!(f, "{value}"),
            Value::Str(value) => f.write_str(value),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::Null => f.write_str("null"),
            Value::Array(elements) => {
                let parts: Vec<String> = elements.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Hash(pairs) => {
                let parts: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key, pair.value))
                    .collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            Value::Function(function) => function.fmt(f),
            Value::Builtin(_) => f.write_str("builtin function"),
            Value::Return(value) | Value::Yield(value) => value.fmt(f),
            Value::Error(message) => write!(f, "ERROR: {message}"),
            Value::Task(_) => f.write_str("task"),
            Value::Generator(_) => f.write_str("generator"),
            Value::Iteration(iteration) => iteration.fmt(f),
        }
    }
}

/// Hash-table key: the operand kind plus a 64-bit digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: Kind,
    pub value: u64,
}

/// One hash entry; the original key value rides along for inspection.
#[derive(Debug, Clone)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

/// A user-defined function plus the environment captured when its
/// literal was evaluated (static scoping).
pub struct Function {
    pub parameters: Vec<Ident>,
    pub body: BlockStatement,
    pub env: Arc<Scope>,
    pub is_async: bool,
    pub is_gen: bool,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters: Vec<String> = self.parameters.iter().map(ToString::to_string).collect();
        write!(f, "fn({}) {{\n{}\n}}", parameters.join(", "), self.body)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("is_async", &self.is_async)
            .field("is_gen", &self.is_gen)
            .finish_non_exhaustive()
    }
}

/// A pausable evaluation of a function body.
///
/// The cursor indexes top-level statements of the body; it only moves
/// forward, and `done` latches once set.
pub struct Generator {
    pub func: Arc<Function>,
    pub env: Arc<Scope>,
    pub state: Mutex<GeneratorState>,
}

#[derive(Debug, Default)]
pub struct GeneratorState {
    pub index: usize,
    pub done: bool,
    pub last: Option<Value>,
}

impl Generator {
    pub fn new(func: Arc<Function>, env: Arc<Scope>) -> Self {
        Self {
            func,
            env,
            state: Mutex::new(GeneratorState::default()),
        }
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// The surface record handed out by `next`.
#[derive(Debug, Clone)]
pub struct Iteration {
    pub done: bool,
    pub value: Box<Value>,
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{done:{}, val:{}}}", self.done, self.value)
    }
}

/// Stable 64-bit FNV-1a digest for string hash keys.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes.iter().fold(OFFSET_BASIS, |digest, byte| {
        (digest ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}
