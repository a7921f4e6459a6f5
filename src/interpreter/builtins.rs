//! The fixed table of native functions, consulted when an identifier
//! misses the environment chain.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::sched;

use super::value::{Generator, GeneratorState, Iteration, Value};

/// Builtin identifiers. Dispatch happens here rather than through
/// boxed closures so the table stays `Copy` and comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Puts,
    First,
    Last,
    Tail,
    Push,
    Sleep,
    Next,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Builtin> {
        match name {
            "len" => Some(Builtin::Len),
            "puts" => Some(Builtin::Puts),
            "first" => Some(Builtin::First),
            "last" => Some(Builtin::Last),
            "tail" => Some(Builtin::Tail),
            "push" => Some(Builtin::Push),
            "sleep" => Some(Builtin::Sleep),
            "next" => Some(Builtin::Next),
            _ => None,
        }
    }

    pub fn apply(self, args: Vec<Value>) -> Value {
        match self {
            Builtin::Len => len(args),
            Builtin::Puts => puts(args),
            Builtin::First => first(args),
            Builtin::Last => last(args),
            Builtin::Tail => tail(args),
            Builtin::Push => push(args),
            Builtin::Sleep => sleep(args),
            Builtin::Next => next(args),
        }
    }
}

fn wrong_args(got: usize, want: usize) -> Value {
    Value::Error(format!("wrong number of args, got {got}, want {want}"))
}

fn unsupported_arg(name: &str, arg: &Value) -> Value {
    Value::Error(format!(
        "argument to `{}` not supported, got {}",
        name,
        arg.kind()
    ))
}

fn len(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => Value::Integer(elements.len() as i64),
        Value::Str(value) => Value::Integer(value.len() as i64),
        other => unsupported_arg("len", other),
    }
}

fn puts(args: Vec<Value>) -> Value {
    for arg in &args {
        println!("{arg}");
    }
    Value::Null
}

fn first(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => elements.first().cloned().unwrap_or(Value::Null),
        other => unsupported_arg("first", other),
    }
}

fn last(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => elements.last().cloned().unwrap_or(Value::Null),
        other => unsupported_arg("last", other),
    }
}

/// A fresh array without the first element; the input is untouched.
fn tail(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), 1);
    }
    match &args[0] {
        Value::Array(elements) => {
            if elements.is_empty() {
                Value::Null
            } else {
                Value::Array(Arc::new(elements[1..].to_vec()))
            }
        }
        other => unsupported_arg("tail", other),
    }
}

/// A fresh array with the value appended; the input is untouched.
fn push(args: Vec<Value>) -> Value {
    if args.len() != 2 {
        return wrong_args(args.len(), 2);
    }
    match &args[0] {
        Value::Array(elements) => {
            let mut extended = Vec::with_capacity(elements.len() + 1);
            extended.extend(elements.iter().cloned());
            extended.push(args[1].clone());
            Value::Array(Arc::new(extended))
        }
        other => unsupported_arg("push", other),
    }
}

/// Block for the given number of seconds. Inside a task the nap
/// watches the cancel token and bails early when tripped.
fn sleep(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), 1);
    }
    let Value::Integer(seconds) = &args[0] else {
        return unsupported_arg("sleep", &args[0]);
    };
    let duration = Duration::from_secs((*seconds).max(0) as u64);
    match sched::current_token() {
        Some(token) => {
            if !token.sleep(duration) {
                debug!("sleep cut short by cancellation");
                return Value::Error("task cancelled".to_string());
            }
        }
        None => thread::sleep(duration),
    }
    Value::Null
}

fn next(args: Vec<Value>) -> Value {
    if args.len() != 1 {
        return wrong_args(args.len(), 1);
    }
    match &args[0] {
        Value::Generator(generator) => step(generator),
        other => unsupported_arg("next", other),
    }
}

/// Drive one resumption of a generator body.
///
/// Statements evaluate in the generator's environment starting at the
/// cursor. A yield pauses after its statement; a return or error ends
/// the generator; running off the end replays the last payload with
/// `done` set.
fn step(generator: &Arc<Generator>) -> Value {
    let mut state = generator.state.lock().expect("generator lock poisoned");
    if state.done {
        return finished(&state);
    }
    let statements = &generator.func.body.statements;
    while state.index < statements.len() {
        let statement = &statements[state.index];
        state.index += 1;
        match statement.eval(&generator.env) {
            Value::Yield(payload) => {
                debug!(cursor = state.index, "generator yielded");
                let value = *payload;
                state.last = Some(value.clone());
                return Value::Iteration(Iteration {
                    done: false,
                    value: Box::new(value),
                });
            }
            Value::Return(payload) => {
                state.done = true;
                let value = *payload;
                state.last = Some(value.clone());
                return Value::Iteration(Iteration {
                    done: true,
                    value: Box::new(value),
                });
            }
            error @ Value::Error(_) => {
                state.done = true;
                state.last = Some(error.clone());
                return Value::Iteration(Iteration {
                    done: true,
                    value: Box::new(error),
                });
            }
            _ => {}
        }
    }
    state.done = true;
    finished(&state)
}

fn finished(state: &GeneratorState) -> Value {
    Value::Iteration(Iteration {
        done: true,
        value: Box::new(state.last.clone().unwrap_or(Value::Null)),
    })
}
