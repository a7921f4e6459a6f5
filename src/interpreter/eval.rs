//! Node-dispatched evaluation with sentinel propagation.
//!
//! Every recursive evaluation is inspected for an error value, which
//! the consumer returns immediately. `Return` bubbles through blocks
//! and unwraps at the program top and the call boundary; `Yield`
//! bubbles until the generator driver picks it up.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::ast::expression::{
    AwaitExpression, Expression, HashLiteral, Ident, IfExpression,
};
use crate::ast::statement::{BlockStatement, LetStatement, Program, ReturnStatement, Statement};
use crate::sched;

use super::builtins::Builtin;
use super::scope::Scope;
use super::value::{Function, Generator, HashPair, Kind, Value};

impl Program {
    pub fn eval(&self, env: &Arc<Scope>) -> Value {
        let mut result = Value::Null;
        for statement in &self.statements {
            match statement.eval(env) {
                Value::Return(value) => return *value,
                error @ Value::Error(_) => return error,
                value => result = value,
            }
        }
        result
    }
}

impl Statement {
    pub fn eval(&self, env: &Arc<Scope>) -> Value {
        match self {
            Statement::Let(statement) => statement.eval(env),
            Statement::Return(statement) => statement.eval(env),
            Statement::Expression(statement) => statement.expression.eval(env),
        }
    }
}

impl LetStatement {
    fn eval(&self, env: &Arc<Scope>) -> Value {
        let value = self.value.eval(env);
        if value.is_error() {
            return value;
        }
        env.set(self.name.value.clone(), value);
        Value::Null
    }
}

impl ReturnStatement {
    fn eval(&self, env: &Arc<Scope>) -> Value {
        let value = self.value.eval(env);
        if value.is_error() {
            return value;
        }
        Value::Return(Box::new(value))
    }
}

impl BlockStatement {
    /// Runs statements in order, remembering the last value. Only the
    /// return and error sentinels short-circuit; a yield keeps the
    /// block running so the generator driver sees the statement's
    /// final result.
    pub fn eval(&self, env: &Arc<Scope>) -> Value {
        let mut result = Value::Null;
        for statement in &self.statements {
            result = statement.eval(env);
            if matches!(result, Value::Return(_) | Value::Error(_)) {
                return result;
            }
        }
        result
    }
}

impl Expression {
    pub fn eval(&self, env: &Arc<Scope>) -> Value {
        match self {
            Expression::Ident(node) => eval_ident(node, env),
            Expression::Integer(node) => Value::Integer(node.value),
            Expression::Str(node) => Value::Str(Arc::from(node.value.as_str())),
            Expression::Boolean(node) => Value::Boolean(node.value),
            Expression::Array(node) => match eval_expressions(&node.elements, env) {
                Ok(elements) => Value::Array(Arc::new(elements)),
                Err(error) => error,
            },
            Expression::Hash(node) => eval_hash_literal(node, env),
            Expression::Prefix(node) => {
                let right = node.right.eval(env);
                if right.is_error() {
                    return right;
                }
                eval_prefix(&node.operator, right)
            }
            Expression::Infix(node) => {
                let right = node.right.eval(env);
                if right.is_error() {
                    return right;
                }
                let left = node.left.eval(env);
                if left.is_error() {
                    return left;
                }
                eval_infix(&node.operator, left, right)
            }
            Expression::If(node) => eval_if(node, env),
            Expression::Index(node) => {
                let left = node.left.eval(env);
                if left.is_error() {
                    return left;
                }
                let index = node.index.eval(env);
                if index.is_error() {
                    return index;
                }
                eval_index(left, index)
            }
            Expression::Call(node) => {
                let callee = node.function.eval(env);
                if callee.is_error() {
                    return callee;
                }
                match eval_expressions(&node.arguments, env) {
                    Ok(arguments) => apply_function(callee, arguments),
                    Err(error) => error,
                }
            }
            Expression::Function(node) => Value::Function(Arc::new(Function {
                parameters: node.parameters.clone(),
                body: node.body.clone(),
                env: Arc::clone(env),
                is_async: node.is_async,
                is_gen: node.is_gen,
            })),
            Expression::Yield(node) => {
                let value = node.argument.eval(env);
                if value.is_error() {
                    return value;
                }
                Value::Yield(Box::new(value))
            }
            Expression::Await(node) => eval_await(node, env),
        }
    }
}

fn eval_ident(node: &Ident, env: &Arc<Scope>) -> Value {
    if let Some(value) = env.get(&node.value) {
        return value;
    }
    if let Some(builtin) = Builtin::lookup(&node.value) {
        return Value::Builtin(builtin);
    }
    Value::Error(format!("ident not found: {}", node.value))
}

/// Left-to-right evaluation; the first error aborts the sweep.
fn eval_expressions(expressions: &[Expression], env: &Arc<Scope>) -> Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(expressions.len());
    for expression in expressions {
        let value = expression.eval(env);
        if value.is_error() {
            return Err(value);
        }
        values.push(value);
    }
    Ok(values)
}

fn eval_hash_literal(node: &HashLiteral, env: &Arc<Scope>) -> Value {
    let mut pairs = HashMap::new();
    for (key_expression, value_expression) in &node.pairs {
        let key = key_expression.eval(env);
        if key.is_error() {
            return key;
        }
        let Some(hash_key) = key.hash_key() else {
            return Value::Error(format!("unusable as hash key: {}", key.kind()));
        };
        let value = value_expression.eval(env);
        if value.is_error() {
            return value;
        }
        pairs.insert(hash_key, HashPair { key, value });
    }
    Value::Hash(Arc::new(pairs))
}

fn eval_if(node: &IfExpression, env: &Arc<Scope>) -> Value {
    let condition = node.condition.eval(env);
    if condition.is_error() {
        return condition;
    }
    if is_truthy(&condition) {
        node.consequence.eval(env)
    } else if let Some(alternative) = &node.alternative {
        alternative.eval(env)
    } else {
        Value::Null
    }
}

/// Only null and false are falsy.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Boolean(false))
}

fn eval_prefix(operator: &str, right: Value) -> Value {
    match operator {
        "!" => Value::Boolean(!is_truthy(&right)),
        "-" => match right {
            Value::Integer(value) => Value::Integer(value.wrapping_neg()),
            other => Value::Error(format!("unknown operator: -{}", other.kind())),
        },
        _ => Value::Error(format!("unknown operator: {}{}", operator, right.kind())),
    }
}

fn eval_infix(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Str(l), Value::Str(r)) => eval_string_infix(operator, l, r),
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        _ if operator == "==" => Value::Boolean(left.identity_eq(&right)),
        _ if operator == "!=" => Value::Boolean(!left.identity_eq(&right)),
        _ if left.kind() != right.kind() => Value::Error(format!(
            "type mismatch: {} {} {}",
            left.kind(),
            operator,
            right.kind()
        )),
        _ => Value::Error(format!(
            "unknown operator: {} {} {}",
            left.kind(),
            operator,
            right.kind()
        )),
    }
}

fn eval_integer_infix(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        }
        "<" => Value::Boolean(left < right),
        ">" => Value::Boolean(left > right),
        "==" => Value::Boolean(left == right),
        "!=" => Value::Boolean(left != right),
        _ => Value::Error(format!(
            "unknown operator: {} {} {}",
            Kind::Integer,
            operator,
            Kind::Integer
        )),
    }
}

fn eval_string_infix(operator: &str, left: &Arc<str>, right: &Arc<str>) -> Value {
    if operator != "+" {
        return Value::Error(format!(
            "unknown operator: {} {} {}",
            Kind::Str,
            operator,
            Kind::Str
        ));
    }
    let mut joined = String::with_capacity(left.len() + right.len());
    joined.push_str(left);
    joined.push_str(right);
    Value::Str(Arc::from(joined))
}

fn eval_index(left: Value, index: Value) -> Value {
    match (&left, &index) {
        (Value::Array(elements), Value::Integer(position)) => {
            if *position < 0 || *position as usize >= elements.len() {
                Value::Null
            } else {
                elements[*position as usize].clone()
            }
        }
        (Value::Hash(pairs), _) => {
            let Some(key) = index.hash_key() else {
                return Value::Error(format!("unusable as hash key: {}", index.kind()));
            };
            pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null)
        }
        _ => Value::Error(format!("index operator not supported: {}", left.kind())),
    }
}

/// Dispatch a call on the evaluated callee.
///
/// User functions get a fresh environment enclosed in their
/// definition-time environment, parameters bound positionally after an
/// arity check. Generator literals return a paused generator without
/// entering the body; async literals ship the body to the scheduler
/// and return the task handle.
pub fn apply_function(callee: Value, arguments: Vec<Value>) -> Value {
    match callee {
        Value::Function(function) => {
            if arguments.len() != function.parameters.len() {
                return Value::Error(format!(
                    "wrong number of args, got {}, want {}",
                    arguments.len(),
                    function.parameters.len()
                ));
            }
            let env = extended_env(&function, arguments);
            if function.is_async {
                debug!(gen = function.is_gen, "spawning async call");
                let task = sched::spawn(move || {
                    if function.is_gen {
                        Value::Generator(Arc::new(Generator::new(Arc::clone(&function), env)))
                    } else {
                        unwrap_return(function.body.eval(&env))
                    }
                });
                return Value::Task(task);
            }
            if function.is_gen {
                return Value::Generator(Arc::new(Generator::new(function, env)));
            }
            unwrap_return(function.body.eval(&env))
        }
        Value::Builtin(builtin) => builtin.apply(arguments),
        other => Value::Error(format!("not a function: {}", other.kind())),
    }
}

fn extended_env(function: &Function, arguments: Vec<Value>) -> Arc<Scope> {
    let env = Scope::enclosed(Arc::clone(&function.env));
    for (parameter, argument) in function.parameters.iter().zip(arguments) {
        env.set(parameter.value.clone(), argument);
    }
    env
}

pub fn unwrap_return(value: Value) -> Value {
    match value {
        Value::Return(inner) => *inner,
        other => other,
    }
}

fn eval_await(node: &AwaitExpression, env: &Arc<Scope>) -> Value {
    let task = match node.argument.eval(env) {
        Value::Task(task) => task,
        // awaiting a non-task (errors included) hands it straight back
        other => return other,
    };
    match task.wait() {
        Ok(resolved) => resolved,
        Err(sched::Cancelled) => {
            Value::Error("error has occurred while awaiting \u{2013} task cancelled".to_string())
        }
    }
}
