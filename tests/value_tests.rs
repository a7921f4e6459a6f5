use std::sync::Arc;

use glint::interpreter::{fnv1a, Iteration, Kind, Value};

#[test]
fn equal_strings_share_a_hash_key() {
    let hello1 = Value::Str(Arc::from("Hello World"));
    let hello2 = Value::Str(Arc::from("Hello World"));
    let diff1 = Value::Str(Arc::from("My name is johnny"));
    let diff2 = Value::Str(Arc::from("My name is johnny"));

    assert_eq!(hello1.hash_key(), hello2.hash_key());
    assert_eq!(diff1.hash_key(), diff2.hash_key());
    assert_ne!(hello1.hash_key(), diff1.hash_key());
}

#[test]
fn integer_and_boolean_keys_use_the_raw_value() {
    assert_eq!(Value::Integer(42).hash_key(), Value::Integer(42).hash_key());
    assert_ne!(Value::Integer(1).hash_key(), Value::Integer(2).hash_key());
    assert_eq!(
        Value::Boolean(true).hash_key(),
        Value::Boolean(true).hash_key()
    );
    // same digest, different kind: the key carries both
    assert_ne!(Value::Integer(1).hash_key(), Value::Boolean(true).hash_key());
}

#[test]
fn only_integers_strings_and_booleans_are_hashable() {
    assert!(Value::Null.hash_key().is_none());
    assert!(Value::Array(Arc::new(vec![])).hash_key().is_none());
}

#[test]
fn fnv1a_matches_the_reference_vectors() {
    assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
    assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    assert_eq!(fnv1a(b"foobar"), 0x8594_4171_f739_67e8);
}

#[test]
fn identity_compares_singletons_by_value() {
    assert!(Value::Boolean(true).identity_eq(&Value::Boolean(true)));
    assert!(!Value::Boolean(true).identity_eq(&Value::Boolean(false)));
    assert!(Value::Null.identity_eq(&Value::Null));
}

#[test]
fn identity_compares_heap_values_by_pointer() {
    let array = Value::Array(Arc::new(vec![Value::Integer(1)]));
    let alias = array.clone();
    let lookalike = Value::Array(Arc::new(vec![Value::Integer(1)]));

    assert!(array.identity_eq(&alias));
    assert!(!array.identity_eq(&lookalike));
}

#[test]
fn identity_never_crosses_kinds() {
    assert!(!Value::Integer(1).identity_eq(&Value::Boolean(true)));
    assert!(!Value::Null.identity_eq(&Value::Boolean(false)));
}

#[test]
fn kinds_render_their_uppercase_names() {
    assert_eq!(Value::Integer(1).kind().to_string(), "INTEGER");
    assert_eq!(Value::Str(Arc::from("x")).kind().to_string(), "STRING");
    assert_eq!(Value::Boolean(true).kind().to_string(), "BOOLEAN");
    assert_eq!(Value::Null.kind().to_string(), "NULL");
    assert_eq!(Value::Array(Arc::new(vec![])).kind().to_string(), "ARRAY");
    assert_eq!(Value::Error(String::new()).kind().to_string(), "ERROR");
    assert_eq!(Value::Integer(1).kind(), Kind::Integer);
}

#[test]
fn inspection_strings() {
    assert_eq!(Value::Integer(-7).to_string(), "-7");
    assert_eq!(Value::Boolean(true).to_string(), "true");
    assert_eq!(Value::Null.to_string(), "null");
    assert_eq!(Value::Str(Arc::from("raw text")).to_string(), "raw text");
    assert_eq!(
        Value::Array(Arc::new(vec![Value::Integer(1), Value::Str(Arc::from("two"))])).to_string(),
        "[1, two]"
    );
    assert_eq!(
        Value::Error("type mismatch: INTEGER + BOOLEAN".into()).to_string(),
        "ERROR: type mismatch: INTEGER + BOOLEAN"
    );
    assert_eq!(
        Value::Iteration(Iteration {
            done: false,
            value: Box::new(Value::Integer(6)),
        })
        .to_string(),
        "{done:false, val:6}"
    );
    assert_eq!(
        Value::Iteration(Iteration {
            done: true,
            value: Box::new(Value::Null),
        })
        .to_string(),
        "{done:true, val:null}"
    );
}

#[test]
fn sentinels_display_their_payload() {
    assert_eq!(Value::Return(Box::new(Value::Integer(3))).to_string(), "3");
    assert_eq!(Value::Yield(Box::new(Value::Integer(4))).to_string(), "4");
    assert_eq!(Value::Return(Box::new(Value::Integer(3))).kind(), Kind::Return);
    assert_eq!(Value::Yield(Box::new(Value::Integer(4))).kind(), Kind::Yield);
}
