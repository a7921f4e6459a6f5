//! End-to-end runs through the public pipeline entry point, checking
//! the inspection string a shell user would see.

use glint::interpreter::Scope;

fn inspect(input: &str) -> String {
    let env = Scope::new();
    glint::run(input, &env)
        .expect("program should parse")
        .to_string()
}

#[test]
fn arithmetic_end_to_end() {
    assert_eq!(inspect("(5 + 5 + 5 + 5 - 10 * 2) + 5 / 5"), "1");
}

#[test]
fn nested_returns_end_to_end() {
    assert_eq!(
        inspect("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
        "10"
    );
}

#[test]
fn string_concatenation_end_to_end() {
    assert_eq!(inspect("\"hello\" + \" \" + \"world\""), "hello world");
}

#[test]
fn hash_lookup_end_to_end() {
    assert_eq!(
        inspect(
            "let two = \"two\"; {\"one\":1, two:2, \"thr\"+\"ee\":3, 4:4, true:5, false:6}[true]"
        ),
        "5"
    );
}

#[test]
fn generator_end_to_end() {
    assert_eq!(
        inspect(
            "let s = fn gen () { yield 2; yield 0; yield 6; yield 1; };
             let g = s();
             next(g); next(g); next(g);"
        ),
        "{done:false, val:6}"
    );
}

#[test]
fn async_await_end_to_end() {
    assert_eq!(inspect("let s = async fn(x) { sleep(0); x }; await(s(5))"), "5");
}

#[test]
fn type_mismatch_end_to_end() {
    assert_eq!(inspect("5 + true"), "ERROR: type mismatch: INTEGER + BOOLEAN");
}

#[test]
fn unhashable_key_end_to_end() {
    assert_eq!(
        inspect("{\"name\":\"y\"}[fn(x){x}]"),
        "ERROR: unusable as hash key: FUNCTION"
    );
}

#[test]
fn a_shared_environment_carries_state_between_runs() {
    let env = Scope::new();
    glint::run("let counter = fn(x) { x + 1 };", &env).expect("should parse");
    let value = glint::run("counter(41)", &env).expect("should parse");
    assert_eq!(value.to_string(), "42");
}

#[test]
fn parse_errors_come_back_as_a_batch() {
    let env = Scope::new();
    let errors = glint::run("let x 5; await t;", &env).expect_err("should not parse");
    assert_eq!(errors.len(), 2);
}
