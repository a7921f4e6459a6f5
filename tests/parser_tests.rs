use glint::ast::expression::Expression;
use glint::ast::statement::Statement;
use glint::ast::Program;
use glint::lexer::Lexer;
use glint::parser::Parser;

fn parse(input: &str) -> Program {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    assert!(
        parser.errors().is_empty(),
        "parse errors for {input:?}: {:?}",
        parser.errors()
    );
    program
}

fn parse_errors(input: &str) -> Vec<String> {
    let mut parser = Parser::new(Lexer::new(input));
    parser.parse_program();
    parser.errors().iter().map(ToString::to_string).collect()
}

fn single_expression(program: &Program) -> &Expression {
    assert_eq!(program.statements.len(), 1, "want a single statement");
    match &program.statements[0] {
        Statement::Expression(statement) => &statement.expression,
        other => panic!("expected expression statement, got {other}"),
    }
}

#[test]
fn let_statements() {
    let program = parse("let x = 5; let y = true; let foobar = y;");
    assert_eq!(program.statements.len(), 3);

    let expected = [("x", "5"), ("y", "true"), ("foobar", "y")];
    for (statement, (name, value)) in program.statements.iter().zip(expected) {
        let Statement::Let(statement) = statement else {
            panic!("expected let statement, got {statement}");
        };
        assert_eq!(statement.name.value, name);
        assert_eq!(statement.value.to_string(), value);
    }
}

#[test]
fn return_statements() {
    let program = parse("return 5; return 10; return add(15);");
    assert_eq!(program.statements.len(), 3);
    for statement in &program.statements {
        assert!(matches!(statement, Statement::Return(_)));
    }
}

#[test]
fn identifier_expression() {
    let program = parse("foobar;");
    let Expression::Ident(ident) = single_expression(&program) else {
        panic!("expected identifier");
    };
    assert_eq!(ident.value, "foobar");
}

#[test]
fn integer_literal_expression() {
    let program = parse("5;");
    let Expression::Integer(literal) = single_expression(&program) else {
        panic!("expected integer literal");
    };
    assert_eq!(literal.value, 5);
}

#[test]
fn string_literal_expression() {
    let program = parse("\"hello world\";");
    let Expression::Str(literal) = single_expression(&program) else {
        panic!("expected string literal");
    };
    assert_eq!(literal.value, "hello world");
}

#[test]
fn prefix_expressions() {
    for (input, operator, operand) in [("!5;", "!", "5"), ("-15;", "-", "15")] {
        let program = parse(input);
        let Expression::Prefix(prefix) = single_expression(&program) else {
            panic!("expected prefix expression for {input:?}");
        };
        assert_eq!(prefix.operator, operator);
        assert_eq!(prefix.right.to_string(), operand);
    }
}

#[test]
fn infix_expressions() {
    let cases = [
        ("5 + 5;", "5", "+", "5"),
        ("5 - 5;", "5", "-", "5"),
        ("5 * 5;", "5", "*", "5"),
        ("5 / 5;", "5", "/", "5"),
        ("5 > 5;", "5", ">", "5"),
        ("5 < 5;", "5", "<", "5"),
        ("5 == 5;", "5", "==", "5"),
        ("5 != 5;", "5", "!=", "5"),
    ];
    for (input, left, operator, right) in cases {
        let program = parse(input);
        let Expression::Infix(infix) = single_expression(&program) else {
            panic!("expected infix expression for {input:?}");
        };
        assert_eq!(infix.left.to_string(), left);
        assert_eq!(infix.operator, operator);
        assert_eq!(infix.right.to_string(), right);
    }
}

#[test]
fn operator_precedence() {
    let cases = [
        ("-a * b", "((-a) * b)"),
        ("!-a", "(!(-a))"),
        ("a + b + c", "((a + b) + c)"),
        ("a + b - c", "((a + b) - c)"),
        ("a * b * c", "((a * b) * c)"),
        ("a * b / c", "((a * b) / c)"),
        ("a + b / c", "(a + (b / c))"),
        ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
        ("3 + 4; -5 * 5", "(3 + 4)((-5) * 5)"),
        ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
        ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
        ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
        ("true", "true"),
        ("false", "false"),
        ("3 > 5 == false", "((3 > 5) == false)"),
        ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
        ("(5 + 5) * 2", "((5 + 5) * 2)"),
        ("2 / (5 + 5)", "(2 / (5 + 5))"),
        ("-(5 + 5)", "(-(5 + 5))"),
        ("!(true == true)", "(!(true == true))"),
        ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
        (
            "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
            "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
        ),
        ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        ("a * [1, 2, 3, 4][b * c] * d", "((a * ([1, 2, 3, 4][(b * c)])) * d)"),
        ("add(a * b[2], b[1], 2 * [1, 2][1])", "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])))"),
    ];
    for (input, expected) in cases {
        let program = parse(input);
        assert_eq!(program.to_string(), expected, "for input {input:?}");
    }
}

#[test]
fn if_expression() {
    let program = parse("if (x < y) { x }");
    let Expression::If(expression) = single_expression(&program) else {
        panic!("expected if expression");
    };
    assert_eq!(expression.condition.to_string(), "(x < y)");
    assert_eq!(expression.consequence.statements.len(), 1);
    assert!(expression.alternative.is_none());
}

#[test]
fn if_else_expression() {
    let program = parse("if (x < y) { x } else { y }");
    let Expression::If(expression) = single_expression(&program) else {
        panic!("expected if expression");
    };
    let alternative = expression.alternative.as_ref().expect("alternative block");
    assert_eq!(alternative.statements.len(), 1);
    assert_eq!(alternative.to_string(), "y");
}

#[test]
fn function_literal() {
    let program = parse("fn(x, y) { x + y; }");
    let Expression::Function(function) = single_expression(&program) else {
        panic!("expected function literal");
    };
    let parameters: Vec<&str> = function
        .parameters
        .iter()
        .map(|parameter| parameter.value.as_str())
        .collect();
    assert_eq!(parameters, ["x", "y"]);
    assert_eq!(function.body.to_string(), "(x + y)");
    assert!(!function.is_async);
    assert!(!function.is_gen);
}

#[test]
fn function_parameter_lists() {
    let cases = [
        ("fn() {};", vec![]),
        ("fn(x) {};", vec!["x"]),
        ("fn(x, y, z) {};", vec!["x", "y", "z"]),
    ];
    for (input, expected) in cases {
        let program = parse(input);
        let Expression::Function(function) = single_expression(&program) else {
            panic!("expected function literal for {input:?}");
        };
        let parameters: Vec<&str> = function
            .parameters
            .iter()
            .map(|parameter| parameter.value.as_str())
            .collect();
        assert_eq!(parameters, expected);
    }
}

#[test]
fn generator_function_literal() {
    let program = parse("fn gen () { yield 1; }");
    let Expression::Function(function) = single_expression(&program) else {
        panic!("expected function literal");
    };
    assert!(function.is_gen);
    assert!(!function.is_async);
}

#[test]
fn async_function_literal() {
    let program = parse("async fn(x) { x }");
    let Expression::Function(function) = single_expression(&program) else {
        panic!("expected function literal");
    };
    assert!(function.is_async);
    assert!(!function.is_gen);
}

#[test]
fn async_generator_function_literal() {
    let program = parse("async fn gen () { yield 1; }");
    let Expression::Function(function) = single_expression(&program) else {
        panic!("expected function literal");
    };
    assert!(function.is_async);
    assert!(function.is_gen);
}

#[test]
fn yield_expression() {
    let program = parse("yield 5 + 5;");
    let Expression::Yield(expression) = single_expression(&program) else {
        panic!("expected yield expression");
    };
    assert_eq!(expression.argument.to_string(), "(5 + 5)");
}

#[test]
fn await_expression() {
    let program = parse("await(t)");
    let Expression::Await(expression) = single_expression(&program) else {
        panic!("expected await expression");
    };
    assert_eq!(expression.argument.to_string(), "t");
}

#[test]
fn await_requires_parentheses() {
    let errors = parse_errors("await t");
    assert!(!errors.is_empty());
    assert!(errors[0].contains("expected next token to be ("));
}

#[test]
fn call_expression() {
    let program = parse("add(1, 2 * 3, 4 + 5);");
    let Expression::Call(call) = single_expression(&program) else {
        panic!("expected call expression");
    };
    assert_eq!(call.function.to_string(), "add");
    assert_eq!(call.arguments.len(), 3);
    assert_eq!(call.arguments[1].to_string(), "(2 * 3)");
}

#[test]
fn array_literal() {
    let program = parse("[1, 2 * 2, 3 + 3]");
    let Expression::Array(array) = single_expression(&program) else {
        panic!("expected array literal");
    };
    assert_eq!(array.elements.len(), 3);
    assert_eq!(array.elements[2].to_string(), "(3 + 3)");
}

#[test]
fn index_expression() {
    let program = parse("myArray[1 + 1]");
    let Expression::Index(index) = single_expression(&program) else {
        panic!("expected index expression");
    };
    assert_eq!(index.left.to_string(), "myArray");
    assert_eq!(index.index.to_string(), "(1 + 1)");
}

#[test]
fn hash_literal_with_mixed_keys() {
    let program = parse("{\"one\": 1, two: 2, 3: 3, true: 4}");
    let Expression::Hash(hash) = single_expression(&program) else {
        panic!("expected hash literal");
    };
    let rendered: Vec<(String, String)> = hash
        .pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    assert_eq!(
        rendered,
        [
            ("one".into(), "1".into()),
            ("two".into(), "2".into()),
            ("3".into(), "3".into()),
            ("true".into(), "4".into()),
        ]
    );
}

#[test]
fn empty_hash_literal() {
    let program = parse("{}");
    let Expression::Hash(hash) = single_expression(&program) else {
        panic!("expected hash literal");
    };
    assert!(hash.pairs.is_empty());
}

#[test]
fn hash_literal_with_expression_values() {
    let program = parse("{\"one\": 0 + 1, \"two\": 10 - 8}");
    let Expression::Hash(hash) = single_expression(&program) else {
        panic!("expected hash literal");
    };
    assert_eq!(hash.pairs[0].1.to_string(), "(0 + 1)");
    assert_eq!(hash.pairs[1].1.to_string(), "(10 - 8)");
}

#[test]
fn hash_rejects_trailing_comma() {
    assert!(!parse_errors("{\"a\": 1,}").is_empty());
}

#[test]
fn hash_rejects_missing_comma() {
    assert!(!parse_errors("{\"a\": 1 \"b\": 2}").is_empty());
}

#[test]
fn missing_assign_is_recorded_and_parsing_continues() {
    let mut parser = Parser::new(Lexer::new("let x 5; let y = 7;"));
    let program = parser.parse_program();
    assert!(!parser.errors().is_empty());
    assert_eq!(parser.errors()[0].to_string(), "expected next token to be =, got INT");
    // the second statement still lands
    assert!(program
        .statements
        .iter()
        .any(|statement| matches!(statement, Statement::Let(stmt) if stmt.name.value == "y")));
}

#[test]
fn optional_semicolons() {
    let program = parse("5 + 5");
    assert_eq!(program.to_string(), "(5 + 5)");
}

#[test]
fn error_list_accumulates() {
    let errors = parse_errors("let x 12 * 3; let = 8; let 838383;");
    assert!(errors.len() >= 3, "got {errors:?}");
}
