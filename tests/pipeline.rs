use reckon::{
    EnvError, Environment, Error, EvalError, Interpreter, Node, NodeKind, ParseError, RuntimeVal,
    ScopeId, Span, TokenKind, evaluate, parse_str, tokenize, tokenize_with_warnings,
};

fn eval(source: &str) -> Result<RuntimeVal, Error> {
    Interpreter::new().eval_str(source)
}

fn number(source: &str) -> f64 {
    match eval(source) {
        Ok(RuntimeVal::Number(n)) => n,
        other => panic!("Expected a number for '{}', got {:?}", source, other),
    }
}

#[test]
fn lexes_the_reference_expression() {
    let kinds: Vec<(TokenKind, String)> = tokenize("12+34*(5-6)")
        .into_iter()
        .map(|t| (t.kind, t.value))
        .collect();
    let expected = [
        (TokenKind::Number, "12"),
        (TokenKind::BinaryOperator, "+"),
        (TokenKind::Number, "34"),
        (TokenKind::BinaryOperator, "*"),
        (TokenKind::OpenParen, "("),
        (TokenKind::Number, "5"),
        (TokenKind::BinaryOperator, "-"),
        (TokenKind::Number, "6"),
        (TokenKind::CloseParen, ")"),
        (TokenKind::EndOfFile, "EndOfFile"),
    ]
    .map(|(kind, value)| (kind, value.to_string()));
    assert_eq!(kinds, expected);
}

#[test]
fn exactly_one_end_of_file() {
    for source in ["", "1", "(((", "let x = 5", "¿?"] {
        let tokens = tokenize(source);
        let eofs = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::EndOfFile)
            .count();
        assert_eq!(eofs, 1, "Input: '{}'", source);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfFile));
    }
}

#[test]
fn precedence_associativity_and_grouping() {
    assert_eq!(number("2+3*4"), 14.0);
    assert_eq!(number("10-2-3"), 5.0);
    assert_eq!(number("2*3%4"), 2.0);
    assert_eq!(number("(2+3)*4"), 20.0);
    assert_eq!(number("((1+2)*(3+4))%5"), 1.0);
}

#[test]
fn null_operands_never_crash() {
    assert_eq!(eval("null * 3"), Ok(RuntimeVal::Null));
    assert_eq!(eval("1 + (null - 2)"), Ok(RuntimeVal::Null));
}

#[test]
fn empty_program_is_null() {
    assert_eq!(eval(""), Ok(RuntimeVal::Null));
}

#[test]
fn relexing_and_reparsing_is_deterministic() {
    let source = "width * (height + 3) % 7 - depth / 2";
    assert_eq!(tokenize(source), tokenize(source));
    assert_eq!(parse_str(source), parse_str(source));
}

#[test]
fn duplicate_declaration_and_shadowing() {
    let mut env = Environment::new();
    env.declare(ScopeId::GLOBAL, "x", RuntimeVal::Number(1.0), Span::default())
        .expect("first declaration");
    assert!(matches!(
        env.declare(ScopeId::GLOBAL, "x", RuntimeVal::Number(2.0), Span::default()),
        Err(EnvError::DuplicateDeclaration(..))
    ));

    let child = env.new_scope(ScopeId::GLOBAL);
    assert_eq!(
        env.declare(child, "x", RuntimeVal::Number(3.0), Span::default()),
        Ok(RuntimeVal::Number(3.0))
    );
    let program = parse_str("x * 10").expect("should parse");
    assert_eq!(
        evaluate(&program, &env, child),
        Ok(RuntimeVal::Number(30.0))
    );
    assert_eq!(
        evaluate(&program, &env, ScopeId::GLOBAL),
        Ok(RuntimeVal::Number(10.0))
    );
}

#[test]
fn resolving_undeclared_name_fails() {
    let env = Environment::new();
    assert!(matches!(
        env.resolve(ScopeId::GLOBAL, "ghost", Span::default()),
        Err(EnvError::UnresolvedVariable(name, _)) if name == "ghost"
    ));
}

#[test]
fn leading_invalid_character_is_skipped_end_to_end() {
    let (tokens, warnings) = tokenize_with_warnings("@42");
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(warnings.len(), 1);
    assert_eq!(number("@42"), 42.0);
}

#[test]
fn parse_errors_are_fail_fast() {
    assert!(matches!(
        eval("1 + * 2"),
        Err(Error::Parse(ParseError::UnexpectedToken { .. }))
    ));
    assert!(matches!(
        eval("(1 + 2 3"),
        Err(Error::Parse(ParseError::MissingCloseParen { .. }))
    ));
}

#[test]
fn nested_program_is_an_evaluation_error() {
    let nested = Node::new_program(
        vec![Node::new_program(vec![], Span::new(0, 0))],
        Span::new(0, 0),
    );
    assert!(matches!(nested.kind, NodeKind::Program(_)));
    assert!(matches!(
        evaluate(&nested, &Environment::new(), ScopeId::GLOBAL),
        Err(EvalError::UnexpectedNode { .. })
    ));
}

#[test]
fn deep_nesting_is_rejected_without_disturbing_the_session() {
    let mut interpreter = Interpreter::new();
    interpreter
        .declare("x", RuntimeVal::Number(4.0))
        .expect("declaration");
    let deep = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    assert!(matches!(
        interpreter.eval_str(&deep),
        Err(Error::Parse(ParseError::TooDeep { .. }))
    ));
    assert!(interpreter.eval_str(&"1+(".repeat(200_000)).is_err());
    assert_eq!(interpreter.eval_str("x * 2"), Ok(RuntimeVal::Number(8.0)));
}

#[test]
fn scope_ids_from_another_environment_are_errors() {
    let mut first = Environment::new();
    let foreign = first.new_scope(ScopeId::GLOBAL);
    let mut second = Environment::new();
    assert!(matches!(
        second.resolve(foreign, "x", Span::default()),
        Err(EnvError::UnresolvedVariable(..))
    ));
    assert!(matches!(
        second.declare(foreign, "x", RuntimeVal::Number(1.0), Span::default()),
        Err(EnvError::UnknownScope(..))
    ));
}
