use pareto_core::{
    dispatch::plan_invocation,
    schema::{SchemaRegistry, builtin_registry},
    value::Value,
};
use pareto_parser::{
    TokenKind, coerce,
    error::{ErrorCode, ErrorKind},
    extract, parse, parse_syntax, scan, tokenize,
};

fn registry() -> SchemaRegistry {
    builtin_registry().expect("Failed to build built-in registry")
}

#[test]
fn test_trace_directive() {
    let command =
        parse(".p/reflect.trace{depth=3, target=reasoning}", &registry()).expect("Failed to parse");

    assert_eq!(command.family(), "reflect");
    assert_eq!(command.function(), "trace");
    assert_eq!(command.parameters().len(), 2);
    assert_eq!(command.get("depth"), Some(&Value::Integer(3)));
    assert_eq!(command.get("target"), Some(&Value::string("reasoning")));
}

#[test]
fn test_detect_directive() {
    let command = parse(".p/collapse.detect{threshold=0.7, alert=true}", &registry())
        .expect("Failed to parse");

    assert_eq!(command.get("threshold"), Some(&Value::Float(0.7)));
    assert_eq!(command.get("alert"), Some(&Value::Boolean(true)));
}

#[test]
fn test_syntax_only_accepts_unregistered_contracts() {
    let command = parse_syntax(".p/reflect.trace{depth=complete}").expect("Failed to parse");
    assert_eq!(command.get("depth"), Some(&Value::string("complete")));

    // The built-in contract requires `target`.
    let err = parse(".p/reflect.trace{depth=complete}", &registry()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Schema);
}

#[test]
fn test_schema_errors() {
    let err = parse(".p/unknown_family.foo{}", &registry()).unwrap_err();
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E200));
    assert!(err.message().contains("unknown_family"));

    let err = parse(".p/reflect.trace{}", &registry()).unwrap_err();
    assert_eq!(err.diagnostic().code(), Some(ErrorCode::E202));
    assert!(err.message().contains("target"));
}

#[test]
fn test_error_pointer() {
    let err = parse(".p/reflect.trace{depth:3}", &registry()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Lexical);
    assert_eq!(
        err.pointer(),
        "expected `=` after parameter name\n.p/reflect.trace{depth:3}\n                      ^"
    );
}

#[test]
fn test_extract_from_free_text() {
    let text = "Use .p/reflect.trace{depth=1,target=reasoning} now and also .p/bad!!syntax";
    let commands = extract(text, &registry());

    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].key(), "reflect.trace");
    assert_eq!(commands[0].get("target"), Some(&Value::string("reasoning")));
}

#[test]
fn test_tokens_and_scan() {
    let tokens = tokenize(".p/fork.context{branches=[a, b]}").expect("Failed to tokenize");
    assert_eq!(tokens.len(), 10);
    assert_eq!(tokens[7].text, "[a, b]");
    assert_eq!(tokens[8].kind, TokenKind::ParamClose);

    let tokens = scan(".p/fork.context{branches=[a, b}");
    let invalid = &tokens[tokens.len() - 2];
    assert_eq!(invalid.kind, TokenKind::Invalid);
    assert_eq!(invalid.text, "[a, b}");
}

#[test]
fn test_coerce_is_public() {
    assert_eq!(coerce("'42'"), Value::string("42"));
    assert_eq!(coerce("42"), Value::Integer(42));
}

#[test]
fn test_parsed_command_plans_invocation() {
    let registry = registry();
    let command =
        parse(".p/collapse.prevent{trigger=oscillation, threshold=3}", &registry).unwrap();

    let invocation = plan_invocation(&registry, &command).expect("collapse.prevent has a handler");
    assert_eq!(invocation.module(), "transformerOS.modules.collapse_module");
    assert_eq!(invocation.function(), "CollapseOperation.prevent");
    assert_eq!(invocation.arguments().get("threshold"), Some(&Value::Integer(3)));
}
