//! Integration tests for the DirectiveEngine API

use std::fs;

use tempfile::tempdir;

use pareto::{
    DirectiveEngine, ParetoError,
    config::{AppConfig, ExtractConfig, RegistryConfig},
    schema::builtin_registry,
    value::Value,
};

const AUDIT: &str = r#"
[[family]]
name = "audit"
description = "Audit directives"

[[function]]
family = "audit"
name = "log"
required = ["level"]

[function.parameters.level]
type = "string"
allowed = ["info", "warn"]

[function.handler]
module = "audit.module"
function = "AuditOperation.log"
parameter_mapping = { level = "severity" }
"#;

#[test]
fn test_default_engine_parses() {
    let engine = DirectiveEngine::new(AppConfig::default()).expect("Failed to build engine");

    let command = engine
        .parse(".p/reflect.trace{depth=3, target=reasoning}")
        .expect("Failed to parse");
    assert_eq!(command.key(), "reflect.trace");
    assert_eq!(command.get("depth"), Some(&Value::Integer(3)));
}

#[test]
fn test_parse_error_carries_source() {
    let engine = DirectiveEngine::new(AppConfig::default()).unwrap();
    let source = ".p/reflect.trace{depth:3}";

    match engine.parse(source) {
        Err(ParetoError::Parse { err, src }) => {
            assert_eq!(src, source);
            assert_eq!(err.position(), 22);
        }
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_syntax_only_parse() {
    let engine = DirectiveEngine::new(AppConfig::default()).unwrap();

    let command = engine
        .parse_syntax(".p/anything.goes{x=1}")
        .expect("Failed to parse");
    assert_eq!(command.key(), "anything.goes");
    assert!(engine.parse(".p/anything.goes{x=1}").is_err());
}

#[test]
fn test_extract_respects_limit() {
    let text = concat!(
        ".p/reflect.trace{target=reasoning} ",
        ".p/reflect.trace{target=memory} ",
        ".p/reflect.trace{target=syntax}"
    );

    let unlimited = DirectiveEngine::new(AppConfig::default()).unwrap();
    assert_eq!(unlimited.extract(text).len(), 3);

    let config = AppConfig::new(RegistryConfig::default(), ExtractConfig::new(Some(2)));
    let limited = DirectiveEngine::new(config).unwrap();
    let commands = limited.extract(text);
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[1].get("target"), Some(&Value::string("memory")));
}

#[test]
fn test_registry_file_extends_builtin() {
    let dir = tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("audit.toml");
    fs::write(&path, AUDIT).unwrap();

    let engine = DirectiveEngine::new(AppConfig::default().with_registry_path(&path))
        .expect("Failed to build engine");

    let command = engine.parse(".p/audit.log{level=warn}").expect("Failed to parse");
    let invocation = engine.plan(&command).expect("audit.log has a handler");
    assert_eq!(invocation.function(), "AuditOperation.log");
    assert_eq!(
        invocation.arguments().get("severity"),
        Some(&Value::string("warn"))
    );

    assert!(engine.parse(".p/reflect.trace{target=reasoning}").is_ok());
    assert!(engine.parse(".p/audit.log{level=debug}").is_err());
}

#[test]
fn test_registry_file_without_builtin() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.toml");
    fs::write(&path, AUDIT).unwrap();

    let config = AppConfig::new(
        RegistryConfig::new(Some(path), false),
        ExtractConfig::default(),
    );
    let engine = DirectiveEngine::new(config).unwrap();

    assert_eq!(engine.schema().families().count(), 1);
    assert!(engine.parse(".p/reflect.trace{target=reasoning}").is_err());
}

#[test]
fn test_missing_registry_file() {
    let dir = tempdir().unwrap();
    let config = AppConfig::default().with_registry_path(dir.path().join("missing.toml"));

    assert!(matches!(
        DirectiveEngine::new(config),
        Err(ParetoError::Io(_))
    ));
}

#[test]
fn test_reload_swaps_registry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.toml");
    fs::write(&path, "").unwrap();

    let config = AppConfig::default().with_registry_path(&path);
    let engine = DirectiveEngine::new(config).unwrap();
    assert!(engine.parse(".p/audit.log{level=info}").is_err());

    let before = engine.schema();
    fs::write(&path, AUDIT).unwrap();
    engine.reload_registry().expect("Failed to reload");

    assert!(engine.parse(".p/audit.log{level=info}").is_ok());
    assert!(!before.has_family("audit"));
}

#[test]
fn test_failed_reload_keeps_registry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.toml");
    fs::write(&path, AUDIT).unwrap();

    let engine = DirectiveEngine::new(AppConfig::default().with_registry_path(&path)).unwrap();
    fs::write(&path, "[[function]]\nfamily = \"nowhere\"\nname = \"go\"\n").unwrap();

    assert!(matches!(
        engine.reload_registry(),
        Err(ParetoError::Registry(_))
    ));
    assert!(engine.parse(".p/audit.log{level=info}").is_ok());
}

#[test]
fn test_with_registry() {
    let engine = DirectiveEngine::with_registry(AppConfig::default(), builtin_registry().unwrap());
    assert_eq!(engine.schema().function_count(), 16);
}

#[test]
fn test_family_functions() {
    let engine = DirectiveEngine::new(AppConfig::default()).unwrap();

    let names: Vec<_> = engine
        .family_functions("fork")
        .unwrap()
        .iter()
        .map(|spec| spec.name().to_string())
        .collect();
    assert_eq!(names, ["context", "attribution"]);

    assert!(engine.family_functions("emit").unwrap().is_empty());
    assert!(matches!(
        engine.family_functions("nope"),
        Err(ParetoError::UnknownFamily(name)) if name == "nope"
    ));
}
