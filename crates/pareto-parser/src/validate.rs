//! Schema validation of provisional commands.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. the `family.function` pair is registered;
//! 2. every required parameter is present, in declaration order;
//! 3. each supplied parameter, in supplied order, is declared, has the
//!    declared type, is in the allowed set if there is one, and passes the
//!    custom validator if one is registered.

use log::debug;

use pareto_core::{
    command::CommandObject,
    schema::{FunctionSpec, Lookup, SchemaRegistry},
    value::Value,
};

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    parser_types::DirectiveSpans,
};

fn list(names: impl Iterator<Item = String>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

fn unknown_family(
    registry: &SchemaRegistry,
    family: &str,
    spans: &DirectiveSpans,
) -> Diagnostic {
    let known = list(registry.families().map(|f| f.name().to_string()));
    Diagnostic::error(format!("unknown family `{family}`"))
        .with_code(ErrorCode::E200)
        .with_label(spans.family, "unknown family")
        .with_help(format!("known families: {known}"))
}

fn unknown_function(
    registry: &SchemaRegistry,
    command: &CommandObject,
    spans: &DirectiveSpans,
) -> Diagnostic {
    let family = command.family();
    let functions = list(registry.functions(family).map(|f| f.name().to_string()));
    let help = if functions.is_empty() {
        format!("family `{family}` has no functions")
    } else {
        format!("functions of `{family}`: {functions}")
    };
    Diagnostic::error(format!(
        "unknown function `{}` in family `{family}`",
        command.function()
    ))
    .with_code(ErrorCode::E201)
    .with_label(spans.function, "unknown function")
    .with_help(help)
}

fn check_required(
    spec: &FunctionSpec,
    command: &CommandObject,
    spans: &DirectiveSpans,
) -> Result<()> {
    let Some(missing) = spec
        .required()
        .iter()
        .find(|name| command.get(name).is_none())
    else {
        return Ok(());
    };

    Err(Diagnostic::error(format!("missing required parameter `{missing}`"))
        .with_code(ErrorCode::E202)
        .with_label(spans.head(), format!("`{}` requires `{missing}`", spec.key()))
        .with_help(format!("add `{missing}=<value>` to the parameter block")))
}

fn check_parameter(
    registry: &SchemaRegistry,
    spec: &FunctionSpec,
    name: &str,
    value: &Value,
    spans: &DirectiveSpans,
) -> Result<()> {
    let Some(param) = spec.parameter(name) else {
        let declared = list(spec.parameters().keys().cloned());
        let help = if declared.is_empty() {
            format!("`{}` takes no parameters", spec.key())
        } else {
            format!("parameters of `{}`: {declared}", spec.key())
        };
        return Err(Diagnostic::error(format!("unknown parameter `{name}`"))
            .with_code(ErrorCode::E203)
            .with_label(spans.name(name), "unknown parameter")
            .with_help(help));
    };

    let tag = param.type_tag();
    if !registry.type_validator(tag)(value) {
        return Err(Diagnostic::error(format!(
            "parameter `{name}` expects {tag}, found {} `{value}`",
            value.kind_name()
        ))
        .with_code(ErrorCode::E300)
        .with_label(spans.value(name), format!("expected {tag}")));
    }

    if !param.permits(value) {
        let allowed = list(param.allowed().unwrap_or_default().iter().map(Value::to_string));
        return Err(
            Diagnostic::error(format!("value `{value}` is not allowed for parameter `{name}`"))
                .with_code(ErrorCode::E301)
                .with_label(spans.value(name), "value not allowed")
                .with_help(format!("allowed values: {allowed}")),
        );
    }

    if let Some(validator) = registry.custom_validator(spec.family(), spec.name(), name) {
        if !validator(value) {
            let expectation = param.validator().map_or("a valid value", |v| v.expectation());
            return Err(Diagnostic::error(format!(
                "parameter `{name}` rejected value `{value}`: expected {expectation}"
            ))
            .with_code(ErrorCode::E302)
            .with_label(spans.value(name), "rejected by validator"));
        }
    }

    Ok(())
}

/// Validate `command` against `registry`, failing at the first violation.
pub(crate) fn validate_command(
    registry: &SchemaRegistry,
    command: &CommandObject,
    spans: &DirectiveSpans,
) -> Result<()> {
    let spec = match registry.lookup(command.family(), command.function()) {
        Lookup::Found(spec) => spec,
        Lookup::UnknownFamily => return Err(unknown_family(registry, command.family(), spans)),
        Lookup::UnknownFunction => return Err(unknown_function(registry, command, spans)),
    };

    check_required(spec, command, spans)?;
    for (name, value) in command.parameters() {
        check_parameter(registry, spec, name, value, spans)?;
    }

    debug!(
        family = command.family(),
        function = command.function(),
        parameters = command.parameters().len();
        "Directive validated"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use pareto_core::schema::{CustomValidator, ParamSpec, RegistryBuilder, TypeTag};

    use super::*;
    use crate::{lexer::tokenize, parser::build_directive, span::Span};

    fn registry() -> SchemaRegistry {
        RegistryBuilder::new()
            .family("probe", "Test probes")
            .family("empty", "No functions")
            .function(
                FunctionSpec::new("probe", "scan")
                    .with_parameter("target", ParamSpec::new(TypeTag::String))
                    .with_parameter(
                        "mode",
                        ParamSpec::new(TypeTag::String).with_allowed(["fast", "slow"]),
                    )
                    .with_parameter(
                        "level",
                        ParamSpec::new(TypeTag::Float)
                            .with_validator(CustomValidator::UnitInterval),
                    )
                    .with_required("target"),
            )
            .build()
            .expect("test registry should build")
    }

    fn check(text: &str) -> Result<()> {
        let tokens = tokenize(text).expect("test input should tokenize");
        let raw = build_directive(&tokens).expect("test input should parse");
        let (command, spans) = raw.coerce(text);
        validate_command(&registry(), &command, &spans)
    }

    fn check_err(text: &str) -> Diagnostic {
        match check(text) {
            Ok(()) => panic!("expected {text:?} to fail validation"),
            Err(diag) => diag,
        }
    }

    #[test]
    fn test_valid_command() {
        assert!(check(".p/probe.scan{target=x, mode=fast, level=0.5}").is_ok());
    }

    #[test]
    fn test_unknown_family_and_function() {
        let diag = check_err(".p/nope.scan{}");
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.message(), "unknown family `nope`");
        assert_eq!(diag.primary_span(), Some(Span::new(3..7)));

        let diag = check_err(".p/probe.missing");
        assert_eq!(diag.code(), Some(ErrorCode::E201));
        assert_eq!(diag.message(), "unknown function `missing` in family `probe`");

        let diag = check_err(".p/empty.anything");
        assert_eq!(diag.code(), Some(ErrorCode::E201));
        assert_eq!(diag.help(), Some("family `empty` has no functions"));
    }

    #[test]
    fn test_required_checked_before_unknown() {
        let diag = check_err(".p/probe.scan{bogus=1}");
        assert_eq!(diag.code(), Some(ErrorCode::E202));
        assert_eq!(diag.message(), "missing required parameter `target`");
    }

    #[test]
    fn test_supplied_order_decides() {
        let diag = check_err(".p/probe.scan{target=x, mode=medium, bogus=1}");
        assert_eq!(diag.code(), Some(ErrorCode::E301));

        let diag = check_err(".p/probe.scan{target=x, bogus=1, mode=medium}");
        assert_eq!(diag.code(), Some(ErrorCode::E203));
        assert_eq!(diag.primary_span(), Some(Span::new(24..29)));
    }

    #[test]
    fn test_type_mismatch() {
        let diag = check_err(".p/probe.scan{target=[a, b]}");
        assert_eq!(diag.code(), Some(ErrorCode::E300));
        assert_eq!(diag.message(), "parameter `target` expects string, found list `[a, b]`");
        assert_eq!(diag.primary_span(), Some(Span::new(21..27)));
    }

    #[test]
    fn test_custom_validator() {
        let diag = check_err(".p/probe.scan{target=x, level=1.5}");
        assert_eq!(diag.code(), Some(ErrorCode::E302));
        assert_eq!(
            diag.message(),
            "parameter `level` rejected value `1.5`: expected a number between 0 and 1"
        );
    }
}
