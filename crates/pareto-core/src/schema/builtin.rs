//! The built-in directive vocabulary.

use crate::{
    error::Result,
    schema::{
        function_spec::{FunctionSpec, HandlerRef, ParamSpec},
        registry::{RegistryBuilder, SchemaRegistry},
        type_tag::TypeTag,
        validators::CustomValidator,
    },
    value::Value,
};

const REFLECT_MODULE: &str = "transformerOS.modules.reflect_module";
const COLLAPSE_MODULE: &str = "transformerOS.modules.collapse_module";
const GHOSTCIRCUIT_MODULE: &str = "transformerOS.modules.ghostcircuits_module";
const FORK_MODULE: &str = "transformerOS.modules.fork_module";

const FAMILIES: [(&str, &str); 19] = [
    ("reflect", "Trace reasoning, attribution and other cognitive processes"),
    ("collapse", "Detect, prevent and recover from recursive collapse"),
    ("fork", "Create parallel branches for alternative analysis"),
    ("shell", "Isolate and lock execution environments"),
    ("anchor", "Pin identity and context references"),
    ("meta", "Operate on the analysis process itself"),
    ("ghostcircuit", "Identify latent activation patterns"),
    ("gradient", "Track drift across a trajectory"),
    ("disentangle", "Separate entangled features"),
    ("plan", "Structure multi-step intentions"),
    ("validate", "Check outputs against expectations"),
    ("loopback", "Feed results back into the input"),
    ("unite", "Merge branches back together"),
    ("self", "Inspect self-reference"),
    ("emit", "Emit signals and markers"),
    ("trace", "Record execution paths"),
    ("qk", "Inspect query-key alignment"),
    ("shift", "Move focus between contexts"),
    ("memory", "Inspect retention and decay"),
];

fn flag(default: bool) -> ParamSpec {
    ParamSpec::new(TypeTag::Boolean).with_default(default)
}

fn choice(default: &str, allowed: &[&str]) -> ParamSpec {
    ParamSpec::new(TypeTag::String)
        .with_default(default)
        .with_allowed(allowed.iter().copied())
}

fn reflect_functions() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("reflect", "trace")
            .with_description("Maps the causal flow of computation through token space")
            .with_parameter(
                "target",
                choice(
                    "reasoning",
                    &[
                        "reasoning",
                        "attribution",
                        "attention",
                        "memory",
                        "uncertainty",
                        "identity",
                        "causal_bridge",
                        "meta-node-cascade",
                        "classifier-pressure",
                        "attribution_path",
                        "temporal_vector_sync",
                        "symbolic",
                        "syntax",
                    ],
                )
                .with_validator(CustomValidator::String)
                .with_description("Target aspect to trace"),
            )
            .with_parameter(
                "depth",
                ParamSpec::new(TypeTag::StringOrInt)
                    .with_default(Value::Integer(3))
                    .with_validator(CustomValidator::RecursionDepth)
                    .with_description("Recursion depth (integer or `complete`)"),
            )
            .with_parameter("detailed", flag(true))
            .with_parameter("visualize", flag(false))
            .with_required("target")
            .with_handler(HandlerRef::new(REFLECT_MODULE, "ReflectOperation.trace")),
        FunctionSpec::new("reflect", "attribution")
            .with_description("Maps source-to-token causal relationships")
            .with_parameter(
                "sources",
                choice(
                    "all",
                    &[
                        "all",
                        "primary",
                        "secondary",
                        "contested",
                        "policy",
                        "user",
                        "memory",
                        "custom",
                    ],
                )
                .with_validator(CustomValidator::StringOrList)
                .with_description("Which sources to include"),
            )
            .with_parameter("confidence", flag(true))
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(REFLECT_MODULE, "ReflectOperation.attribution")),
        FunctionSpec::new("reflect", "boundary")
            .with_description("Maps epistemic boundaries of model knowledge")
            .with_parameter("distinct", flag(true))
            .with_parameter("overlap", choice("minimal", &["minimal", "moderate", "maximal"]))
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(REFLECT_MODULE, "ReflectOperation.boundary")),
        FunctionSpec::new("reflect", "uncertainty")
            .with_description("Quantifies and maps uncertainty across token space")
            .with_parameter("quantify", flag(true))
            .with_parameter("distribution", choice("show", &["show", "hide"]))
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(REFLECT_MODULE, "ReflectOperation.uncertainty")),
        FunctionSpec::new("reflect", "meta")
            .with_description("Reflects on the reflection process itself")
            .with_parameter(
                "level",
                ParamSpec::new(TypeTag::Integer).with_default(Value::Integer(3)),
            )
            .with_parameter(
                "target",
                choice(
                    "reasoning",
                    &[
                        "reasoning",
                        "attribution",
                        "cognition",
                        "self",
                        "language",
                        "co-emergence",
                    ],
                ),
            )
            .with_required("level"),
        FunctionSpec::new("reflect", "agent")
            .with_description("Examines agent identity and simulation boundaries")
            .with_parameter("identity", choice("stable", &["stable", "fluid"]))
            .with_parameter("simulation", choice("explicit", &["explicit", "implicit"]))
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(REFLECT_MODULE, "ReflectOperation.agent")),
    ]
}

fn collapse_functions() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("collapse", "detect")
            .with_description("Identifies potential recursion collapse points")
            .with_parameter(
                "threshold",
                ParamSpec::new(TypeTag::Float)
                    .with_default(0.7)
                    .with_validator(CustomValidator::UnitInterval)
                    .with_description("Sensitivity threshold for collapse detection"),
            )
            .with_parameter("alert", flag(true))
            .with_parameter(
                "trigger",
                choice(
                    "recursive_depth",
                    &[
                        "recursive_depth",
                        "confidence_drop",
                        "contradiction",
                        "oscillation",
                        "attribution_void",
                        "loopback_failure",
                        "fork-desync",
                        "inverse_attribution",
                        "qk_collapse_vector",
                        "instruction_overlap",
                        "entangled_projection",
                        "echo-vector-desync",
                        "recursive-inconsistency",
                        "semantic-vector-mismatch",
                        "dual-overlap-failure",
                        "memory_decay",
                        "self_reference",
                    ],
                ),
            )
            .with_handler(HandlerRef::new(COLLAPSE_MODULE, "CollapseOperation.detect")),
        FunctionSpec::new("collapse", "prevent")
            .with_description("Establishes safeguards against recursive collapse")
            .with_parameter(
                "trigger",
                choice(
                    "recursive_depth",
                    &[
                        "recursive_depth",
                        "confidence_drop",
                        "contradiction",
                        "oscillation",
                        "self_reference",
                    ],
                ),
            )
            .with_parameter(
                "threshold",
                ParamSpec::new(TypeTag::Integer)
                    .with_default(Value::Integer(5))
                    .with_validator(CustomValidator::PositiveNumber),
            )
            .with_required("trigger")
            .with_handler(HandlerRef::new(COLLAPSE_MODULE, "CollapseOperation.prevent")),
        FunctionSpec::new("collapse", "recover")
            .with_description("Recovers from a recursive collapse event")
            .with_parameter(
                "from",
                ParamSpec::new(TypeTag::String).with_allowed([
                    "loop",
                    "contradiction",
                    "dissipation",
                    "fork_explosion",
                ]),
            )
            .with_parameter(
                "method",
                choice("gradual", &["gradual", "immediate", "checkpoint"]),
            )
            .with_required("from")
            .with_handler(HandlerRef::new(COLLAPSE_MODULE, "CollapseOperation.recover")),
        FunctionSpec::new("collapse", "trace")
            .with_description("Records a detailed collapse trajectory")
            .with_parameter(
                "detail",
                choice("standard", &["minimal", "standard", "comprehensive"]),
            )
            .with_parameter("format", choice("symbolic", &["symbolic", "numeric", "visual"]))
            .with_handler(HandlerRef::new(COLLAPSE_MODULE, "CollapseOperation.trace")),
        FunctionSpec::new("collapse", "mirror")
            .with_description("Creates a reflective mirror of collapse patterns")
            .with_parameter("surface", choice("explicit", &["explicit", "implicit"]))
            .with_parameter("depth", choice("limit", &["limit", "unlimited"]))
            .with_handler(HandlerRef::new(COLLAPSE_MODULE, "CollapseOperation.mirror")),
    ]
}

fn ghostcircuit_functions() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("ghostcircuit", "identify")
            .with_description("Identifies ghost circuits and symbolic residue")
            .with_parameter("sensitivity", ParamSpec::new(TypeTag::Float).with_default(0.7))
            .with_parameter("threshold", ParamSpec::new(TypeTag::Float).with_default(0.2))
            .with_parameter(
                "trace_type",
                choice("full", &["full", "attention", "symbolic", "null"]),
            )
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(
                GHOSTCIRCUIT_MODULE,
                "GhostCircuitOperation.identify",
            )),
        FunctionSpec::new("ghostcircuit", "extract")
            .with_description("Extracts specific symbolic residue patterns")
            .with_parameter(
                "pattern",
                choice("all", &["all", "attention", "symbolic", "token", "circuit"]),
            )
            .with_parameter("intensity", choice("medium", &["low", "medium", "high"]))
            .with_parameter("visualize", flag(false))
            .with_required("pattern")
            .with_handler(HandlerRef::new(
                GHOSTCIRCUIT_MODULE,
                "GhostCircuitOperation.extract",
            )),
        FunctionSpec::new("ghostcircuit", "trace")
            .with_description("Traces ghost activation pathways through model layers")
            .with_parameter("depth", choice("all", &["surface", "middle", "deep", "all"]))
            .with_parameter("threshold", ParamSpec::new(TypeTag::Float).with_default(0.2))
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(
                GHOSTCIRCUIT_MODULE,
                "GhostCircuitOperation.trace",
            )),
    ]
}

fn fork_functions() -> Vec<FunctionSpec> {
    vec![
        FunctionSpec::new("fork", "context")
            .with_description("Creates contextual forks for alternative analysis")
            .with_parameter("branches", ParamSpec::new(TypeTag::List))
            .with_parameter("assess", flag(true))
            .with_parameter("visualize", flag(false))
            .with_required("branches")
            .with_handler(HandlerRef::new(FORK_MODULE, "ForkOperation.context")),
        FunctionSpec::new("fork", "attribution")
            .with_description("Forks attribution pathways for comparison")
            .with_parameter(
                "sources",
                ParamSpec::new(TypeTag::Any)
                    .with_default("all")
                    .with_validator(CustomValidator::StringOrList),
            )
            .with_parameter("visualize", flag(false))
            .with_handler(HandlerRef::new(FORK_MODULE, "ForkOperation.attribution")),
    ]
}

/// A builder preloaded with the built-in vocabulary, for extending it.
pub fn builtin_builder() -> RegistryBuilder {
    let mut builder = FAMILIES
        .iter()
        .fold(RegistryBuilder::new(), |builder, (name, description)| {
            builder.family(*name, *description)
        });

    for spec in reflect_functions()
        .into_iter()
        .chain(collapse_functions())
        .chain(ghostcircuit_functions())
        .chain(fork_functions())
    {
        builder = builder.function(spec);
    }
    builder
}

/// Build the built-in registry.
pub fn builtin_registry() -> Result<SchemaRegistry> {
    builtin_builder().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::registry::Lookup;

    #[test]
    fn test_builtin_registry_builds() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.families().count(), FAMILIES.len());
        assert_eq!(registry.function_count(), 16);
    }

    #[test]
    fn test_families_without_functions_are_known() {
        let registry = builtin_registry().unwrap();
        assert_eq!(registry.lookup("emit", "foo"), Lookup::UnknownFunction);
        assert_eq!(registry.lookup("unknown_family", "foo"), Lookup::UnknownFamily);
    }

    #[test]
    fn test_builtin_validators() {
        let registry = builtin_registry().unwrap();
        let expected = [
            ("reflect", "trace", "depth", CustomValidator::RecursionDepth),
            ("reflect", "trace", "target", CustomValidator::String),
            ("reflect", "attribution", "sources", CustomValidator::StringOrList),
            ("collapse", "detect", "threshold", CustomValidator::UnitInterval),
            ("collapse", "prevent", "threshold", CustomValidator::PositiveNumber),
            ("fork", "attribution", "sources", CustomValidator::StringOrList),
        ];

        for (family, function, parameter, validator) in expected {
            let spec = registry.get_function_spec(family, function).unwrap();
            assert_eq!(
                spec.parameter(parameter).and_then(ParamSpec::validator),
                Some(validator),
                "{family}.{function}.{parameter}"
            );
        }
    }

    #[test]
    fn test_reflect_trace_contract() {
        let registry = builtin_registry().unwrap();
        let trace = registry.get_function_spec("reflect", "trace").unwrap();

        assert_eq!(trace.required(), ["target".to_string()]);
        assert_eq!(
            trace.parameter("depth").and_then(ParamSpec::default),
            Some(&Value::Integer(3))
        );
        assert_eq!(
            trace.handler().map(HandlerRef::function),
            Some("ReflectOperation.trace")
        );
    }
}
