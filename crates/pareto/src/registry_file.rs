//! Registry definition files.
//!
//! A definition file is TOML with `[[family]]` and `[[function]]` tables:
//!
//! ```toml
//! [[family]]
//! name = "audit"
//! description = "Audit directives"
//!
//! [[function]]
//! family = "audit"
//! name = "log"
//! required = ["level"]
//!
//! [function.parameters.level]
//! type = "string"
//! allowed = ["info", "warn"]
//!
//! [function.parameters.ratio]
//! type = "float"
//! default = 0.5
//! validator = "unit_interval"
//!
//! [function.handler]
//! module = "audit.module"
//! function = "AuditOperation.log"
//! parameter_mapping = { level = "severity" }
//! ```
//!
//! Definitions are applied on top of a [`RegistryBuilder`]. A family or
//! function already in the builder is replaced; one defined twice in the same
//! file is an error.

use std::{collections::HashSet, fs};

use indexmap::IndexMap;
use log::{debug, info};
use serde::Deserialize;

use pareto_core::{
    error::RegistryError,
    schema::{
        CustomValidator, FamilySpec, FunctionSpec, HandlerRef, ParamSpec, RegistryBuilder,
        SchemaRegistry, TypeTag, builtin_builder,
    },
    value::Value,
};

use crate::{ParetoError, config::RegistryConfig};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionFile {
    #[serde(default)]
    family: Vec<FamilyDef>,
    #[serde(default)]
    function: Vec<FunctionDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FamilyDef {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FunctionDef {
    family: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    required: Vec<String>,
    #[serde(default)]
    parameters: IndexMap<String, ParamDef>,
    #[serde(default)]
    handler: Option<HandlerDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamDef {
    #[serde(rename = "type")]
    type_tag: String,
    #[serde(default)]
    default: Option<toml::Value>,
    #[serde(default)]
    allowed: Option<Vec<toml::Value>>,
    #[serde(default)]
    validator: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HandlerDef {
    module: String,
    function: String,
    #[serde(default)]
    parameter_mapping: IndexMap<String, String>,
}

/// Convert a TOML value into a directive value.
///
/// Returns `None` for datetimes and tables, which have no directive form.
fn to_value(value: toml::Value) -> Option<Value> {
    match value {
        toml::Value::String(s) => Some(Value::String(s)),
        toml::Value::Integer(i) => Some(Value::Integer(i)),
        toml::Value::Float(x) => Some(Value::Float(x)),
        toml::Value::Boolean(b) => Some(Value::Boolean(b)),
        toml::Value::Array(items) => items
            .into_iter()
            .map(to_value)
            .collect::<Option<Vec<_>>>()
            .map(Value::List),
        toml::Value::Datetime(_) | toml::Value::Table(_) => None,
    }
}

fn convert(
    value: toml::Value,
    function: &FunctionDef,
    parameter: &str,
    what: &str,
) -> Result<Value, ParetoError> {
    let found = value.type_str();
    to_value(value).ok_or_else(|| {
        ParetoError::Definition(format!(
            "{what} of parameter `{parameter}` of `{}.{}` cannot be a {found}",
            function.family, function.name
        ))
    })
}

fn param_spec(
    function: &FunctionDef,
    name: &str,
    def: ParamDef,
) -> Result<ParamSpec, ParetoError> {
    let mut spec = ParamSpec::new(def.type_tag.parse::<TypeTag>()?);

    if let Some(default) = def.default {
        spec = spec.with_default(convert(default, function, name, "default")?);
    }
    if let Some(allowed) = def.allowed {
        let allowed = allowed
            .into_iter()
            .map(|value| convert(value, function, name, "allowed value"))
            .collect::<Result<Vec<_>, _>>()?;
        spec = spec.with_allowed(allowed);
    }
    if let Some(validator) = def.validator {
        spec = spec.with_validator(validator.parse::<CustomValidator>()?);
    }
    if let Some(description) = def.description {
        spec = spec.with_description(description);
    }

    Ok(spec)
}

fn function_spec(mut def: FunctionDef) -> Result<FunctionSpec, ParetoError> {
    let parameters = std::mem::take(&mut def.parameters);
    let mut spec = FunctionSpec::new(def.family.as_str(), def.name.as_str())
        .with_description(def.description.as_str());

    for (name, param) in parameters {
        let param = param_spec(&def, &name, param)?;
        spec = spec.with_parameter(name, param);
    }
    for name in def.required {
        spec = spec.with_required(name);
    }
    if let Some(handler) = def.handler {
        let handler_ref = handler
            .parameter_mapping
            .into_iter()
            .fold(HandlerRef::new(handler.module, handler.function), |h, (from, to)| {
                h.with_mapping(from, to)
            });
        spec = spec.with_handler(handler_ref);
    }

    Ok(spec)
}

/// Apply the definitions in `source` to `builder`.
///
/// # Errors
///
/// Returns [`ParetoError::Definition`] when the TOML is malformed or a value
/// has no directive form, and [`ParetoError::Registry`] for an unknown type
/// tag or validator name, or a family or function defined twice in `source`.
/// Checks that need the whole vocabulary run later, in
/// [`RegistryBuilder::build`].
pub fn apply_definitions(builder: &mut RegistryBuilder, source: &str) -> Result<(), ParetoError> {
    let file: DefinitionFile =
        toml::from_str(source).map_err(|e| ParetoError::Definition(e.to_string()))?;

    let mut families = HashSet::new();
    for family in file.family {
        if !families.insert(family.name.clone()) {
            return Err(RegistryError::DuplicateFamily {
                family: family.name,
            }
            .into());
        }
        builder.upsert_family(FamilySpec::new(family.name, family.description));
    }

    let mut functions = HashSet::new();
    for function in file.function {
        if !functions.insert((function.family.clone(), function.name.clone())) {
            return Err(RegistryError::DuplicateFunction {
                family: function.family,
                function: function.name,
            }
            .into());
        }
        builder.upsert_function(function_spec(function)?);
    }

    debug!(
        families = families.len(),
        functions = functions.len();
        "Registry definitions applied"
    );
    Ok(())
}

/// Build the registry described by `config`.
///
/// Starts from the built-in vocabulary, or from nothing when
/// `include_builtin` is off, and applies the definition file if one is
/// configured.
///
/// # Errors
///
/// Returns an error if the definition file cannot be read or applied, or if
/// the resulting vocabulary fails the registry's structural checks.
pub fn load_registry(config: &RegistryConfig) -> Result<SchemaRegistry, ParetoError> {
    let mut builder = if config.include_builtin() {
        builtin_builder()
    } else {
        RegistryBuilder::new()
    };

    if let Some(path) = config.path() {
        info!(path = path.display().to_string(); "Loading registry definitions");
        let source = fs::read_to_string(path)?;
        apply_definitions(&mut builder, &source)?;
    }

    let registry = builder.build()?;
    info!(
        families = registry.families().count(),
        functions = registry.function_count();
        "Registry loaded"
    );
    Ok(registry)
}
