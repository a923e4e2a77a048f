//! The immutable schema registry and its builder.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use crate::{
    error::{RegistryError, Result},
    schema::{
        function_spec::{FamilySpec, FunctionSpec},
        type_tag::TypeTag,
        validators::Validator,
    },
};

/// Outcome of looking up a `family.function` pair.
///
/// Missing entries are reported as values, never as errors; turning them
/// into user-facing errors is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    Found(&'a FunctionSpec),
    UnknownFamily,
    UnknownFunction,
}

#[derive(Debug, Clone)]
struct FamilyEntry {
    spec: FamilySpec,
    functions: IndexMap<String, FunctionSpec>,
}

/// The closed vocabulary of families, functions and parameter contracts.
///
/// A registry is only obtainable through [`RegistryBuilder::build`], so every
/// registry in existence has passed the structural checks. It has no interior
/// mutability and can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    families: IndexMap<String, FamilyEntry>,
}

impl SchemaRegistry {
    /// Look up a function, distinguishing an unknown family from an unknown
    /// function of a known family.
    pub fn lookup(&self, family: &str, function: &str) -> Lookup<'_> {
        match self.families.get(family) {
            None => Lookup::UnknownFamily,
            Some(entry) => match entry.functions.get(function) {
                Some(spec) => Lookup::Found(spec),
                None => Lookup::UnknownFunction,
            },
        }
    }

    /// The contract of `family.function`, if registered.
    pub fn get_function_spec(&self, family: &str, function: &str) -> Option<&FunctionSpec> {
        self.families.get(family)?.functions.get(function)
    }

    /// The validity check for a type tag.
    pub fn type_validator(&self, tag: TypeTag) -> Validator {
        tag.validator()
    }

    /// The custom validator registered for one parameter of a function, if any.
    pub fn custom_validator(
        &self,
        family: &str,
        function: &str,
        parameter: &str,
    ) -> Option<Validator> {
        self.get_function_spec(family, function)?
            .parameter(parameter)?
            .validator()
            .map(|v| v.predicate())
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.families.contains_key(family)
    }

    /// All families, in registration order.
    pub fn families(&self) -> impl Iterator<Item = &FamilySpec> {
        self.families.values().map(|entry| &entry.spec)
    }

    pub fn family(&self, family: &str) -> Option<&FamilySpec> {
        self.families.get(family).map(|entry| &entry.spec)
    }

    /// The functions of one family, in registration order.
    ///
    /// Unknown families yield nothing.
    pub fn functions<'a>(&'a self, family: &str) -> impl Iterator<Item = &'a FunctionSpec> + 'a {
        self.families
            .get(family)
            .into_iter()
            .flat_map(|entry| entry.functions.values())
    }

    pub fn function_count(&self) -> usize {
        self.families.values().map(|e| e.functions.len()).sum()
    }
}

/// Collects family and function definitions and checks them into a
/// [`SchemaRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    families: Vec<FamilySpec>,
    functions: Vec<FunctionSpec>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a family. Declaring the same family twice fails the build.
    pub fn family(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.families.push(FamilySpec::new(name, description));
        self
    }

    /// Add a function. Adding the same `family.function` twice fails the build.
    pub fn function(mut self, spec: FunctionSpec) -> Self {
        self.functions.push(spec);
        self
    }

    /// Declare a family, replacing any earlier declaration of the same name.
    pub fn upsert_family(&mut self, spec: FamilySpec) {
        match self.families.iter_mut().find(|f| f.name() == spec.name()) {
            Some(existing) => *existing = spec,
            None => self.families.push(spec),
        }
    }

    /// Add a function, replacing any earlier definition of the same pair.
    pub fn upsert_function(&mut self, spec: FunctionSpec) {
        match self
            .functions
            .iter_mut()
            .find(|f| f.family() == spec.family() && f.name() == spec.name())
        {
            Some(existing) => *existing = spec,
            None => self.functions.push(spec),
        }
    }

    /// Check all definitions and build the registry.
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found: a malformed name, a
    /// duplicate family or function, a function of an undeclared family, a
    /// required parameter that is not declared, a default or allowed value
    /// that does not match the parameter's type, or a handler mapping two
    /// parameters to the same name.
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut families: IndexMap<String, FamilyEntry> = IndexMap::new();

        for spec in self.families {
            check_name("family", spec.name())?;
            if families.contains_key(spec.name()) {
                return Err(RegistryError::DuplicateFamily {
                    family: spec.name().to_string(),
                });
            }
            families.insert(
                spec.name().to_string(),
                FamilyEntry {
                    spec,
                    functions: IndexMap::new(),
                },
            );
        }

        for spec in self.functions {
            check_function(&spec)?;

            let Some(entry) = families.get_mut(spec.family()) else {
                return Err(RegistryError::UndeclaredFamily {
                    family: spec.family().to_string(),
                    function: spec.name().to_string(),
                });
            };
            if entry.functions.contains_key(spec.name()) {
                return Err(RegistryError::DuplicateFunction {
                    family: spec.family().to_string(),
                    function: spec.name().to_string(),
                });
            }
            entry.functions.insert(spec.name().to_string(), spec);
        }

        let registry = SchemaRegistry { families };
        debug!(
            families = registry.families.len(),
            functions = registry.function_count();
            "Schema registry built"
        );
        Ok(registry)
    }
}

/// Names follow the directive surface grammar: `[a-z_]+`.
fn check_name(what: &'static str, name: &str) -> Result<()> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        Ok(())
    } else {
        Err(RegistryError::InvalidName {
            what,
            name: name.to_string(),
        })
    }
}

fn check_function(spec: &FunctionSpec) -> Result<()> {
    check_name("family", spec.family())?;
    check_name("function", spec.name())?;

    for (name, param) in spec.parameters() {
        check_name("parameter", name)?;

        let tag = param.type_tag();
        if param.default().is_some_and(|default| !tag.accepts(default)) {
            return Err(RegistryError::InvalidDefault {
                function: spec.key(),
                parameter: name.clone(),
                tag: tag.as_str(),
            });
        }
        if let Some(bad) = param
            .allowed()
            .and_then(|allowed| allowed.iter().find(|v| !tag.accepts(v)))
        {
            return Err(RegistryError::InvalidAllowedValue {
                function: spec.key(),
                parameter: name.clone(),
                value: bad.to_string(),
                tag: tag.as_str(),
            });
        }
    }

    let mut seen = HashSet::new();
    for required in spec.required() {
        if !seen.insert(required.as_str()) || spec.parameter(required).is_none() {
            return Err(RegistryError::UndeclaredRequired {
                function: spec.key(),
                parameter: required.clone(),
            });
        }
    }

    if let Some(handler) = spec.handler() {
        let mut targets = HashSet::new();
        for target in handler.parameter_mapping().values() {
            if !targets.insert(target.as_str()) {
                return Err(RegistryError::ConflictingMapping {
                    function: spec.key(),
                    target: target.clone(),
                });
            }
        }
    }

    Ok(())
}
