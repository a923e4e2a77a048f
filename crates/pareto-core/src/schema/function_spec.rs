//! Registry entries: families, functions, parameters and handlers.

use indexmap::IndexMap;

use crate::{
    schema::{type_tag::TypeTag, validators::CustomValidator},
    value::Value,
};

/// A command family, the top-level namespace of a directive.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySpec {
    name: String,
    description: String,
}

impl FamilySpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// The contract of a single parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    type_tag: TypeTag,
    default: Option<Value>,
    allowed: Option<Vec<Value>>,
    validator: Option<CustomValidator>,
    description: Option<String>,
}

impl ParamSpec {
    /// Create a parameter contract with only a declared type.
    pub fn new(type_tag: TypeTag) -> Self {
        Self {
            type_tag,
            default: None,
            allowed: None,
            validator: None,
            description: None,
        }
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Restrict the parameter to an enumerated set of values.
    pub fn with_allowed<I, V>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.allowed = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Attach a custom validator.
    pub fn with_validator(mut self, validator: CustomValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// The enumerated allowed values, if the parameter is restricted.
    pub fn allowed(&self) -> Option<&[Value]> {
        self.allowed.as_deref()
    }

    /// Returns `true` if `value` is permitted by the allowed-value set.
    ///
    /// Unrestricted parameters permit every value.
    pub fn permits(&self, value: &Value) -> bool {
        self.allowed
            .as_ref()
            .is_none_or(|allowed| allowed.contains(value))
    }

    pub fn validator(&self) -> Option<CustomValidator> {
        self.validator
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// An opaque reference to the external handler of a function.
///
/// The handler is never invoked here; see [`crate::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    module: String,
    function: String,
    parameter_mapping: IndexMap<String, String>,
}

impl HandlerRef {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
            parameter_mapping: IndexMap::new(),
        }
    }

    /// Pass parameter `from` to the handler under the name `to`.
    pub fn with_mapping(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.parameter_mapping.insert(from.into(), to.into());
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn parameter_mapping(&self) -> &IndexMap<String, String> {
        &self.parameter_mapping
    }

    /// The handler-side name of directive parameter `name`, when it is renamed.
    pub fn mapped_name(&self, name: &str) -> Option<&str> {
        self.parameter_mapping.get(name).map(String::as_str)
    }
}

/// The parameter contract of one `family.function` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    family: String,
    name: String,
    description: String,
    parameters: IndexMap<String, ParamSpec>,
    required: Vec<String>,
    handler: Option<HandlerRef>,
}

impl FunctionSpec {
    pub fn new(family: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            name: name.into(),
            description: String::new(),
            parameters: IndexMap::new(),
            required: Vec::new(),
            handler: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare a parameter. Declaring the same name again replaces it.
    pub fn with_parameter(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.parameters.insert(name.into(), spec);
        self
    }

    /// Mark a parameter as required.
    pub fn with_required(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
        self
    }

    pub fn with_handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `family.function` key.
    pub fn key(&self) -> String {
        format!("{}.{}", self.family, self.name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared parameters, in declaration order.
    pub fn parameters(&self) -> &IndexMap<String, ParamSpec> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParamSpec> {
        self.parameters.get(name)
    }

    /// Required parameter names, in declaration order.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }
}
