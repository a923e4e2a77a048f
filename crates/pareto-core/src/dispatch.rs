//! Handler invocation planning.
//!
//! A registered [`HandlerRef`](crate::schema::HandlerRef) names an external
//! handler and how directive parameters are renamed for it. Planning an
//! invocation applies that renaming to a command's parameters; invoking the
//! handler is left to the caller.

use indexmap::{IndexMap, map::Entry};
use log::debug;
use serde::Serialize;

use crate::{command::CommandObject, schema::SchemaRegistry, value::Value};

/// A fully resolved handler call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invocation {
    module: String,
    function: String,
    arguments: IndexMap<String, Value>,
    original_text: String,
}

impl Invocation {
    /// The handler's module identifier.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The handler's function identifier within the module.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Handler arguments, renamed, in the order the directive supplied them.
    ///
    /// An argument name appears once, at its first position.
    pub fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }
}

/// Plan the handler call for `command`.
///
/// Each supplied parameter is renamed according to the handler's parameter
/// mapping; parameters without a mapping keep their names. When a renamed
/// parameter and a supplied one end up with the same name, the renamed
/// parameter's value is used. Returns `None` when the command's function is
/// unknown or has no handler registered.
pub fn plan_invocation(registry: &SchemaRegistry, command: &CommandObject) -> Option<Invocation> {
    let handler = registry
        .get_function_spec(command.family(), command.function())?
        .handler()?;

    let mut arguments: IndexMap<String, Value> = IndexMap::new();
    for (name, value) in command.parameters() {
        match handler.mapped_name(name) {
            // A renamed parameter takes its target name even when the
            // directive also supplied a parameter under that name.
            Some(target) => {
                if let Some(shadowed) = arguments.insert(target.to_string(), value.clone()) {
                    debug!(
                        argument = target,
                        shadowed = shadowed.to_string();
                        "Mapped parameter replaces supplied argument"
                    );
                }
            }
            None => match arguments.entry(name.clone()) {
                Entry::Occupied(_) => {
                    debug!(argument = name.as_str(); "Supplied argument shadowed by mapped parameter");
                }
                Entry::Vacant(slot) => {
                    slot.insert(value.clone());
                }
            },
        }
    }

    Some(Invocation {
        module: handler.module().to_string(),
        function: handler.function().to_string(),
        arguments,
        original_text: command.original_text().to_string(),
    })
}
