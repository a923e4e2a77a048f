//! Pareto - parse and validate `.p/family.function{name=value}` directives.
//!
//! This crate ties the directive parser to a configurable, swappable
//! vocabulary. It is the entry point most applications need; the
//! `pareto-core` and `pareto-parser` crates hold the pieces.

pub mod config;
pub mod registry_file;

mod error;
mod shared;

pub use pareto_core::{command, dispatch, schema, value};

pub use error::ParetoError;
pub use shared::SharedRegistry;

use std::sync::Arc;

use log::{debug, info, trace};

use pareto_core::{
    command::CommandObject,
    dispatch::{Invocation, plan_invocation},
    schema::{FunctionSpec, SchemaRegistry},
};
use pareto_parser::Extractor;

use config::AppConfig;

/// Engine for parsing, validating and extracting directives.
///
/// The engine owns its configuration and a [`SharedRegistry`]; every
/// operation runs against a snapshot of the registry taken when it starts.
///
/// # Examples
///
/// ```rust
/// use pareto::{DirectiveEngine, config::AppConfig, value::Value};
///
/// let engine = DirectiveEngine::new(AppConfig::default())
///     .expect("Failed to load registry");
///
/// let command = engine
///     .parse(".p/collapse.detect{threshold=0.7, alert=true}")
///     .expect("Failed to parse");
/// assert_eq!(command.get("alert"), Some(&Value::Boolean(true)));
///
/// let found = engine.extract("First .p/reflect.trace{target=reasoning}, then prose.");
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug)]
pub struct DirectiveEngine {
    config: AppConfig,
    registry: SharedRegistry,
}

impl DirectiveEngine {
    /// Create an engine, loading the vocabulary the configuration describes.
    ///
    /// # Errors
    ///
    /// Returns `ParetoError` if the registry definition file cannot be read
    /// or does not describe a valid vocabulary.
    pub fn new(config: AppConfig) -> Result<Self, ParetoError> {
        let registry = registry_file::load_registry(config.registry())?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create an engine around an already built registry.
    ///
    /// The registry settings of `config` are ignored until
    /// [`reload_registry`](Self::reload_registry) is called.
    pub fn with_registry(config: AppConfig, registry: SchemaRegistry) -> Self {
        Self {
            config,
            registry: SharedRegistry::new(registry),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// The engine's swappable registry handle.
    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Rebuild the registry from the configuration and swap it in.
    ///
    /// On error the current registry stays in place.
    ///
    /// # Errors
    ///
    /// See [`DirectiveEngine::new`].
    pub fn reload_registry(&self) -> Result<(), ParetoError> {
        let registry = registry_file::load_registry(self.config.registry())?;
        self.registry.swap(registry);
        Ok(())
    }

    /// Parse and validate a single directive.
    ///
    /// # Errors
    ///
    /// Returns `ParetoError::Parse` for lexical, structural, schema or value
    /// errors.
    pub fn parse(&self, text: &str) -> Result<CommandObject, ParetoError> {
        info!("Parsing directive");

        let registry = self.registry.load();
        let command = pareto_parser::parse(text, &registry)
            .map_err(|err| ParetoError::new_parse_error(err, text))?;

        debug!(key = command.key(); "Directive parsed successfully");
        trace!(command:?; "Parsed directive");

        Ok(command)
    }

    /// Parse a single directive without schema validation.
    ///
    /// # Errors
    ///
    /// Returns `ParetoError::Parse` for lexical or structural errors.
    pub fn parse_syntax(&self, text: &str) -> Result<CommandObject, ParetoError> {
        pareto_parser::parse_syntax(text).map_err(|err| ParetoError::new_parse_error(err, text))
    }

    /// Extract the valid directives embedded in `text`, left to right.
    ///
    /// Stops after `max_directives` when the configuration sets one.
    pub fn extract(&self, text: &str) -> Vec<CommandObject> {
        let registry = self.registry.load();
        let limit = self.config.extract().max_directives().unwrap_or(usize::MAX);

        let commands: Vec<_> = Extractor::new(text, &registry).take(limit).collect();
        debug!(count = commands.len(); "Directives extracted");

        commands
    }

    /// Plan the handler call for `command` against the current registry.
    pub fn plan(&self, command: &CommandObject) -> Option<Invocation> {
        plan_invocation(&self.registry.load(), command)
    }

    /// A snapshot of the current registry.
    pub fn schema(&self) -> Arc<SchemaRegistry> {
        self.registry.load()
    }

    /// The functions of `family`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns `ParetoError::UnknownFamily` if the family is not registered.
    pub fn family_functions(&self, family: &str) -> Result<Vec<FunctionSpec>, ParetoError> {
        let registry = self.registry.load();
        if !registry.has_family(family) {
            return Err(ParetoError::UnknownFamily(family.to_string()));
        }
        Ok(registry.functions(family).cloned().collect())
    }
}
