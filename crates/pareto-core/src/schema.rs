//! Schema registry for the directive vocabulary.
//!
//! The registry is the closed table of command families, the functions of
//! each family and every function's parameter contract. It is built once
//! through a [`RegistryBuilder`], which checks the definitions for structural
//! problems, and is read-only afterwards.
//!
//! # Example
//!
//! ```
//! # use pareto_core::schema::{FunctionSpec, ParamSpec, RegistryBuilder, TypeTag};
//! let registry = RegistryBuilder::new()
//!     .family("reflect", "Reflection directives")
//!     .function(
//!         FunctionSpec::new("reflect", "trace")
//!             .with_parameter("depth", ParamSpec::new(TypeTag::RecursionDepth))
//!             .with_required("depth"),
//!     )
//!     .build()
//!     .unwrap();
//!
//! assert!(registry.get_function_spec("reflect", "trace").is_some());
//! ```

mod builtin;
mod function_spec;
mod registry;
mod type_tag;
mod validators;

pub use builtin::{builtin_builder, builtin_registry};
pub use function_spec::{FamilySpec, FunctionSpec, HandlerRef, ParamSpec};
pub use registry::{Lookup, RegistryBuilder, SchemaRegistry};
pub use type_tag::TypeTag;
pub use validators::{CustomValidator, Validator};
