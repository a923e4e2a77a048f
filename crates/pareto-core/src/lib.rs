//! Pareto Core Types and Definitions
//!
//! This crate provides the foundational types for the pareto directive
//! language. It includes:
//!
//! - **Values**: Typed parameter values ([`value::Value`])
//! - **Commands**: Parsed directives ([`command::CommandObject`])
//! - **Schema**: The closed vocabulary of families, functions and parameter
//!   contracts ([`schema::SchemaRegistry`])
//! - **Dispatch**: Handler invocation planning ([`dispatch`] module)

pub mod command;
pub mod dispatch;
pub mod error;
pub mod schema;
pub mod value;
