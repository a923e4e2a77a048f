//! CLI logic for the pareto directive tool.
//!
//! This module contains the core CLI logic: configuration loading, engine
//! construction and one handler per [`Command`].

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command};

use std::{
    fs,
    io::{self, Write},
};

use log::info;
use serde::Serialize;

use pareto::{
    DirectiveEngine, ParetoError,
    command::CommandObject,
    dispatch::Invocation,
    schema::{FunctionSpec, ParamSpec},
};

/// JSON shape of the `parse` command's output.
#[derive(Serialize)]
struct ParseOutput<'a> {
    command: &'a CommandObject,
    invocation: Option<&'a Invocation>,
}

/// Run the pareto CLI application, writing results to stdout.
///
/// # Errors
///
/// Returns `ParetoError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Registry definition errors
/// - Parsing errors
pub fn run(args: &Args) -> Result<(), ParetoError> {
    let stdout = io::stdout();
    run_with_output(args, &mut stdout.lock())
}

/// Run the pareto CLI application, writing results to `out`.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<(), ParetoError> {
    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(path) = &args.registry {
        info!(path = path.as_str(); "Using registry definitions from command line");
        app_config = app_config.with_registry_path(path);
    }

    let engine = DirectiveEngine::new(app_config)?;

    match &args.command {
        Command::Parse {
            directive,
            syntax_only,
            json,
        } => parse(&engine, directive, *syntax_only, *json, out),
        Command::Extract { file, json } => extract(&engine, file.as_deref(), *json, out),
        Command::Tokens { directive } => tokens(directive, out),
        Command::Schema { family } => schema(&engine, family.as_deref(), out),
    }
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<(), ParetoError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

fn parse(
    engine: &DirectiveEngine,
    directive: &str,
    syntax_only: bool,
    json: bool,
    out: &mut impl Write,
) -> Result<(), ParetoError> {
    let (command, invocation) = if syntax_only {
        (engine.parse_syntax(directive)?, None)
    } else {
        let command = engine.parse(directive)?;
        let invocation = engine.plan(&command);
        (command, invocation)
    };

    if json {
        return write_json(
            out,
            &ParseOutput {
                command: &command,
                invocation: invocation.as_ref(),
            },
        );
    }

    writeln!(out, "{command}")?;
    if let Some(invocation) = invocation {
        writeln!(
            out,
            "handler: {}::{}",
            invocation.module(),
            invocation.function()
        )?;
        for (name, value) in invocation.arguments() {
            writeln!(out, "    {name} = {value}")?;
        }
    }
    Ok(())
}

fn extract(
    engine: &DirectiveEngine,
    file: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> Result<(), ParetoError> {
    let text = match file {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };

    let commands = engine.extract(&text);
    info!(count = commands.len(); "Directives extracted");

    if json {
        return write_json(out, &commands);
    }
    for command in &commands {
        writeln!(out, "{command}")?;
    }
    Ok(())
}

fn tokens(directive: &str, out: &mut impl Write) -> Result<(), ParetoError> {
    for token in pareto_parser::scan(directive) {
        writeln!(out, "{token}")?;
    }
    Ok(())
}

fn schema(
    engine: &DirectiveEngine,
    family: Option<&str>,
    out: &mut impl Write,
) -> Result<(), ParetoError> {
    let Some(family) = family else {
        let registry = engine.schema();
        for spec in registry.families() {
            let count = registry.functions(spec.name()).count();
            writeln!(out, "{:<14} {count:>2}  {}", spec.name(), spec.description())?;
        }
        return Ok(());
    };

    let functions = engine.family_functions(family)?;
    if functions.is_empty() {
        writeln!(out, "family `{family}` has no functions")?;
    }
    for function in &functions {
        writeln!(out, "{}  {}", function.key(), function.description())?;
        for (name, param) in function.parameters() {
            writeln!(out, "    {}", describe_param(function, name, param))?;
        }
    }
    Ok(())
}

/// One-line summary of a parameter contract, e.g.
/// `target: string (required) = reasoning, one of [reasoning, memory]`.
fn describe_param(function: &FunctionSpec, name: &str, param: &ParamSpec) -> String {
    let mut line = format!("{name}: {}", param.type_tag());
    if function.is_required(name) {
        line.push_str(" (required)");
    }
    if let Some(default) = param.default() {
        line.push_str(&format!(" = {default}"));
    }
    if let Some(allowed) = param.allowed() {
        let allowed: Vec<_> = allowed.iter().map(ToString::to_string).collect();
        line.push_str(&format!(", one of [{}]", allowed.join(", ")));
    }
    if let Some(validator) = param.validator() {
        line.push_str(&format!(", {}", validator.expectation()));
    }
    line
}
