//! Best-effort extraction of directives from free text.
//!
//! Every occurrence of `.p/` starts a candidate, and a candidate ends no later
//! than the next `.p/`, so no part of the text is scanned twice. A candidate
//! that parses and validates is returned and scanning resumes after it; one
//! that fails is dropped and scanning resumes at the next `.p/`.

use log::debug;

use pareto_core::{
    command::{CommandObject, PREFIX},
    schema::SchemaRegistry,
};

use crate::{lexer::Mode, parse_validated};

/// Iterator over the valid directives embedded in a text, left to right.
#[derive(Debug, Clone)]
pub struct Extractor<'t, 'r> {
    text: &'t str,
    registry: &'r SchemaRegistry,
    cursor: usize,
}

impl<'t, 'r> Extractor<'t, 'r> {
    pub fn new(text: &'t str, registry: &'r SchemaRegistry) -> Self {
        Self {
            text,
            registry,
            cursor: 0,
        }
    }
}

impl Iterator for Extractor<'_, '_> {
    type Item = CommandObject;

    fn next(&mut self) -> Option<CommandObject> {
        while let Some(found) = self.text[self.cursor..].find(PREFIX) {
            let start = self.cursor + found;
            let end = self.text[start + PREFIX.len()..]
                .find(PREFIX)
                .map_or(self.text.len(), |next| start + PREFIX.len() + next);
            match parse_validated(&self.text[start..end], self.registry, Mode::Prefix) {
                Ok((command, consumed)) => {
                    self.cursor = start + consumed;
                    return Some(command);
                }
                Err(diagnostic) => {
                    debug!(
                        offset = start,
                        code:? = diagnostic.code(),
                        message = diagnostic.message();
                        "Skipping malformed directive"
                    );
                    self.cursor = end;
                }
            }
        }
        self.cursor = self.text.len();
        None
    }
}

/// Extract every valid directive in `text`, skipping fragments that fail to
/// parse or validate.
pub fn extract(text: &str, registry: &SchemaRegistry) -> Vec<CommandObject> {
    Extractor::new(text, registry).collect()
}
