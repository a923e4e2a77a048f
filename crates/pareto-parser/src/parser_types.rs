//! Intermediate types produced by the grammar driver.
//!
//! A [`RawDirective`] borrows every name and value from the directive text
//! and keeps their spans. [`RawDirective::coerce`] turns it into the owned
//! [`CommandObject`] plus the spans validation needs for its labels.

use indexmap::IndexMap;

use pareto_core::command::{CommandObject, Parameters};

use crate::{
    coerce::coerce,
    span::{Span, Spanned},
};

/// One `name=value` pair, value still raw.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawParam<'src> {
    pub name: Spanned<&'src str>,
    pub value: Spanned<&'src str>,
}

/// A structurally valid directive before coercion.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawDirective<'src> {
    pub family: Spanned<&'src str>,
    pub function: Spanned<&'src str>,
    pub params: Vec<RawParam<'src>>,
    /// Position of the end-of-input token.
    pub end: Span,
}

/// Where each part of a directive came from.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirectiveSpans {
    pub family: Span,
    pub function: Span,
    /// Name and value spans of the effective occurrence of each parameter.
    pub params: IndexMap<String, (Span, Span)>,
    pub end: Span,
}

impl DirectiveSpans {
    pub fn name(&self, parameter: &str) -> Span {
        self.params
            .get(parameter)
            .map_or(self.end, |(name, _)| *name)
    }

    pub fn value(&self, parameter: &str) -> Span {
        self.params
            .get(parameter)
            .map_or(self.end, |(_, value)| *value)
    }

    /// The `family.function` part of the directive.
    pub fn head(&self) -> Span {
        self.family.union(self.function)
    }
}

impl RawDirective<'_> {
    /// Coerce every value and build the provisional command.
    ///
    /// A repeated parameter keeps the position of its first occurrence and
    /// the value of its last.
    pub fn coerce(self, original_text: &str) -> (CommandObject, DirectiveSpans) {
        let mut parameters = Parameters::with_capacity(self.params.len());
        let mut spans = DirectiveSpans {
            family: self.family.span(),
            function: self.function.span(),
            params: IndexMap::with_capacity(self.params.len()),
            end: self.end,
        };

        for param in self.params {
            let name = param.name.inner().to_string();
            spans
                .params
                .insert(name.clone(), (param.name.span(), param.value.span()));
            parameters.insert(name, coerce(param.value.inner()));
        }

        let command = CommandObject::new(
            self.family.into_inner(),
            self.function.into_inner(),
            parameters,
            original_text,
        );
        (command, spans)
    }
}

#[cfg(test)]
mod tests {
    use pareto_core::value::Value;

    use super::*;

    fn spanned(text: &str, start: usize) -> Spanned<&str> {
        Spanned::new(text, Span::new(start..start + text.len()))
    }

    #[test]
    fn test_duplicate_parameter_keeps_first_position() {
        let raw = RawDirective {
            family: spanned("a", 3),
            function: spanned("b", 5),
            params: vec![
                RawParam {
                    name: spanned("x", 7),
                    value: spanned("1", 9),
                },
                RawParam {
                    name: spanned("y", 11),
                    value: spanned("2", 13),
                },
                RawParam {
                    name: spanned("x", 15),
                    value: spanned("3", 17),
                },
            ],
            end: Span::at(19),
        };

        let (command, spans) = raw.coerce(".p/a.b{x=1,y=2,x=3}");
        let names: Vec<_> = command.parameters().keys().map(String::as_str).collect();
        assert_eq!(names, ["x", "y"]);
        assert_eq!(command.get("x"), Some(&Value::Integer(3)));
        assert_eq!(spans.value("x"), Span::new(17..18));
        assert_eq!(spans.name("missing"), Span::at(19));
        assert_eq!(spans.head(), Span::new(3..6));
    }
}
