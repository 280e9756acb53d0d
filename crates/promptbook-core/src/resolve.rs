//! Argument resolution: raw form input plus declared defaults into a
//! complete argument set.
//!
//! Resolution is a pure value transformation. Unmet required fields are a
//! user-visible blocking state, not an error: rendering simply must not
//! proceed until every field resolves.

use std::collections::HashMap;

use tera::Context;

use crate::recipe::{ParamType, ParamValue};
use crate::schema::FieldDescriptor;

/// Raw submitted values keyed by parameter name. An absent key is treated
/// the same as an empty string.
pub type RawValues = HashMap<String, String>;

/// Final keyword arguments, one per descriptor, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedArgs {
    values: Vec<(String, ParamValue)>,
}

impl ResolvedArgs {
    /// Look up an argument by parameter name
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Iterate arguments in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &(String, ParamValue)> {
        self.values.iter()
    }

    /// Number of resolved arguments
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were resolved
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a template context with one entry per argument
    pub fn to_context(&self) -> Context {
        let mut context = Context::new();
        for (name, value) in &self.values {
            match value {
                ParamValue::Text(s) => context.insert(name, s),
                ParamValue::Integer(n) => context.insert(name, n),
                ParamValue::Float(x) => context.insert(name, x),
            }
        }
        context
    }

    fn push(&mut self, name: String, value: ParamValue) {
        self.values.push((name, value));
    }
}

/// Why a field could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmetReason {
    /// Required field left empty
    MissingRequired,
    /// Numeric field submitted with a value that does not parse
    InvalidNumber,
}

/// A field blocking prompt rendering.
#[derive(Debug, Clone)]
pub struct UnmetField {
    /// Parameter name of the blocking field
    pub name: String,
    /// Why the field is unresolved
    pub reason: UnmetReason,
}

/// Outcome of resolving raw input against a form schema.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Every field resolved; rendering may proceed
    Complete(ResolvedArgs),
    /// One or more fields are empty or invalid
    Blocked(Vec<UnmetField>),
}

impl Resolution {
    /// Whether every field resolved
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// The resolved arguments, if complete
    pub fn into_complete(self) -> Option<ResolvedArgs> {
        match self {
            Self::Complete(args) => Some(args),
            Self::Blocked(_) => None,
        }
    }
}

/// Resolve raw submitted values against the form schema.
///
/// For each field, in declaration order: empty input falls back to the
/// declared default where one exists; a required field left empty blocks
/// resolution; non-empty input is coerced according to the declared type
/// when the affordance is numeric, and passed through verbatim otherwise.
pub fn resolve_arguments(fields: &[FieldDescriptor], raw: &RawValues) -> Resolution {
    let mut resolved = ResolvedArgs::default();
    let mut unmet = Vec::new();

    for field in fields {
        let submitted = raw.get(&field.name).map(String::as_str).unwrap_or("");

        if submitted.is_empty() {
            match &field.default {
                Some(default) => resolved.push(field.name.clone(), default.clone()),
                None => unmet.push(UnmetField {
                    name: field.name.clone(),
                    reason: UnmetReason::MissingRequired,
                }),
            }
            continue;
        }

        match coerce(submitted, field.value_type) {
            Some(value) => resolved.push(field.name.clone(), value),
            None => unmet.push(UnmetField {
                name: field.name.clone(),
                reason: UnmetReason::InvalidNumber,
            }),
        }
    }

    if unmet.is_empty() {
        Resolution::Complete(resolved)
    } else {
        Resolution::Blocked(unmet)
    }
}

/// Coerce a non-empty raw value according to the declared type.
fn coerce(raw: &str, value_type: ParamType) -> Option<ParamValue> {
    match value_type {
        ParamType::Text => Some(ParamValue::Text(raw.to_string())),
        ParamType::Integer => raw.trim().parse::<i64>().ok().map(ParamValue::Integer),
        ParamType::Float => raw.trim().parse::<f64>().ok().map(ParamValue::Float),
    }
}
