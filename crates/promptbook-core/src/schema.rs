//! Form schema generation from declared recipe parameters.
//!
//! This module merges the validated parameter list of a recipe with its
//! optional UI hints into an ordered sequence of [`FieldDescriptor`]s, one
//! per parameter, ready for a form-rendering collaborator. Descriptors are
//! derived fresh on every call; nothing is cached across recipe selections.

use serde::Serialize;

use crate::recipe::{ParamSpec, ParamType, ParamValue, Recipe, UiHintMap};
use crate::utils::capitalize;

/// Input control class selected for a parameter.
///
/// This is a two-way classification only; list, enum and boolean affordances
/// are intentionally absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    /// Numeric input control
    Numeric,
    /// Free-text input control
    FreeText,
}

impl Affordance {
    fn for_type(value_type: ParamType) -> Self {
        if value_type.is_numeric() {
            Self::Numeric
        } else {
            Self::FreeText
        }
    }

    /// Whether the field takes the numeric input control
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric)
    }
}

/// One generated form field. Field order equals parameter declaration order
/// and drives form layout top to bottom.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Parameter name, used for lookups; never altered for display
    pub name: String,

    /// Display label
    pub label: String,

    /// Help text, from a UI hint
    pub help: Option<String>,

    /// Placeholder text, from a UI hint
    pub placeholder: Option<String>,

    /// Free-form text rendered immediately before the field, from a UI hint
    pub preceding_text: Option<String>,

    /// Declared parameter type
    pub value_type: ParamType,

    /// Input control class, decided once at schema build time
    pub affordance: Affordance,

    /// Whether the field must be filled before rendering can proceed
    pub required: bool,

    /// Declared default substituted for empty input
    pub default: Option<ParamValue>,
}

/// Build the ordered form schema for a recipe using its own UI hints.
///
/// Hints referencing unknown parameter names are logged and ignored; use
/// [`build_fields`] with `strict` set to turn them into errors.
pub fn build_form_schema(recipe: &Recipe) -> crate::Result<Vec<FieldDescriptor>> {
    build_fields(recipe.params(), recipe.ui_hints(), false)
}

/// Build the ordered form schema from parameter specs and optional hints.
///
/// For each parameter, in declaration order: synthesize the default label
/// from the required/optional rule, apply any hint overrides field by field,
/// and classify the input affordance from the declared type.
///
/// # Errors
///
/// With `strict` set, a hint keyed by a parameter name absent from the
/// parameter list fails with [`crate::Error::Schema`]. Otherwise stray hints
/// are downgraded to a warning.
pub fn build_fields(
    params: &[ParamSpec],
    hints: Option<&UiHintMap>,
    strict: bool,
) -> crate::Result<Vec<FieldDescriptor>> {
    if let Some(hints) = hints {
        for key in hints.keys() {
            if !params.iter().any(|p| p.name == *key) {
                if strict {
                    return Err(crate::Error::schema(format!(
                        "UI hint references unknown parameter '{}'",
                        key
                    )));
                }
                log::warn!("Ignoring UI hint for unknown parameter '{}'", key);
            }
        }
    }

    let mut fields = Vec::with_capacity(params.len());
    for spec in params {
        let synthesized = match &spec.default {
            None => format!("{} (required)", capitalize(&spec.name)),
            Some(default) => format!(
                "{} (optional, defaults to {})",
                capitalize(&spec.name),
                default
            ),
        };

        let hint = hints.and_then(|h| h.get(&spec.name));
        fields.push(FieldDescriptor {
            name: spec.name.clone(),
            label: hint
                .and_then(|h| h.label.clone())
                .unwrap_or(synthesized),
            help: hint.and_then(|h| h.help.clone()),
            placeholder: hint.and_then(|h| h.placeholder.clone()),
            preceding_text: hint.and_then(|h| h.text.clone()),
            value_type: spec.value_type,
            affordance: Affordance::for_type(spec.value_type),
            required: spec.required(),
            default: spec.default.clone(),
        });
    }

    Ok(fields)
}
