//! Recipe model: typed parameter lists, UI hints, and prompt bodies.
//!
//! A recipe is a named, parameterized prompt template. Its parameter list is
//! an explicit descriptor structure declared once at load time; constructing
//! a [`Recipe`] validates that structure but never invokes the body.
//!
//! # Examples
//!
//! ```
//! use promptbook_core::recipe::{ParamSpec, ParamType, ParamValue};
//!
//! let spec = ParamSpec::new("times", ParamType::Integer)
//!     .with_default(ParamValue::Integer(1));
//! assert!(!spec.required());
//! ```

// Internal imports (std, crate)
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::resolve::ResolvedArgs;
use crate::Error;

// External imports (alphabetized)
use serde::{Deserialize, Deserializer, Serialize};
use serde_value::Value as SerdeValue;

/// Declared parameter types. The type only selects the input affordance:
/// numeric types get a numeric input, everything else free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Free-form text
    #[default]
    #[serde(alias = "str", alias = "string")]
    Text,
    /// Whole numbers
    #[serde(alias = "int")]
    Integer,
    /// Floating point numbers
    #[serde(alias = "number")]
    Float,
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "str" | "string" => Ok(ParamType::Text),
            "integer" | "int" => Ok(ParamType::Integer),
            "float" | "number" => Ok(ParamType::Float),
            _ => Err(format!("Unknown parameter type: {}", s)),
        }
    }
}

impl ParamType {
    /// Returns the type identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
        }
    }

    /// Whether this type takes the numeric input affordance
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Float)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A concrete parameter value: a declared default or a resolved argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Free-form text
    Text(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Float(f64),
}

impl ParamValue {
    /// The declared type this value belongs to
    pub fn kind(&self) -> ParamType {
        match self {
            Self::Text(_) => ParamType::Text,
            Self::Integer(_) => ParamType::Integer,
            Self::Float(_) => ParamType::Float,
        }
    }

    /// Borrow the value as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer, if it is one
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// The value as a float; integers widen
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    /// Accept any string or numeric scalar from a manifest file.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = SerdeValue::deserialize(deserializer)?;

        match value {
            SerdeValue::String(s) => Ok(ParamValue::Text(s)),
            SerdeValue::I8(n) => Ok(ParamValue::Integer(n as i64)),
            SerdeValue::I16(n) => Ok(ParamValue::Integer(n as i64)),
            SerdeValue::I32(n) => Ok(ParamValue::Integer(n as i64)),
            SerdeValue::I64(n) => Ok(ParamValue::Integer(n)),
            SerdeValue::U8(n) => Ok(ParamValue::Integer(n as i64)),
            SerdeValue::U16(n) => Ok(ParamValue::Integer(n as i64)),
            SerdeValue::U32(n) => Ok(ParamValue::Integer(n as i64)),
            SerdeValue::U64(n) => i64::try_from(n)
                .map(ParamValue::Integer)
                .map_err(|_| serde::de::Error::custom("Integer default out of range")),
            SerdeValue::F32(x) => Ok(ParamValue::Float(x as f64)),
            SerdeValue::F64(x) => Ok(ParamValue::Float(x)),
            _ => Err(serde::de::Error::custom("Expected string or number")),
        }
    }
}

/// One declared recipe parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, unique within a recipe's parameter list
    pub name: String,

    /// Declared type, used to select the input affordance
    #[serde(rename = "type", default)]
    pub value_type: ParamType,

    /// Declared default. `None` makes the parameter mandatory; a default of
    /// `""` or `0` is still optional.
    #[serde(default)]
    pub default: Option<ParamValue>,
}

impl ParamSpec {
    /// Create a mandatory parameter
    pub fn new(name: impl Into<String>, value_type: ParamType) -> Self {
        Self {
            name: name.into(),
            value_type,
            default: None,
        }
    }

    /// Attach a declared default, making the parameter optional
    pub fn with_default(mut self, value: ParamValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether the parameter must be filled by the user
    pub fn required(&self) -> bool {
        self.default.is_none()
    }
}

/// Partial per-parameter overrides for the generated form. Unset fields keep
/// the synthesized defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiHint {
    /// Replaces the synthesized field label
    #[serde(default)]
    pub label: Option<String>,

    /// Help text shown next to the field
    #[serde(default)]
    pub help: Option<String>,

    /// Placeholder text shown inside an empty field
    #[serde(default, alias = "suggestions")]
    pub placeholder: Option<String>,

    /// Free-form text rendered immediately before the field
    #[serde(default)]
    pub text: Option<String>,
}

/// Recipe-supplied UI hints keyed by parameter name. Not every parameter
/// needs an entry.
pub type UiHintMap = HashMap<String, UiHint>;

/// Presentational metadata attached to a recipe. Rendered if present, no
/// further invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeMetadata {
    /// Display title
    #[serde(default)]
    pub title: Option<String>,

    /// Author credit
    #[serde(default)]
    pub author: Option<String>,

    /// What the recipe's prompt does
    #[serde(default)]
    pub description: Option<String>,
}

/// The prompt-producing body of a recipe.
#[derive(Clone)]
pub enum RecipeBody {
    /// Tera template source rendered with the resolved arguments
    Template(String),
    /// Native function, used by built-in recipes
    Function(fn(&ResolvedArgs) -> crate::Result<String>),
}

impl fmt::Debug for RecipeBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template(source) => f.debug_tuple("Template").field(source).finish(),
            Self::Function(_) => f.debug_tuple("Function").finish(),
        }
    }
}

/// A named, parameterized prompt template.
#[derive(Debug, Clone)]
pub struct Recipe {
    name: String,
    metadata: RecipeMetadata,
    params: Vec<ParamSpec>,
    ui: Option<UiHintMap>,
    body: RecipeBody,
}

impl Recipe {
    /// Build a recipe after validating its declared signature.
    ///
    /// The validation replaces runtime reflection: the parameter list is
    /// checked once here, and the body is never invoked. An integer default
    /// on a float parameter widens; any other type mismatch is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Introspection`] if a parameter name is empty, not a
    /// valid identifier, duplicated, or its default contradicts the declared
    /// type.
    pub fn new(
        name: impl Into<String>,
        metadata: RecipeMetadata,
        params: Vec<ParamSpec>,
        ui: Option<UiHintMap>,
        body: RecipeBody,
    ) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::introspection("Recipe name must not be empty"));
        }

        let mut params = params;
        let mut seen = HashSet::new();
        for spec in &mut params {
            if !is_identifier(&spec.name) {
                return Err(Error::introspection(format!(
                    "Invalid parameter name '{}' in recipe '{}'",
                    spec.name, name
                )));
            }
            if !seen.insert(spec.name.clone()) {
                return Err(Error::introspection(format!(
                    "Duplicate parameter '{}' in recipe '{}'",
                    spec.name, name
                )));
            }
            match (spec.value_type, spec.default.take()) {
                (_, None) => {}
                (ParamType::Text, Some(v @ ParamValue::Text(_)))
                | (ParamType::Integer, Some(v @ ParamValue::Integer(_)))
                | (ParamType::Float, Some(v @ ParamValue::Float(_))) => {
                    spec.default = Some(v);
                }
                (ParamType::Float, Some(ParamValue::Integer(n))) => {
                    spec.default = Some(ParamValue::Float(n as f64));
                }
                (declared, Some(other)) => {
                    return Err(Error::introspection(format!(
                        "Default for parameter '{}' in recipe '{}' is {} but the declared type is {}",
                        spec.name,
                        name,
                        other.kind(),
                        declared
                    )));
                }
            }
        }

        Ok(Self {
            name,
            metadata,
            params,
            ui,
            body,
        })
    }

    /// Recipe identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Presentational metadata
    pub fn metadata(&self) -> &RecipeMetadata {
        &self.metadata
    }

    /// Declared parameters, in declaration order
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Recipe-supplied UI hints, if any
    pub fn ui_hints(&self) -> Option<&UiHintMap> {
        self.ui.as_ref()
    }

    pub(crate) fn body(&self) -> &RecipeBody {
        &self.body
    }
}

/// A parameter name must look like an identifier: leading letter or
/// underscore, alphanumerics and underscores after that.
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
