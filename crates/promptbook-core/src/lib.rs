//! Promptbook Core Library
//!
//! This library provides the core functionality for turning parameterized
//! prompt recipes into descriptive forms, resolved arguments, and rendered
//! prompt text ready for a completion API.

pub mod completion;
pub mod config;
pub mod error;
pub mod manifest;
pub mod recipe;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod utils;

pub use crate::{
    completion::{CompletionClient, CompletionConfig},
    config::Config,
    error::{Error, Result},
    manifest::RecipeManifest,
    recipe::{
        ParamSpec, ParamType, ParamValue, Recipe, RecipeBody, RecipeMetadata, UiHint, UiHintMap,
    },
    registry::RecipeRegistry,
    render::render_prompt,
    resolve::{resolve_arguments, RawValues, ResolvedArgs, Resolution, UnmetField, UnmetReason},
    schema::{build_form_schema, Affordance, FieldDescriptor},
};
