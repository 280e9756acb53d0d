//! promptbook CLI entrypoint
//! Parses command-line arguments and dispatches to the core library.

// Internal imports (std, crate)
use std::path::PathBuf;

// External imports (alphabetized)
use anyhow::Context;
use clap::Parser;
use dialoguer::Input;
use promptbook_core::{
    build_form_schema, render_prompt, resolve_arguments, CompletionClient, CompletionConfig,
    Config, FieldDescriptor, RawValues, RecipeRegistry, Resolution, UnmetReason,
};

#[derive(Parser)]
#[command(name = "promptbook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List available recipes
    List {
        /// Custom recipe directory
        #[arg(long)]
        recipe_dir: Option<PathBuf>,
    },
    /// Show the form a recipe generates
    Show {
        /// Recipe name
        recipe: String,
        /// Custom recipe directory
        #[arg(long)]
        recipe_dir: Option<PathBuf>,
    },
    /// Fill a recipe's parameters, render the prompt, and send it for completion
    Cook {
        /// Recipe name
        recipe: String,
        /// Argument value as NAME=VALUE (repeatable)
        ///
        /// Example: --arg topic=rivers --arg lines=5
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,
        /// Prompt for unfilled fields interactively
        #[arg(long)]
        interactive: bool,
        /// Print the rendered prompt without calling the completion API
        #[arg(long)]
        dry_run: bool,
        /// Model to request (default: gpt-4)
        #[arg(long)]
        model: Option<String>,
        /// Sampling temperature in [0.0, 2.0] (default: 0.0)
        #[arg(long)]
        temperature: Option<f32>,
        /// Custom recipe directory
        #[arg(long)]
        recipe_dir: Option<PathBuf>,
        /// Config file with cooking defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match &cli.command {
        Commands::List { recipe_dir } => {
            let registry = load_registry(recipe_dir.as_ref()).await?;
            for recipe in registry.iter() {
                println!("{}", recipe.name());
                let meta = recipe.metadata();
                if let Some(title) = &meta.title {
                    println!("    {}", title);
                }
                if let Some(author) = &meta.author {
                    println!("    By {}", author);
                }
                if let Some(description) = &meta.description {
                    println!("    {}", description);
                }
            }
        }
        Commands::Show { recipe, recipe_dir } => {
            let registry = load_registry(recipe_dir.as_ref()).await?;
            let recipe = registry
                .get(recipe)
                .with_context(|| format!("Unknown recipe '{recipe}'; run `promptbook list`"))?;

            println!("Recipe: {}", recipe.name());
            let meta = recipe.metadata();
            if let Some(title) = &meta.title {
                println!("{}", title);
            }
            if let Some(author) = &meta.author {
                println!("By {}", author);
            }
            if let Some(description) = &meta.description {
                println!("{}", description);
            }
            println!();

            let fields = build_form_schema(recipe).context("Failed to build form schema")?;
            for field in &fields {
                if let Some(text) = &field.preceding_text {
                    println!("{}", text);
                }
                let tag = if field.affordance.is_numeric() {
                    "numeric"
                } else {
                    "text"
                };
                println!("{} [{}]", field.label, tag);
                if let Some(help) = &field.help {
                    println!("    {}", help);
                }
                if let Some(placeholder) = &field.placeholder {
                    println!("    e.g. {}", placeholder);
                }
            }
        }
        Commands::Cook {
            recipe,
            args,
            interactive,
            dry_run,
            model,
            temperature,
            recipe_dir,
            config,
        } => {
            // Load cooking defaults, flags win over the config file
            let file_config = match config {
                Some(path) => Some(
                    Config::from_file(path)
                        .await
                        .with_context(|| format!("Failed to load config {}", path.display()))?,
                ),
                None => None,
            };

            let recipe_dir = recipe_dir.clone().or_else(|| {
                file_config
                    .as_ref()
                    .and_then(|c| c.recipe_dir.clone().map(PathBuf::from))
            });
            let model = model
                .clone()
                .or_else(|| file_config.as_ref().map(|c| c.model.clone()))
                .unwrap_or_else(|| "gpt-4".to_string());
            let temperature = (*temperature)
                .or(file_config.as_ref().map(|c| c.temperature))
                .unwrap_or(0.0);

            let registry = load_registry(recipe_dir.as_ref()).await?;
            let recipe = registry
                .get(recipe)
                .with_context(|| format!("Unknown recipe '{recipe}'; run `promptbook list`"))?;

            let fields = build_form_schema(recipe).context("Failed to build form schema")?;

            // Collect raw values from --arg flags, then interactively
            let mut raw = RawValues::new();
            for pair in args {
                let (name, value) = parse_arg(pair)?;
                raw.insert(name, value);
            }
            if *interactive {
                fill_interactively(&fields, &mut raw)?;
            }

            let resolved = match resolve_arguments(&fields, &raw) {
                Resolution::Complete(resolved) => resolved,
                Resolution::Blocked(unmet) => {
                    eprintln!("Cannot render '{}' yet:", recipe.name());
                    for field in &unmet {
                        match field.reason {
                            UnmetReason::MissingRequired => {
                                eprintln!("  {} is required and empty", field.name)
                            }
                            UnmetReason::InvalidNumber => {
                                eprintln!("  {} expects a number", field.name)
                            }
                        }
                    }
                    anyhow::bail!("{} field(s) unresolved", unmet.len());
                }
            };

            let prompt = render_prompt(recipe, &resolved).context("Failed to render prompt")?;

            if *dry_run {
                println!("{}", prompt);
                return Ok(());
            }

            let api_key = std::env::var("OPENAI_API_KEY").context(
                "OPENAI_API_KEY is not set; pass --dry-run to preview the prompt instead",
            )?;

            let mut completion_config =
                CompletionConfig::new(api_key, model).with_temperature(temperature);
            if let Some(base_url) = file_config.as_ref().and_then(|c| c.base_url.clone()) {
                completion_config = completion_config.with_base_url(base_url);
            }

            let client = CompletionClient::new(completion_config);
            let output = client
                .complete(&prompt)
                .await
                .context("Completion call failed")?;
            println!("{}", output);
        }
    }
    Ok(())
}

async fn load_registry(recipe_dir: Option<&PathBuf>) -> anyhow::Result<RecipeRegistry> {
    let registry = RecipeRegistry::discover(recipe_dir.map(|p| p.as_path()))
        .await
        .context("Failed to load recipes")?;
    log::debug!("{} recipe(s) available", registry.len());
    Ok(registry)
}

/// Split a NAME=VALUE argument pair.
fn parse_arg(pair: &str) -> anyhow::Result<(String, String)> {
    match pair.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => anyhow::bail!("Invalid --arg '{pair}': expected NAME=VALUE"),
    }
}

/// Prompt for every field not already supplied via --arg. Empty answers are
/// allowed; resolution decides whether a default covers them.
fn fill_interactively(fields: &[FieldDescriptor], raw: &mut RawValues) -> anyhow::Result<()> {
    for field in fields {
        if raw.get(&field.name).map(|v| !v.is_empty()).unwrap_or(false) {
            continue;
        }
        if let Some(text) = &field.preceding_text {
            println!("{}", text);
        }
        if let Some(help) = &field.help {
            println!("  {}", help);
        }
        if let Some(placeholder) = &field.placeholder {
            println!("  e.g. {}", placeholder);
        }
        let value: String = Input::new()
            .with_prompt(&field.label)
            .allow_empty(true)
            .interact_text()?;
        raw.insert(field.name.clone(), value);
    }
    Ok(())
}
