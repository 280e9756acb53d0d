//! End-to-end flow tests: load recipes, build the form, resolve input,
//! render the prompt.

use promptbook_core::{
    build_form_schema, render_prompt, resolve_arguments, ParamValue, RawValues, RecipeRegistry,
    Resolution, UnmetReason,
};

const HAIKU_MANIFEST: &str = r#"
name: haiku
title: Haiku writer
params:
  - name: topic
  - name: lines
    type: integer
    default: 3
ui:
  topic:
    label: Poem topic
    help: What the poem should be about.
template: |
  Write a poem about {{ topic }} in exactly {{ lines }} lines.
"#;

fn raw(pairs: &[(&str, &str)]) -> RawValues {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn cook_flow_from_manifest() -> promptbook_core::Result<()> {
    let dir = tempfile::tempdir()?;
    tokio::fs::write(dir.path().join("haiku.yaml"), HAIKU_MANIFEST).await?;

    let mut registry = RecipeRegistry::new();
    let loaded = registry.load_dir(dir.path()).await?;
    assert_eq!(loaded, 1);

    let recipe = registry.get("haiku").expect("recipe registered");
    assert_eq!(recipe.metadata().title.as_deref(), Some("Haiku writer"));

    let fields = build_form_schema(recipe)?;
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].label, "Poem topic");
    assert_eq!(fields[0].help.as_deref(), Some("What the poem should be about."));
    assert_eq!(fields[1].label, "Lines (optional, defaults to 3)");
    assert!(fields[1].affordance.is_numeric());

    let resolved = match resolve_arguments(&fields, &raw(&[("topic", "rivers"), ("lines", "")])) {
        Resolution::Complete(args) => args,
        Resolution::Blocked(unmet) => panic!("unexpected blocked fields: {:?}", unmet),
    };

    let prompt = render_prompt(recipe, &resolved)?;
    assert_eq!(prompt, "Write a poem about rivers in exactly 3 lines.");

    Ok(())
}

#[tokio::test]
async fn cook_flow_blocks_on_empty_required_field() -> promptbook_core::Result<()> {
    let dir = tempfile::tempdir()?;
    tokio::fs::write(dir.path().join("haiku.yaml"), HAIKU_MANIFEST).await?;

    let registry = RecipeRegistry::discover(Some(dir.path())).await?;
    let recipe = registry.get("haiku").expect("recipe registered");
    let fields = build_form_schema(recipe)?;

    match resolve_arguments(&fields, &raw(&[("topic", ""), ("lines", "5")])) {
        Resolution::Blocked(unmet) => {
            assert_eq!(unmet.len(), 1);
            assert_eq!(unmet[0].name, "topic");
            assert_eq!(unmet[0].reason, UnmetReason::MissingRequired);
        }
        Resolution::Complete(_) => panic!("expected blocked resolution"),
    }

    Ok(())
}

#[tokio::test]
async fn cook_flow_with_builtin_recipe() -> promptbook_core::Result<()> {
    let registry = RecipeRegistry::with_builtins();
    let recipe = registry.get("greet").expect("builtin registered");

    let fields = build_form_schema(recipe)?;
    assert_eq!(fields[0].label, "Name (required)");
    assert_eq!(fields[1].label, "Times (optional, defaults to 1)");

    let resolved = resolve_arguments(&fields, &raw(&[("name", "Ada"), ("times", "")]))
        .into_complete()
        .expect("resolution complete");
    assert_eq!(resolved.get("name"), Some(&ParamValue::Text("Ada".to_string())));
    assert_eq!(resolved.get("times"), Some(&ParamValue::Integer(1)));

    let prompt = render_prompt(recipe, &resolved)?;
    assert!(prompt.contains("Ada"));
    assert!(prompt.contains('1'));

    Ok(())
}

#[tokio::test]
async fn discovery_merges_builtins_and_directory_recipes() -> promptbook_core::Result<()> {
    let dir = tempfile::tempdir()?;
    tokio::fs::write(dir.path().join("haiku.yaml"), HAIKU_MANIFEST).await?;

    let registry = RecipeRegistry::discover(Some(dir.path())).await?;
    let names = registry.names();
    assert!(names.contains(&"greet"));
    assert!(names.contains(&"brainstorm"));
    assert!(names.contains(&"haiku"));

    Ok(())
}
