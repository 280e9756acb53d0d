//! Prompt rendering: invoke a recipe body and normalize indentation.

use tera::Tera;

use crate::recipe::{Recipe, RecipeBody};
use crate::resolve::ResolvedArgs;

/// Render a recipe into its final prompt text.
///
/// Template bodies are rendered with Tera, autoescape off (prompts are plain
/// text, not HTML); function bodies are invoked directly. The produced text
/// then has its common leading indentation stripped so multi-line template
/// literals read cleanly.
///
/// # Errors
///
/// Returns [`crate::Error::Tera`] when a template body fails to render
/// (e.g. a required argument is still missing from the context) and
/// [`crate::Error::Render`] when a function body fails. The underlying cause
/// is preserved in the message, never swallowed.
pub fn render_prompt(recipe: &Recipe, args: &ResolvedArgs) -> crate::Result<String> {
    log::debug!("Rendering recipe '{}'", recipe.name());

    let text = match recipe.body() {
        RecipeBody::Template(source) => Tera::one_off(source, &args.to_context(), false)?,
        RecipeBody::Function(body) => body(args).map_err(|e| {
            crate::Error::render(format!("Recipe '{}' failed: {}", recipe.name(), e))
        })?,
    };

    Ok(dedent(&text))
}

/// Strip the greatest common leading whitespace shared by all non-blank
/// lines, then trim leading and trailing blank lines.
pub fn dedent(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let indent = &line[..line.len() - line.trim_start().len()];
        margin = Some(match margin {
            None => indent,
            Some(current) => common_prefix(current, indent),
        });
    }
    let margin = margin.unwrap_or("");

    let mut lines: Vec<&str> = text
        .lines()
        .map(|line| match line.strip_prefix(margin) {
            Some(stripped) => stripped,
            // Only blank lines can be shorter than the common margin.
            None => line.trim_start(),
        })
        .collect();

    while lines.first().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.remove(0);
    }
    while lines.last().map(|l| l.trim().is_empty()).unwrap_or(false) {
        lines.pop();
    }

    lines.join("\n")
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let end = a
        .char_indices()
        .zip(b.chars())
        .take_while(|((_, ca), cb)| ca == cb)
        .last()
        .map(|((i, c), _)| i + c.len_utf8())
        .unwrap_or(0);
    &a[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::{ParamSpec, ParamType, ParamValue, RecipeMetadata};
    use crate::resolve::{resolve_arguments, RawValues, Resolution};
    use crate::schema::build_form_schema;

    fn template_recipe(template: &str) -> Recipe {
        Recipe::new(
            "demo",
            RecipeMetadata::default(),
            vec![
                ParamSpec::new("name", ParamType::Text),
                ParamSpec::new("times", ParamType::Integer)
                    .with_default(ParamValue::Integer(1)),
            ],
            None,
            RecipeBody::Template(template.to_string()),
        )
        .unwrap()
    }

    fn resolved(name: &str, times: &str) -> ResolvedArgs {
        let recipe = template_recipe("unused");
        let fields = build_form_schema(&recipe).unwrap();
        let mut raw = RawValues::new();
        raw.insert("name".to_string(), name.to_string());
        raw.insert("times".to_string(), times.to_string());
        match resolve_arguments(&fields, &raw) {
            Resolution::Complete(args) => args,
            Resolution::Blocked(unmet) => panic!("unexpected blocked fields: {:?}", unmet),
        }
    }

    #[test]
    fn test_dedent_strips_common_indentation() {
        assert_eq!(dedent("    line one\n    line two"), "line one\nline two");
    }

    #[test]
    fn test_dedent_keeps_relative_indentation() {
        assert_eq!(dedent("  a\n    b\n  c"), "a\n  b\nc");
    }

    #[test]
    fn test_dedent_ignores_blank_lines_for_margin() {
        assert_eq!(dedent("    a\n\n    b"), "a\n\nb");
    }

    #[test]
    fn test_dedent_trims_blank_edges() {
        assert_eq!(dedent("\n    a\n    b\n"), "a\nb");
    }

    #[test]
    fn test_dedent_unindented_text_is_untouched() {
        assert_eq!(dedent("a\nb"), "a\nb");
    }

    #[test]
    fn test_render_template_body() {
        let recipe = template_recipe("Greet {{ name }} {{ times }} time(s).");
        let prompt = render_prompt(&recipe, &resolved("Ada", "")).unwrap();
        assert_eq!(prompt, "Greet Ada 1 time(s).");
    }

    #[test]
    fn test_render_dedents_template_output() {
        let recipe = template_recipe("    Dear {{ name }},\n    hello.");
        let prompt = render_prompt(&recipe, &resolved("Ada", "")).unwrap();
        assert_eq!(prompt, "Dear Ada,\nhello.");
    }

    #[test]
    fn test_render_surfaces_template_failure() {
        let recipe = template_recipe("{{ nonexistent }}");
        let result = render_prompt(&recipe, &resolved("Ada", ""));
        assert!(matches!(result, Err(crate::Error::Tera(_))));
    }

    #[test]
    fn test_render_function_body() {
        fn body(args: &ResolvedArgs) -> crate::Result<String> {
            let name = args.get("name").and_then(|v| v.as_text()).unwrap_or("");
            Ok(format!("    Hi {}.", name))
        }

        let recipe = Recipe::new(
            "func",
            RecipeMetadata::default(),
            vec![ParamSpec::new("name", ParamType::Text)],
            None,
            RecipeBody::Function(body),
        )
        .unwrap();

        let fields = build_form_schema(&recipe).unwrap();
        let mut raw = RawValues::new();
        raw.insert("name".to_string(), "Ada".to_string());
        let args = resolve_arguments(&fields, &raw).into_complete().unwrap();

        assert_eq!(render_prompt(&recipe, &args).unwrap(), "Hi Ada.");
    }

    #[test]
    fn test_render_function_failure_is_a_render_error() {
        fn body(_: &ResolvedArgs) -> crate::Result<String> {
            Err(crate::Error::config("boom"))
        }

        let recipe = Recipe::new(
            "func",
            RecipeMetadata::default(),
            vec![],
            None,
            RecipeBody::Function(body),
        )
        .unwrap();

        let result = render_prompt(&recipe, &ResolvedArgs::default());
        match result {
            Err(crate::Error::Render(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected render error, got {:?}", other),
        }
    }
}
