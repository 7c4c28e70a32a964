//! Handlebars template engine.
//!
//! Output is source code, so HTML escaping is off. Missing fields render
//! as empty text. Helpers:
//!
//! | helper    | example                              |
//! |-----------|--------------------------------------|
//! | `upper`   | `{{upper name}}`                     |
//! | `lower`   | `{{lower name}}`                     |
//! | `snake`   | `{{snake name}}` -> `user_service`   |
//! | `kebab`   | `{{kebab name}}` -> `user-service`   |
//! | `pascal`  | `{{pascal name}}` -> `UserService`   |
//! | `title`   | `{{title name}}` -> `User Service`   |
//! | `default` | `{{default keys.port "8080"}}`       |

use brevity_core::{
    application::{ApplicationError, ports::TemplateEngine},
    error::BrevityResult,
};
use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, no_escape,
};
use serde_json::Value;
use tracing::trace;

use super::case::{to_kebab_case, to_pascal_case, to_snake_case, to_title_case};

/// Name used in errors for one-off templates.
const INLINE: &str = "<inline>";

/// [`TemplateEngine`] backed by a private handlebars registry.
pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for HandlebarsEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlebarsEngine")
            .field("templates", &self.template_names())
            .finish()
    }
}

impl HandlebarsEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.set_strict_mode(false);

        registry.register_helper("upper", Box::new(upper_helper));
        registry.register_helper("lower", Box::new(lower_helper));
        registry.register_helper("snake", Box::new(snake_helper));
        registry.register_helper("kebab", Box::new(kebab_helper));
        registry.register_helper("pascal", Box::new(pascal_helper));
        registry.register_helper("title", Box::new(title_helper));
        registry.register_helper("default", Box::new(default_helper));

        Self { registry }
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn register(&mut self, name: &str, source: &str) -> BrevityResult<()> {
        trace!(template = name, "register");
        self.registry
            .register_template_string(name, source)
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    template: name.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }

    fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registry.get_templates().keys().cloned().collect();
        names.sort();
        names
    }

    fn render(&self, name: &str, data: &Value) -> BrevityResult<String> {
        self.registry.render(name, data).map_err(|e| {
            ApplicationError::RenderingFailed {
                template: name.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn render_str(&self, source: &str, data: &Value) -> BrevityResult<String> {
        self.registry.render_template(source, data).map_err(|e| {
            ApplicationError::RenderingFailed {
                template: INLINE.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

// Handlebars helpers

fn text_param(h: &Helper, index: usize) -> String {
    match h.param(index).map(|p| p.value()) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn upper_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&text_param(h, 0).to_uppercase())?;
    Ok(())
}

fn lower_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&text_param(h, 0).to_lowercase())?;
    Ok(())
}

fn snake_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&to_snake_case(&text_param(h, 0)))?;
    Ok(())
}

fn kebab_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&to_kebab_case(&text_param(h, 0)))?;
    Ok(())
}

fn pascal_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&to_pascal_case(&text_param(h, 0)))?;
    Ok(())
}

fn title_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write(&to_title_case(&text_param(h, 0)))?;
    Ok(())
}

/// First parameter unless it is empty, otherwise the second.
fn default_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let value = text_param(h, 0);
    if value.is_empty() {
        out.write(&text_param(h, 1))?;
    } else {
        out.write(&value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn renders_registered_template_without_escaping() {
        let mut engine = HandlebarsEngine::new();
        engine.register("main", "hello {{name}} <{{keys.module}}>").unwrap();
        let out = engine
            .render("main", &json!({"name": "demo", "keys": {"module": "a&b"}}))
            .unwrap();
        assert_eq!(out, "hello demo <a&b>");
    }

    #[test]
    fn re_registering_replaces() {
        let mut engine = HandlebarsEngine::new();
        engine.register("main", "one").unwrap();
        engine.register("main", "two").unwrap();
        assert_eq!(engine.render("main", &json!({})).unwrap(), "two");
        assert_eq!(engine.template_names(), vec!["main"]);
    }

    #[test]
    fn helpers_convert_case_and_default() {
        let engine = HandlebarsEngine::new();
        let data = json!({"name": "userService", "keys": {}});
        let out = engine
            .render_str(
                "{{snake name}} {{kebab name}} {{pascal name}} {{upper name}} {{default keys.port \"8080\"}}",
                &data,
            )
            .unwrap();
        assert_eq!(out, "user_service user-service UserService USERSERVICE 8080");
    }

    #[test]
    fn parent_chain_is_reachable() {
        let engine = HandlebarsEngine::new();
        let data = json!({"name": "serve", "parent": {"name": "cobra", "parent": {"name": "demo"}}});
        assert_eq!(
            engine.render_str("{{parent.parent.name}}/{{name}}", &data).unwrap(),
            "demo/serve"
        );
    }

    #[test]
    fn syntax_errors_are_rendering_failures() {
        let mut engine = HandlebarsEngine::new();
        let err = engine.register("bad", "{{#if}}").unwrap_err();
        assert!(err.to_string().contains("template bad failed"));
        assert!(engine.render("missing", &json!({})).is_err());
    }
}
