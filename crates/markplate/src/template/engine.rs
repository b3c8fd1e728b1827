//! Template engine abstraction.
//!
//! The dispatcher only needs two things from a template backend: whether a
//! template exists under a name, and executing it against a data payload.
//! [`TemplateEngine`] captures that seam; [`MiniJinjaEngine`] is the
//! implementation used by default.

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};

use crate::error::TemplateError;
use crate::template::registry::{RegistryError, TemplateRegistry};

/// A template engine that renders named templates with data.
///
/// Engines are read-only while rendering, so one engine can serve any number
/// of render calls, including concurrent ones.
pub trait TemplateEngine: Send + Sync {
    /// Renders a template string with the given data.
    ///
    /// This compiles and renders the template in one step. For repeated
    /// rendering of the same template, use [`add_template`](Self::add_template)
    /// and [`render_named`](Self::render_named).
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, TemplateError>;

    /// Compiles and stores a named template.
    fn add_template(&mut self, name: &str, source: &str) -> Result<(), TemplateError>;

    /// Renders a previously registered template.
    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, TemplateError>;

    /// Checks if a template with the given name exists.
    fn has_template(&self, name: &str) -> bool;
}

/// MiniJinja-based template engine.
///
/// The environment is set up for producing markup fragments:
///
/// - no auto-escaping, since `Content` is already rendered markup
/// - trailing newlines are kept, so `<hr/>\n` renders byte for byte
/// - undefined values are errors, so a template reading a field its payload
///   lacks fails instead of printing nothing
///
/// # Example
///
/// ```rust
/// use markplate::template::{MiniJinjaEngine, TemplateEngine};
/// use serde_json::json;
///
/// let mut engine = MiniJinjaEngine::new();
/// engine.add_template("em", "<i>{{ Content }}</i>").unwrap();
///
/// let output = engine.render_named("em", &json!({ "Content": "hi" })).unwrap();
/// assert_eq!(output, "<i>hi</i>");
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine with no templates and the default filters registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_keep_trailing_newline(true);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        register_filters(&mut env);
        Self { env }
    }

    /// Creates an engine holding every template of `registry`.
    ///
    /// # Errors
    ///
    /// Fails if a file template cannot be read, or if a template does not
    /// compile.
    pub fn from_registry(registry: &TemplateRegistry) -> Result<Self, RegistryError> {
        let mut engine = Self::new();
        for name in registry.names() {
            let source = registry.get_content(name)?;
            engine
                .add_template(name, &source)
                .map_err(|err| RegistryError::Invalid {
                    name: name.to_string(),
                    message: err.to_string(),
                })?;
        }
        tracing::debug!(templates = registry.len(), "template engine built");
        Ok(engine)
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows registering extra filters or functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_template(&self, template: &str, data: &serde_json::Value) -> Result<String, TemplateError> {
        let value = Value::from_serialize(data);
        Ok(self.env.render_str(template, value)?)
    }

    fn add_template(&mut self, name: &str, source: &str) -> Result<(), TemplateError> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())?;
        tracing::debug!(template = name, "template registered");
        Ok(())
    }

    fn render_named(&self, name: &str, data: &serde_json::Value) -> Result<String, TemplateError> {
        let tmpl = self.env.get_template(name)?;
        let value = Value::from_serialize(data);
        Ok(tmpl.render(value)?)
    }

    fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

/// Registers markplate's filters with a MiniJinja environment.
///
/// This is called automatically by [`MiniJinjaEngine::new`].
pub fn register_filters(env: &mut Environment<'static>) {
    // Newline filter
    env.add_filter("nl", |value: Value| -> String { format!("{}\n", value) });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_template_simple() {
        let engine = MiniJinjaEngine::new();
        let output = engine
            .render_template("Hello, {{ name }}!", &json!({ "name": "World" }))
            .unwrap();
        assert_eq!(output, "Hello, World!");
    }

    #[test]
    fn test_named_template() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_template("p", "<p{{ Attrs }}>{{ Content }}</p>").unwrap();

        assert!(engine.has_template("p"));
        assert!(!engine.has_template("em"));

        let output = engine
            .render_named("p", &json!({ "Content": "x", "Attrs": " id=\"a\"" }))
            .unwrap();
        assert_eq!(output, "<p id=\"a\">x</p>");
    }

    #[test]
    fn test_no_auto_escape_even_for_html_names() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_template("p.html", "{{ Content }}").unwrap();
        let output = engine
            .render_named("p.html", &json!({ "Content": "<b>x</b>" }))
            .unwrap();
        assert_eq!(output, "<b>x</b>");
    }

    #[test]
    fn test_keeps_trailing_newline() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_template("hr", "<hr/>\n").unwrap();
        assert_eq!(engine.render_named("hr", &json!({})).unwrap(), "<hr/>\n");
    }

    #[test]
    fn test_undefined_field_is_error() {
        let mut engine = MiniJinjaEngine::new();
        engine.add_template("br", "{{ Content }}").unwrap();
        let err = engine.render_named("br", &json!({})).unwrap_err();
        assert!(matches!(err, TemplateError::Undefined(_)));
    }

    #[test]
    fn test_syntax_error() {
        let mut engine = MiniJinjaEngine::new();
        let err = engine.add_template("bad", "{{ unclosed").unwrap_err();
        assert!(matches!(err, TemplateError::Syntax(_)));
    }

    #[test]
    fn test_missing_template() {
        let engine = MiniJinjaEngine::new();
        let err = engine.render_named("nope", &json!({})).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(_)));
    }

    #[test]
    fn test_nl_filter() {
        let engine = MiniJinjaEngine::new();
        let output = engine
            .render_template("{{ Content | nl }}", &json!({ "Content": "line" }))
            .unwrap();
        assert_eq!(output, "line\n");
    }

    #[test]
    fn test_environment_accepts_extra_filters() {
        let mut engine = MiniJinjaEngine::new();
        engine
            .environment_mut()
            .add_filter("shout", |value: String| value.to_uppercase());
        engine.add_template("h1", "<h1>{{ Content | shout }}</h1>").unwrap();

        assert!(engine.environment().get_template("h1").is_ok());
        let output = engine
            .render_named("h1", &json!({ "Content": "intro" }))
            .unwrap();
        assert_eq!(output, "<h1>INTRO</h1>");
    }

    #[test]
    fn test_from_registry() {
        let mut registry = TemplateRegistry::new();
        registry.add_inline("em", "<i>{{ Content }}</i>");
        registry.add_inline("strong", "<b>{{ Content }}</b>");

        let engine = MiniJinjaEngine::from_registry(&registry).unwrap();
        assert!(engine.has_template("em"));
        assert!(engine.has_template("strong"));
    }

    #[test]
    fn test_from_registry_reports_invalid_template() {
        let mut registry = TemplateRegistry::new();
        registry.add_inline("p", "{% if %}");

        let err = MiniJinjaEngine::from_registry(&registry).err().unwrap();
        assert!(matches!(err, RegistryError::Invalid { ref name, .. } if name == "p"));
    }
}
