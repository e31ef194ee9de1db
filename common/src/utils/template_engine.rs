pub use minijinja::{Environment, Value};

/// Thin wrapper around a minijinja environment with templates compiled
/// into the binary. Callers register their pages at startup.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    pub fn add_template(
        &mut self,
        name: &'static str,
        source: &'static str,
    ) -> Result<(), minijinja::Error> {
        self.env.add_template(name, source)
    }

    pub fn render(&self, name: &str, ctx: &Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn renders_registered_template() {
        let mut engine = TemplateEngine::new();
        engine
            .add_template("greet.html", "Hello {{ name }}!")
            .unwrap();

        let rendered = engine
            .render("greet.html", &context! { name => "world" })
            .unwrap();
        assert_eq!(rendered, "Hello world!");
    }

    #[test]
    fn unknown_template_is_an_error() {
        let engine = TemplateEngine::new();
        assert!(engine.render("missing.html", &Value::UNDEFINED).is_err());
    }
}
