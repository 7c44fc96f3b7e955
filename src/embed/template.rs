//! Template types for typed variable injection.

use std::marker::PhantomData;

/// Trait for template variable sets
pub trait TemplateVars {
    /// Value for the `__NAME__` placeholder, or `None` to leave it as is.
    fn lookup(&self, name: &str) -> Option<&str>;
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    /// Fill every `__NAME__` placeholder in one pass.
    ///
    /// Substituted values are never rescanned, so page content that happens
    /// to contain placeholder text comes out verbatim.
    pub fn render(&self, vars: &V) -> String {
        let mut out = String::with_capacity(self.content.len() * 2);
        let mut rest = self.content;

        while let Some(start) = rest.find("__") {
            let after = &rest[start + 2..];
            let name_len = after
                .find(|c: char| !(c.is_ascii_uppercase() || c == '_'))
                .unwrap_or(after.len());
            let name = &after[..name_len];

            match name.strip_suffix("__").and_then(|n| vars.lookup(n)) {
                Some(value) => {
                    out.push_str(&rest[..start]);
                    out.push_str(value);
                    rest = &after[name_len..];
                }
                _ => {
                    out.push_str(&rest[..start + 2]);
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Vars {
        title: &'static str,
        body: &'static str,
    }

    impl TemplateVars for Vars {
        fn lookup(&self, name: &str) -> Option<&str> {
            match name {
                "TITLE" => Some(self.title),
                "BODY" => Some(self.body),
                _ => None,
            }
        }
    }

    const PAGE: Template<Vars> = Template::new("<title>__TITLE__</title><main>__BODY__</main>");

    #[test]
    fn test_render_fills_placeholders() {
        let html = PAGE.render(&Vars {
            title: "Intro",
            body: "<p>hi</p>",
        });
        assert_eq!(html, "<title>Intro</title><main><p>hi</p></main>");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let html = PAGE.render(&Vars {
            title: "__BODY__",
            body: "x",
        });
        assert_eq!(html, "<title>__BODY__</title><main>x</main>");
    }

    #[test]
    fn test_unknown_placeholders_kept() {
        let t: Template<Vars> = Template::new("a __OTHER__ b __ c__TITLE__");
        let html = t.render(&Vars { title: "T", body: "" });
        assert_eq!(html, "a __OTHER__ b __ cT");
    }
}
