use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::PromptError;

/// `{{name}}` placeholder substitution. Unknown names render as the empty
/// string. Substituted values are never rescanned for placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn render(&self, vars: &HashMap<&str, &str>) -> Result<String, PromptError> {
        let pattern = placeholder()?;
        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            vars.get(&caps[1]).copied().unwrap_or_default().to_string()
        });
        Ok(rendered.into_owned())
    }
}

/// Compiled once per process and shared by every template.
fn placeholder() -> Result<&'static Regex, PromptError> {
    static PLACEHOLDER: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PLACEHOLDER
        .get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}"))
        .as_ref()
        .map_err(|e| PromptError::InvalidTemplate(e.to_string()))
}
