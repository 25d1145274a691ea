//! Code-based prompt template system with variable substitution.

use std::collections::HashMap;

/// Result alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A required variable was not provided.
    #[error("missing required variable: {name}")]
    MissingVariable {
        /// Name of the missing variable.
        name: String,
    },

    /// The template could not be assembled.
    #[error("invalid template: {reason}")]
    InvalidTemplate {
        /// Reason for the failure.
        reason: String,
    },
}

/// A prompt template with `{{variable}}` placeholders.
///
/// Single braces are left alone, so templates can embed literal JSON
/// examples. Variables may be required or carry a default value; optional
/// variables without a value render as the empty string.
///
/// # Examples
///
/// ```
/// use recipe_prompts::template::PromptTemplate;
///
/// let template = PromptTemplate::builder("Cook {{dish}} for {{guests}} people.")
///     .with_variable("guests", "4")
///     .with_required_variable("dish")
///     .build()
///     .unwrap();
///
/// let mut vars = std::collections::HashMap::new();
/// vars.insert("dish".to_owned(), "risotto".to_owned());
/// assert_eq!(template.render_with(&vars).unwrap(), "Cook risotto for 4 people.");
/// ```
#[derive(Clone, Debug)]
pub struct PromptTemplate {
    template: String,
    variables: HashMap<String, String>,
    required_variables: Vec<String>,
}

impl PromptTemplate {
    /// Returns a builder for constructing templates.
    #[must_use]
    pub fn builder(template: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder::new(template)
    }

    /// Renders the template with the current variables.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a required variable is not set.
    pub fn render(&self) -> TemplateResult<String> {
        self.render_with(&HashMap::new())
    }

    /// Renders the template with additional runtime variables.
    ///
    /// Runtime variables override template variables. Substituted values are
    /// never re-scanned for placeholders.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingVariable`] if a required variable is not set.
    pub fn render_with(&self, runtime_vars: &HashMap<String, String>) -> TemplateResult<String> {
        for name in &self.required_variables {
            if !runtime_vars.contains_key(name) && !self.variables.contains_key(name) {
                return Err(TemplateError::MissingVariable { name: name.clone() });
            }
        }

        let mut result = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            let Some(len) = rest[start + 2..].find("}}") else {
                break;
            };
            let name = rest[start + 2..start + 2 + len].trim();
            result.push_str(&rest[..start]);
            let value = runtime_vars
                .get(name)
                .or_else(|| self.variables.get(name))
                .map_or("", String::as_str);
            result.push_str(value);
            rest = &rest[start + 2 + len + 2..];
        }
        result.push_str(rest);

        Ok(result)
    }
}

/// Builder for constructing prompt templates.
pub struct TemplateBuilder {
    template: String,
    variables: HashMap<String, String>,
    required_variables: Vec<String>,
}

impl TemplateBuilder {
    /// Creates a new builder with the supplied template text.
    #[must_use]
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            variables: HashMap::new(),
            required_variables: Vec::new(),
        }
    }

    /// Sets a variable with a default value.
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Declares a required variable (must be provided at render time).
    #[must_use]
    pub fn with_required_variable(mut self, name: impl Into<String>) -> Self {
        self.required_variables.push(name.into());
        self
    }

    /// Builds the template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::InvalidTemplate`] if a required variable is
    /// never referenced by the template text.
    pub fn build(self) -> TemplateResult<PromptTemplate> {
        let referenced = extract_variable_refs(&self.template);
        if let Some(unused) = self
            .required_variables
            .iter()
            .find(|name| !referenced.contains(name))
        {
            return Err(TemplateError::InvalidTemplate {
                reason: format!("required variable `{unused}` does not appear in the template"),
            });
        }

        Ok(PromptTemplate {
            template: self.template,
            variables: self.variables,
            required_variables: self.required_variables,
        })
    }
}

/// Extracts variable names from a template string.
fn extract_variable_refs(template: &str) -> Vec<String> {
    let mut vars = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(len) = rest[start + 2..].find("}}") else {
            break;
        };
        let name = rest[start + 2..start + 2 + len].trim();
        if !name.is_empty() && !vars.iter().any(|v| v == name) {
            vars.push(name.to_owned());
        }
        rest = &rest[start + 2 + len + 2..];
    }

    vars
}
