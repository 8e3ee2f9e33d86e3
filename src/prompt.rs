//! # Prompt
//! A prompt is simply a string
//! ## PromptTemplate
//! A prompt template is a string with placeholders.
//!
//! ## Placeholder
//! A placeholder is a string that is in the format of `{{name}}`. It can be filled with a value.
//! It has a name, which is the string inside the double braces.
//!
//! ## PartialPrompt
//! A partial prompt is a prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
//!
//! The placeholders in a partial prompt can be filled with values via [PartialPrompt::try_fill], which can also update the filling values of the placeholders.
//! When all placeholders are filled, the partial prompt can be completed via [PartialPrompt::complete], in which the placeholders in a template are **actually** replaced with the filling values.
//!
//! ## Chat prompts
//! Chat models take an ordered list of role-tagged messages rather than one string. See [chat] for templates of such lists.
//!


use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};
use crate::utils::prompt_processing::{get_placeholders, replace_all_placeholders};
use log::warn;

pub mod chat;


/// A prompt template with some placeholders filled. A partial prompt can be only constructed from a prompt template via [PromptTemplate::construct_prompt].
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PartialPrompt {
    /// The template of the partial prompt, readonly
    #[readonly]
    pub template: PromptTemplate,

    /// Mapping from placeholder name to its filling value
    pub(crate) placeholder_to_vals: HashMap<String, Option<String>>,

    /// Record the placeholders that are not filled yet
    pub(crate) unfilled_placeholders: HashSet<String>,
}

impl PartialPrompt {
    /// Fill the placeholders in the partial prompt with the given values.
    /// Returns an error if the placeholder does not exist.
    pub fn try_fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        if self.placeholder_to_vals.contains_key(&placeholder) {
            self.unfilled_placeholders.remove(&placeholder);
            self.placeholder_to_vals.insert(placeholder, Some(value.into()));
            Ok(self)
        } else {
            Err(PlaceholderNotExist::new(placeholder, value, &self.template.placeholders))
        }
    }

    /// Whether the template of this partial prompt has the placeholder, filled or not.
    #[inline]
    pub fn has_placeholder(&self, placeholder: &str) -> bool {
        self.placeholder_to_vals.contains_key(placeholder)
    }

    /// Whether all placeholders are filled.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.unfilled_placeholders.is_empty()
    }

    /// Complete the partial prompt and return the completed prompt.
    /// Returns an error if there are still unfilled placeholders.
    pub fn complete(&self) -> Result<String, UnfilledPlaceholders> {
        if self.is_complete() {
            let template = self.template.str();
            Ok(replace_all_placeholders(template, &self.placeholder_to_vals))
        } else {
            Err(UnfilledPlaceholders {
                all_placeholders: self.template.placeholders.iter().map(Clone::clone).collect(),
                unfilled_placeholders: self.unfilled_placeholders.iter().map(|s| (*s).clone()).collect(),
            })
        }
    }
}

/// A prompt template with placeholders.
#[derive(Debug, Clone)]
#[readonly::make]
pub struct PromptTemplate {
    /// The template of the partial prompt, immutable
    template: Arc<String>,

    /// The placeholders in the template, readonly
    #[readonly]
    pub placeholders: HashSet<String>,
}

impl PromptTemplate {
    /// Create a prompt template from a string. Warns if the template does not have any placeholder.
    pub fn new(template: impl Into<String>) -> Self {
        let template = Self::build(template);
        if template.placeholders.is_empty() {
            warn!("Your prompt template does not have a placeholder. If this is intended, use PromptTemplate::literal. \
            Otherwise, check whether you have written placeholders correctly.\n\
            Got prompt template:\n\
            {}", template.str());
        }
        template
    }

    /// Create a prompt template that is meant to have no placeholder, e.g., a fixed instruction.
    ///
    /// Any `{{name}}` in the string is still recognized as a placeholder.
    pub fn literal(template: impl Into<String>) -> Self {
        Self::build(template)
    }

    fn build(template: impl Into<String>) -> Self {
        let template = template.into();
        let placeholders = get_placeholders(&template);
        Self {
            template: Arc::new(template),
            placeholders,
        }
    }

    /// Get the prompt template as a string.
    #[inline]
    pub fn str(&self) -> &str {
        &self.template
    }

    /// Construct a partial prompt from the prompt template.
    pub fn construct_prompt(&self) -> PartialPrompt {
        PartialPrompt {
            template: self.clone(),
            placeholder_to_vals: self.placeholders.iter().map(|p| (p.clone(), None)).collect(),
            unfilled_placeholders: self.placeholders.clone(),
        }
    }
}

pub mod errors {
    use std::collections::HashSet;
    use std::error::Error;
    use std::fmt;
    use std::fmt::Formatter;

    /// Error when trying to complete a partial prompt but there are still unfilled placeholders.
    #[derive(Debug)]
    pub struct UnfilledPlaceholders {
        pub unfilled_placeholders: Vec<String>,
        pub all_placeholders: Vec<String>,
    }

    impl fmt::Display for UnfilledPlaceholders {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "UnfilledPlaceholders: to complete the prompt template,\n  Requires Placeholders:{:?}\n  Unfilled Placeholders:{:?}",
                   self.all_placeholders, self.unfilled_placeholders)
        }
    }

    impl Error for UnfilledPlaceholders {}

    /// Error when trying to fill a placeholder that does not exist in the prompt template of the partial prompt.
    #[derive(Debug)]
    pub struct PlaceholderNotExist {
        pub try_fill_placeholder: String,
        pub value: String,
        pub available_placeholders: Vec<String>,
    }

    impl PlaceholderNotExist {
        pub(crate) fn new(try_fill_placeholder: impl Into<String>,
                          value: impl Into<String>,
                          available_placeholders: &HashSet<String>) -> Self {
            let available_placeholders = available_placeholders.iter().map(|k| k.clone()).collect();
            PlaceholderNotExist {
                try_fill_placeholder: try_fill_placeholder.into(),
                value: value.into(),
                available_placeholders,
            }
        }
    }

    impl fmt::Display for PlaceholderNotExist {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "PlaceholderNotExist: try to fill placeholder = {} with value = {}, but available placeholders are {:?}",
                   self.try_fill_placeholder,
                   self.value,
                   self.available_placeholders)
        }
    }

    impl Error for PlaceholderNotExist {}
}
