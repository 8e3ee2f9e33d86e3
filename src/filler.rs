//! # Filler
//!
//! Anything that fills one or more placeholders of a [PartialPrompt].

use std::collections::BTreeMap;
use crate::prompt::PartialPrompt;
use anyhow::Result;

pub trait FillPlaceholders {
    /// Names of the placeholders this filler knows how to fill.
    fn placeholders_to_fill(&self) -> Vec<&str>;
}

pub trait Fill: FillPlaceholders {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()>;
}

pub trait FillWith<CTX>: FillPlaceholders {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: CTX) -> Result<CTX>;
}

impl<T: FillWith<()>> Fill for T {
    fn fill(&self, partial_prompt: &mut PartialPrompt) -> Result<()> {
        self.fill_with(partial_prompt, ())
    }
}

/// Fills placeholders from fixed values.
///
/// Only the placeholders that the partial prompt actually has are filled, so one filler can serve every message of
/// a chat prompt.
#[derive(Debug, Clone, Default)]
pub struct ValueFiller {
    values: BTreeMap<String, String>,
}

impl ValueFiller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(placeholder.into(), value.into());
        self
    }
}

impl FillPlaceholders for ValueFiller {
    fn placeholders_to_fill(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }
}

impl FillWith<()> for ValueFiller {
    fn fill_with(&self, partial_prompt: &mut PartialPrompt, context: ()) -> Result<()> {
        for (placeholder, value) in self.values.iter() {
            if partial_prompt.has_placeholder(placeholder) {
                partial_prompt.try_fill(placeholder.as_str(), value.as_str())?;
            }
        }
        Ok(context)
    }
}
