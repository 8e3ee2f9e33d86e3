//! # Chat prompts
//!
//! A chat prompt is an ordered list of [ChatMessage]s, each tagged with a [Role].
//!
//! A [ChatPromptTemplate] is the chat counterpart of [PromptTemplate]: one template per message. It constructs a
//! [PartialChatPrompt], which gets filled placeholder by placeholder (or by a [Fill] filler) and is finally completed
//! into `Vec<ChatMessage>`.
//!
//! ```
//! use semantic_meta::prompt::PromptTemplate;
//! use semantic_meta::prompt::chat::{ChatPromptTemplate, Role};
//!
//! let template = ChatPromptTemplate::from_messages([
//!     (Role::System, PromptTemplate::new("Sort the list into {{number}} groups.")),
//!     (Role::Human, PromptTemplate::new("{{data}}")),
//! ]);
//! let messages = template
//!     .construct_prompt()
//!     .try_fill("number", "2").unwrap()
//!     .try_fill("data", "[\"cat\",\"car\"]").unwrap()
//!     .complete()
//!     .unwrap();
//! assert_eq!(messages[0].content, "Sort the list into 2 groups.");
//! assert_eq!(messages[1].role, Role::Human);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fmt::Formatter;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use crate::filler::Fill;
use crate::prompt::{PartialPrompt, PromptTemplate};
use crate::prompt::errors::{PlaceholderNotExist, UnfilledPlaceholders};

/// Who a message is from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    Human,
    Ai,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Human => "human",
            Role::Ai => "ai",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A concrete message with role and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// An ordered list of role-tagged prompt templates.
#[derive(Debug, Clone)]
pub struct ChatPromptTemplate {
    pub messages: Vec<(Role, PromptTemplate)>,
}

impl ChatPromptTemplate {
    pub fn from_messages(messages: impl IntoIterator<Item=(Role, PromptTemplate)>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
        }
    }

    /// All placeholders across all message templates.
    pub fn placeholders(&self) -> HashSet<String> {
        self.messages
            .iter()
            .flat_map(|(_, template)| template.placeholders.iter().cloned())
            .collect()
    }

    pub fn construct_prompt(&self) -> PartialChatPrompt {
        PartialChatPrompt {
            messages: self.messages
                .iter()
                .map(|(role, template)| (*role, template.construct_prompt()))
                .collect(),
        }
    }
}

/// A chat prompt whose messages may still have unfilled placeholders.
#[derive(Debug, Clone)]
pub struct PartialChatPrompt {
    pub messages: Vec<(Role, PartialPrompt)>,
}

impl PartialChatPrompt {
    /// Fill the placeholder in every message that has it.
    /// Returns an error if no message has the placeholder.
    pub fn try_fill(&mut self, placeholder: impl Into<String>, value: impl Into<String>) -> Result<&mut Self, PlaceholderNotExist> {
        let placeholder = placeholder.into();
        let value = value.into();
        let mut filled = false;
        for (_, partial_prompt) in self.messages.iter_mut() {
            if partial_prompt.has_placeholder(&placeholder) {
                partial_prompt.try_fill(placeholder.as_str(), value.as_str())?;
                filled = true;
            }
        }
        if filled {
            Ok(self)
        } else {
            let available = self.messages
                .iter()
                .flat_map(|(_, p)| p.template.placeholders.iter().cloned())
                .collect();
            Err(PlaceholderNotExist::new(placeholder, value, &available))
        }
    }

    /// Let a filler fill every message.
    pub fn fill_with(&mut self, filler: &impl Fill) -> Result<&mut Self> {
        for (_, partial_prompt) in self.messages.iter_mut() {
            filler.fill(partial_prompt)?;
        }
        Ok(self)
    }

    /// Complete every message.
    /// Returns an error listing the unfilled placeholders of the first incomplete message.
    pub fn complete(&self) -> Result<Vec<ChatMessage>, UnfilledPlaceholders> {
        self.messages
            .iter()
            .map(|(role, partial_prompt)| partial_prompt.complete().map(|content| ChatMessage::new(*role, content)))
            .collect()
    }
}

#[cfg(test)]
mod test_chat {
    use std::collections::HashSet;
    use crate::prompt::PromptTemplate;
    use super::{ChatMessage, ChatPromptTemplate, Role};

    fn template() -> ChatPromptTemplate {
        ChatPromptTemplate::from_messages([
            (Role::System, PromptTemplate::new("Use {{number}} groups for {{data}}.")),
            (Role::Human, PromptTemplate::new("{{data}}")),
        ])
    }

    #[test]
    fn test_placeholders_across_messages() {
        let expected = HashSet::from(["number".to_string(), "data".to_string()]);
        assert_eq!(expected, template().placeholders());
    }

    #[test]
    fn test_fill_shared_placeholder() {
        let messages = template()
            .construct_prompt()
            .try_fill("data", "x").unwrap()
            .try_fill("number", "4").unwrap()
            .complete()
            .unwrap();
        assert_eq!(vec![
            ChatMessage::new(Role::System, "Use 4 groups for x."),
            ChatMessage::new(Role::Human, "x"),
        ], messages);
    }

    #[test]
    fn test_unknown_and_unfilled() {
        let mut prompt = template().construct_prompt();
        assert!(prompt.try_fill("missing", "v").is_err());
        prompt.try_fill("data", "x").unwrap();
        let err = prompt.complete().expect_err("number is unfilled");
        assert_eq!(vec!["number".to_string()], err.unfilled_placeholders);
    }

    #[test]
    fn test_role_serde() {
        assert_eq!("\"human\"", serde_json::to_string(&Role::Human).unwrap());
        assert_eq!(Role::Ai, serde_json::from_str::<Role>("\"ai\"").unwrap());
    }
}
