//! # Categorizer
//!
//! Asks a chat model to categorize a 2D array of values, with one of two [Task]s:
//!
//! * [Task::SemanticMatch]: collapse the values into canonical labels. The reply maps each new label to the values it
//!   represents, e.g., `{"fruit": ["apple", "banana"]}`. Labels need not appear in the input.
//! * [Task::MetaLabel]: sort the values into a given number of meta categories.
//!
//! A call is one pipeline: the task picks a [ChatPromptTemplate](crate::prompt::chat::ChatPromptTemplate), a filler
//! fills in the items (and the category count for [Task::MetaLabel]), the completed messages go to a
//! [ChatCompletion] endpoint once, and the reply is decoded as JSON. Nothing is retried, and errors of the endpoint
//! and of JSON decoding are propagated as they are, so callers can downcast them from [anyhow::Error].
//!
//! The shape of the returned map is up to the model. Temperature 0 makes it likely, not certain, that the same input
//! gets the same answer.

use anyhow::Result;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;
use crate::utils::JsonMap;
use crate::utils::llm::{ChatCompletion, ChatRequest};
use crate::utils::llm::openai::{ConversationConfig, OpenAIChat};
use crate::utils::postprocess::json::{decode_reply, ReplyFormat};
use crate::utils::token::tiktoken::Tiktoken;

pub mod task;
pub mod templates;

pub use task::{InvalidArgument, Task};
use templates::build_messages;

pub const DEFAULT_CATEGORY_COUNT: usize = 5;

/// Configuration of a [Categorizer].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    /// Model and temperature of the request
    pub conversation: ConversationConfig,
    /// Category count used for [Task::MetaLabel] when a call does not give one.
    /// Must be positive; zero is rejected when deserializing, and by [Task::MetaLabel] calls that fall back to it.
    #[serde(deserialize_with = "positive_count")]
    pub default_category_count: usize,
    /// How the reply carries its JSON
    pub reply_format: ReplyFormat,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            conversation: ConversationConfig::default(),
            default_category_count: DEFAULT_CATEGORY_COUNT,
            reply_format: ReplyFormat::default(),
        }
    }
}

fn positive_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let count = usize::deserialize(deserializer)?;
    if count == 0 {
        Err(D::Error::custom(InvalidArgument::new("default_category_count", "0", "a positive integer")))
    } else {
        Ok(count)
    }
}

/// Semantic matching and meta labeling over a [ChatCompletion] endpoint.
///
/// A categorizer holds no state between calls.
pub struct Categorizer<C> {
    pub config: CategorizerConfig,
    chat: C,
    context_counter: Option<Tiktoken>,
}

impl Default for Categorizer<OpenAIChat> {
    /// OpenAI with credentials from the environment and the default config.
    fn default() -> Self {
        Self::new(OpenAIChat::default())
    }
}

impl<C: ChatCompletion> Categorizer<C> {
    pub fn new(chat: C) -> Self {
        Self::with_config(chat, CategorizerConfig::default())
    }

    pub fn with_config(chat: C, config: CategorizerConfig) -> Self {
        Self {
            config,
            chat,
            context_counter: None,
        }
    }

    /// Warn when a prompt does not fit into the context window of the configured model.
    /// The prompt is sent anyway.
    ///
    /// Fails if the model has no known tokenizer.
    pub fn with_context_check(mut self) -> Result<Self> {
        self.context_counter = Some(Tiktoken::new(self.config.conversation.model.as_str())?);
        Ok(self)
    }

    #[inline]
    pub fn chat(&self) -> &C {
        &self.chat
    }

    /// Build the request of a call without sending it.
    pub fn build_request<T: AsRef<str>>(&self,
                                        items: &[Vec<T>],
                                        category_count: Option<usize>,
                                        task: Task) -> Result<ChatRequest> {
        let category_count = category_count.unwrap_or(self.config.default_category_count);
        let messages = build_messages(task, category_count, items)?;
        Ok(self.config.conversation.request(messages))
    }

    /// Categorize the items with the task. `category_count` is only used by [Task::MetaLabel] and defaults to
    /// [CategorizerConfig::default_category_count].
    ///
    /// Sends exactly one request unless the arguments are invalid, in which case nothing is sent.
    ///
    /// Errors, to be recovered with [anyhow::Error::downcast_ref]:
    /// * [InvalidArgument] for a zero category count with [Task::MetaLabel], before anything is sent.
    /// * Whatever the endpoint fails with, e.g., [async_openai::error::OpenAIError] or
    ///   [EmptyReply](crate::utils::llm::openai::EmptyReply) for [OpenAIChat].
    /// * The decode failure depends on [CategorizerConfig::reply_format]: a [serde_json::Error] with
    ///   [ReplyFormat::Json], and with [ReplyFormat::EmbeddedJson] an
    ///   [InvalidJSON](crate::utils::postprocess::json::InvalidJSON) when the reply has no `{...}` span, or a
    ///   [serde_json::Error] when the span does not parse.
    pub async fn categorize<T: AsRef<str>>(&self,
                                           items: &[Vec<T>],
                                           category_count: Option<usize>,
                                           task: Task) -> Result<JsonMap> {
        let request = self.build_request(items, category_count, task)?;
        if let Some(counter) = &self.context_counter {
            if let Some(token_count) = counter.exceeds_context(&request.messages) {
                warn!("Prompt of task {} takes {} tokens, more than the {} tokens of model {}. Sending it anyway.",
                    task, token_count, counter.max_tokens, counter.model);
            }
        }
        debug!("Sending {} row(s) for task {} to model {}", items.len(), task, request.model);
        let reply = self.chat.complete(&request).await?;
        debug!("Got a reply of {} bytes", reply.len());
        decode_reply(&reply, self.config.reply_format)
    }

    /// Same as [Categorizer::categorize], with the task given by its name, `semantic_match` or `meta_label`.
    ///
    /// Fails with [InvalidArgument] for any other name, before anything is sent.
    pub async fn categorize_named<T: AsRef<str>>(&self,
                                                 items: &[Vec<T>],
                                                 category_count: Option<usize>,
                                                 task: &str) -> Result<JsonMap> {
        let task: Task = task.parse()?;
        self.categorize(items, category_count, task).await
    }
}
