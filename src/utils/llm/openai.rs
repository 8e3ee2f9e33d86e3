use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use anyhow::Result;
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage,
    ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs,
    CreateChatCompletionResponse,
};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::prompt::chat::{ChatMessage, Role};
use crate::utils::llm::{ChatCompletion, ChatRequest};

/// Model and sampling settings of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    pub model: String,
    pub temperature: f32,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
        }
    }
}

impl ConversationConfig {
    /// Make a request of the messages with this config.
    pub fn request(&self, messages: Vec<ChatMessage>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages,
        }
    }
}

/// Error when the API answers without any message content.
#[derive(Debug, Clone)]
pub struct EmptyReply {
    pub model: String,
}

impl fmt::Display for EmptyReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "EmptyReply: model {} replied without content", self.model)
    }
}

impl Error for EmptyReply {}

/// Chat endpoint of the OpenAI API.
#[derive(Clone, Debug)]
pub struct OpenAIChat {
    pub client: Client<OpenAIConfig>,
}

impl Default for OpenAIChat {
    /// Uses the credentials from the environment, e.g., `OPENAI_API_KEY`.
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl OpenAIChat {
    pub fn new(client: Client<OpenAIConfig>) -> Self {
        Self { client }
    }

    fn convert_message(chat_message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let content = chat_message.content.clone();
        let message: ChatCompletionRequestMessage = match chat_message.role {
            Role::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            Role::Human => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()?
                .into(),
            Role::Ai => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()?
                .into(),
        };
        Ok(message)
    }

    /// Convert a request to the OpenAI request. Only the model, the temperature and the messages are set.
    pub fn to_openai_request(request: &ChatRequest) -> Result<CreateChatCompletionRequest> {
        let messages = request.messages
            .iter()
            .map(Self::convert_message)
            .collect::<Result<Vec<_>>>()?;
        let request = CreateChatCompletionRequestArgs::default()
            .model(request.model.as_str())
            .temperature(request.temperature)
            .messages(messages)
            .build()?;
        Ok(request)
    }

    /// The text of the first choice of a response.
    /// Returns an [EmptyReply] error if there is no choice or the choice has no content.
    pub fn reply_text(response: CreateChatCompletionResponse, model: &str) -> Result<String> {
        debug!("model {} replied with {} choice(s)", response.model, response.choices.len());
        response.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| EmptyReply { model: model.to_string() }.into())
    }
}

#[async_trait]
impl ChatCompletion for OpenAIChat {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        let openai_request = Self::to_openai_request(request)?;
        let response = self.client.chat().create(openai_request).await?;
        Self::reply_text(response, &request.model)
    }
}
