//! # LLM endpoints
//!
//! The endpoint of the `template -> prompt` pipeline is an LLM, which consumes a chat prompt and produces a reply.
//! [ChatCompletion] is that endpoint. [openai::OpenAIChat] implements it with the OpenAI API.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::prompt::chat::ChatMessage;

pub mod openai;

//TODO: when async fn in trait is object-safe, remove async_trait macro

/// One chat completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

/// Trait for sending a chat request and getting the text of the reply.
///
/// Implementations propagate transport errors as they are.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String>;
}

#[async_trait]
impl<T: ChatCompletion + ?Sized> ChatCompletion for &T {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl<T: ChatCompletion + ?Sized> ChatCompletion for Box<T> {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        (**self).complete(request).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use super::{ChatCompletion, ChatRequest};

    /// A chat endpoint that replies with a fixed text or fails with a fixed message, and records what it is asked.
    pub(crate) struct ScriptedChat {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl ScriptedChat {
        pub(crate) fn replying(reply: impl Into<String>) -> Self {
            Self::new(Ok(reply.into()))
        }

        pub(crate) fn failing(message: impl Into<String>) -> Self {
            Self::new(Err(message.into()))
        }

        fn new(reply: std::result::Result<String, String>) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_request(&self) -> Option<ChatRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatCompletion for ScriptedChat {
        async fn complete(&self, request: &ChatRequest) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.reply.clone().map_err(|message| anyhow!(message))
        }
    }
}
