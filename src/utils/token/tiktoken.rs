use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use anyhow::Result;
pub use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::prompt::chat::ChatMessage;
use crate::utils::token::CountToken;
use lazy_static::lazy_static;

const TOKENS_PER_MESSAGE: usize = 3;
/// Every reply is primed with `<|start|>assistant<|message|>`.
const TOKENS_PER_REPLY: usize = 3;

lazy_static! {
    /// const map from model name to max tokens.
    pub static ref MODEL_TO_MAX_TOKENS: HashMap<&'static str, usize> = HashMap::from([
        ("gpt-4", 8192),
        ("gpt-4-0613", 8192),
        ("gpt-4-32k", 32768),
        ("gpt-4-32k-0613", 32768),
        ("gpt-3.5-turbo", 4096),
        ("gpt-3.5-turbo-16k", 16384),
        ("gpt-3.5-turbo-0613", 4096),
        ("gpt-3.5-turbo-16k-0613", 16384),
    ]);
}

/// Error when a model has no known tokenizer or context window.
#[derive(Debug, Clone)]
pub struct UnsupportedModel {
    pub model: String,
}

impl fmt::Display for UnsupportedModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "UnsupportedModel: no tokenizer known for model {}", self.model)
    }
}

impl Error for UnsupportedModel {}

/// Counter using the Tiktoken tokenizer.
#[derive(Clone)]
#[readonly::make]
pub struct Tiktoken {
    /// The model name as requested. read-only.
    #[readonly]
    pub model: String,
    /// The context window of the model. read-only.
    #[readonly]
    pub max_tokens: usize,
    /// The tokenizer. read-only.
    #[readonly]
    pub bpe: CoreBPE,
}

impl Tiktoken {
    /// Create a new Tiktoken counter.
    /// Returns an [UnsupportedModel] error if the model is not in [MODEL_TO_MAX_TOKENS].
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let max_tokens = match MODEL_TO_MAX_TOKENS.get(model.as_str()) {
            Some(max_tokens) => *max_tokens,
            None => return Err(UnsupportedModel { model }.into()),
        };
        let tokenizer_model = if model.starts_with("gpt-4-32k") {
            "gpt-4-32k"
        } else if model.starts_with("gpt-4") {
            "gpt-4"
        } else {
            "gpt-3.5-turbo"
        };
        let bpe = get_bpe_from_model(tokenizer_model)?;
        Ok(Tiktoken {
            model,
            max_tokens,
            bpe,
        })
    }

    /// Count the number of tokens in a chat message. Following best practices from the OpenAI example.
    ///
    /// Assuming the model is NOT the legacy `gpt-3.5-turbo-0301`
    pub fn count_msg_token(&self, msg: &ChatMessage) -> usize {
        self.count_token(&msg.content) + TOKENS_PER_MESSAGE
    }

    /// Count the number of tokens a request of these messages takes, including the priming of the reply.
    pub fn count_prompt_token(&self, messages: &[ChatMessage]) -> usize {
        messages.iter().map(|msg| self.count_msg_token(msg)).sum::<usize>() + TOKENS_PER_REPLY
    }

    /// Whether the messages exceed the context window. Returns the token count if they do.
    pub fn exceeds_context(&self, messages: &[ChatMessage]) -> Option<usize> {
        let count = self.count_prompt_token(messages);
        (count > self.max_tokens).then_some(count)
    }
}

impl CountToken for Tiktoken {
    fn count_token(&self, string: &str) -> usize {
        self.bpe.encode_with_special_tokens(string).len()
    }
}

#[cfg(test)]
mod test_tiktoken {
    use crate::prompt::chat::{ChatMessage, Role};
    use crate::utils::token::CountToken;
    use super::{Tiktoken, UnsupportedModel, TOKENS_PER_MESSAGE, TOKENS_PER_REPLY};

    #[test]
    fn test_unsupported_model() {
        let err = Tiktoken::new("not-a-model").err().expect("model should be unsupported");
        assert_eq!("not-a-model", err.downcast_ref::<UnsupportedModel>().unwrap().model);
    }

    #[test]
    fn test_count_prompt() {
        let tiktoken = Tiktoken::new("gpt-3.5-turbo-0613").unwrap();
        assert_eq!(4096, tiktoken.max_tokens);
        assert_eq!("gpt-3.5-turbo-0613", tiktoken.model);

        let content = "[[\"cat\",\"dog\"]]";
        let messages = [ChatMessage::new(Role::Human, content)];
        let content_tokens = tiktoken.count_token(content);
        assert!(content_tokens > 0);
        assert_eq!(content_tokens + TOKENS_PER_MESSAGE + TOKENS_PER_REPLY, tiktoken.count_prompt_token(&messages));
        assert_eq!(None, tiktoken.exceeds_context(&messages));
    }

    #[test]
    fn test_exceeds_context() {
        let tiktoken = Tiktoken::new("gpt-3.5-turbo").unwrap();
        let huge = "cat dog ".repeat(5000);
        let messages = [ChatMessage::new(Role::Human, huge)];
        assert!(tiktoken.exceeds_context(&messages).unwrap() > 4096);
    }
}
