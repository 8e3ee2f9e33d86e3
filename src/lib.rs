//! # semantic-meta
//!
//! Semantic matching and meta-categorization of value lists with chat LLMs, in Rust
//!
//! ## Usage
//! Add a dependency in `Cargo.toml`
//! ```toml
//! semantic-meta = { git = "https://github.com/ifsheldon/semantic-meta.git", branch = "main"}
//! ```
//!
//! Then, with `OPENAI_API_KEY` set,
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use semantic_meta::categorizer::{Categorizer, Task};
//! use semantic_meta::utils::llm::openai::OpenAIChat;
//!
//! let categorizer: Categorizer<OpenAIChat> = Categorizer::default();
//! let items = vec![vec!["NYC", "New York City"], vec!["SF", "San Francisco", "new york"]];
//! let labels = categorizer.categorize(&items, None, Task::SemanticMatch).await?;
//! let groups = categorizer.categorize(&items, Some(2), Task::MetaLabel).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## What it does
//!
//! Messy columns of data refer to one thing in many ways: `"NYC"`, `"New York City"`, `"new york"`. Given a 2D array
//! of such values, the [Categorizer](crate::categorizer::Categorizer) asks a chat model for either
//!
//! * **semantic matching**: canonical labels, each mapped to all the raw values it represents, or
//! * **meta labeling**: the values sorted into a fixed number of meta categories.
//!
//! The model answers in JSON, which comes back as a [JsonMap](crate::utils::JsonMap). Its shape is whatever the model
//! makes of the instructions; nothing is validated beyond being a JSON object.
//!
//! ## Concepts and Design
//!
//! A call is a short, explicit pipeline, and each stage is a plain value you can inspect:
//!
//! `ChatPromptTemplate -> PartialChatPrompt -> Vec<ChatMessage> -> ChatRequest -> reply -> JsonMap`
//!
//! ### Prompt Template and Placeholder
//!
//! A template of prompts looks like
//!
//! ```text
//! You will be provided a list and will sort them into {{number}} meta categories based on semantics.
//! ```
//!
//! `{{number}}` is a placeholder, a slot to be filled, which has a name `"number"`. The name can be any string
//! without line breaks.
//!
//! A [PromptTemplate](crate::prompt::PromptTemplate) constructs a [PartialPrompt](crate::prompt::PartialPrompt), which
//! records the filling values and the unfilled placeholders. When everything is filled, `complete` gives the prompt.
//! Chat models take role-tagged messages, so [prompt::chat] has the same thing for a list of messages.
//!
//! ### Filler
//!
//! Anything that fills one or more placeholders in a partial prompt, i.e., anything that implements
//! [`FillPlaceholders`](crate::filler::FillPlaceholders) and [`Fill`](crate::filler::Fill) or
//! [`FillWith<CTX>`](crate::filler::FillWith). The categorizer fills the items, and the category count when the task
//! needs one.
//!
//! ### Endpoint
//!
//! The endpoint of the pipeline is an LLM behind [`ChatCompletion`](crate::utils::llm::ChatCompletion). The OpenAI
//! API is supported out of the box. Implement the trait for anything else, including a stub in tests.
//!
//! ### What it does not do
//!
//! No retries, caching, batching, rate limiting or chunking of large inputs. A categorizer sends exactly one request
//! per call and returns every error to you as is.
//!
//! ## License
//!
//! `semantic-meta` will always remain free under Apache license.
//!
//! ## Attribution
//! * `tiktoken-rs`: In [crate::utils::token::tiktoken], we re-export the `tiktoken-rs` crate.
//!
//!


pub mod prompt;
pub mod filler;
pub mod categorizer;
pub mod utils;
