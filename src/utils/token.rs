//! Token counting traits and utilities

pub mod tiktoken;

/// Trait for counting tokens in a string.
pub trait CountToken {
    fn count_token(&self, string: &str) -> usize;
}
