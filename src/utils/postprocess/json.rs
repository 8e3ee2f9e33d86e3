use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use anyhow::Result;
use std::error::Error;
use std::fmt;
use std::fmt::Formatter;
use crate::utils::JsonMap;


/// How a reply of an LLM is expected to carry its JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyFormat {
    /// The whole reply is one JSON object.
    #[default]
    Json,
    /// The JSON object is wrapped in other text, e.g., "Sure! Here you go: {...}".
    EmbeddedJson,
}

/// Decode a reply into a JSON object.
///
/// With [ReplyFormat::Json], a reply that is not a JSON object gives the [serde_json::Error] as is.
/// With [ReplyFormat::EmbeddedJson], see [filter_to_json].
pub fn decode_reply(reply: &str, format: ReplyFormat) -> Result<JsonMap> {
    match format {
        ReplyFormat::Json => Ok(from_str(reply)?),
        ReplyFormat::EmbeddedJson => filter_to_json(reply),
    }
}

/// Filters invalid content and tries to parse the valid json string.
///
/// Returns the parsed value if the string contains valid json between its first `{` and last `}`, else an
/// [InvalidJSON] error when there is no such span, or a [serde_json::Error] when the span does not parse.
///
/// # Example
/// ```
/// use serde_json::Value;
/// use semantic_meta::utils::postprocess::json::filter_to_json;
/// let valid_str = "partially valid: {\"a\":\"alice\"}";
/// let json_value: Value = filter_to_json(valid_str).expect("Expect to be fine but failed");
/// assert_eq!(json_value["a"], "alice");
///
/// let invalid_str = "partially valid: \"a\":\"alice\"}";
/// assert_eq!(filter_to_json::<Value>(invalid_str).is_err(), true)
/// ```
pub fn filter_to_json<T: DeserializeOwned>(string: impl Into<String>) -> Result<T> {
    let string = string.into();
    let left_brace_idx = string.find('{');
    let right_brace_idx = string.rfind('}');
    match (left_brace_idx, right_brace_idx) {
        (Some(lbi), Some(rbi)) if lbi < rbi => {
            let valid_json = &string[lbi..rbi + 1];
            let value = from_str(valid_json)?;
            Ok(value)
        }
        _ => Err(InvalidJSON { invalid_string: string }.into())
    }
}

/// Error when the string is not a valid json.
#[derive(Debug, Clone)]
pub struct InvalidJSON {
    pub invalid_string: String,
}


impl fmt::Display for InvalidJSON {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid string to be parsed:\n{}", self.invalid_string)
    }
}

impl Error for InvalidJSON {}
