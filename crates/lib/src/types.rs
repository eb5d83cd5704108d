//! # Wire Types
//!
//! The request payload sent to the query endpoint and the validated outcome
//! built from whatever JSON the service returns. The service's response shape
//! is not trusted: anything that is neither answer-shaped nor error-shaped
//! becomes [`QueryOutcome::Unrecognized`], which renders nothing extra.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum number of characters of a source excerpt shown to the user.
pub const EXCERPT_MAX_CHARS: usize = 800;

/// The body of the single POST issued per submit.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
    pub k: u32,
}

/// One supporting document excerpt returned alongside an answer.
///
/// `metadata` is an opaque key-value mapping passed through unmodified from
/// the service; the content field deserializes from `page_content` on the
/// wire.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SourceExcerpt {
    #[serde(default)]
    pub metadata: Map<String, Value>,
    #[serde(rename = "page_content", default)]
    pub content: String,
}

impl SourceExcerpt {
    /// Content capped at [`EXCERPT_MAX_CHARS`] characters, with a trailing
    /// ellipsis when truncated. Cuts on a character boundary.
    pub fn excerpt(&self) -> Cow<'_, str> {
        match self.content.char_indices().nth(EXCERPT_MAX_CHARS) {
            None => Cow::Borrowed(self.content.as_str()),
            Some((byte_offset, _)) => {
                let mut truncated = self.content[..byte_offset].to_string();
                truncated.push('…');
                Cow::Owned(truncated)
            }
        }
    }
}

/// The validated result of one query exchange.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryOutcome {
    /// The service answered; `sources` may be empty.
    Answer {
        text: String,
        sources: Vec<SourceExcerpt>,
    },
    /// Either the service reported an error or the exchange itself failed.
    Error { message: String },
    /// The response parsed as JSON but matched neither known shape.
    Unrecognized,
}

impl QueryOutcome {
    /// Validate parsed response JSON into an outcome.
    ///
    /// A string `answer` field wins over a string `error` field when both are
    /// present. Entries of `sources` that are not objects are skipped rather
    /// than failing the whole response.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(map) = value else {
            return QueryOutcome::Unrecognized;
        };

        if let Some(text) = map.get("answer").and_then(Value::as_str) {
            let sources = map
                .get("sources")
                .and_then(Value::as_array)
                .map(|entries| {
                    entries
                        .iter()
                        .filter_map(|entry| {
                            serde_json::from_value::<SourceExcerpt>(entry.clone()).ok()
                        })
                        .collect()
                })
                .unwrap_or_default();
            return QueryOutcome::Answer {
                text: text.to_string(),
                sources,
            };
        }

        if let Some(message) = map.get("error").and_then(Value::as_str) {
            return QueryOutcome::Error {
                message: message.to_string(),
            };
        }

        QueryOutcome::Unrecognized
    }

    /// Wrap a transport or parse failure in the error shape shown to the user.
    pub fn failure(message: impl Into<String>) -> Self {
        QueryOutcome::Error {
            message: message.into(),
        }
    }

    /// `true` for the answer-shaped outcome.
    pub fn is_answer(&self) -> bool {
        matches!(self, QueryOutcome::Answer { .. })
    }
}
