use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Generic failure body returned at service edges (`{"error": "..."}`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// A caller's question awaiting an operator answer.
///
/// Only `id` and `question` carry meaning for the dashboard; every other
/// field the backend attaches (caller id, timestamp, status, ...) is kept
/// opaque in `context` and round-trips untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct PendingRequest {
    pub id: String,
    pub question: String,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

impl PendingRequest {
    pub fn new(id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            context: Map::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }
}

/// A question/answer pair as shown in the resolved and learned views.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ResolvedAnswer {
    pub question: String,
    pub answer: String,
    /// Currently always equal to `answer`.
    pub learned_answer: String,
}

impl ResolvedAnswer {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let answer = answer.into();
        Self {
            question: question.into(),
            learned_answer: answer.clone(),
            answer,
        }
    }
}

/// Backend knowledge base: question text -> canonical answer.
///
/// Keys are unique; iteration order is by question text.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(transparent)]
pub struct LearnedMapping(pub BTreeMap<String, String>);

impl LearnedMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.0.insert(question.into(), answer.into());
    }

    pub fn get(&self, question: &str) -> Option<&str> {
        self.0.get(question).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// One resolved entry per key.
    pub fn to_resolved(&self) -> Vec<ResolvedAnswer> {
        self.0
            .iter()
            .map(|(question, answer)| ResolvedAnswer::new(question.clone(), answer.clone()))
            .collect()
    }
}

impl<Q: Into<String>, A: Into<String>> FromIterator<(Q, A)> for LearnedMapping {
    fn from_iter<I: IntoIterator<Item = (Q, A)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(q, a)| (q.into(), a.into()))
                .collect(),
        )
    }
}

/// Body of `POST /requests/{id}/resolve`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ResolveRequest {
    pub answer: String,
}

/// Success body of `POST /requests/{id}/resolve`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ResolveResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub question: String,
    pub answer: String,
}

impl ResolveResponse {
    pub fn into_resolved(self) -> ResolvedAnswer {
        ResolvedAnswer::new(self.question, self.answer)
    }
}

/// Body of `POST /requests` as understood by the mock backend. The proxy
/// relays arbitrary JSON and never parses this.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct NewRequest {
    pub question: String,
    #[serde(default)]
    pub caller_id: Option<String>,
}

/// Body of `POST /call`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CallRequest {
    pub caller_id: String,
    pub question: String,
}

/// Success body of `POST /call`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct CallResponse {
    pub response_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

/// Success body of `GET /livekit/token/{identity}/{room}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Plain acknowledgement (`POST /clear`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct MessageResponse {
    pub message: String,
}
