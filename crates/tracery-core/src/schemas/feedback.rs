//! Feedback records attached to runs

use super::KvMap;
use super::run::RunId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type FeedbackId = Uuid;

/// Who produced a piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSourceType {
    /// Computed by an evaluator
    Model,
    /// Submitted directly through the API
    Api,
}

/// Origin of a feedback record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSource {
    #[serde(rename = "type")]
    pub source_type: FeedbackSourceType,
    #[serde(default, skip_serializing_if = "KvMap::is_empty")]
    pub metadata: KvMap,
}

impl FeedbackSource {
    pub fn model(metadata: KvMap) -> Self {
        Self {
            source_type: FeedbackSourceType::Model,
            metadata,
        }
    }

    pub fn api() -> Self {
        Self {
            source_type: FeedbackSourceType::Api,
            metadata: KvMap::new(),
        }
    }
}

/// A scored or categorical judgment about one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: FeedbackId,
    pub run_id: RunId,
    /// Evaluator or metric name
    pub key: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub correction: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback_source: Option<FeedbackSource>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating feedback. The id is generated client-side so every
/// invocation yields a distinct record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCreate {
    pub id: FeedbackId,
    pub run_id: RunId,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correction: Option<serde_json::Value>,
    pub feedback_source: FeedbackSource,
}

impl FeedbackCreate {
    /// New API-sourced feedback for `run_id` with a fresh id
    pub fn new(run_id: RunId, key: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            run_id,
            key: key.into(),
            score: None,
            value: None,
            comment: None,
            correction: None,
            feedback_source: FeedbackSource::api(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_source(mut self, source: FeedbackSource) -> Self {
        self.feedback_source = source;
        self
    }

    /// Materialize the stored record, stamped with `created_at`
    pub fn into_feedback(self, created_at: DateTime<Utc>) -> Feedback {
        Feedback {
            id: self.id,
            run_id: self.run_id,
            key: self.key,
            score: self.score,
            value: self.value,
            comment: self.comment,
            correction: self.correction,
            feedback_source: Some(self.feedback_source),
            created_at,
        }
    }
}
