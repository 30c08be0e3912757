//! Progress events and the callback context threaded between invocations

use crate::error::{Classification, HandlerErrorCode};
use crate::types::ResourceModel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State carried from one handler invocation to the next.
///
/// Handlers write it; the orchestrator hands it back unchanged on the next
/// invocation. Fields only ever move forward: once a call is recorded as
/// issued it is never issued again for the same chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallbackContext {
    /// Identifier returned by create
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub create_issued: bool,
    /// Create probe has seen the profile `ACTIVE`
    #[serde(skip_serializing_if = "is_false")]
    pub stabilized: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub delete_issued: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub tags_added: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub tags_removed: bool,
    /// Stabilization probes made so far. Informational only.
    #[serde(skip_serializing_if = "is_zero")]
    pub stabilization_attempts: u32,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    InProgress,
    Success,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        })
    }
}

/// Output of one handler invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_model: Option<ResourceModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_models: Option<Vec<ResourceModel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    /// Seconds the orchestrator should wait before re-invoking
    #[serde(default)]
    pub callback_delay_seconds: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<HandlerErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Context to resubmit; always `None` on terminal events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_context: Option<CallbackContext>,
}

impl ProgressEvent {
    fn new(status: OperationStatus) -> Self {
        Self {
            status,
            resource_model: None,
            resource_models: None,
            next_token: None,
            callback_delay_seconds: 0,
            error_code: None,
            message: None,
            callback_context: None,
        }
    }

    /// Not converged yet; re-invoke after `delay_seconds` with `context`.
    pub fn in_progress(model: ResourceModel, context: CallbackContext, delay_seconds: u32) -> Self {
        Self {
            resource_model: Some(model),
            callback_delay_seconds: delay_seconds,
            callback_context: Some(context),
            ..Self::new(OperationStatus::InProgress)
        }
    }

    /// Point operation finished. Delete passes `None`.
    pub fn success(model: Option<ResourceModel>) -> Self {
        Self {
            resource_model: model,
            ..Self::new(OperationStatus::Success)
        }
    }

    /// A page of list results; the continuation token is passed through as is.
    pub fn success_list(models: Vec<ResourceModel>, next_token: Option<String>) -> Self {
        Self {
            resource_models: Some(models),
            next_token,
            ..Self::new(OperationStatus::Success)
        }
    }

    pub fn failed(
        model: Option<ResourceModel>,
        code: HandlerErrorCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            resource_model: model,
            error_code: Some(code),
            message: Some(message.into()),
            ..Self::new(OperationStatus::Failed)
        }
    }

    /// Event for a classified downstream failure.
    ///
    /// Retriable failures keep the chain alive: the event is `IN_PROGRESS`,
    /// keeps the context and asks for a retry after `retry_delay_seconds`.
    pub fn from_classification(
        classification: Classification,
        model: ResourceModel,
        context: CallbackContext,
        retry_delay_seconds: u32,
    ) -> Self {
        if classification.retriable {
            Self {
                error_code: Some(classification.code),
                message: Some(classification.message),
                ..Self::in_progress(model, context, retry_delay_seconds.max(1))
            }
        } else {
            Self::failed(Some(model), classification.code, classification.message)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
