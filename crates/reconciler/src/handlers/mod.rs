//! Lifecycle handlers.
//!
//! Each handler is a short pipeline of steps. A step takes the [`Progress`]
//! so far and either passes it on or stops the pipeline with a [`Halt`]
//! carrying the event to hand back to the orchestrator: `IN_PROGRESS` with a
//! delay hint when the remote side has not settled or throttled us, `FAILED`
//! on anything terminal. Steps are chained with `?`.
//!
//! Resumption works through the [`CallbackContext`]: a step that issued its
//! remote call records that fact, and on the next invocation the same step
//! sees the record and passes straight through.

pub mod create;
pub mod delete;
pub mod list;
pub mod read;
pub mod update;

use crate::client::ProfileClient;
use crate::context::{HandlerConfig, HandlerContext, RequestLog};
use crate::error::{HandlerErrorCode, ServiceError, classify};
use crate::progress::{CallbackContext, ProgressEvent};
use crate::types::{HandlerRequest, ResourceModel};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle operation requested by the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::Update,
        Action::Delete,
        Action::List,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown action '{s}' (expected create, read, update, delete or list)")
            })
    }
}

/// Run one invocation of the handler for `action`.
///
/// Pass an empty context on the first invocation and the context from the
/// previous event on every re-invocation.
pub fn invoke(
    action: Action,
    client: &dyn ProfileClient,
    config: &HandlerConfig,
    request: &HandlerRequest,
    context: CallbackContext,
) -> ProgressEvent {
    let log = RequestLog::new(action, request.account_id.as_deref());
    let ctx = HandlerContext::new(client, config, log);

    let event = match action {
        Action::Create => create::handle(&ctx, request, context),
        Action::Read => read::handle(&ctx, request, context),
        Action::Update => update::handle(&ctx, request, context),
        Action::Delete => delete::handle(&ctx, request, context),
        Action::List => list::handle(&ctx, request, context),
    };

    match &event.error_code {
        Some(code) => ctx
            .log
            .info(format_args!("finished with {} ({code})", event.status)),
        None => ctx.log.info(format_args!("finished with {}", event.status)),
    }
    event
}

/// Model and context flowing between steps
#[derive(Debug, Clone)]
pub(crate) struct Progress {
    pub model: ResourceModel,
    pub context: CallbackContext,
}

/// Early exit from a pipeline with the event to return
#[derive(Debug)]
pub(crate) struct Halt(pub ProgressEvent);

pub(crate) type Step<T = Progress> = Result<T, Halt>;

impl Progress {
    pub fn new(model: ResourceModel, context: CallbackContext) -> Self {
        Self { model, context }
    }

    /// Stop here and ask to be re-invoked after `delay_seconds`.
    pub fn retry_later(self, delay_seconds: u32) -> Halt {
        Halt(ProgressEvent::in_progress(
            self.model,
            self.context,
            delay_seconds,
        ))
    }

    pub fn fail(self, code: HandlerErrorCode, message: impl Into<String>) -> Halt {
        Halt(ProgressEvent::failed(Some(self.model), code, message))
    }
}

/// Turn a failed remote call into the event that ends this invocation.
pub(crate) fn service_failure(
    ctx: &HandlerContext<'_>,
    progress: &Progress,
    error: ServiceError,
) -> Halt {
    let classification = classify(&error);
    if classification.retriable {
        ctx.log.warn(format_args!(
            "{} will be retried: {}",
            classification.code, classification.message
        ));
    } else {
        ctx.log.warn(format_args!(
            "{} is terminal: {}",
            classification.code, classification.message
        ));
    }

    Halt(ProgressEvent::from_classification(
        classification,
        progress.model.clone(),
        progress.context.clone(),
        ctx.config.throttle_delay_seconds,
    ))
}

/// Collapse a finished pipeline into its event.
pub(crate) fn finish(step: Step<ProgressEvent>) -> ProgressEvent {
    step.unwrap_or_else(|Halt(event)| event)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::api::{CreateProfileResponse, ListTagsResponse, ProfileDescription, WireModel, WireTag};

    pub const ARN: &str =
        "arn:aws:bedrock:us-east-1:123456789012:application-inference-profile/abc123";

    pub fn description(status: &str) -> ProfileDescription {
        ProfileDescription {
            inference_profile_name: Some("p1".to_string()),
            description: Some("cost tracking".to_string()),
            created_at: None,
            updated_at: None,
            inference_profile_arn: Some(ARN.to_string()),
            models: vec![WireModel {
                model_arn: Some("arn:model".to_string()),
            }],
            inference_profile_id: Some("abc123".to_string()),
            status: Some(status.to_string()),
            profile_type: Some("APPLICATION".to_string()),
        }
    }

    pub fn created() -> CreateProfileResponse {
        CreateProfileResponse {
            inference_profile_arn: ARN.to_string(),
            status: Some("PENDING".to_string()),
        }
    }

    pub fn tag_list(entries: &[(&str, &str)]) -> ListTagsResponse {
        ListTagsResponse {
            tags: entries
                .iter()
                .map(|(k, v)| WireTag {
                    key: k.to_string(),
                    value: Some(v.to_string()),
                })
                .collect(),
        }
    }
}
