//! # reconciler
//!
//! Resumable lifecycle handlers for application inference profiles.
//!
//! This crate provides:
//! - Create, read, update, delete and list handlers that each run as one
//!   short invocation and report a [`ProgressEvent`]
//! - A callback context that lets an orchestrator re-invoke a handler
//!   until it converges, without repeating remote calls already issued
//! - Layered tag merging and tag diffing for updates
//! - Uniform classification of remote failures into handler error codes
//! - A blocking HTTP client and a scripted mock behind one [`ProfileClient`] trait
//!
//! ## Example
//!
//! ```
//! use reconciler::{
//!     Action, CallbackContext, HandlerConfig, HandlerRequest, MockClient, OperationStatus,
//!     ResourceModel, invoke,
//! };
//! use reconciler::error::ServiceError;
//!
//! let client = MockClient::new();
//! client.push_get(Err(ServiceError::not_found("gone")));
//!
//! let request = HandlerRequest {
//!     desired_resource_state: Some(ResourceModel {
//!         inference_profile_identifier: Some("arn:aws:bedrock:us-east-1:1:application-inference-profile/x".into()),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let event = invoke(Action::Delete, &client, &HandlerConfig::default(), &request, CallbackContext::default());
//! assert_eq!(event.status, OperationStatus::Success);
//! ```
//!
//! ## Driving a chain
//!
//! Handlers never sleep. An `IN_PROGRESS` event carries a delay hint and a
//! context; the caller waits at least that long and invokes the same action
//! again with that context, until the event is terminal.

pub mod api;
pub mod client;
pub mod context;
pub mod error;
pub mod handlers;
pub mod progress;
pub mod stabilize;
pub mod tags;
pub mod translator;
pub mod types;

pub use client::{HttpClient, MockClient, ProfileClient, ServiceResult};
pub use context::HandlerConfig;
pub use error::{HandlerErrorCode, ServiceError, ServiceErrorKind};
pub use handlers::{Action, invoke};
pub use progress::{CallbackContext, OperationStatus, ProgressEvent};
pub use types::{HandlerRequest, ProfileStatus, ProfileType, ResourceModel, Tag, TagLayer};
