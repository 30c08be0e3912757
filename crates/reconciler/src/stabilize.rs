//! Stabilization probes.
//!
//! A probe is one read of the remote profile right after (or on a later
//! invocation following) a mutating call. Probes never sleep and never loop:
//! when the profile has not settled the handler returns `IN_PROGRESS` with a
//! delay hint, and how often and how long to keep re-invoking is up to the
//! orchestrator.

use crate::client::ServiceResult;
use crate::context::HandlerContext;
use crate::error::ServiceError;
use crate::translator;
use crate::types::{ProfileStatus, ResourceModel, TYPE_NAME};

/// Has a freshly created profile become usable?
///
/// On `ACTIVE` the resolved identifier and ARN are written into `model`.
///
/// # Errors
///
/// A profile reporting `FAILED` is a terminal service fault, not a profile
/// that is still converging. Read failures are passed through.
pub fn is_create_stabilized(
    ctx: &HandlerContext<'_>,
    identifier: &str,
    model: &mut ResourceModel,
) -> ServiceResult<bool> {
    let response = ctx.client.get(&translator::to_read_request(identifier))?;
    let status = response
        .status
        .as_deref()
        .map_or(ProfileStatus::Unknown, translator::parse_status);

    match status {
        ProfileStatus::Active => {
            ctx.log
                .info(format_args!("{TYPE_NAME} [{identifier}] has stabilized."));
            model.inference_profile_identifier = Some(identifier.to_string());
            model.inference_profile_arn = Some(identifier.to_string());
            Ok(true)
        }
        ProfileStatus::Failed => Err(ServiceError::internal(format!(
            "{TYPE_NAME} [{}] failed to create.",
            model.inference_profile_name.as_deref().unwrap_or(identifier)
        ))),
        other => {
            ctx.log
                .debug(format_args!("{TYPE_NAME} [{identifier}] is {other}, not stable yet"));
            Ok(false)
        }
    }
}

/// Is a deleted profile gone?
///
/// Only a not-found read counts as gone; a successful read means the
/// deletion is still in flight whatever status it reports.
///
/// # Errors
///
/// Read failures other than not-found are passed through.
pub fn is_delete_stabilized(ctx: &HandlerContext<'_>, identifier: &str) -> ServiceResult<bool> {
    match ctx.client.get(&translator::to_read_request(identifier)) {
        Ok(_) => {
            ctx.log
                .debug(format_args!("{TYPE_NAME} [{identifier}] still exists"));
            Ok(false)
        }
        Err(err) if err.is_not_found() => {
            ctx.log
                .info(format_args!("{TYPE_NAME} [{identifier}] has been deleted."));
            Ok(true)
        }
        Err(err) => Err(err),
    }
}
