//! Update handler.
//!
//! Only tags are mutable in place. The handler diffs the previous and
//! desired tag sets, adds or changes what is new, removes what is gone and
//! reads the result back. Either tag call is skipped when it has nothing to
//! send or the context shows it already went through.

use super::{Action, Progress, Step, finish, read, service_failure};
use crate::context::HandlerContext;
use crate::error::HandlerErrorCode;
use crate::progress::{CallbackContext, ProgressEvent};
use crate::tags::{self, TagSet};
use crate::translator;
use crate::types::{HandlerRequest, TYPE_NAME};
use std::collections::BTreeSet;

pub fn handle(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    context: CallbackContext,
) -> ProgressEvent {
    let Some(mut model) = request.desired_resource_state.clone() else {
        return ProgressEvent::failed(
            None,
            HandlerErrorCode::InvalidRequest,
            "update requires a desired resource state",
        );
    };

    if model.inference_profile_identifier.is_none() {
        model.inference_profile_identifier = request
            .previous_resource_state
            .as_ref()
            .and_then(|previous| previous.inference_profile_identifier.clone());
    }

    finish(run(ctx, request, Progress::new(model, context)))
}

fn run(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    progress: Progress,
) -> Step<ProgressEvent> {
    let Some(identifier) = progress.model.identifier().map(str::to_string) else {
        return Err(progress.fail(
            HandlerErrorCode::NotFound,
            format!("{TYPE_NAME} has no identifier to update"),
        ));
    };

    let diff = tags::diff(&tags::previous_tags(request), &tags::desired_tags(request));
    if diff.is_empty() {
        ctx.log
            .debug(format_args!("{TYPE_NAME} [{identifier}] tags already up to date"));
    }

    let progress = add_tags(ctx, progress, &identifier, &diff.to_add)?;
    let progress = remove_tags(ctx, progress, &identifier, &diff.to_remove)?;
    read::read_model(&ctx.for_action(Action::Read), progress)
}

fn add_tags(
    ctx: &HandlerContext<'_>,
    mut progress: Progress,
    identifier: &str,
    to_add: &TagSet,
) -> Step {
    if to_add.is_empty() || progress.context.tags_added {
        return Ok(progress);
    }

    ctx.client
        .tag(&translator::to_tag_request(identifier, to_add))
        .map_err(|e| service_failure(ctx, &progress, e))?;

    ctx.log.info(format_args!(
        "{TYPE_NAME} [{identifier}] tagged with {} key(s)",
        to_add.len()
    ));
    progress.context.tags_added = true;
    Ok(progress)
}

fn remove_tags(
    ctx: &HandlerContext<'_>,
    mut progress: Progress,
    identifier: &str,
    to_remove: &BTreeSet<String>,
) -> Step {
    if to_remove.is_empty() || progress.context.tags_removed {
        return Ok(progress);
    }

    ctx.client
        .untag(&translator::to_untag_request(identifier, to_remove))
        .map_err(|e| service_failure(ctx, &progress, e))?;

    ctx.log.info(format_args!(
        "{TYPE_NAME} [{identifier}] untagged {} key(s)",
        to_remove.len()
    ));
    progress.context.tags_removed = true;
    Ok(progress)
}
