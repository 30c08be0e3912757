//! Read handler: describe the profile and attach its current tags.

use super::{Progress, Step, finish, service_failure};
use crate::context::HandlerContext;
use crate::error::HandlerErrorCode;
use crate::progress::{CallbackContext, ProgressEvent};
use crate::translator;
use crate::types::{HandlerRequest, TYPE_NAME};

pub fn handle(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    context: CallbackContext,
) -> ProgressEvent {
    let model = request.desired_resource_state.clone().unwrap_or_default();
    finish(read_model(ctx, Progress::new(model, context)))
}

/// Final read shared by create and update.
///
/// The returned model is rebuilt from the service response; nothing from
/// the incoming model survives except through the remote state.
pub(crate) fn read_model(ctx: &HandlerContext<'_>, progress: Progress) -> Step<ProgressEvent> {
    let Some(identifier) = progress.model.identifier().map(str::to_string) else {
        return Err(progress.fail(
            HandlerErrorCode::NotFound,
            format!("{TYPE_NAME} has no identifier to read"),
        ));
    };

    let response = ctx
        .client
        .get(&translator::to_read_request(&identifier))
        .map_err(|e| service_failure(ctx, &progress, e))?;
    let mut model = translator::from_read_response(&response);

    // Tags are addressed by ARN; the caller may have passed the short id.
    let tag_target = model.identifier().unwrap_or(&identifier).to_string();
    let tags = ctx
        .client
        .list_tags(&translator::to_list_tags_request(&tag_target))
        .map_err(|e| service_failure(ctx, &progress, e))?;
    model.tags = Some(translator::from_wire_tags(&tags.tags));

    ctx.log
        .info(format_args!("{TYPE_NAME} [{tag_target}] has successfully been read."));
    Ok(ProgressEvent::success(Some(model)))
}
