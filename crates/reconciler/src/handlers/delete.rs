//! Delete handler: issue delete once, then probe until the profile is gone.

use super::{Progress, Step, finish, service_failure};
use crate::context::HandlerContext;
use crate::error::HandlerErrorCode;
use crate::progress::{CallbackContext, ProgressEvent};
use crate::stabilize;
use crate::translator;
use crate::types::{HandlerRequest, TYPE_NAME};

pub fn handle(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    context: CallbackContext,
) -> ProgressEvent {
    let model = request
        .desired_resource_state
        .clone()
        .or_else(|| request.previous_resource_state.clone())
        .unwrap_or_default();
    finish(run(ctx, Progress::new(model, context)))
}

fn run(ctx: &HandlerContext<'_>, progress: Progress) -> Step<ProgressEvent> {
    let Some(identifier) = progress.model.identifier().map(str::to_string) else {
        return Err(progress.fail(
            HandlerErrorCode::NotFound,
            format!("{TYPE_NAME} has no identifier to delete"),
        ));
    };

    let progress = delete_profile(ctx, progress, &identifier)?;
    stabilize_delete(ctx, progress, &identifier)?;
    Ok(ProgressEvent::success(None))
}

fn delete_profile(ctx: &HandlerContext<'_>, mut progress: Progress, identifier: &str) -> Step {
    if progress.context.delete_issued {
        ctx.log.debug("delete already issued, resuming");
        return Ok(progress);
    }

    // A profile that is already gone fails the delete with not-found.
    ctx.client
        .delete(&translator::to_delete_request(identifier))
        .map_err(|e| service_failure(ctx, &progress, e))?;

    ctx.log
        .info(format_args!("{TYPE_NAME} [{identifier}] delete issued."));
    progress.context.delete_issued = true;
    Ok(progress)
}

fn stabilize_delete(ctx: &HandlerContext<'_>, mut progress: Progress, identifier: &str) -> Step {
    progress.context.stabilization_attempts += 1;
    match stabilize::is_delete_stabilized(ctx, identifier) {
        Ok(true) => Ok(progress),
        Ok(false) => {
            let delay = ctx.config.stabilization_delay_seconds;
            Err(progress.retry_later(delay))
        }
        Err(e) => Err(service_failure(ctx, &progress, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Call, MockClient};
    use crate::context::{HandlerConfig, RequestLog};
    use crate::error::ServiceError;
    use crate::handlers::Action;
    use crate::handlers::testing::{ARN, description};
    use crate::progress::OperationStatus;
    use crate::types::ResourceModel;

    fn request() -> HandlerRequest {
        HandlerRequest {
            desired_resource_state: Some(ResourceModel {
                inference_profile_identifier: Some(ARN.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn invoke(client: &MockClient, context: CallbackContext) -> ProgressEvent {
        let config = HandlerConfig::default();
        let ctx = HandlerContext::new(client, &config, RequestLog::new(Action::Delete, None));
        handle(&ctx, &request(), context)
    }

    #[test]
    fn test_delete_gone_on_first_probe() {
        let client = MockClient::new();
        client.push_get(Err(ServiceError::not_found("gone")));

        let event = invoke(&client, CallbackContext::default());
        assert_eq!(event.status, OperationStatus::Success);
        assert!(event.resource_model.is_none());
        assert!(event.callback_context.is_none());
        assert_eq!(
            client.calls(),
            vec![Call::Delete(ARN.to_string()), Call::Get(ARN.to_string())]
        );
    }

    #[test]
    fn test_delete_waits_until_gone() {
        let client = MockClient::new();
        client.push_get(Ok(description("ACTIVE")));
        client.push_get(Err(ServiceError::not_found("gone")));

        let first = invoke(&client, CallbackContext::default());
        assert_eq!(first.status, OperationStatus::InProgress);
        let context = first.callback_context.unwrap();
        assert!(context.delete_issued);

        let second = invoke(&client, context);
        assert_eq!(second.status, OperationStatus::Success);
        assert_eq!(client.count(|c| matches!(c, Call::Delete(_))), 1);
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 2);
    }

    #[test]
    fn test_delete_of_missing_profile_fails() {
        let client = MockClient::new();
        client.push_delete(Err(ServiceError::not_found("no such profile")));

        let event = invoke(&client, CallbackContext::default());
        assert_eq!(event.status, OperationStatus::Failed);
        assert_eq!(event.error_code, Some(HandlerErrorCode::NotFound));
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 0);
    }

    #[test]
    fn test_delete_probe_throttled_keeps_context() {
        let client = MockClient::new();
        client.push_get(Err(ServiceError::throttling("slow down")));

        let event = invoke(&client, CallbackContext::default());
        assert_eq!(event.status, OperationStatus::InProgress);
        assert_eq!(event.error_code, Some(HandlerErrorCode::Throttling));
        assert!(event.callback_context.unwrap().delete_issued);
    }
}
