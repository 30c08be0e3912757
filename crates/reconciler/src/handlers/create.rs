//! Create handler.
//!
//! Steps: merge tags into the model, issue create, probe until `ACTIVE`,
//! then read back the full model. Create is issued at most once per chain;
//! the context records it together with the identifier the service assigned.

use super::{Action, Progress, Step, finish, read, service_failure};
use crate::context::HandlerContext;
use crate::error::HandlerErrorCode;
use crate::progress::{CallbackContext, ProgressEvent};
use crate::stabilize;
use crate::tags;
use crate::translator;
use crate::types::{HandlerRequest, TYPE_NAME};

pub fn handle(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    context: CallbackContext,
) -> ProgressEvent {
    ctx.log.info(format_args!(
        "creating {TYPE_NAME} (client request token {})",
        request.client_request_token.as_deref().unwrap_or("-")
    ));

    let Some(mut model) = request.desired_resource_state.clone() else {
        return ProgressEvent::failed(
            None,
            HandlerErrorCode::InvalidRequest,
            "create requires a desired resource state",
        );
    };
    tags::apply_desired(&mut model, &tags::desired_tags(request));

    finish(run(
        ctx,
        Progress::new(model, context),
        request.client_request_token.as_deref(),
    ))
}

fn run(
    ctx: &HandlerContext<'_>,
    progress: Progress,
    client_request_token: Option<&str>,
) -> Step<ProgressEvent> {
    let progress = create_profile(ctx, progress, client_request_token)?;
    let progress = stabilize_create(ctx, progress)?;
    read::read_model(&ctx.for_action(Action::Read), progress)
}

fn create_profile(
    ctx: &HandlerContext<'_>,
    mut progress: Progress,
    client_request_token: Option<&str>,
) -> Step {
    if progress.context.create_issued {
        ctx.log.debug("create already issued, resuming");
        return Ok(progress);
    }

    let request = translator::to_create_request(&progress.model, client_request_token);
    let response = ctx
        .client
        .create(&request)
        .map_err(|e| service_failure(ctx, &progress, e))?;

    ctx.log.info(format_args!(
        "{TYPE_NAME} [{}] successfully created.",
        response.inference_profile_arn
    ));
    progress.context.create_issued = true;
    progress.context.identifier = Some(response.inference_profile_arn);
    Ok(progress)
}

fn stabilize_create(ctx: &HandlerContext<'_>, mut progress: Progress) -> Step {
    let Some(identifier) = progress.context.identifier.clone() else {
        return Err(progress.fail(
            HandlerErrorCode::InternalFailure,
            "callback context records a create but no identifier",
        ));
    };

    if progress.context.stabilized {
        progress.model.inference_profile_identifier = Some(identifier.clone());
        progress.model.inference_profile_arn = Some(identifier);
        return Ok(progress);
    }

    progress.context.stabilization_attempts += 1;
    match stabilize::is_create_stabilized(ctx, &identifier, &mut progress.model) {
        Ok(true) => {
            progress.context.stabilized = true;
            Ok(progress)
        }
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
    use crate::error::{ServiceError, ServiceErrorKind};
    use crate::handlers::testing::{ARN, created, description, tag_list};
    use crate::progress::OperationStatus;
    use crate::types::{ModelSource, ResourceModel, Tag, TagLayer};

    fn request() -> HandlerRequest {
        HandlerRequest {
            client_request_token: Some("token-1".to_string()),
            desired_resource_state: Some(ResourceModel {
                inference_profile_name: Some("p1".to_string()),
                description: Some("cost tracking".to_string()),
                model_source: Some(ModelSource {
                    copy_from: "arn:model".to_string(),
                }),
                tags: Some(vec![Tag::new("team", "ml")]),
                ..Default::default()
            }),
            system_tags: Some(TagLayer::from([(
                "aws:cloudformation:stack-name".to_string(),
                Some("stack".to_string()),
            )])),
            ..Default::default()
        }
    }

    fn invoke(client: &MockClient, config: &HandlerConfig, context: CallbackContext) -> ProgressEvent {
        let ctx = HandlerContext::new(client, config, RequestLog::new(Action::Create, None));
        handle(&ctx, &request(), context)
    }

    #[test]
    fn test_create_converges_after_pending_probes() {
        let client = MockClient::new();
        client.push_create(Ok(created()));
        client.push_get(Ok(description("PENDING")));
        client.push_get(Ok(description("PENDING")));
        client.push_get(Ok(description("ACTIVE")));
        client.push_get(Ok(description("ACTIVE")));
        client.push_list_tags(Ok(tag_list(&[("team", "ml")])));
        let config = HandlerConfig::default();

        let first = invoke(&client, &config, CallbackContext::default());
        assert_eq!(first.status, OperationStatus::InProgress);
        assert_eq!(first.callback_delay_seconds, config.stabilization_delay_seconds);

        let second = invoke(&client, &config, first.callback_context.unwrap());
        assert_eq!(second.status, OperationStatus::InProgress);
        let context = second.callback_context.unwrap();
        assert_eq!(context.stabilization_attempts, 2);
        assert_eq!(context.identifier.as_deref(), Some(ARN));

        let third = invoke(&client, &config, context);
        assert_eq!(third.status, OperationStatus::Success);
        assert!(third.callback_context.is_none());
        let model = third.resource_model.unwrap();
        assert_eq!(model.identifier(), Some(ARN));
        assert_eq!(model.tags, Some(vec![Tag::new("team", "ml")]));

        assert_eq!(client.count(|c| matches!(c, Call::Create(_))), 1);
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 4);
    }

    #[test]
    fn test_create_request_carries_merged_tags_and_token() {
        let client = MockClient::new();
        client.push_create(Ok(created()));
        client.push_get(Ok(description("PENDING")));

        invoke(&client, &HandlerConfig::default(), CallbackContext::default());

        let Some(Call::Create(sent)) = client.calls().into_iter().next() else {
            panic!("expected a create call first");
        };
        assert_eq!(sent.client_request_token.as_deref(), Some("token-1"));
        assert_eq!(sent.inference_profile_name.as_deref(), Some("p1"));
        let keys: Vec<_> = sent.tags.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["aws:cloudformation:stack-name", "team"]);
    }

    #[test]
    fn test_create_failed_status_is_terminal() {
        let client = MockClient::new();
        client.push_create(Ok(created()));
        client.push_get(Ok(description("FAILED")));

        let event = invoke(&client, &HandlerConfig::default(), CallbackContext::default());
        assert_eq!(event.status, OperationStatus::Failed);
        assert_eq!(event.error_code, Some(HandlerErrorCode::ServiceInternalError));
        assert!(event.message.unwrap().contains("failed to create"));
    }

    #[test]
    fn test_create_rejected_by_service() {
        let client = MockClient::new();
        client.push_create(Err(ServiceError::new(ServiceErrorKind::QuotaExceeded, "too many profiles")));

        let event = invoke(&client, &HandlerConfig::default(), CallbackContext::default());
        assert_eq!(event.error_code, Some(HandlerErrorCode::ServiceLimitExceeded));
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 0);
    }

    #[test]
    fn test_create_without_desired_state() {
        let client = MockClient::new();
        let config = HandlerConfig::default();
        let ctx = HandlerContext::new(&client, &config, RequestLog::new(Action::Create, None));

        let event = handle(&ctx, &HandlerRequest::default(), CallbackContext::default());
        assert_eq!(event.error_code, Some(HandlerErrorCode::InvalidRequest));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_throttled_final_read_skips_probe_on_resume() {
        let client = MockClient::new();
        client.push_create(Ok(created()));
        client.push_get(Ok(description("ACTIVE")));
        client.push_get(Err(ServiceError::throttling("slow down")));
        client.push_get(Ok(description("ACTIVE")));
        let config = HandlerConfig::default();

        let first = invoke(&client, &config, CallbackContext::default());
        assert_eq!(first.status, OperationStatus::InProgress);
        assert_eq!(first.error_code, Some(HandlerErrorCode::Throttling));
        let context = first.callback_context.unwrap();
        assert!(context.stabilized);

        let second = invoke(&client, &config, context);
        assert_eq!(second.status, OperationStatus::Success);
        assert_eq!(client.count(|c| matches!(c, Call::Create(_))), 1);
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 3);
    }
}
