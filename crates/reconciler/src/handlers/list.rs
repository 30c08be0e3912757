//! List handler: one page of application inference profiles.

use super::{Progress, Step, finish, service_failure};
use crate::context::HandlerContext;
use crate::progress::{CallbackContext, ProgressEvent};
use crate::translator;
use crate::types::HandlerRequest;

pub fn handle(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    context: CallbackContext,
) -> ProgressEvent {
    let model = request.desired_resource_state.clone().unwrap_or_default();
    finish(run(ctx, request, Progress::new(model, context)))
}

fn run(
    ctx: &HandlerContext<'_>,
    request: &HandlerRequest,
    progress: Progress,
) -> Step<ProgressEvent> {
    let page_size = match request.max_results {
        Some(n) if n > 0 => n,
        _ => ctx.config.default_page_size,
    };
    let profile_type = progress.model.profile_type.unwrap_or_default();

    let list_request =
        translator::to_list_request(page_size, request.next_token.as_deref(), profile_type);
    let response = ctx
        .client
        .list(&list_request)
        .map_err(|e| service_failure(ctx, &progress, e))?;

    let models = translator::from_list_response(&response);
    ctx.log.info(format_args!(
        "listed {} {profile_type} profile(s){}",
        models.len(),
        if response.next_token.is_some() { ", more available" } else { "" }
    ));
    Ok(ProgressEvent::success_list(models, response.next_token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListProfilesResponse;
    use crate::client::{Call, MockClient};
    use crate::context::{HandlerConfig, RequestLog};
    use crate::error::{HandlerErrorCode, ServiceError, ServiceErrorKind};
    use crate::handlers::Action;
    use crate::handlers::testing::{ARN, description};
    use crate::progress::OperationStatus;
    use crate::types::{ProfileType, ResourceModel};

    fn invoke(client: &MockClient, request: &HandlerRequest) -> ProgressEvent {
        let config = HandlerConfig::default();
        let ctx = HandlerContext::new(client, &config, RequestLog::new(Action::List, None));
        handle(&ctx, request, CallbackContext::default())
    }

    fn sent(client: &MockClient) -> crate::api::ListProfilesRequest {
        match client.calls().into_iter().next() {
            Some(Call::List(request)) => request,
            other => panic!("expected a list call, got {other:?}"),
        }
    }

    #[test]
    fn test_list_passes_token_through() {
        let client = MockClient::new();
        client.push_list(Ok(ListProfilesResponse {
            inference_profile_summaries: vec![description("ACTIVE"), description("ACTIVE")],
            next_token: Some("t2".to_string()),
        }));

        let request = HandlerRequest {
            next_token: Some("t1".to_string()),
            max_results: Some(2),
            ..Default::default()
        };
        let event = invoke(&client, &request);

        assert_eq!(event.status, OperationStatus::Success);
        assert_eq!(event.next_token.as_deref(), Some("t2"));
        let models = event.resource_models.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[0].identifier(), Some(ARN));

        let sent = sent(&client);
        assert_eq!(sent.next_token.as_deref(), Some("t1"));
        assert_eq!(sent.max_results, 2);
        assert_eq!(sent.type_equals, "APPLICATION");
    }

    #[test]
    fn test_list_defaults() {
        let client = MockClient::new();
        let request = HandlerRequest {
            max_results: Some(0),
            ..Default::default()
        };

        let event = invoke(&client, &request);
        assert_eq!(event.status, OperationStatus::Success);
        assert_eq!(event.resource_models, Some(vec![]));
        assert!(event.next_token.is_none());
        assert_eq!(sent(&client).max_results, 100);
    }

    #[test]
    fn test_list_type_filter_from_model() {
        let client = MockClient::new();
        let request = HandlerRequest {
            desired_resource_state: Some(ResourceModel {
                profile_type: Some(ProfileType::SystemDefined),
                ..Default::default()
            }),
            ..Default::default()
        };

        invoke(&client, &request);
        assert_eq!(sent(&client).type_equals, "SYSTEM_DEFINED");
    }

    #[test]
    fn test_list_failure() {
        let client = MockClient::new();
        client.push_list(Err(ServiceError::new(ServiceErrorKind::AccessDenied, "denied")));

        let event = invoke(&client, &HandlerRequest::default());
        assert_eq!(event.status, OperationStatus::Failed);
        assert_eq!(event.error_code, Some(HandlerErrorCode::AccessDenied));
    }
}
