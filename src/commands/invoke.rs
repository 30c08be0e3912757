//! `profilectl invoke` - a minimal orchestrator.
//!
//! Runs one handler invocation from a request file and prints the event. With
//! `--wait` it plays the orchestrator's part: sleep for the delay hint,
//! re-invoke with the returned context, stop on a terminal event or after
//! `max_attempts` invocations.

use anyhow::{Context as _, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reconciler::{
    Action, CallbackContext, HandlerConfig, HandlerRequest, HttpClient, OperationStatus,
    ProfileClient, ProgressEvent, invoke,
};
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::thread;
use std::time::Duration;

use crate::Context;
use crate::cli::InvokeArgs;
use crate::config::{Config, ENV_BEARER_TOKEN};
use crate::ui;

pub fn run(ctx: &Context, config: &Config, args: &InvokeArgs) -> Result<OperationStatus> {
    let action = Action::from(args.action);
    let request = read_request(&args.request)?;
    let context = match &args.context {
        Some(path) => read_context(path)?,
        None => CallbackContext::default(),
    };

    let client = build_client(config);
    log::info!("{action} against {}", client.endpoint());

    let event = if args.wait {
        let max_attempts = args
            .max_attempts
            .unwrap_or(config.orchestrator.max_attempts);
        wait(ctx, &client, &config.handler, action, &request, context, max_attempts)
    } else {
        invoke(action, &client, &config.handler, &request, context)
    };

    if let Some(path) = &args.save_context {
        save_context(path, event.callback_context.as_ref())?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&event).context("Failed to serialize progress event")?
    );
    if !ctx.quiet {
        ui::event_summary(action, &event);
    }

    Ok(event.status)
}

fn build_client(config: &Config) -> HttpClient {
    let client = HttpClient::new(config.endpoint(), config.timeout());
    match &config.bearer_token {
        Some(token) => client.with_bearer_token(token),
        None => {
            log::warn!("{ENV_BEARER_TOKEN} is not set, requests will be unauthenticated");
            client
        }
    }
}

/// Run with a spinner, sleeping for real between invocations.
fn wait(
    ctx: &Context,
    client: &dyn ProfileClient,
    handler: &HandlerConfig,
    action: Action,
    request: &HandlerRequest,
    context: CallbackContext,
    max_attempts: u32,
) -> ProgressEvent {
    let spinner = spinner(ctx, action);

    let event = drive(
        client,
        handler,
        action,
        request,
        context,
        max_attempts,
        |attempt, event| {
            let delay = Duration::from_secs(u64::from(event.callback_delay_seconds));
            if ctx.verbose > 0 {
                spinner.suspend(|| {
                    ui::step(attempt, max_attempts, &format!("{action}: {}", status_note(event)));
                });
            }
            spinner.set_message(format!(
                "{action}: {} (attempt {attempt}/{max_attempts}, next in {}s)",
                status_note(event),
                delay.as_secs()
            ));
            thread::sleep(delay);
        },
    );
    spinner.finish_and_clear();

    if !event.is_terminal() && !ctx.quiet {
        ui::warn(&format!(
            "{action} did not converge after {max_attempts} invocation(s)"
        ));
        ui::dim("Save the context with --save-context and resume with --context");
    }
    event
}

/// Re-invoke `action` until the event is terminal or `max_attempts` runs out.
///
/// `pause` runs between invocations with the attempt number and the
/// `IN_PROGRESS` event just returned; it is where the caller waits.
/// The last event is returned either way.
pub fn drive(
    client: &dyn ProfileClient,
    handler: &HandlerConfig,
    action: Action,
    request: &HandlerRequest,
    mut context: CallbackContext,
    max_attempts: u32,
    mut pause: impl FnMut(u32, &ProgressEvent),
) -> ProgressEvent {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let event = invoke(action, client, handler, request, context);
        if event.is_terminal() || attempt >= max_attempts {
            return event;
        }

        pause(attempt, &event);
        context = event.callback_context.unwrap_or_default();
    }
}

fn status_note(event: &ProgressEvent) -> String {
    match event.error_code {
        Some(code) => code.to_string(),
        None => "stabilizing".to_string(),
    }
}

fn spinner(ctx: &Context, action: Action) -> ProgressBar {
    if ctx.quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        Ok(style) => pb.set_style(style),
        Err(e) => log::debug!("spinner template rejected: {e}"),
    }
    pb.set_message(format!("{action}: starting"));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        return Ok(content);
    }

    fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))
}

pub fn read_request(path: &Path) -> Result<HandlerRequest> {
    let content = read_input(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid handler request in {}", path.display()))
}

/// Read a saved context. An empty file means a fresh chain.
pub fn read_context(path: &Path) -> Result<CallbackContext> {
    let content = read_input(path)?;
    if content.trim().is_empty() {
        return Ok(CallbackContext::default());
    }
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid callback context in {}", path.display()))
}

/// Write the context to resubmit; a terminal event leaves an empty context.
pub fn save_context(path: &Path, context: Option<&CallbackContext>) -> Result<()> {
    let empty = CallbackContext::default();
    let content = serde_json::to_string_pretty(context.unwrap_or(&empty))
        .context("Failed to serialize callback context")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write callback context: {}", path.display()))?;
    log::debug!("Saved callback context to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconciler::MockClient;
    use reconciler::api::{CreateProfileResponse, ProfileDescription};
    use reconciler::client::Call;
    use reconciler::error::ServiceError;
    use tempfile::TempDir;

    const ARN: &str = "arn:aws:bedrock:us-east-1:1:application-inference-profile/cli";

    fn description(status: &str) -> ProfileDescription {
        ProfileDescription {
            inference_profile_arn: Some(ARN.to_string()),
            status: Some(status.to_string()),
            ..Default::default()
        }
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_request_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "request.json",
            r#"{
                "clientRequestToken": "abc",
                "desiredResourceState": {"InferenceProfileName": "p1", "Tags": [{"Key": "k", "Value": "v"}]},
                "desiredResourceTags": {"env": "dev", "gone": null}
            }"#,
        );

        let request = read_request(&path).unwrap();
        assert_eq!(request.client_request_token.as_deref(), Some("abc"));
        let model = request.desired_resource_state.unwrap();
        assert_eq!(model.inference_profile_name.as_deref(), Some("p1"));
        assert_eq!(request.desired_resource_tags.unwrap().get("gone"), Some(&None));
    }

    #[test]
    fn test_read_request_rejects_garbage() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "request.json", "not json");
        let err = read_request(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid handler request"));
    }

    #[test]
    fn test_context_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("context.json");
        let context = CallbackContext {
            identifier: Some(ARN.to_string()),
            create_issued: true,
            stabilization_attempts: 3,
            ..Default::default()
        };

        save_context(&path, Some(&context)).unwrap();
        assert_eq!(read_context(&path).unwrap(), context);

        save_context(&path, None).unwrap();
        assert_eq!(read_context(&path).unwrap(), CallbackContext::default());

        let empty = write(&temp_dir, "empty.json", "\n");
        assert_eq!(read_context(&empty).unwrap(), CallbackContext::default());
    }

    #[test]
    fn test_drive_until_terminal() {
        let client = MockClient::new();
        client.push_create(Ok(CreateProfileResponse {
            inference_profile_arn: ARN.to_string(),
            status: None,
        }));
        for status in ["PENDING", "ACTIVE", "ACTIVE"] {
            client.push_get(Ok(description(status)));
        }

        let request = HandlerRequest {
            desired_resource_state: Some(Default::default()),
            ..Default::default()
        };
        let mut pauses = Vec::new();
        let event = drive(
            &client,
            &HandlerConfig::default(),
            Action::Create,
            &request,
            CallbackContext::default(),
            10,
            |attempt, event| pauses.push((attempt, event.callback_delay_seconds)),
        );

        assert_eq!(event.status, OperationStatus::Success);
        assert_eq!(pauses, vec![(1, 5)]);
        assert_eq!(client.count(|c| matches!(c, Call::Create(_))), 1);
    }

    #[test]
    fn test_drive_gives_up_with_resumable_event() {
        let client = MockClient::new();
        for _ in 0..3 {
            client.push_get(Ok(description("ACTIVE")));
        }

        let request = HandlerRequest {
            desired_resource_state: Some(reconciler::ResourceModel {
                inference_profile_identifier: Some(ARN.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut pauses = 0;
        let event = drive(
            &client,
            &HandlerConfig::default(),
            Action::Delete,
            &request,
            CallbackContext::default(),
            3,
            |_, _| pauses += 1,
        );

        assert_eq!(event.status, OperationStatus::InProgress);
        assert_eq!(pauses, 2);
        assert!(event.callback_context.unwrap().delete_issued);
        assert_eq!(client.count(|c| matches!(c, Call::Delete(_))), 1);
    }

    #[test]
    fn test_drive_stops_on_failure() {
        let client = MockClient::new();
        client.push_get(Err(ServiceError::not_found("gone")));

        let request = HandlerRequest {
            desired_resource_state: Some(reconciler::ResourceModel {
                inference_profile_identifier: Some(ARN.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let event = drive(
            &client,
            &HandlerConfig::default(),
            Action::Read,
            &request,
            CallbackContext::default(),
            5,
            |_, _| panic!("a terminal event must not pause"),
        );
        assert_eq!(event.status, OperationStatus::Failed);
    }
}
