//! Human-readable output.
//!
//! Stdout carries the progress event JSON, so everything here goes to stderr.

use colored::Colorize;
use reconciler::{Action, OperationStatus, ProgressEvent};

/// Print an info message
pub fn info(msg: &str) {
    eprintln!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    eprintln!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    eprintln!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    eprintln!("  {}", msg.dimmed());
}

/// One-line summary of a progress event
pub fn event_summary(action: Action, event: &ProgressEvent) {
    match event.status {
        OperationStatus::Success => {
            let subject = match (&event.resource_model, &event.resource_models) {
                (Some(model), _) => model.label().to_string(),
                (None, Some(models)) => format!("{} profile(s)", models.len()),
                (None, None) => "done".to_string(),
            };
            success(&format!("{action} succeeded: {subject}"));
            if let Some(token) = &event.next_token {
                dim(&format!("next token: {token}"));
            }
        }
        OperationStatus::Failed => {
            let code = event
                .error_code
                .map_or_else(|| "unknown".to_string(), |c| c.to_string());
            error(&format!(
                "{action} failed [{code}]: {}",
                event.message.as_deref().unwrap_or("no message")
            ));
        }
        OperationStatus::InProgress => {
            let reason = event
                .error_code
                .map_or_else(|| "not converged".to_string(), |c| c.to_string());
            info(&format!(
                "{action} in progress ({reason}), retry in {}s",
                event.callback_delay_seconds
            ));
        }
    }
}

/// Print a step indicator
pub fn step(num: u32, total: u32, msg: &str) {
    eprintln!("{} {}", format!("[{num}/{total}]").blue().bold(), msg);
}
