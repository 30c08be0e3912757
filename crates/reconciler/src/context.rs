//! Handler configuration and the per-invocation context
//!
//! Everything a handler needs besides its request is passed in explicitly
//! through [`HandlerContext`]: the client, the tuning knobs and the logger.

use crate::client::ProfileClient;
use crate::handlers::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tuning knobs for handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// Delay hint returned while waiting for a profile to stabilize
    pub stabilization_delay_seconds: u32,
    /// Delay hint returned after the service throttled a call
    pub throttle_delay_seconds: u32,
    /// Page size for list when the caller asks for none
    pub default_page_size: u32,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            stabilization_delay_seconds: 5,
            throttle_delay_seconds: 10,
            default_page_size: 100,
        }
    }
}

/// Logger scoped to one handler invocation.
///
/// Prefixes every line with the action and account so interleaved
/// invocations stay readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLog {
    action: Action,
    account_id: Option<String>,
}

impl RequestLog {
    pub fn new(action: Action, account_id: Option<&str>) -> Self {
        Self {
            action,
            account_id: account_id.map(str::to_string),
        }
    }

    pub fn info(&self, message: impl fmt::Display) {
        log::info!("{self} {message}");
    }

    pub fn debug(&self, message: impl fmt::Display) {
        log::debug!("{self} {message}");
    }

    pub fn warn(&self, message: impl fmt::Display) {
        log::warn!("{self} {message}");
    }
}

impl fmt::Display for RequestLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}]",
            self.action.name().to_uppercase(),
            self.account_id.as_deref().unwrap_or("-")
        )
    }
}

/// Context passed to every handler step
pub struct HandlerContext<'a> {
    pub client: &'a dyn ProfileClient,
    pub config: &'a HandlerConfig,
    pub log: RequestLog,
}

impl<'a> HandlerContext<'a> {
    pub fn new(client: &'a dyn ProfileClient, config: &'a HandlerConfig, log: RequestLog) -> Self {
        Self {
            client,
            config,
            log,
        }
    }

    /// Same client and config, logging under another action
    pub fn for_action(&self, action: Action) -> Self {
        Self {
            client: self.client,
            config: self.config,
            log: RequestLog {
                action,
                account_id: self.log.account_id.clone(),
            },
        }
    }
}
