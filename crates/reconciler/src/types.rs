//! Resource model and handler request types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type name reported in logs and error messages
pub const TYPE_NAME: &str = "Bedrock::ApplicationInferenceProfile";

/// Lifecycle status of an inference profile as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileStatus {
    /// Profile is ready for use
    Active,
    /// Profile is still being provisioned
    Pending,
    /// Provisioning failed
    Failed,
    /// Any status this controller does not know about
    #[serde(other)]
    Unknown,
}

impl ProfileStatus {
    /// Wire form of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inference profile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProfileType {
    /// Created by a user for cost tracking and tagging
    #[default]
    Application,
    /// Predefined by the service
    SystemDefined,
}

impl ProfileType {
    /// Wire form of the type, as used in list filters
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Application => "APPLICATION",
            Self::SystemDefined => "SYSTEM_DEFINED",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a profile copies its model configuration from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelSource {
    /// ARN of the foundation model or system profile to copy from
    pub copy_from: String,
}

/// A model referenced by the profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileModel {
    pub model_arn: Option<String>,
}

/// Resource-level tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Declarative state of one application inference profile
///
/// `inference_profile_identifier` is assigned by the service on create and
/// never changes afterwards. `model_source` is only meaningful on create;
/// reads do not return it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_profile_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_profile_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_profile_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_profile_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_source: Option<ModelSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProfileStatus>,
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<ProfileType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub models: Option<Vec<ProfileModel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl ResourceModel {
    /// Identifier to address the remote profile with, if one has been assigned
    pub fn identifier(&self) -> Option<&str> {
        self.inference_profile_identifier.as_deref()
    }

    /// Display label for logs: identifier, then name, then a placeholder
    pub fn label(&self) -> &str {
        self.inference_profile_identifier
            .as_deref()
            .or(self.inference_profile_name.as_deref())
            .unwrap_or("<unassigned>")
    }
}

/// One tag layer as supplied by the orchestrator
///
/// Values may be null; null entries never reach the service.
pub type TagLayer = BTreeMap<String, Option<String>>;

/// Input to a single handler invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Idempotency token forwarded to create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_request_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_resource_state: Option<ResourceModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource_state: Option<ResourceModel>,
    /// Platform-injected tags (lowest precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_tags: Option<TagLayer>,
    /// Orchestrator-level tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_resource_tags: Option<TagLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_system_tags: Option<TagLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_resource_tags: Option<TagLayer>,
    /// Continuation token for list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    /// Page size for list; zero or absent selects the default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}
