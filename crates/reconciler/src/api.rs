//! Request and response shapes of the remote inference profile service.
//!
//! These mirror the service's JSON documents (camelCase). Nothing in here
//! knows about the resource model; see [`crate::translator`] for the mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag as carried on the wire. The service may hand back tags without a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WireTag {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModelSource {
    pub copy_from: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireModel {
    #[serde(default)]
    pub model_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub inference_profile_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_source: Option<WireModelSource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<WireTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_request_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileResponse {
    pub inference_profile_arn: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProfileRequest {
    pub inference_profile_identifier: String,
}

/// Full description of one profile, as returned by get
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDescription {
    #[serde(default)]
    pub inference_profile_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub inference_profile_arn: Option<String>,
    #[serde(default)]
    pub models: Vec<WireModel>,
    #[serde(default)]
    pub inference_profile_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub profile_type: Option<String>,
}

/// List entries share the description's shape
pub type ProfileSummary = ProfileDescription;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteProfileRequest {
    pub inference_profile_identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListProfilesRequest {
    pub max_results: u32,
    pub next_token: Option<String>,
    pub type_equals: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProfilesResponse {
    #[serde(default)]
    pub inference_profile_summaries: Vec<ProfileSummary>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResourceRequest {
    #[serde(rename = "resourceARN")]
    pub resource_arn: String,
    pub tags: Vec<WireTag>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UntagResourceRequest {
    #[serde(rename = "resourceARN")]
    pub resource_arn: String,
    #[serde(rename = "tagKeys")]
    pub tag_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTagsRequest {
    #[serde(rename = "resourceARN")]
    pub resource_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListTagsResponse {
    #[serde(default)]
    pub tags: Vec<WireTag>,
}
