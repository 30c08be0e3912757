//! Translation between the resource model and service request/response shapes
//!
//! Pure functions only: no client, no logging.

use crate::api::{
    CreateProfileRequest, DeleteProfileRequest, GetProfileRequest, ListProfilesRequest,
    ListProfilesResponse, ListTagsRequest, WireModelSource, ProfileDescription, ProfileSummary,
    TagResourceRequest, UntagResourceRequest, WireModel, WireTag,
};
use crate::tags::{self, TagSet};
use crate::types::{ProfileModel, ProfileStatus, ProfileType, ResourceModel, Tag};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;

pub fn to_create_request(
    model: &ResourceModel,
    client_request_token: Option<&str>,
) -> CreateProfileRequest {
    CreateProfileRequest {
        inference_profile_name: model.inference_profile_name.clone(),
        description: model.description.clone(),
        model_source: model.model_source.as_ref().map(|source| WireModelSource {
            copy_from: source.copy_from.clone(),
        }),
        tags: to_wire_tags(model.tags.as_deref().unwrap_or_default()),
        client_request_token: client_request_token.map(str::to_string),
    }
}

pub fn to_read_request(identifier: &str) -> GetProfileRequest {
    GetProfileRequest {
        inference_profile_identifier: identifier.to_string(),
    }
}

pub fn to_delete_request(identifier: &str) -> DeleteProfileRequest {
    DeleteProfileRequest {
        inference_profile_identifier: identifier.to_string(),
    }
}

pub fn to_list_request(
    max_results: u32,
    next_token: Option<&str>,
    profile_type: ProfileType,
) -> ListProfilesRequest {
    ListProfilesRequest {
        max_results,
        next_token: next_token.map(str::to_string),
        type_equals: profile_type.as_str().to_string(),
    }
}

pub fn to_list_tags_request(identifier: &str) -> ListTagsRequest {
    ListTagsRequest {
        resource_arn: identifier.to_string(),
    }
}

pub fn to_tag_request(identifier: &str, added: &TagSet) -> TagResourceRequest {
    TagResourceRequest {
        resource_arn: identifier.to_string(),
        tags: tags::to_list(added),
    }
}

pub fn to_untag_request(identifier: &str, removed: &BTreeSet<String>) -> UntagResourceRequest {
    UntagResourceRequest {
        resource_arn: identifier.to_string(),
        tag_keys: removed.iter().cloned().collect(),
    }
}

/// Build a model from a get response.
///
/// The ARN doubles as the identifier. Model source and tags are not part of
/// the response.
pub fn from_read_response(response: &ProfileDescription) -> ResourceModel {
    ResourceModel {
        inference_profile_identifier: response.inference_profile_arn.clone(),
        inference_profile_arn: response.inference_profile_arn.clone(),
        inference_profile_id: response.inference_profile_id.clone(),
        inference_profile_name: response.inference_profile_name.clone(),
        description: response.description.clone(),
        model_source: None,
        status: response.status.as_deref().map(parse_status),
        profile_type: response.profile_type.as_deref().and_then(parse_type),
        created_at: timestamp_string(response.created_at.as_ref()),
        updated_at: timestamp_string(response.updated_at.as_ref()),
        models: Some(from_wire_models(&response.models)),
        tags: None,
    }
}

pub fn from_summary(summary: &ProfileSummary) -> ResourceModel {
    from_read_response(summary)
}

pub fn from_list_response(response: &ListProfilesResponse) -> Vec<ResourceModel> {
    response
        .inference_profile_summaries
        .iter()
        .map(from_summary)
        .collect()
}

pub fn from_wire_models(models: &[WireModel]) -> Vec<ProfileModel> {
    models
        .iter()
        .map(|model| ProfileModel {
            model_arn: model.model_arn.clone(),
        })
        .collect()
}

pub fn to_wire_tags(tags: &[Tag]) -> Vec<WireTag> {
    tags.iter()
        .map(|tag| WireTag {
            key: tag.key.clone(),
            value: Some(tag.value.clone()),
        })
        .collect()
}

/// Wire tags to model tags, sorted by key. Value-less entries are dropped.
pub fn from_wire_tags(tags: &[WireTag]) -> Vec<Tag> {
    tags::to_model_tags(&tags::to_map(tags))
}

pub fn parse_status(status: &str) -> ProfileStatus {
    match status {
        "ACTIVE" => ProfileStatus::Active,
        "PENDING" => ProfileStatus::Pending,
        "FAILED" => ProfileStatus::Failed,
        _ => ProfileStatus::Unknown,
    }
}

pub fn parse_type(profile_type: &str) -> Option<ProfileType> {
    match profile_type {
        "APPLICATION" => Some(ProfileType::Application),
        "SYSTEM_DEFINED" => Some(ProfileType::SystemDefined),
        _ => None,
    }
}

/// Canonical timestamp form: RFC 3339, UTC, `Z` suffix.
fn timestamp_string(timestamp: Option<&DateTime<Utc>>) -> Option<String> {
    timestamp.map(|t| t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}
