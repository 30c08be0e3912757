//! Tag layering and diffing.
//!
//! Desired tags come from three layers, lowest precedence first: tags the
//! platform injects, tags set at the orchestrator level, and tags declared on
//! the resource itself. A later layer overrides an earlier one on key
//! collision. Null values are dropped after layering, so a null in a later
//! layer removes the key entirely.

use crate::api::WireTag;
use crate::types::{HandlerRequest, ResourceModel, Tag, TagLayer};
use std::collections::{BTreeMap, BTreeSet};

/// Resolved tags, key to value. Sorted so output is deterministic.
pub type TagSet = BTreeMap<String, String>;

/// Changes needed to move a resource from one tag set to another
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Keys that are new or whose value changed
    pub to_add: TagSet,
    /// Keys present before but not desired any more
    pub to_remove: BTreeSet<String>,
}

impl TagDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Merge the three tag layers; later layers win.
pub fn merge_layers(
    platform: Option<&TagLayer>,
    orchestrator: Option<&TagLayer>,
    resource: Option<&TagLayer>,
) -> TagSet {
    let mut merged: BTreeMap<&str, Option<&str>> = BTreeMap::new();
    for layer in [platform, orchestrator, resource].into_iter().flatten() {
        for (key, value) in layer {
            merged.insert(key.as_str(), value.as_deref());
        }
    }

    merged
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key.to_string(), v.to_string())))
        .collect()
}

/// Compute what to add and what to remove to go from `previous` to `desired`.
pub fn diff(previous: &TagSet, desired: &TagSet) -> TagDiff {
    let to_add = desired
        .iter()
        .filter(|(key, value)| previous.get(*key) != Some(*value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let to_remove = previous
        .keys()
        .filter(|key| !desired.contains_key(*key))
        .cloned()
        .collect();

    TagDiff { to_add, to_remove }
}

/// Tags the caller wants on the resource after this request.
pub fn desired_tags(request: &HandlerRequest) -> TagSet {
    let resource = request
        .desired_resource_state
        .as_ref()
        .and_then(|model| model.tags.as_deref())
        .map(layer_from_tags);

    merge_layers(
        request.system_tags.as_ref(),
        request.desired_resource_tags.as_ref(),
        resource.as_ref(),
    )
}

/// Tags that were attached before this request.
pub fn previous_tags(request: &HandlerRequest) -> TagSet {
    let resource = request
        .previous_resource_state
        .as_ref()
        .and_then(|model| model.tags.as_deref())
        .map(layer_from_tags);

    merge_layers(
        request.previous_system_tags.as_ref(),
        request.previous_resource_tags.as_ref(),
        resource.as_ref(),
    )
}

fn layer_from_tags(tags: &[Tag]) -> TagLayer {
    tags.iter()
        .map(|tag| (tag.key.clone(), Some(tag.value.clone())))
        .collect()
}

/// Wire tags to a tag set, dropping value-less entries. Last key wins.
pub fn to_map(tags: &[WireTag]) -> TagSet {
    tags.iter()
        .filter_map(|tag| {
            tag.value
                .as_ref()
                .map(|value| (tag.key.clone(), value.clone()))
        })
        .collect()
}

/// Tag set to the list form wire calls require.
pub fn to_list(tags: &TagSet) -> Vec<WireTag> {
    tags.iter()
        .map(|(key, value)| WireTag {
            key: key.clone(),
            value: Some(value.clone()),
        })
        .collect()
}

/// Tag set to resource-model tags.
pub fn to_model_tags(tags: &TagSet) -> Vec<Tag> {
    tags.iter()
        .map(|(key, value)| Tag::new(key.clone(), value.clone()))
        .collect()
}

/// Replace the model's tags with the merged desired set.
pub fn apply_desired(model: &mut ResourceModel, desired: &TagSet) {
    model.tags = Some(to_model_tags(desired));
}
