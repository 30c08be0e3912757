//! In-memory client for tests.
//!
//! Responses are queued per operation and handed out in order. Every call is
//! recorded so tests can assert exactly which remote calls a handler made.

use super::{ProfileClient, ServiceResult};
use crate::api::{
    CreateProfileRequest, CreateProfileResponse, DeleteProfileRequest, GetProfileRequest,
    ListProfilesRequest, ListProfilesResponse, ListTagsRequest, ListTagsResponse,
    ProfileDescription, TagResourceRequest, UntagResourceRequest,
};
use crate::error::ServiceError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A recorded remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(CreateProfileRequest),
    Get(String),
    Delete(String),
    List(ListProfilesRequest),
    Tag(TagResourceRequest),
    Untag(UntagResourceRequest),
    ListTags(String),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    create: VecDeque<ServiceResult<CreateProfileResponse>>,
    get: VecDeque<ServiceResult<ProfileDescription>>,
    delete: VecDeque<ServiceResult<()>>,
    list: VecDeque<ServiceResult<ListProfilesResponse>>,
    tag: VecDeque<ServiceResult<()>>,
    untag: VecDeque<ServiceResult<()>>,
    list_tags: VecDeque<ServiceResult<ListTagsResponse>>,
}

/// Mock client with scripted responses.
///
/// Operations whose queue is empty answer with a default: an empty success
/// for delete/tag/untag/list/list-tags, and an unclassified error for
/// create/get, so an unexpected call is loud.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<State>>,
}

impl MockClient {
    /// Create a new mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push_create(&self, response: ServiceResult<CreateProfileResponse>) {
        self.state().create.push_back(response);
    }

    pub fn push_get(&self, response: ServiceResult<ProfileDescription>) {
        self.state().get.push_back(response);
    }

    pub fn push_delete(&self, response: ServiceResult<()>) {
        self.state().delete.push_back(response);
    }

    pub fn push_list(&self, response: ServiceResult<ListProfilesResponse>) {
        self.state().list.push_back(response);
    }

    pub fn push_tag(&self, response: ServiceResult<()>) {
        self.state().tag.push_back(response);
    }

    pub fn push_untag(&self, response: ServiceResult<()>) {
        self.state().untag.push_back(response);
    }

    pub fn push_list_tags(&self, response: ServiceResult<ListTagsResponse>) {
        self.state().list_tags.push_back(response);
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// Number of recorded calls matching a predicate.
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|call| predicate(call)).count()
    }
}

impl ProfileClient for MockClient {
    fn create(&self, request: &CreateProfileRequest) -> ServiceResult<CreateProfileResponse> {
        let mut state = self.state();
        state.calls.push(Call::Create(request.clone()));
        state
            .create
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::unclassified("no scripted create response")))
    }

    fn get(&self, request: &GetProfileRequest) -> ServiceResult<ProfileDescription> {
        let mut state = self.state();
        state
            .calls
            .push(Call::Get(request.inference_profile_identifier.clone()));
        state
            .get
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::unclassified("no scripted get response")))
    }

    fn delete(&self, request: &DeleteProfileRequest) -> ServiceResult<()> {
        let mut state = self.state();
        state
            .calls
            .push(Call::Delete(request.inference_profile_identifier.clone()));
        state.delete.pop_front().unwrap_or(Ok(()))
    }

    fn list(&self, request: &ListProfilesRequest) -> ServiceResult<ListProfilesResponse> {
        let mut state = self.state();
        state.calls.push(Call::List(request.clone()));
        state
            .list
            .pop_front()
            .unwrap_or_else(|| Ok(ListProfilesResponse::default()))
    }

    fn tag(&self, request: &TagResourceRequest) -> ServiceResult<()> {
        let mut state = self.state();
        state.calls.push(Call::Tag(request.clone()));
        state.tag.pop_front().unwrap_or(Ok(()))
    }

    fn untag(&self, request: &UntagResourceRequest) -> ServiceResult<()> {
        let mut state = self.state();
        state.calls.push(Call::Untag(request.clone()));
        state.untag.pop_front().unwrap_or(Ok(()))
    }

    fn list_tags(&self, request: &ListTagsRequest) -> ServiceResult<ListTagsResponse> {
        let mut state = self.state();
        state.calls.push(Call::ListTags(request.resource_arn.clone()));
        state
            .list_tags
            .pop_front()
            .unwrap_or_else(|| Ok(ListTagsResponse::default()))
    }
}
