//! Remote service abstraction.
//!
//! The [`ProfileClient`] trait covers the operations handlers invoke on the
//! inference profile service, allowing for different implementations:
//!
//! - [`HttpClient`]: blocking JSON over HTTPS
//! - [`MockClient`]: scripted responses for testing without network access
//!
//! ```
//! use reconciler::client::{MockClient, ProfileClient};
//! use reconciler::error::ServiceError;
//!
//! let mock = MockClient::new();
//! mock.push_get(Err(ServiceError::not_found("gone")));
//! assert!(mock.get(&reconciler::translator::to_read_request("arn")).is_err());
//! ```

pub mod http;
pub mod mock;

pub use http::HttpClient;
pub use mock::{Call, MockClient};

use crate::api::{
    CreateProfileRequest, CreateProfileResponse, DeleteProfileRequest, GetProfileRequest,
    ListProfilesRequest, ListProfilesResponse, ListTagsRequest, ListTagsResponse,
    ProfileDescription, TagResourceRequest, UntagResourceRequest,
};
use crate::error::ServiceError;

/// Result of a remote call
pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// Operations of the remote inference profile service.
///
/// Every call is blocking. Failures are reported as [`ServiceError`] so
/// handlers can classify them uniformly.
pub trait ProfileClient: Send + Sync {
    /// Start creating a profile. The profile may not be usable yet.
    fn create(&self, request: &CreateProfileRequest) -> ServiceResult<CreateProfileResponse>;

    /// Describe one profile.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the profile does not exist.
    fn get(&self, request: &GetProfileRequest) -> ServiceResult<ProfileDescription>;

    /// Delete a profile.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the profile does not exist.
    fn delete(&self, request: &DeleteProfileRequest) -> ServiceResult<()>;

    /// List one page of profiles.
    fn list(&self, request: &ListProfilesRequest) -> ServiceResult<ListProfilesResponse>;

    /// Attach or overwrite tags.
    fn tag(&self, request: &TagResourceRequest) -> ServiceResult<()>;

    /// Detach tags by key.
    fn untag(&self, request: &UntagResourceRequest) -> ServiceResult<()>;

    /// All tags currently attached.
    fn list_tags(&self, request: &ListTagsRequest) -> ServiceResult<ListTagsResponse>;
}
