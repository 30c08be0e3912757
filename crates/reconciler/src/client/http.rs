//! HTTP backend.
//!
//! Talks JSON to the inference profile service's REST endpoints. Requests are
//! authenticated with a bearer token when one is configured; obtaining that
//! token is the caller's business.

use super::{ProfileClient, ServiceResult};
use crate::api::{
    CreateProfileRequest, CreateProfileResponse, DeleteProfileRequest, GetProfileRequest,
    ListProfilesRequest, ListProfilesResponse, ListTagsRequest, ListTagsResponse,
    ProfileDescription, TagResourceRequest, UntagResourceRequest,
};
use crate::error::{ServiceError, ServiceErrorKind};
use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

const USER_AGENT: &str = concat!("profilectl/", env!("CARGO_PKG_VERSION"));

/// Header carrying the service's error type name
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

/// Blocking HTTP client for the inference profile service.
pub struct HttpClient {
    agent: Agent,
    endpoint: String,
    bearer_token: Option<String>,
}

impl HttpClient {
    /// Create a client for `endpoint` (e.g. `https://bedrock.us-east-1.amazonaws.com`).
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Authenticate requests with a bearer token.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn profiles_url(&self) -> String {
        format!("{}/inference-profiles", self.endpoint)
    }

    fn profile_url(&self, identifier: &str) -> String {
        format!(
            "{}/inference-profiles/{}",
            self.endpoint,
            urlencoding::encode(identifier)
        )
    }

    fn operation_url(&self, operation: &str) -> String {
        format!("{}/{operation}", self.endpoint)
    }

    fn prepare<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        let request = request
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json");
        match &self.bearer_token {
            Some(token) => request.header("Authorization", format!("Bearer {token}")),
            None => request,
        }
    }
}

impl ProfileClient for HttpClient {
    fn create(&self, request: &CreateProfileRequest) -> ServiceResult<CreateProfileResponse> {
        log::debug!("POST {}", self.profiles_url());
        let response = self
            .prepare(self.agent.post(&self.profiles_url()))
            .send_json(request)?;
        read_json(response)
    }

    fn get(&self, request: &GetProfileRequest) -> ServiceResult<ProfileDescription> {
        let url = self.profile_url(&request.inference_profile_identifier);
        log::debug!("GET {url}");
        let response = self.prepare(self.agent.get(&url)).call()?;
        read_json(response)
    }

    fn delete(&self, request: &DeleteProfileRequest) -> ServiceResult<()> {
        let url = self.profile_url(&request.inference_profile_identifier);
        log::debug!("DELETE {url}");
        let response = self.prepare(self.agent.delete(&url)).call()?;
        read_empty(response)
    }

    fn list(&self, request: &ListProfilesRequest) -> ServiceResult<ListProfilesResponse> {
        let url = self.profiles_url();
        log::debug!("GET {url} (type={})", request.type_equals);
        let mut builder = self
            .prepare(self.agent.get(&url))
            .query("maxResults", request.max_results.to_string())
            .query("type", &request.type_equals);
        if let Some(token) = &request.next_token {
            builder = builder.query("nextToken", token);
        }
        read_json(builder.call()?)
    }

    fn tag(&self, request: &TagResourceRequest) -> ServiceResult<()> {
        let url = self.operation_url("tagResource");
        log::debug!("POST {url}");
        let response = self.prepare(self.agent.post(&url)).send_json(request)?;
        read_empty(response)
    }

    fn untag(&self, request: &UntagResourceRequest) -> ServiceResult<()> {
        let url = self.operation_url("untagResource");
        log::debug!("POST {url}");
        let response = self.prepare(self.agent.post(&url)).send_json(request)?;
        read_empty(response)
    }

    fn list_tags(&self, request: &ListTagsRequest) -> ServiceResult<ListTagsResponse> {
        let url = self.operation_url("listTagsForResource");
        log::debug!("POST {url}");
        let response = self.prepare(self.agent.post(&url)).send_json(request)?;
        read_json(response)
    }
}

impl From<ureq::Error> for ServiceError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => error_from_parts(code, None, ""),
            other => ServiceError::unclassified(other.to_string()),
        }
    }
}

fn read_json<T: DeserializeOwned>(mut response: Response<Body>) -> ServiceResult<T> {
    check_status(&mut response)?;
    response
        .body_mut()
        .read_json()
        .map_err(|e| ServiceError::unclassified(format!("invalid response body: {e}")))
}

fn read_empty(mut response: Response<Body>) -> ServiceResult<()> {
    check_status(&mut response)
}

fn check_status(response: &mut Response<Body>) -> ServiceResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let type_header = response
        .headers()
        .get(ERROR_TYPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = response.body_mut().read_to_string().unwrap_or_default();

    Err(error_from_parts(status.as_u16(), type_header.as_deref(), &body))
}

/// Build a [`ServiceError`] from a failed response.
///
/// The error type name comes from the error header, or failing that from the
/// `__type`/`code` body field. Without a type name the status code decides.
fn error_from_parts(status: u16, type_header: Option<&str>, body: &str) -> ServiceError {
    let json: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        json.as_ref()
            .and_then(|v| v.get(name))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let type_name = type_header
        .map(str::to_string)
        .or_else(|| field("__type"))
        .or_else(|| field("code"));

    let kind = match type_name.as_deref().map(ServiceErrorKind::from_type_name) {
        Some(kind) if kind != ServiceErrorKind::Unclassified => kind,
        _ => kind_from_status(status),
    };

    let message = field("message")
        .or_else(|| field("Message"))
        .unwrap_or_else(|| format!("HTTP {status}"));

    ServiceError::new(kind, message)
}

fn kind_from_status(status: u16) -> ServiceErrorKind {
    match status {
        400 => ServiceErrorKind::Validation,
        403 => ServiceErrorKind::AccessDenied,
        404 => ServiceErrorKind::NotFound,
        409 => ServiceErrorKind::Conflict,
        429 => ServiceErrorKind::Throttling,
        500..=599 => ServiceErrorKind::InternalServer,
        _ => ServiceErrorKind::Unclassified,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_url_encodes_arn() {
        let client = HttpClient::new("https://bedrock.us-east-1.amazonaws.com/", Duration::from_secs(5));
        assert_eq!(client.endpoint(), "https://bedrock.us-east-1.amazonaws.com");
        assert_eq!(
            client.profile_url("arn:aws:bedrock:us-east-1:1:application-inference-profile/x"),
            "https://bedrock.us-east-1.amazonaws.com/inference-profiles/arn%3Aaws%3Abedrock%3Aus-east-1%3A1%3Aapplication-inference-profile%2Fx"
        );
        assert_eq!(
            client.operation_url("tagResource"),
            "https://bedrock.us-east-1.amazonaws.com/tagResource"
        );
    }

    #[test]
    fn test_error_from_header() {
        let err = error_from_parts(
            400,
            Some("ThrottlingException:http://internal.amazon.com/coral/com.amazon.bedrock/"),
            r#"{"message":"Too many requests"}"#,
        );
        assert_eq!(err.kind, ServiceErrorKind::Throttling);
        assert_eq!(err.message, "Too many requests");
    }

    #[test]
    fn test_error_from_body_type() {
        let err = error_from_parts(
            400,
            None,
            r#"{"__type":"TooManyTagsException","Message":"limit 50"}"#,
        );
        assert_eq!(err.kind, ServiceErrorKind::TooManyTags);
        assert_eq!(err.message, "limit 50");
    }

    #[test]
    fn test_error_falls_back_to_status() {
        assert_eq!(error_from_parts(404, None, "").kind, ServiceErrorKind::NotFound);
        assert_eq!(error_from_parts(429, None, "").kind, ServiceErrorKind::Throttling);
        assert_eq!(
            error_from_parts(503, Some("Unknown"), "not json").kind,
            ServiceErrorKind::InternalServer
        );
        assert_eq!(error_from_parts(418, None, "").kind, ServiceErrorKind::Unclassified);
        assert_eq!(error_from_parts(418, None, "").message, "HTTP 418");
    }

    #[test]
    fn test_transport_error_is_unclassified() {
        let err: ServiceError = ureq::Error::BadUri("not a uri".to_string()).into();
        assert_eq!(err.kind, ServiceErrorKind::Unclassified);
        let err: ServiceError = ureq::Error::StatusCode(429).into();
        assert_eq!(err.kind, ServiceErrorKind::Throttling);
    }
}
