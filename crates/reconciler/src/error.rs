//! Downstream failures and their classification.
//!
//! Every remote call reports failures as a [`ServiceError`]. Handlers never
//! interpret those errors themselves; they hand them to [`classify`], which
//! maps each [`ServiceErrorKind`] onto a standardized [`HandlerErrorCode`] and
//! decides whether the orchestrator should retry.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Closed set of failure conditions the remote service can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceErrorKind {
    /// Account quota or service limit reached
    QuotaExceeded,
    /// Caller is not allowed to perform the operation
    AccessDenied,
    /// Request failed input validation
    Validation,
    /// Operation conflicts with the resource's current state
    Conflict,
    /// Resource does not exist
    NotFound,
    /// Request was rate limited
    Throttling,
    /// Service-side fault
    InternalServer,
    /// Resource would carry more tags than allowed
    TooManyTags,
    /// Anything else, including transport failures
    Unclassified,
}

impl ServiceErrorKind {
    /// Short description used as the error message prefix.
    pub fn description(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => "service quota exceeded",
            Self::AccessDenied => "access denied",
            Self::Validation => "invalid request",
            Self::Conflict => "resource conflict",
            Self::NotFound => "resource not found",
            Self::Throttling => "request throttled",
            Self::InternalServer => "service internal error",
            Self::TooManyTags => "too many tags",
            Self::Unclassified => "unexpected error",
        }
    }

    /// Map a service error type name (e.g. `ThrottlingException`) onto a kind.
    ///
    /// Accepts the bare name as well as the `Name:namespace` and
    /// `namespace#Name` forms services put in error headers and bodies.
    pub fn from_type_name(name: &str) -> Self {
        let name = name.split(':').next().unwrap_or(name);
        let name = name.rsplit('#').next().unwrap_or(name).trim();

        match name {
            "ServiceQuotaExceededException" => Self::QuotaExceeded,
            "AccessDeniedException" => Self::AccessDenied,
            "ValidationException" => Self::Validation,
            "ConflictException" => Self::Conflict,
            "ResourceNotFoundException" => Self::NotFound,
            "ThrottlingException" => Self::Throttling,
            "InternalServerException" => Self::InternalServer,
            "TooManyTagsException" => Self::TooManyTags,
            _ => Self::Unclassified,
        }
    }
}

/// A failed remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {message}", kind.description())]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::NotFound, message)
    }

    pub fn throttling(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Throttling, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::InternalServer, message)
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Unclassified, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ServiceErrorKind::NotFound
    }
}

/// Standardized error codes reported to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    ServiceLimitExceeded,
    AccessDenied,
    InvalidRequest,
    ResourceConflict,
    NotFound,
    Throttling,
    ServiceInternalError,
    InternalFailure,
}

impl HandlerErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::AccessDenied => "AccessDenied",
            Self::InvalidRequest => "InvalidRequest",
            Self::ResourceConflict => "ResourceConflict",
            Self::NotFound => "NotFound",
            Self::Throttling => "Throttling",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::InternalFailure => "InternalFailure",
        }
    }
}

impl fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a downstream failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Whether the orchestrator should re-drive the same step later
    pub retriable: bool,
    pub code: HandlerErrorCode,
    pub message: String,
}

/// Classify a downstream failure.
///
/// Throttling is the only retriable condition.
pub fn classify(error: &ServiceError) -> Classification {
    let (retriable, code) = match error.kind {
        ServiceErrorKind::QuotaExceeded => (false, HandlerErrorCode::ServiceLimitExceeded),
        ServiceErrorKind::AccessDenied => (false, HandlerErrorCode::AccessDenied),
        ServiceErrorKind::Validation => (false, HandlerErrorCode::InvalidRequest),
        ServiceErrorKind::Conflict => (false, HandlerErrorCode::ResourceConflict),
        ServiceErrorKind::NotFound => (false, HandlerErrorCode::NotFound),
        ServiceErrorKind::Throttling => (true, HandlerErrorCode::Throttling),
        ServiceErrorKind::InternalServer => (false, HandlerErrorCode::ServiceInternalError),
        ServiceErrorKind::TooManyTags => (false, HandlerErrorCode::InvalidRequest),
        ServiceErrorKind::Unclassified => (false, HandlerErrorCode::InternalFailure),
    };

    Classification {
        retriable,
        code,
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: [(ServiceErrorKind, bool, HandlerErrorCode); 9] = [
        (ServiceErrorKind::QuotaExceeded, false, HandlerErrorCode::ServiceLimitExceeded),
        (ServiceErrorKind::AccessDenied, false, HandlerErrorCode::AccessDenied),
        (ServiceErrorKind::Validation, false, HandlerErrorCode::InvalidRequest),
        (ServiceErrorKind::Conflict, false, HandlerErrorCode::ResourceConflict),
        (ServiceErrorKind::NotFound, false, HandlerErrorCode::NotFound),
        (ServiceErrorKind::Throttling, true, HandlerErrorCode::Throttling),
        (ServiceErrorKind::InternalServer, false, HandlerErrorCode::ServiceInternalError),
        (ServiceErrorKind::TooManyTags, false, HandlerErrorCode::InvalidRequest),
        (ServiceErrorKind::Unclassified, false, HandlerErrorCode::InternalFailure),
    ];

    #[test]
    fn test_classification_table() {
        for (kind, retriable, code) in TABLE {
            let classification = classify(&ServiceError::new(kind, "boom"));
            assert_eq!(classification.retriable, retriable, "{kind:?}");
            assert_eq!(classification.code, code, "{kind:?}");
        }
    }

    #[test]
    fn test_only_throttling_is_retriable() {
        let retriable: Vec<_> = TABLE.iter().filter(|(_, r, _)| *r).collect();
        assert_eq!(retriable.len(), 1);
        assert_eq!(retriable[0].0, ServiceErrorKind::Throttling);
    }

    #[test]
    fn test_message_includes_downstream_text() {
        let classification = classify(&ServiceError::throttling("Rate exceeded"));
        assert_eq!(classification.message, "request throttled: Rate exceeded");
    }

    #[test]
    fn test_from_type_name_forms() {
        assert_eq!(
            ServiceErrorKind::from_type_name("ThrottlingException"),
            ServiceErrorKind::Throttling
        );
        assert_eq!(
            ServiceErrorKind::from_type_name(
                "ResourceNotFoundException:http://internal.amazon.com/coral/com.amazon.bedrock/"
            ),
            ServiceErrorKind::NotFound
        );
        assert_eq!(
            ServiceErrorKind::from_type_name("com.amazonaws.bedrock#TooManyTagsException"),
            ServiceErrorKind::TooManyTags
        );
        assert_eq!(
            ServiceErrorKind::from_type_name("SomethingNew"),
            ServiceErrorKind::Unclassified
        );
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(HandlerErrorCode::ServiceLimitExceeded.to_string(), "ServiceLimitExceeded");
        let json = serde_json::to_string(&HandlerErrorCode::NotFound).unwrap();
        assert_eq!(json, "\"NotFound\"");
    }
}
