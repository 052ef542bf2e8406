use crate::errors::ServiceError;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use utoipa::ToSchema;
use validator::Validate;

/// Simple acknowledgement body used by the write endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validate request input
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))
}

/// Bounds a store-backed service call with the configured timeout.
///
/// Timeouts fail closed: the in-flight future is dropped and the caller
/// sees a service-unavailable error instead of an unbounded wait. No retry
/// happens at this layer.
pub async fn bounded<T, F>(timeout: Duration, operation: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(ServiceError::ServiceUnavailable(
            "coupon store query timed out".to_string(),
        )),
    }
}
