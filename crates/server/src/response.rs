use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{
    error::ApiError,
    protocol::{ErrorEnvelope, SuccessEnvelope},
};

/// Success payload wrapped as `{success: true, data}`.
pub(crate) struct Envelope<T> {
    status: StatusCode,
    data: T,
}

impl<T> Envelope<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data,
        }
    }

    pub(crate) fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(SuccessEnvelope::new(self.data))).into_response()
    }
}

/// Error payload wrapped as `{success: false, error: {code, message, status}}`.
#[derive(Debug)]
pub(crate) struct Failure(pub(crate) ApiError);

impl Failure {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self(ApiError::validation(message))
    }
}

impl From<ApiError> for Failure {
    fn from(value: ApiError) -> Self {
        Self(value)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorEnvelope::from(self.0))).into_response()
    }
}

pub(crate) type HandlerResult<T> = Result<Envelope<T>, Failure>;
