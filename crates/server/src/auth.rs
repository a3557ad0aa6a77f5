use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use session::{bearer_token, verify_session_token, SessionClaims};
use shared::error::{ApiError, ErrorCode};
use tracing::{debug, warn};

use crate::{app_state::AppState, response::Failure};

/// Rejects requests without a valid session bearer token. Verified claims are
/// stored in the request extensions.
pub(crate) async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
    else {
        return unauthorized("missing or invalid bearer token");
    };

    match verify_session_token(&state.auth_secret, token) {
        Ok(claims) => {
            debug!(subject = %claims.sub, path = %req.uri().path(), "session verified");
            req.extensions_mut().insert::<SessionClaims>(claims);
            next.run(req).await
        }
        Err(err) => {
            warn!(error = %err, "rejected session token");
            unauthorized("invalid or expired session token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    let mut response =
        Failure(ApiError::new(ErrorCode::Unauthorized, message)).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    response
}
