use super::*;

fn api(code: ErrorCode, message: &str) -> ClientError {
    ClientError::Api {
        status: code.http_status(),
        code,
        message: message.to_string(),
    }
}

#[test]
fn api_codes_map_to_categories() {
    let cases = [
        (ErrorCode::Unauthorized, UiErrorCategory::Auth),
        (ErrorCode::NotFound, UiErrorCategory::NotFound),
        (ErrorCode::Validation, UiErrorCategory::Validation),
        (ErrorCode::UpstreamUnavailable, UiErrorCategory::Transport),
        (ErrorCode::Internal, UiErrorCategory::Unknown),
    ];
    for (code, expected) in cases {
        let err = UiError::from_client_error(UiErrorContext::General, &api(code, "boom"));
        assert_eq!(err.category(), expected, "{code:?}");
    }
}

#[test]
fn unauthorized_requires_reauth() {
    let err = UiError::from_client_error(
        UiErrorContext::LoadTemplates,
        &api(ErrorCode::Unauthorized, "missing or invalid bearer token"),
    );
    assert!(err.requires_reauth());
    assert!(!err.navigates_away());
}

#[test]
fn failed_detail_load_navigates_away_with_notice() {
    let err = UiError::from_client_error(
        UiErrorContext::LoadTemplate,
        &api(ErrorCode::NotFound, "template t-1 not found"),
    );
    assert!(err.navigates_away());
    assert_eq!(
        err.notice_text(),
        "Failed to load template: template t-1 not found (404)"
    );
}

#[test]
fn bad_server_url_is_a_validation_error() {
    let err = UiError::from_client_error(UiErrorContext::SignIn, &ClientError::OpaqueUrl);
    assert_eq!(err.category(), UiErrorCategory::Validation);
}

#[test]
fn classifies_backend_command_processor_disconnect_as_transport_error() {
    let err = UiError::from_message(
        UiErrorContext::General,
        "Backend command processor disconnected; restart the app",
    );
    assert_eq!(err.category(), UiErrorCategory::Transport);
    assert!(!err.requires_reauth());
}

#[test]
fn missing_session_is_an_auth_error() {
    let err = UiError::from_message(UiErrorContext::LoadTemplates, "not signed in");
    assert!(err.requires_reauth());
}
