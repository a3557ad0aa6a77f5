use super::*;

#[test]
fn update_sends_only_given_fields() {
    let req = update_request(
        None,
        FieldArgs {
            category: Some("css_theme".into()),
            ..FieldArgs::default()
        },
        Clears::default(),
    );
    let body = serde_json::to_value(&req).expect("json");
    assert_eq!(body, serde_json::json!({ "category": "css_theme" }));
}

#[test]
fn clear_flags_send_explicit_nulls() {
    let req = update_request(
        Some("Renamed".into()),
        FieldArgs::default(),
        Clears {
            description: true,
            category: true,
            tags: true,
            ..Clears::default()
        },
    );
    let body = serde_json::to_value(&req).expect("json");
    assert_eq!(
        body,
        serde_json::json!({
            "title": "Renamed",
            "description": null,
            "tags": [],
            "category": null
        })
    );
}

#[test]
fn empty_update_is_detected() {
    let req = update_request(None, FieldArgs::default(), Clears::default());
    assert!(req.is_empty());
}

#[test]
fn create_trims_tags() {
    let req = create_request(
        "Digest".into(),
        FieldArgs {
            tags: Some(vec![" a".into(), "".into(), "b ".into()]),
            ..FieldArgs::default()
        },
    );
    assert_eq!(req.tags, Some(vec!["a".to_string(), "b".to_string()]));
    assert_eq!(req.title.as_deref(), Some("Digest"));
}

#[test]
fn cli_parses_update_with_clear_flag() {
    let cli = Cli::try_parse_from([
        "desktop",
        "--server-url",
        "http://localhost:9000",
        "update",
        "t-1",
        "--clear-content",
        "--tags",
        "x,y",
    ])
    .expect("parse");
    match cli.command {
        Command::Update {
            id,
            clear_content,
            fields,
            ..
        } => {
            assert_eq!(id, "t-1");
            assert!(clear_content);
            assert_eq!(fields.tags, Some(vec!["x".to_string(), "y".to_string()]));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn cli_rejects_conflicting_clear_and_value() {
    let result = Cli::try_parse_from([
        "desktop",
        "update",
        "t-1",
        "--description",
        "x",
        "--clear-description",
    ]);
    assert!(result.is_err());
}
