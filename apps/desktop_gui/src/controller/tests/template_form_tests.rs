use super::*;
use chrono::Utc;
use shared::domain::TemplateId;

fn template() -> ArticleTemplate {
    let now = Utc::now();
    ArticleTemplate {
        id: TemplateId::from("t-1"),
        title: "Weekly".into(),
        description: Some("digest".into()),
        content: None,
        tags: vec!["news".into(), "weekly".into()],
        category: None,
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn parse_tags_trims_and_drops_empty_entries() {
    assert_eq!(parse_tags(" a, ,b ,, c "), vec!["a", "b", "c"]);
    assert!(parse_tags("").is_empty());
    assert!(parse_tags(" , ").is_empty());
}

#[test]
fn form_round_trips_loaded_template() {
    let saved = template();
    let form = TemplateForm::from_template(&saved);
    assert_eq!(form.tags, "news, weekly");
    assert_eq!(form.description, "digest");
    assert_eq!(form.category, "");
    assert!(!form.is_dirty(&saved));
}

#[test]
fn blank_description_and_category_become_null() {
    let mut form = TemplateForm::from_template(&template());
    form.description = "   ".into();
    form.tags = "x,, y".into();

    let req = form.to_update_request();
    assert_eq!(req.title, Patch::Set("Weekly".to_string()));
    assert_eq!(req.description, Patch::Set(None));
    assert_eq!(req.category, Patch::Set(None));
    assert_eq!(req.content, Patch::Set(Some(String::new())));
    assert_eq!(req.tags, Patch::Set(vec!["x".to_string(), "y".to_string()]));

    let body = serde_json::to_value(&req).expect("json");
    assert!(body["description"].is_null());
    assert!(body["category"].is_null());
}

#[test]
fn create_draft_requires_title() {
    let mut draft = NewTemplateDraft::default();
    assert!(draft.to_create_request().is_none());

    draft.title = "  Launch  ".into();
    draft.category = "css_theme".into();
    let req = draft.to_create_request().expect("request");
    assert_eq!(req.title.as_deref(), Some("Launch"));
    assert_eq!(req.category.as_deref(), Some("css_theme"));
}
