use super::*;
use shared::patch::Patch;

async fn memory_storage() -> Storage {
    Storage::new("sqlite::memory:").await.expect("db")
}

fn new_template(title: &str) -> NewTemplate {
    NewTemplate {
        title: title.to_string(),
        ..NewTemplate::default()
    }
}

fn filter(limit: u32, offset: u32) -> TemplateFilter {
    TemplateFilter {
        limit,
        offset,
        ..TemplateFilter::default()
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = memory_storage().await;
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("storage.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn created_template_gets_id_timestamps_and_defaults() {
    let storage = memory_storage().await;
    let created = storage
        .create_template(&new_template("Launch note"))
        .await
        .expect("create");

    assert!(!created.id.as_str().is_empty());
    assert_eq!(created.title, "Launch note");
    assert_eq!(created.description, None);
    assert_eq!(created.content, None);
    assert_eq!(created.category, None);
    assert!(created.tags.is_empty());
    assert_eq!(created.created_at, created.updated_at);

    let loaded = storage
        .get_template(&created.id)
        .await
        .expect("get")
        .expect("some template");
    assert_eq!(loaded, created);
}

#[tokio::test]
async fn tags_keep_their_order() {
    let storage = memory_storage().await;
    let created = storage
        .create_template(&NewTemplate {
            title: "Tagged".into(),
            tags: vec!["dark".into(), "tech".into(), "alpha".into()],
            ..NewTemplate::default()
        })
        .await
        .expect("create");
    let loaded = storage
        .get_template(&created.id)
        .await
        .expect("get")
        .expect("template");
    assert_eq!(loaded.tags, vec!["dark", "tech", "alpha"]);
}

#[tokio::test]
async fn missing_template_reads_as_none() {
    let storage = memory_storage().await;
    let id = TemplateId::from("does-not-exist");
    assert!(storage.get_template(&id).await.expect("get").is_none());
    assert!(!storage.template_exists(&id).await.expect("exists"));
}

#[tokio::test]
async fn update_touches_only_set_fields() {
    let storage = memory_storage().await;
    let created = storage
        .create_template(&NewTemplate {
            title: "Original".into(),
            description: Some("desc".into()),
            content: Some("body".into()),
            tags: vec!["a".into()],
            category: Some("css_theme".into()),
        })
        .await
        .expect("create");

    let patch = UpdateTemplateRequest {
        description: Patch::Set(None),
        tags: Patch::Set(Vec::new()),
        ..UpdateTemplateRequest::default()
    };
    let updated = storage
        .update_template(&created.id, &patch)
        .await
        .expect("update")
        .expect("row");

    assert_eq!(updated.title, "Original");
    assert_eq!(updated.description, None);
    assert_eq!(updated.content.as_deref(), Some("body"));
    assert!(updated.tags.is_empty());
    assert_eq!(updated.category.as_deref(), Some("css_theme"));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn update_of_missing_row_returns_none() {
    let storage = memory_storage().await;
    let patch = UpdateTemplateRequest {
        title: Patch::Set("x".into()),
        ..UpdateTemplateRequest::default()
    };
    let result = storage
        .update_template(&TemplateId::from("ghost"), &patch)
        .await
        .expect("update");
    assert!(result.is_none());
}

#[tokio::test]
async fn delete_reports_removed_rows() {
    let storage = memory_storage().await;
    let created = storage
        .create_template(&new_template("Short lived"))
        .await
        .expect("create");

    assert_eq!(storage.delete_template(&created.id).await.expect("delete"), 1);
    assert_eq!(storage.delete_template(&created.id).await.expect("delete"), 0);
    assert!(storage.get_template(&created.id).await.expect("get").is_none());
}

#[tokio::test]
async fn lists_newest_first_with_total_independent_of_paging() {
    let storage = memory_storage().await;
    let mut ids = Vec::new();
    for title in ["first", "second", "third", "fourth", "fifth"] {
        ids.push(
            storage
                .create_template(&new_template(title))
                .await
                .expect("create")
                .id,
        );
    }

    let page = storage.list_templates(&filter(2, 0)).await.expect("list");
    assert_eq!(page.total, 5);
    assert_eq!(page.templates.len(), 2);
    assert_eq!(page.templates[0].id, ids[4]);
    assert_eq!(page.templates[1].id, ids[3]);

    let tail = storage.list_templates(&filter(2, 4)).await.expect("list");
    assert_eq!(tail.total, 5);
    assert_eq!(tail.templates.len(), 1);
    assert_eq!(tail.templates[0].id, ids[0]);

    let past_end = storage.list_templates(&filter(10, 5)).await.expect("list");
    assert_eq!(past_end.total, 5);
    assert!(past_end.templates.is_empty());
}

#[tokio::test]
async fn filters_by_exact_category() {
    let storage = memory_storage().await;
    for (title, category) in [
        ("a", Some("css_theme")),
        ("b", Some("css_theme_dark")),
        ("c", None),
    ] {
        storage
            .create_template(&NewTemplate {
                title: title.into(),
                category: category.map(str::to_string),
                ..NewTemplate::default()
            })
            .await
            .expect("create");
    }

    let page = storage
        .list_templates(&TemplateFilter {
            category: Some("css_theme".into()),
            ..filter(100, 0)
        })
        .await
        .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.templates[0].title, "a");
}

#[tokio::test]
async fn search_matches_title_or_description_case_insensitively() {
    let storage = memory_storage().await;
    for (title, description) in [
        ("FOO weekly", None),
        ("Monthly", Some("all about foo bars")),
        ("Unrelated", Some("nothing here")),
    ] {
        storage
            .create_template(&NewTemplate {
                title: title.into(),
                description: description.map(str::to_string),
                ..NewTemplate::default()
            })
            .await
            .expect("create");
    }

    let page = storage
        .list_templates(&TemplateFilter {
            search: Some("foo".into()),
            ..filter(100, 0)
        })
        .await
        .expect("list");
    assert_eq!(page.total, 2);
    let mut titles: Vec<_> = page.templates.iter().map(|t| t.title.as_str()).collect();
    titles.sort_unstable();
    assert_eq!(titles, vec!["FOO weekly", "Monthly"]);

    storage
        .create_template(&NewTemplate {
            title: "ÉTÉ Digest".into(),
            description: Some("Сводка за ЛЕТО".into()),
            ..NewTemplate::default()
        })
        .await
        .expect("create");
    for term in ["ÉTÉ", "été", "Été digest", "лето", "СВОДКА"] {
        let page = storage
            .list_templates(&TemplateFilter {
                search: Some(term.into()),
                ..filter(100, 0)
            })
            .await
            .expect("list");
        assert_eq!(page.total, 1, "search for {term:?}");
        assert_eq!(page.templates[0].title, "ÉTÉ Digest");
    }
}

#[tokio::test]
async fn search_follows_updated_title_and_description() {
    let storage = memory_storage().await;
    let created = storage
        .create_template(&NewTemplate {
            title: "Draft".into(),
            description: Some("Old notes".into()),
            ..NewTemplate::default()
        })
        .await
        .expect("create");
    storage
        .update_template(
            &created.id,
            &UpdateTemplateRequest {
                title: Patch::Set("ÜBERSICHT".into()),
                description: Patch::Set(None),
                ..UpdateTemplateRequest::default()
            },
        )
        .await
        .expect("update")
        .expect("row");

    let search = |term: &str| TemplateFilter {
        search: Some(term.into()),
        ..filter(100, 0)
    };
    let page = storage.list_templates(&search("übersicht")).await.expect("list");
    assert_eq!(page.total, 1);
    let page = storage.list_templates(&search("draft")).await.expect("list");
    assert_eq!(page.total, 0);
    let page = storage.list_templates(&search("notes")).await.expect("list");
    assert_eq!(page.total, 0, "cleared description no longer matches");
}

#[tokio::test]
async fn search_treats_like_wildcards_literally() {
    let storage = memory_storage().await;
    storage
        .create_template(&new_template("100% pure"))
        .await
        .expect("create");
    storage
        .create_template(&new_template("100 percent"))
        .await
        .expect("create");

    let page = storage
        .list_templates(&TemplateFilter {
            search: Some("0%".into()),
            ..filter(100, 0)
        })
        .await
        .expect("list");
    assert_eq!(page.total, 1);
    assert_eq!(page.templates[0].title, "100% pure");
}

#[test]
fn like_pattern_escapes_wildcards() {
    assert_eq!(like_pattern("A_b%"), "%a\\_b\\%%");
}

#[test]
fn memory_urls_have_no_parent_dir() {
    assert!(sqlite_path("sqlite::memory:").is_none());
    assert_eq!(
        sqlite_path("sqlite://./data/app.db?mode=rwc"),
        Some(PathBuf::from("./data/app.db"))
    );
}
