use shared::{
    domain::{NewTemplate, TemplateFilter},
    patch::Patch,
    protocol::UpdateTemplateRequest,
};
use storage::Storage;

#[tokio::test]
async fn template_survives_reopen_of_file_database() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("cms.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let created = {
        let storage = Storage::new(&database_url).await.expect("db");
        storage
            .create_template(&NewTemplate {
                title: "Persistent".into(),
                content: Some("# Heading".into()),
                tags: vec!["keep".into()],
                ..NewTemplate::default()
            })
            .await
            .expect("create")
    };

    let storage = Storage::new(&database_url).await.expect("reopen");
    let loaded = storage
        .get_template(&created.id)
        .await
        .expect("get")
        .expect("template");
    assert_eq!(loaded, created);

    let updated = storage
        .update_template(
            &created.id,
            &UpdateTemplateRequest {
                category: Patch::Set(Some("content_type".into())),
                ..UpdateTemplateRequest::default()
            },
        )
        .await
        .expect("update")
        .expect("row");
    assert_eq!(updated.category.as_deref(), Some("content_type"));
    assert_eq!(updated.content.as_deref(), Some("# Heading"));

    let page = storage
        .list_templates(&TemplateFilter {
            category: Some("content_type".into()),
            limit: 10,
            ..TemplateFilter::default()
        })
        .await
        .expect("list");
    assert_eq!(page.total, 1);

    storage.delete_template(&created.id).await.expect("delete");
    let page = storage
        .list_templates(&TemplateFilter {
            limit: 10,
            ..TemplateFilter::default()
        })
        .await
        .expect("list");
    assert_eq!(page.total, 0);
}
