use std::sync::Arc;

use async_trait::async_trait;
use shared::{
    domain::{ArticleTemplate, NewTemplate, TemplateFilter, TemplateId, TemplatePage},
    error::{ApiError, ErrorCode},
    protocol::{
        CreateTemplateRequest, DeleteTemplateResponse, ListTemplatesQuery, TemplateListResponse,
        UpdateTemplateRequest,
    },
};
use storage::Storage;
use tracing::{error, info};

/// Persistence operations the template API needs.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn health_check(&self) -> anyhow::Result<()>;
    async fn list(&self, filter: &TemplateFilter) -> anyhow::Result<TemplatePage>;
    async fn get(&self, id: &TemplateId) -> anyhow::Result<Option<ArticleTemplate>>;
    async fn create(&self, new: &NewTemplate) -> anyhow::Result<ArticleTemplate>;
    async fn update(
        &self,
        id: &TemplateId,
        patch: &UpdateTemplateRequest,
    ) -> anyhow::Result<Option<ArticleTemplate>>;
    async fn delete(&self, id: &TemplateId) -> anyhow::Result<u64>;
}

#[async_trait]
impl TemplateStore for Storage {
    async fn health_check(&self) -> anyhow::Result<()> {
        Storage::health_check(self).await
    }

    async fn list(&self, filter: &TemplateFilter) -> anyhow::Result<TemplatePage> {
        self.list_templates(filter).await
    }

    async fn get(&self, id: &TemplateId) -> anyhow::Result<Option<ArticleTemplate>> {
        self.get_template(id).await
    }

    async fn create(&self, new: &NewTemplate) -> anyhow::Result<ArticleTemplate> {
        self.create_template(new).await
    }

    async fn update(
        &self,
        id: &TemplateId,
        patch: &UpdateTemplateRequest,
    ) -> anyhow::Result<Option<ArticleTemplate>> {
        self.update_template(id, patch).await
    }

    async fn delete(&self, id: &TemplateId) -> anyhow::Result<u64> {
        self.delete_template(id).await
    }
}

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn TemplateStore>,
}

impl ApiContext {
    pub fn new(store: impl TemplateStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

pub async fn list_templates(
    ctx: &ApiContext,
    query: ListTemplatesQuery,
) -> Result<TemplateListResponse, ApiError> {
    let filter = query.into_filter();
    let page = ctx
        .store
        .list(&filter)
        .await
        .map_err(|err| internal("list templates", err))?;
    Ok(TemplateListResponse {
        templates: page.templates,
        total: page.total,
        limit: filter.limit,
        offset: filter.offset,
    })
}

pub async fn get_template(ctx: &ApiContext, id: &TemplateId) -> Result<ArticleTemplate, ApiError> {
    ctx.store
        .get(id)
        .await
        .map_err(|err| internal("get template", err))?
        .ok_or_else(|| not_found(id))
}

pub async fn create_template(
    ctx: &ApiContext,
    req: CreateTemplateRequest,
) -> Result<ArticleTemplate, ApiError> {
    let Some(new) = req.into_new_template() else {
        return Err(ApiError::validation("title is required"));
    };
    let created = ctx
        .store
        .create(&new)
        .await
        .map_err(|err| internal("create template", err))?;
    info!(template_id = %created.id, "template created");
    Ok(created)
}

pub async fn update_template(
    ctx: &ApiContext,
    id: &TemplateId,
    req: UpdateTemplateRequest,
) -> Result<ArticleTemplate, ApiError> {
    let current = get_template(ctx, id).await?;
    if req.title.as_set().is_some_and(|title| title.trim().is_empty()) {
        return Err(ApiError::validation("title cannot be empty"));
    }
    if req.is_empty() {
        return Ok(current);
    }

    let updated = ctx
        .store
        .update(id, &req)
        .await
        .map_err(|err| internal("update template", err))?
        // Deleted between the lookup and the write.
        .ok_or_else(|| not_found(id))?;
    info!(template_id = %id, "template updated");
    Ok(updated)
}

/// Succeeds whether or not a row existed.
pub async fn delete_template(
    ctx: &ApiContext,
    id: &TemplateId,
) -> Result<DeleteTemplateResponse, ApiError> {
    let removed = ctx
        .store
        .delete(id)
        .await
        .map_err(|err| internal("delete template", err))?;
    info!(template_id = %id, removed, "template delete processed");
    Ok(DeleteTemplateResponse {
        message: "Template deleted successfully".to_string(),
    })
}

fn not_found(id: &TemplateId) -> ApiError {
    ApiError::not_found(format!("template {id} not found"))
}

fn internal(operation: &'static str, err: anyhow::Error) -> ApiError {
    error!(operation, error = ?err, "template store failure");
    ApiError::new(ErrorCode::Internal, format!("failed to {operation}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
