use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use server_api::{
    create_template, delete_template, get_template, list_templates, update_template, ApiContext,
};
use shared::{
    domain::{ArticleTemplate, TemplateId},
    protocol::{
        CreateTemplateRequest, DeleteTemplateResponse, ListTemplatesQuery, TemplateListResponse,
        UpdateTemplateRequest,
    },
};
use storage::Storage;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod app_state;
mod auth;
mod config;
mod docs;
mod response;

use crate::app_state::AppState;
use crate::config::{load_settings, prepare_database_url};
use crate::docs::DocsClient;
use crate::response::{Envelope, Failure, HandlerResult};

const SKILL_UNAVAILABLE: &str = "Documentation service is unavailable. Try again later.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings()?;
    if settings.auth_secret.is_empty() {
        warn!("auth_secret is empty; every /templates request will be rejected");
    }

    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let docs = DocsClient::new(
        Url::parse(&settings.docs_url)?,
        Duration::from_secs(settings.docs_timeout_seconds),
    )?;

    let state = AppState {
        api: ApiContext::new(storage),
        auth_secret: settings.auth_secret,
        docs,
    };
    let app = build_router(Arc::new(state))
        .layer(RequestBodyLimitLayer::new(settings.max_body_bytes));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let templates = Router::new()
        .route("/templates", get(http_list_templates).post(http_create_template))
        .route(
            "/templates/:id",
            get(http_get_template)
                .put(http_update_template)
                .delete(http_delete_template),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/skill", get(skill))
        .merge(templates)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, StatusCode> {
    state.api.store.health_check().await.map_err(|error| {
        error!(%error, "health check failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok("ok")
}

async fn skill(State(state): State<Arc<AppState>>) -> Response {
    match state.docs.fetch_skill().await {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => {
            warn!(error = %err, url = %state.docs.skill_url(), "skill passthrough failed");
            (
                StatusCode::BAD_GATEWAY,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                SKILL_UNAVAILABLE,
            )
                .into_response()
        }
    }
}

async fn http_list_templates(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListTemplatesQuery>, QueryRejection>,
) -> HandlerResult<TemplateListResponse> {
    let Query(query) = query.map_err(|rejection| Failure::validation(rejection.body_text()))?;
    let page = list_templates(&state.api, query).await?;
    Ok(Envelope::ok(page))
}

async fn http_get_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult<ArticleTemplate> {
    let template = get_template(&state.api, &TemplateId::from(id)).await?;
    Ok(Envelope::ok(template))
}

async fn http_create_template(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateTemplateRequest>, JsonRejection>,
) -> HandlerResult<ArticleTemplate> {
    let Json(req) = body.map_err(|rejection| Failure::validation(rejection.body_text()))?;
    let template = create_template(&state.api, req).await?;
    Ok(Envelope::created(template))
}

async fn http_update_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<UpdateTemplateRequest>, JsonRejection>,
) -> HandlerResult<ArticleTemplate> {
    let Json(req) = body.map_err(|rejection| Failure::validation(rejection.body_text()))?;
    let template = update_template(&state.api, &TemplateId::from(id), req).await?;
    Ok(Envelope::ok(template))
}

async fn http_delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> HandlerResult<DeleteTemplateResponse> {
    let deleted = delete_template(&state.api, &TemplateId::from(id)).await?;
    Ok(Envelope::ok(deleted))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
