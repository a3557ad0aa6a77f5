//! Backend worker: a dedicated thread running a tokio runtime that drains the
//! UI command queue and reports results as [`UiEvent`]s.

use std::thread;

use client_core::{images::resolve_image_url, TemplatesClient};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use shared::protocol::ListTemplatesQuery;

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{PreviewImage, UiError, UiErrorContext, UiEvent},
};

const PREVIEW_MAX_EDGE: u32 = 1024;

pub fn launch(cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let mut worker = Worker {
                client: None,
                ui_tx,
            };
            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend command received");
                worker.handle(cmd).await;
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

struct Worker {
    client: Option<TemplatesClient>,
    ui_tx: Sender<UiEvent>,
}

impl Worker {
    async fn handle(&mut self, cmd: BackendCommand) {
        match cmd {
            BackendCommand::SignIn { server_url, token } => {
                let client = match TemplatesClient::new(&server_url) {
                    Ok(client) => client.with_token(token.clone()),
                    Err(err) => {
                        self.emit(UiEvent::Error(UiError::from_client_error(
                            UiErrorContext::SignIn,
                            &err,
                        )));
                        return;
                    }
                };
                // The list endpoint is the cheapest authenticated call.
                let probe = ListTemplatesQuery {
                    limit: Some(1),
                    ..ListTemplatesQuery::default()
                };
                match client.list_templates(&probe).await {
                    Ok(_) => {
                        tracing::info!(server = %client.base_url(), "signed in");
                        self.client = Some(client);
                        self.emit(UiEvent::SignedIn { server_url, token });
                    }
                    Err(err) => {
                        tracing::warn!(%server_url, "sign-in probe failed: {err}");
                        self.emit(UiEvent::Error(UiError::from_client_error(
                            UiErrorContext::SignIn,
                            &err,
                        )));
                    }
                }
            }
            BackendCommand::SignOut => {
                self.client = None;
            }
            BackendCommand::ListTemplates { query, append } => {
                let Some(client) = self.signed_in(UiErrorContext::LoadTemplates) else {
                    return;
                };
                let event = match client.list_templates(&query).await {
                    Ok(response) => UiEvent::TemplatesLoaded { response, append },
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::LoadTemplates,
                        &err,
                    )),
                };
                self.emit(event);
            }
            BackendCommand::LoadTemplate { id } => {
                let Some(client) = self.signed_in(UiErrorContext::LoadTemplate) else {
                    return;
                };
                let event = match client.get_template(&id).await {
                    Ok(template) => UiEvent::TemplateLoaded(template),
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::LoadTemplate,
                        &err,
                    )),
                };
                self.emit(event);
            }
            BackendCommand::CreateTemplate { req } => {
                let Some(client) = self.signed_in(UiErrorContext::CreateTemplate) else {
                    return;
                };
                let event = match client.create_template(&req).await {
                    Ok(template) => UiEvent::TemplateCreated(template),
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::CreateTemplate,
                        &err,
                    )),
                };
                self.emit(event);
            }
            BackendCommand::SaveTemplate { id, req } => {
                let Some(client) = self.signed_in(UiErrorContext::SaveTemplate) else {
                    return;
                };
                let event = match client.update_template(&id, &req).await {
                    Ok(template) => UiEvent::TemplateSaved(template),
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::SaveTemplate,
                        &err,
                    )),
                };
                self.emit(event);
            }
            BackendCommand::DeleteTemplate { id } => {
                let Some(client) = self.signed_in(UiErrorContext::DeleteTemplate) else {
                    return;
                };
                let event = match client.delete_template(&id).await {
                    Ok(response) => UiEvent::TemplateDeleted {
                        id,
                        message: response.message,
                    },
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::DeleteTemplate,
                        &err,
                    )),
                };
                self.emit(event);
            }
            BackendCommand::FetchSkill => {
                let Some(client) = self.signed_in(UiErrorContext::LoadDocs) else {
                    return;
                };
                let event = match client.fetch_skill().await {
                    Ok(markdown) => UiEvent::SkillLoaded(markdown),
                    Err(err) => UiEvent::Error(UiError::from_client_error(
                        UiErrorContext::LoadDocs,
                        &err,
                    )),
                };
                self.emit(event);
            }
            BackendCommand::FetchPreviewImage { url } => {
                let Some(client) = self.client.clone() else {
                    self.emit(UiEvent::PreviewFailed {
                        url,
                        reason: "not signed in".to_string(),
                    });
                    return;
                };
                // Image downloads run beside other commands so a slow host does not
                // hold up the queue.
                let ui_tx = self.ui_tx.clone();
                tokio::spawn(async move {
                    let event = match fetch_preview(&client, &url).await {
                        Ok(image) => UiEvent::PreviewLoaded { url, image },
                        Err(reason) => {
                            tracing::debug!(%url, "preview failed: {reason}");
                            UiEvent::PreviewFailed { url, reason }
                        }
                    };
                    forward_event(&ui_tx, event);
                });
            }
        }
    }

    fn signed_in(&self, context: UiErrorContext) -> Option<TemplatesClient> {
        if self.client.is_none() {
            self.emit(UiEvent::Error(UiError::from_message(context, "not signed in")));
        }
        self.client.clone()
    }

    fn emit(&self, event: UiEvent) {
        forward_event(&self.ui_tx, event);
    }
}

/// Hands an event to the UI without blocking. A dropped event is logged; lost
/// previews are fetched again once their request goes stale.
fn forward_event(ui_tx: &Sender<UiEvent>, event: UiEvent) -> bool {
    match ui_tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(event)) => {
            tracing::warn!(event = event.name(), "ui event queue is full; dropping backend event");
            false
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::warn!("ui event queue is closed; dropping backend event");
            false
        }
    }
}

async fn fetch_preview(client: &TemplatesClient, locator: &str) -> Result<PreviewImage, String> {
    let url = resolve_image_url(client.base_url(), locator)
        .ok_or_else(|| format!("unsupported image location '{locator}'"))?;
    let bytes = client
        .fetch_image(&url)
        .await
        .map_err(|err| err.to_string())?;
    tokio::task::spawn_blocking(move || decode_preview_image(&bytes))
        .await
        .map_err(|err| err.to_string())?
}

pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
