use server_api::ApiContext;

use crate::docs::DocsClient;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) auth_secret: String,
    pub(crate) docs: DocsClient,
}
