use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{ArticleTemplate, TemplateId},
    error::{ApiError, ErrorCode},
    protocol::{
        CreateTemplateRequest, DeleteTemplateResponse, ErrorEnvelope, ListTemplatesQuery,
        SuccessEnvelope, TemplateListResponse, UpdateTemplateRequest,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod images;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("server url cannot carry a path")]
    OpaqueUrl,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message} ({status})")]
    Api {
        status: u16,
        code: ErrorCode,
        message: String,
    },
    #[error("unexpected response ({status}): {detail}")]
    UnexpectedResponse { status: u16, detail: String },
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::UnexpectedResponse { status, .. } => {
                Some(*status)
            }
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            ClientError::InvalidUrl(_) | ClientError::OpaqueUrl => None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            ClientError::Api { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(ErrorCode::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code() == Some(ErrorCode::Unauthorized)
    }
}

impl From<ClientError> for ApiError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Api { code, message, .. } => ApiError::new(code, message),
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Typed client for the template HTTP service.
#[derive(Clone)]
pub struct TemplatesClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl TemplatesClient {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_http(Client::new(), server_url)
    }

    pub fn with_http(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let base_url = Url::parse(server_url.trim())?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::OpaqueUrl);
        }
        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.set_token(Some(token.into()));
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn health(&self) -> Result<(), ClientError> {
        let response = self.http.get(self.endpoint(&["healthz"])?).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        Err(ClientError::UnexpectedResponse {
            status: status.as_u16(),
            detail: response.text().await.unwrap_or_default(),
        })
    }

    pub async fn list_templates(
        &self,
        query: &ListTemplatesQuery,
    ) -> Result<TemplateListResponse, ClientError> {
        let response = self
            .authorized(self.http.get(self.endpoint(&["templates"])?))
            .query(query)
            .send()
            .await?;
        decode_envelope(response).await
    }

    pub async fn get_template(&self, id: &TemplateId) -> Result<ArticleTemplate, ClientError> {
        let response = self
            .authorized(self.http.get(self.endpoint(&["templates", id.as_str()])?))
            .send()
            .await?;
        decode_envelope(response).await
    }

    pub async fn create_template(
        &self,
        req: &CreateTemplateRequest,
    ) -> Result<ArticleTemplate, ClientError> {
        let response = self
            .authorized(self.http.post(self.endpoint(&["templates"])?))
            .json(req)
            .send()
            .await?;
        decode_envelope(response).await
    }

    pub async fn update_template(
        &self,
        id: &TemplateId,
        req: &UpdateTemplateRequest,
    ) -> Result<ArticleTemplate, ClientError> {
        let response = self
            .authorized(self.http.put(self.endpoint(&["templates", id.as_str()])?))
            .json(req)
            .send()
            .await?;
        decode_envelope(response).await
    }

    pub async fn delete_template(
        &self,
        id: &TemplateId,
    ) -> Result<DeleteTemplateResponse, ClientError> {
        let response = self
            .authorized(self.http.delete(self.endpoint(&["templates", id.as_str()])?))
            .send()
            .await?;
        decode_envelope(response).await
    }

    /// Raw markdown from the documentation passthrough.
    pub async fn fetch_skill(&self) -> Result<String, ClientError> {
        let response = self.http.get(self.endpoint(&["skill"])?).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            code: ErrorCode::from_http_status(status.as_u16()),
            message: body,
        })
    }

    pub async fn fetch_image(&self, url: &Url) -> Result<Vec<u8>, ClientError> {
        let bytes = self
            .http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        debug!(%url, len = bytes.len(), "fetched image");
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::OpaqueUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        let envelope: SuccessEnvelope<T> =
            serde_json::from_slice(&bytes).map_err(|err| ClientError::UnexpectedResponse {
                status: status.as_u16(),
                detail: err.to_string(),
            })?;
        return Ok(envelope.data);
    }

    match serde_json::from_slice::<ErrorEnvelope>(&bytes) {
        Ok(envelope) => Err(ClientError::Api {
            status: status.as_u16(),
            code: envelope.error.code,
            message: envelope.error.message,
        }),
        Err(_) => Err(ClientError::Api {
            status: status.as_u16(),
            code: ErrorCode::from_http_status(status.as_u16()),
            message: status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
