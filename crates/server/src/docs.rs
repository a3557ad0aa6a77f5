use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub(crate) enum DocsError {
    #[error("documentation service unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("documentation service returned status {0}")]
    Status(u16),
}

/// Fetches the skill document from the internal documentation service.
#[derive(Clone)]
pub(crate) struct DocsClient {
    http: reqwest::Client,
    skill_url: Url,
}

impl DocsClient {
    pub(crate) fn new(skill_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, skill_url })
    }

    pub(crate) fn skill_url(&self) -> &Url {
        &self.skill_url
    }

    pub(crate) async fn fetch_skill(&self) -> Result<String, DocsError> {
        let response = self.http.get(self.skill_url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DocsError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
