use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::models::request::JobKind;
use crate::models::status::{StatusReply, SubmitReply};

/// Endpoint URLs for the two Horde job families.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub text_submit_url: String,
    pub text_status_url: String,
    pub image_submit_url: String,
    pub image_status_url: String,
}

impl Endpoints {
    fn submit_url(&self, kind: JobKind) -> &str {
        match kind {
            JobKind::Text => &self.text_submit_url,
            JobKind::Image => &self.image_submit_url,
        }
    }

    fn status_url(&self, kind: JobKind, id: &str) -> String {
        let base = match kind {
            JobKind::Text => &self.text_status_url,
            JobKind::Image => &self.image_status_url,
        };
        format!("{}/{}", base.trim_end_matches('/'), id)
    }
}

/// Transport seam between the job client and the network.
///
/// Production uses [`HttpTransport`]; tests script server behavior through
/// an in-memory implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn submit(
        &self,
        kind: JobKind,
        body: &serde_json::Value,
    ) -> Result<SubmitReply, TransportError>;

    async fn status(&self, kind: JobKind, id: &str) -> Result<StatusReply, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn submit(
        &self,
        kind: JobKind,
        body: &serde_json::Value,
    ) -> Result<SubmitReply, TransportError> {
        (**self).submit(kind, body).await
    }

    async fn status(&self, kind: JobKind, id: &str) -> Result<StatusReply, TransportError> {
        (**self).status(kind, id).await
    }
}

/// HTTP transport for the AI Horde async generation API.
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    endpoints: Endpoints,
    api_key: String,
}

impl HttpTransport {
    pub fn new(endpoints: Endpoints, api_key: String) -> Self {
        Self {
            http: Client::new(),
            endpoints,
            api_key,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn submit(
        &self,
        kind: JobKind,
        body: &serde_json::Value,
    ) -> Result<SubmitReply, TransportError> {
        let response = self
            .http
            .post(self.endpoints.submit_url(kind))
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await?;

        let code = response.status();
        if !code.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                code: code.as_u16(),
                body,
            });
        }

        Ok(response.json::<SubmitReply>().await?)
    }

    async fn status(&self, kind: JobKind, id: &str) -> Result<StatusReply, TransportError> {
        let response = self
            .http
            .get(self.endpoints.status_url(kind, id))
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let code = response.status();
        if !code.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                code: code.as_u16(),
                body,
            });
        }

        Ok(response.json::<StatusReply>().await?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {code}: {body}")]
    Status { code: u16, body: String },
}
