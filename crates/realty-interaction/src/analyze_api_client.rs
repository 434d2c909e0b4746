//! HttpAnalysisClient - REST client for the locality analysis service.
//!
//! Sends `POST {endpoint}/analyze/` with `{"query": "..."}` and hands the raw
//! body back to the session controller, which owns normalization.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use realty_core::config::RealtyConfig;
use realty_core::session::Query;
use realty_core::{RealtyError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest error body echoed back to the user.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// The remote analysis service as seen by the session controller.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Runs one analysis and returns the raw response body.
    ///
    /// # Errors
    ///
    /// Returns `Transport` when the service cannot be reached or answers with
    /// a non-success status.
    async fn analyze(&self, query: &Query) -> Result<String>;
}

/// Client that talks to the analysis service over HTTP.
#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    analyze_url: String,
    upload_url: String,
}

impl HttpAnalysisClient {
    /// Creates a client for the endpoint in `config`.
    ///
    /// The HTTP client gets its own timeout as a backstop; the controller
    /// enforces the same limit around the whole request.
    pub fn new(config: &RealtyConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(Duration::from_secs(5).min(config.request_timeout()))
            .build()
            .map_err(|err| RealtyError::config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            analyze_url: config.analyze_url(),
            upload_url: config.upload_url(),
        })
    }

    pub fn analyze_url(&self) -> &str {
        &self.analyze_url
    }

    /// Uploads an Excel dataset for the service to analyze from now on.
    ///
    /// Returns the confirmation message sent back by the service.
    pub async fn upload_dataset(&self, path: &Path) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset.xlsx".to_string());

        debug!(file = %path.display(), size = bytes.len(), "uploading dataset");

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        Ok(serde_json::from_str::<UploadResponse>(&body)
            .ok()
            .and_then(|parsed| parsed.message)
            .unwrap_or_else(|| "Dataset uploaded".to_string()))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, query: &Query) -> Result<String> {
        let request = AnalyzeRequest {
            query: query.as_str(),
        };

        let response = self
            .client
            .post(&self.analyze_url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(%status, bytes = body.len(), "analysis response received");

        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }

        Ok(body)
    }
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct UploadResponse {
    message: Option<String>,
}

/// Error body returned by the service on failure.
#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    detail: Option<String>,
}

fn transport_error(err: reqwest::Error) -> RealtyError {
    let message = if err.is_timeout() {
        format!("Analysis service timed out: {err}")
    } else if err.is_connect() {
        format!("Analysis service unreachable: {err}")
    } else {
        format!("Analysis request failed: {err}")
    };
    match err.status() {
        Some(status) => RealtyError::http_status(status.as_u16(), message),
        None => RealtyError::transport(message),
    }
}

fn map_http_error(status: StatusCode, body: &str) -> RealtyError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error,
            detail: Some(detail),
        }) => format!("{error}: {detail}"),
        Ok(ErrorResponse { error, detail: None }) => error,
        Err(_) if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        Err(_) => body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
    };

    RealtyError::http_status(status.as_u16(), format!("HTTP {}: {message}", status.as_u16()))
}
