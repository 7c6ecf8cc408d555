use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info};

use crate::client::{ApiError, DashboardApi};
use crate::config::DashboardConfig;
use crate::models::{PendingFile, TransactionRecord};

const PDF_MIME: &str = "application/pdf";

/// `DashboardApi` over HTTP: multipart uploads to the conversion URL and `GET <api>/data`.
pub struct HttpDashboardApi {
    client: Client,
    convert_url: String,
    data_url: String
}

impl HttpDashboardApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            convert_url: config.convert_url.clone(),
            data_url: format!("{}/data", config.api_url)
        })
    }

    async fn ensure_success(response: Response) -> Result<Response, ApiError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        Err(ApiError::Status {
            status: status.as_u16(),
            message: error_message(&body)
        })
    }
}

/// The backend reports failures as `{"error": "..."}`; anything else is passed on verbatim.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body).ok()
        .and_then(|value| value.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

impl DashboardApi for HttpDashboardApi {
    async fn convert(&self, file: &PendingFile) -> Result<Value, ApiError> {
        let content = tokio::fs::read(&file.path).await
            .map_err(|source| ApiError::Io { path: file.path.clone(), source })?;

        debug!("Uploading [{}] ({} bytes) for bank [{}]", file.file_name(), content.len(), file.bank);

        let part = Part::bytes(content)
            .file_name(file.file_name())
            .mime_str(PDF_MIME)?;

        let form = Form::new()
            .part("file", part)
            .text("bank", file.bank.to_string());

        let response = self.client
            .post(&self.convert_url)
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;

        // An empty or non-JSON acknowledgment still counts as success.
        let acknowledgment = serde_json::from_slice(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));

        info!("Converted [{}] for bank [{}]", file.file_name(), file.bank);

        Ok(acknowledgment)
    }

    async fn fetch_dashboard(&self) -> Result<Vec<TransactionRecord>, ApiError> {
        let response = self.client
            .get(&self.data_url)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body)
            .map_err(|error| ApiError::MalformedPayload(error.to_string()))
    }
}
