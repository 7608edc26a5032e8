use std::path::Path;
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use documorph_logging::{morph_debug, morph_trace};
use futures_util::StreamExt;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

use crate::wire::CreateResponse;
use crate::{FailureKind, FetchError, JobRequest, StatusReport};

const REQUESTED_WITH: &str = "X-Requested-With";
const XML_HTTP_REQUEST: &str = "XMLHttpRequest";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Server root, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Longest silence tolerated while sending or receiving a body.
    pub read_timeout: Duration,
    /// Whole-request bound for status queries only. Uploads and downloads
    /// may take longer as long as data keeps flowing.
    pub request_timeout: Duration,
    /// Upper bound for downloaded artifacts.
    pub max_download_bytes: u64,
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            max_download_bytes: 256 * 1024 * 1024,
            user_agent: concat!("documorph/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A fetched result artifact, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    pub bytes: Bytes,
    pub content_disposition: Option<String>,
    pub final_url: String,
}

#[async_trait::async_trait]
pub trait JobClient: Send + Sync {
    /// Posts the form and returns the server-assigned task id.
    async fn create_job(&self, request: &JobRequest) -> Result<String, FetchError>;

    async fn fetch_status(&self, task_id: &str) -> Result<StatusReport, FetchError>;

    async fn download(&self, url: &str) -> Result<DownloadedArtifact, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobClient {
    settings: ClientSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobClient {
    pub fn new(settings: ClientSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    /// Resolves a server-relative path or an absolute URL against the base.
    fn resolve(&self, target: &str) -> Result<Url, FetchError> {
        self.base_url
            .join(target)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }

    fn progress_url(&self, task_id: &str) -> Result<Url, FetchError> {
        let mut url = self.resolve("/progress/")?;
        url.path_segments_mut()
            .map_err(|_| FetchError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .push(task_id);
        Ok(url)
    }
}

fn build_client(settings: &ClientSettings) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .read_timeout(settings.read_timeout)
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

async fn build_form(request: &JobRequest) -> Result<Form, FetchError> {
    let mut form = Form::new();
    for (name, value) in &request.fields {
        form = form.text(name.clone(), value.clone());
    }
    for (field, path) in &request.attachments {
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            FetchError::new(FailureKind::Io, format!("{}: {err}", path.display()))
        })?;
        morph_trace!("attaching {} ({} bytes) as {}", path.display(), bytes.len(), field);
        let part = Part::bytes(bytes).file_name(attachment_name(path));
        form = form.part(field.clone(), part);
    }
    Ok(form)
}

fn attachment_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("application/json")
}

#[async_trait::async_trait]
impl JobClient for ReqwestJobClient {
    async fn create_job(&self, request: &JobRequest) -> Result<String, FetchError> {
        let url = self.resolve(&request.page_path)?;
        let form = build_form(request).await?;

        let response = self
            .client
            .post(url)
            .header(REQUESTED_WITH, XML_HTTP_REQUEST)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.text().await.map_err(map_reqwest_error)?;
        morph_debug!(
            "create_job status={} content_type={:?} body_len={}",
            status,
            content_type,
            body.len()
        );

        if !is_json(&content_type) {
            return Err(FetchError::new(
                FailureKind::NotJson { body },
                "server did not return json",
            ));
        }
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|err| {
            FetchError::new(FailureKind::NotJson { body: body.clone() }, err.to_string())
        })?;

        CreateResponse::deserialize(value)
            .ok()
            .and_then(|created| created.task_id)
            .ok_or_else(|| FetchError::new(FailureKind::MissingTaskId, "no task_id in response"))
    }

    async fn fetch_status(&self, task_id: &str) -> Result<StatusReport, FetchError> {
        let url = self.progress_url(task_id)?;
        let response = self
            .client
            .get(url)
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body).map_err(|err| {
            FetchError::new(FailureKind::Decode, format!("invalid status response: {err}"))
        })
    }

    async fn download(&self, url: &str) -> Result<DownloadedArtifact, FetchError> {
        let url = self.resolve(url)?;
        let max_bytes = self.settings.max_download_bytes;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "artifact too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned);

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = buffer.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "artifact too large",
                ));
            }
            buffer.extend_from_slice(&chunk);
        }

        Ok(DownloadedArtifact {
            bytes: buffer.freeze(),
            content_disposition,
            final_url,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
