//! HTTP client for the dataset query service.

use std::path::Path;

use reqwest::{multipart, Client as HttpClient, Response, StatusCode};
use tracing::{debug, error};

use crate::api::types::{
    DatasetList, DatasetPreview, ErrorDetail, QueryRequest, QueryResponse, UploadResponse,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },
    #[error("unable to read upload file: {0}")]
    Io(#[from] std::io::Error),
}

/// Thin typed wrapper around the four backend endpoints. Cloned into spawned
/// tasks; `reqwest::Client` is internally reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
}

impl ApiClient {
    pub fn new<S: Into<String>>(base_url: S) -> Result<Self, ApiError> {
        let http = HttpClient::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /datasets`
    pub async fn list_datasets(&self) -> Result<Vec<String>, ApiError> {
        let resp = self
            .http
            .get(format!("{}/datasets", self.base_url))
            .send()
            .await?;
        let list: DatasetList = check(resp).await?.json().await?;
        debug!("fetched {} datasets", list.datasets.len());
        Ok(list.datasets)
    }

    /// `GET /preview/{dataset}` — returns the column summary text.
    pub async fn preview(&self, dataset: &str) -> Result<String, ApiError> {
        let resp = self
            .http
            .get(format!("{}/preview/{}", self.base_url, dataset))
            .send()
            .await?;
        let preview: DatasetPreview = check(resp).await?.json().await?;
        Ok(preview.columns_summary)
    }

    /// `POST /query`
    pub async fn query(&self, dataset: &str, user_query: &str) -> Result<QueryResponse, ApiError> {
        let body = QueryRequest {
            dataset_name: dataset,
            user_query,
        };
        let resp = self
            .http
            .post(format!("{}/query", self.base_url))
            .json(&body)
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// `POST /upload-dataset` — multipart field `file`. Returns the backend's
    /// success message, if it sent one.
    pub async fn upload_dataset(&self, path: &Path) -> Result<Option<String>, ApiError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset.csv".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .map_err(ApiError::Transport)?;
        let form = multipart::Form::new().part("file", part);
        let resp = self
            .http
            .post(format!("{}/upload-dataset", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let upload: UploadResponse = check(resp).await?.json().await?;
        Ok(upload.message)
    }
}

/// Map non-2xx responses to `ApiError::Status`, logging the FastAPI-style
/// `detail` body when present.
async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let detail = resp
        .json::<ErrorDetail>()
        .await
        .ok()
        .and_then(|d| d.detail);
    if let Some(d) = &detail {
        error!("server returned {status}: {d}");
    } else {
        error!("server returned {status}");
    }
    Err(ApiError::Status { status, detail })
}
