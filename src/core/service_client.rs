// src/core/service_client.rs
//! HTTP client for the Candidate Service - search, ask, candidate detail and upload

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::{ClientConfig, DetailPath};
use crate::core::query_builder::{AskContext, SearchParams};
use crate::error::{DetailAttempt, ServiceError};
use crate::types::candidate::CandidateRecord;
use crate::types::response::{AskResponse, RawAskResponse, SearchResponse, UploadAck};
use crate::utils::content_type_for;

const SEARCH_ENDPOINT: &str = "/search";
const ASK_ENDPOINT: &str = "/ask";
const UPLOAD_ENDPOINT: &str = "/documents/upload";

pub struct CandidateServiceClient {
    client: reqwest::Client,
    base_url: String,
    detail_path: DetailPath,
}

impl CandidateServiceClient {
    /// Create new service client with configuration
    pub fn new(config: &ClientConfig) -> Result<Self, ServiceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.service_url.trim_end_matches('/').to_string(),
            detail_path: config.detail_path,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 1. Search - ranked matches for a query
    pub async fn search(
        &self,
        query: &str,
        params: &SearchParams,
    ) -> Result<SearchResponse, ServiceError> {
        let url = format!("{}{}", self.base_url, SEARCH_ENDPOINT);
        let mut pairs = vec![("query", query.to_string())];
        pairs.extend(params.to_query_pairs());

        info!("Searching candidates: {} ({} params)", url, pairs.len());

        let response: SearchResponse = self
            .get_json(&url, &pairs, |status, body| ServiceError::Search { status, body })
            .await?;

        info!("Search returned {} match(es)", response.matches.len());
        Ok(response)
    }

    /// 2. Ask - free-text recommendation from the model endpoint
    pub async fn ask(&self, prompt: &str, context: &AskContext) -> Result<AskResponse, ServiceError> {
        let url = format!("{}{}", self.base_url, ASK_ENDPOINT);
        let mut pairs = vec![("query", prompt.to_string())];
        pairs.extend(context.to_query_pairs());

        info!("Asking model endpoint: {}", url);
        debug!("Prompt: {}", prompt);

        let raw: RawAskResponse = self
            .get_json(&url, &pairs, |status, body| ServiceError::Http { status, body })
            .await?;

        if raw.answer.is_none() {
            warn!("Model response had no answer field, using fallback");
        }
        Ok(AskResponse::from(raw))
    }

    /// 3. Candidate detail by canonical identifier
    pub async fn fetch_detail(&self, candidate_id: &str) -> Result<CandidateRecord, ServiceError> {
        let url = format!("{}{}", self.base_url, self.detail_path.endpoint(candidate_id));

        info!("Fetching candidate detail: {}", url);

        let record: CandidateRecord = self
            .get_json(&url, &[], |status, body| ServiceError::Detail { status, body })
            .await?;

        // The service answers 200 with an error body when the CV does not exist
        if let Some(message) = &record.error {
            warn!("Candidate {} reported by service as missing: {}", candidate_id, message);
            return Err(ServiceError::Detail {
                status: StatusCode::NOT_FOUND.as_u16(),
                body: message.clone(),
            });
        }

        Ok(record)
    }

    /// Try each identifier in order, stopping at the first that resolves
    pub async fn fetch_detail_any(
        &self,
        candidate_ids: &[String],
    ) -> Result<CandidateRecord, ServiceError> {
        if candidate_ids.is_empty() {
            return Err(ServiceError::Validation(
                "No hay identificador de candidato para consultar".to_string(),
            ));
        }

        let mut attempts = Vec::with_capacity(candidate_ids.len());

        for candidate_id in candidate_ids {
            match self.fetch_detail(candidate_id).await {
                Ok(record) => return Ok(record),
                // No other identifier can succeed against an unreachable service
                Err(e @ ServiceError::Network { .. }) => {
                    error!("Candidate detail aborted, service unreachable: {}", e);
                    return Err(e);
                }
                Err(e) => {
                    debug!("Detail attempt with id {} failed: {}", candidate_id, e);
                    attempts.push(DetailAttempt {
                        candidate_id: candidate_id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        error!(
            "Candidate detail not found after {} attempt(s)",
            attempts.len()
        );
        Err(ServiceError::NotFoundDetail { attempts })
    }

    /// 4. Document upload - one multipart request per file
    pub async fn upload_document(&self, file_path: &Path) -> Result<UploadAck, ServiceError> {
        let url = format!("{}{}", self.base_url, UPLOAD_ENDPOINT);
        let file_name = file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();

        let file_content = tokio::fs::read(file_path).await.map_err(|e| {
            ServiceError::Validation(format!(
                "No se pudo leer el archivo {}: {}",
                file_path.display(),
                e
            ))
        })?;

        let part = Part::bytes(file_content)
            .file_name(file_name.clone())
            .mime_str(content_type_for(&file_name))
            .map_err(|e| ServiceError::Validation(format!("Invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        info!("Uploading {} to {}", file_name, url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::network(&url, &e))?;

        let value: serde_json::Value = Self::read_json(&url, response, |status, body| {
            ServiceError::Http { status, body }
        })
        .await
        .or_else(|e| match e {
            // Acks are implementation-defined; a non-JSON 2xx body is still a success
            ServiceError::Decode(_) => Ok(serde_json::Value::Null),
            other => Err(other),
        })?;

        info!("Uploaded {}", file_name);
        Ok(UploadAck::from(value))
    }

    /// Generic GET request with query parameters
    async fn get_json<R, F>(
        &self,
        url: &str,
        query: &[(&str, String)],
        on_error_status: F,
    ) -> Result<R, ServiceError>
    where
        R: DeserializeOwned,
        F: FnOnce(u16, String) -> ServiceError,
    {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                error!("Request to {} failed: {}", url, e);
                ServiceError::network(url, &e)
            })?;

        Self::read_json(url, response, on_error_status).await
    }

    async fn read_json<R, F>(
        url: &str,
        response: reqwest::Response,
        on_error_status: F,
    ) -> Result<R, ServiceError>
    where
        R: DeserializeOwned,
        F: FnOnce(u16, String) -> ServiceError,
    {
        let status = response.status();
        debug!("Response status from {}: {}", url, status);

        let response_text = response
            .text()
            .await
            .map_err(|e| ServiceError::network(url, &e))?;

        if !status.is_success() {
            error!("Service error response {} from {}: {}", status, url, response_text);
            return Err(on_error_status(status.as_u16(), response_text));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse response from {}: {}", url, e);
            ServiceError::Decode(format!("{}. Raw response: {}", e, response_text))
        })
    }
}
