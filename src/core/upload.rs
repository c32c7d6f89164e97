// src/core/upload.rs
//! Sequential document upload with per-file outcomes

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::core::service_client::CandidateServiceClient;
use crate::error::{server_detail, ServiceError};
use crate::types::UploadAck;
use crate::utils::{get_file_extension, has_allowed_extension};

/// Extensions offered by the file picker. Advisory only: uploads are not blocked by it.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "xlsx", "xls", "csv", "txt"];

pub const NO_FILES_MESSAGE: &str = "Por favor selecciona al menos un archivo";
pub const BATCH_DONE_MESSAGE: &str = "Todos los archivos han sido procesados";

/// Human label for a file's type, by extension
pub fn file_type_label(file_name: &str) -> &'static str {
    match get_file_extension(file_name).as_deref() {
        Some("pdf") => "PDF",
        Some("docx") => "Word",
        Some("xlsx") | Some("xls") => "Excel",
        Some("csv") => "CSV",
        Some("txt") => "Texto",
        _ => "Desconocido",
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingFile {
    pub path: PathBuf,
    pub name: String,
    pub size: Option<u64>,
}

impl PendingFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self { path, name, size }
    }

    pub fn type_label(&self) -> &'static str {
        file_type_label(&self.name)
    }

    pub fn is_accepted(&self) -> bool {
        has_allowed_extension(&self.name, ACCEPTED_EXTENSIONS)
    }
}

#[derive(Debug, Clone, Serialize)]
pub enum FileOutcome {
    Uploaded(UploadAck),
    Failed(String),
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Uploaded(_))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PendingFile,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadReport {
    pub results: Vec<FileResult>,
    pub summary: String,
}

impl UploadReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Receives per-file progress. There is no byte-level progress: a file is
/// either in flight or finished.
pub trait UploadObserver {
    fn started(&mut self, index: usize, total: usize, file: &PendingFile);
    fn finished(&mut self, index: usize, file: &PendingFile, outcome: &FileOutcome);
}

/// Observer that ignores every event
pub struct NoopObserver;

impl UploadObserver for NoopObserver {
    fn started(&mut self, _: usize, _: usize, _: &PendingFile) {}
    fn finished(&mut self, _: usize, _: &PendingFile, _: &FileOutcome) {}
}

#[derive(Debug, Default)]
pub struct UploadFlow {
    pending: Vec<PendingFile>,
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending set
    pub fn select_files<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.pending = paths
            .into_iter()
            .map(|p| PendingFile::new(p.as_ref().to_path_buf()))
            .collect();

        for file in self.pending.iter().filter(|f| !f.is_accepted()) {
            warn!("{} is outside the accepted types, uploading anyway", file.name);
        }
    }

    pub fn remove_file(&mut self, index: usize) -> Option<PendingFile> {
        (index < self.pending.len()).then(|| self.pending.remove(index))
    }

    pub fn pending(&self) -> &[PendingFile] {
        &self.pending
    }

    /// Upload every pending file, one request at a time. A failed file is
    /// recorded and the batch moves on.
    pub async fn upload_all<O>(
        &mut self,
        client: &CandidateServiceClient,
        observer: &mut O,
    ) -> Result<UploadReport, ServiceError>
    where
        O: UploadObserver + ?Sized,
    {
        if self.pending.is_empty() {
            return Err(ServiceError::Validation(NO_FILES_MESSAGE.to_string()));
        }

        let files = std::mem::take(&mut self.pending);
        let total = files.len();
        let mut results = Vec::with_capacity(total);

        info!("Uploading {} file(s) sequentially", total);

        for (index, file) in files.into_iter().enumerate() {
            observer.started(index, total, &file);

            let outcome = match client.upload_document(&file.path).await {
                Ok(ack) => FileOutcome::Uploaded(ack),
                Err(e) => {
                    error!("Upload of {} failed: {}", file.name, e);
                    FileOutcome::Failed(format!(
                        "Error al subir {}: {}",
                        file.name,
                        upload_error_detail(&e)
                    ))
                }
            };

            observer.finished(index, &file, &outcome);
            results.push(FileResult { file, outcome });
        }

        let report = UploadReport {
            results,
            summary: BATCH_DONE_MESSAGE.to_string(),
        };
        info!(
            "Upload batch done: {} ok, {} failed",
            report.succeeded(),
            report.failed()
        );
        Ok(report)
    }
}

fn upload_error_detail(err: &ServiceError) -> String {
    match err {
        ServiceError::Http { body, .. } => server_detail(body),
        other => other.to_string(),
    }
}
