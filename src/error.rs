// src/error.rs
//! Error taxonomy for calls to the Candidate Service

use thiserror::Error;

/// One failed attempt while resolving a candidate detail by several identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct DetailAttempt {
    pub candidate_id: String,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Network error calling {url}: {message}")]
    Network { url: String, message: String },

    #[error("HTTP {status} error: {body}")]
    Http { status: u16, body: String },

    #[error("Search failed with status {status}: {body}")]
    Search { status: u16, body: String },

    #[error("Candidate detail failed with status {status}: {body}")]
    Detail { status: u16, body: String },

    #[error("No candidate detail found after trying {} identifier(s)", attempts.len())]
    NotFoundDetail { attempts: Vec<DetailAttempt> },

    #[error("{0}")]
    Validation(String),

    #[error("Failed to decode service response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ServiceError {
    pub(crate) fn network(url: &str, err: &reqwest::Error) -> Self {
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::Search { status, .. } | Self::Detail { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Message shown to the user in place of the failed view content
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "No se pudo conectar con el servicio de candidatos.".to_string()
            }
            Self::Http { status, body } => {
                format!("Error {}: {}", status, server_detail(body))
            }
            Self::Search { status, .. } => {
                format!("Error {}: no se pudo completar la búsqueda", status)
            }
            Self::Detail { status, .. } => {
                format!("Error {}: No se pudieron obtener los detalles", status)
            }
            Self::NotFoundDetail { attempts } => {
                let ids: Vec<&str> = attempts.iter().map(|a| a.candidate_id.as_str()).collect();
                format!(
                    "No se encontraron detalles del candidato (ids probados: {})",
                    ids.join(", ")
                )
            }
            Self::Validation(message) => message.clone(),
            Self::Decode(_) => "Respuesta inesperada del servicio.".to_string(),
            Self::Config(message) => format!("Configuración inválida: {}", message),
        }
    }
}

/// Extract the `detail` field FastAPI puts in error bodies, falling back to the raw body
pub fn server_detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| match value.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) if !other.is_null() => Some(other.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown error".to_string()
            } else {
                trimmed.to_string()
            }
        })
}
