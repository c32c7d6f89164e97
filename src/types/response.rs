// src/types/response.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::candidate::CandidateMatch;

/// Answer used when the model endpoint replies without an `answer` field
pub const ASK_FALLBACK_ANSWER: &str = "No se recibió respuesta del modelo.";

// ===== Service Response Types =====

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RawSearchResponse")]
pub struct SearchResponse {
    pub matches: Vec<CandidateMatch>,
}

#[derive(Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    matches: Option<MatchesPayload>,
}

/// The service answers either with ranked rows or with the raw columnar
/// payload of its vector store (one inner list per query text).
#[derive(Deserialize)]
#[serde(untagged)]
enum MatchesPayload {
    Rows(Vec<CandidateMatch>),
    Columns(VectorColumns),
}

#[derive(Deserialize)]
struct VectorColumns {
    #[serde(default)]
    ids: Vec<Vec<Value>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<Map<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f64>>>,
}

impl From<RawSearchResponse> for SearchResponse {
    fn from(raw: RawSearchResponse) -> Self {
        let matches = match raw.matches {
            None => Vec::new(),
            Some(MatchesPayload::Rows(rows)) => rows,
            Some(MatchesPayload::Columns(columns)) => columns.into_rows(),
        };
        Self { matches }
    }
}

impl VectorColumns {
    fn into_rows(self) -> Vec<CandidateMatch> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let documents = self
            .documents
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();
        let metadatas = self
            .metadatas
            .and_then(|m| m.into_iter().next())
            .unwrap_or_default();
        let distances = self
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        ids.into_iter()
            .enumerate()
            .map(|(i, id)| {
                let mut row = metadatas.get(i).cloned().flatten().unwrap_or_default();
                row.insert("id".to_string(), id);
                if let Some(Some(doc)) = documents.get(i) {
                    let preview: String = doc.chars().take(200).collect();
                    row.insert("preview".to_string(), Value::String(preview));
                }
                if let Some(distance) = distances.get(i) {
                    row.insert("similarity".to_string(), Value::from(1.0 - distance));
                }
                CandidateMatch::from(row)
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

#[derive(Deserialize)]
pub(crate) struct RawAskResponse {
    #[serde(default)]
    pub answer: Option<String>,
}

impl From<RawAskResponse> for AskResponse {
    fn from(raw: RawAskResponse) -> Self {
        Self {
            answer: raw
                .answer
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| ASK_FALLBACK_ANSWER.to_string()),
        }
    }
}

/// Upload acknowledgement. The body shape is up to the service, so it is kept raw.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadAck {
    pub status: Option<String>,
    pub id: Option<String>,
    pub raw: Value,
}

impl From<Value> for UploadAck {
    fn from(raw: Value) -> Self {
        let text = |key: &str| match raw.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        Self {
            status: text("status"),
            id: text("id").or_else(|| text("cv_id")),
            raw: raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_shaped_search_response() {
        let json = r#"{"matches": [{"candidate_id": "1", "score": 90}, {"id": 2}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.matches.len(), 2);
        assert_eq!(response.matches[1].candidate_id.as_deref(), Some("2"));
    }

    #[test]
    fn test_columnar_search_response() {
        let json = r#"{"matches": {
            "ids": [["11", "12"]],
            "documents": [["Ingeniera con 5 años en Python", null]],
            "metadatas": [[{"role": "Desarrollador", "experience": "Senior"}, null]],
            "distances": [[0.25, 0.5]]
        }}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.matches.len(), 2);
        let first = &response.matches[0];
        assert_eq!(first.candidate_id.as_deref(), Some("11"));
        assert_eq!(first.role.as_deref(), Some("Desarrollador"));
        assert_eq!(first.seniority.as_deref(), Some("Senior"));
        assert_eq!(first.years_experience, None);
        assert_eq!(first.similarity, Some(0.75));
        assert!(first.preview.as_deref().unwrap().starts_with("Ingeniera"));
        assert_eq!(response.matches[1].preview, None);
    }

    #[test]
    fn test_missing_matches_is_empty() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(response.matches.is_empty());
    }

    #[test]
    fn test_ask_without_answer_uses_fallback() {
        let raw: RawAskResponse = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert_eq!(AskResponse::from(raw).answer, ASK_FALLBACK_ANSWER);
    }

    #[test]
    fn test_upload_ack_reads_numeric_id() {
        let ack = UploadAck::from(serde_json::json!({"status": "ok", "id": 8}));
        assert_eq!(ack.status.as_deref(), Some("ok"));
        assert_eq!(ack.id.as_deref(), Some("8"));
    }
}
