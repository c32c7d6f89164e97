// src/types/candidate.rs
//! Candidate data structures returned by the Candidate Service

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// ===== Search Match =====

/// Identifier keys, in resolution order. The service has used all of them.
const ID_KEYS: &[&str] = &["candidate_id", "cv_id", "id", "candidateId", "cvId"];
const METADATA_ID_KEYS: &[&str] = &["cv_id", "id"];

/// One ranked search result. The identifier is resolved once, at parse time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct CandidateMatch {
    pub candidate_id: Option<String>,
    /// Every distinct identifier the row carried, canonical one first
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternate_ids: Vec<String>,
    pub name: Option<String>,
    pub filename: Option<String>,
    pub role: Option<String>,
    pub years_experience: Option<String>,
    pub industry: Option<String>,
    pub score: Option<f64>,
    pub seniority: Option<String>,
    pub preview: Option<String>,
    pub match_strength: Option<MatchStrength>,
    pub similarity: Option<f64>,
}

impl From<Map<String, Value>> for CandidateMatch {
    fn from(map: Map<String, Value>) -> Self {
        let metadata = map.get("metadata").and_then(Value::as_object);

        let mut alternate_ids: Vec<String> = Vec::new();
        let id_sources = ID_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .chain(
                METADATA_ID_KEYS
                    .iter()
                    .filter_map(|k| metadata.and_then(|m| m.get(*k))),
            );
        for id in id_sources.filter_map(value_as_text) {
            if !alternate_ids.contains(&id) {
                alternate_ids.push(id);
            }
        }
        let candidate_id = alternate_ids.first().cloned();

        let lookup = |keys: &[&str]| {
            first_text(&map, keys).or_else(|| metadata.and_then(|m| first_text(m, keys)))
        };

        Self {
            candidate_id,
            alternate_ids,
            name: lookup(&["name", "nombre", "nombre_completo"]),
            filename: lookup(&["filename", "file_name"]),
            role: lookup(&["role", "rol"]),
            years_experience: lookup(&["years_experience", "anhos_experiencia"]),
            industry: lookup(&["industry", "industria"]),
            score: first_number(&map, &["score", "overall_score", "puntuacion"]),
            seniority: lookup(&["seniority", "nivel", "experience"]),
            preview: lookup(&["preview", "preview_snippet", "snippet", "document"]),
            match_strength: first_text(&map, &["match_strength", "matchStrength"])
                .and_then(|s| s.parse().ok()),
            similarity: first_number(&map, &["similarity", "similarity_score"]),
        }
    }
}

impl CandidateMatch {
    /// Years of experience as a number, when the service sent something numeric
    pub fn years_as_number(&self) -> Option<f64> {
        self.years_experience
            .as_deref()
            .and_then(|y| y.trim().parse::<f64>().ok())
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| map.get(*k).and_then(value_as_text))
}

fn first_number(map: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|k| match map.get(*k)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Qualitative relevance bucket computed server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStrength {
    Excelente,
    Bueno,
    Regular,
    Bajo,
}

impl MatchStrength {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Excelente => "Excelente",
            Self::Bueno => "Bueno",
            Self::Regular => "Regular",
            Self::Bajo => "Bajo",
        }
    }
}

impl std::str::FromStr for MatchStrength {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::utils::fold_accents(s).as_str() {
            "excelente" | "excellent" => Ok(Self::Excelente),
            "bueno" | "good" => Ok(Self::Bueno),
            "regular" | "fair" => Ok(Self::Regular),
            "bajo" | "low" => Ok(Self::Bajo),
            other => Err(format!("Unknown match strength: {}", other)),
        }
    }
}

impl fmt::Display for MatchStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== Full Candidate Record =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRecord {
    pub personal_info: PersonalInfo,
    #[serde(alias = "professional_profile")]
    pub professional_info: ProfessionalInfo,
    #[serde(alias = "skills")]
    pub skills_and_languages: SkillsAndLanguages,
    pub cv_info: CvInfo,
    /// Older service revisions put contact data here instead of `personal_info`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classic_data: Option<PersonalInfo>,
    /// Set by the service instead of a 404 when the CV does not exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    #[serde(alias = "nombre", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(alias = "telefono", deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(alias = "ubicacion", deserialize_with = "lenient_text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub github: Option<String>,
    #[serde(alias = "portafolio", deserialize_with = "lenient_text")]
    pub portfolio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalInfo {
    #[serde(alias = "industria", deserialize_with = "lenient_text")]
    pub industry: Option<String>,
    #[serde(alias = "rol", deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(alias = "puesto", deserialize_with = "lenient_text")]
    pub position: Option<String>,
    #[serde(alias = "seniority", deserialize_with = "lenient_text")]
    pub seniority_label: Option<String>,
    #[serde(
        alias = "anhos_experiencia",
        alias = "experiencia",
        deserialize_with = "lenient_number"
    )]
    pub years_experience: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillsAndLanguages {
    #[serde(alias = "habilidades", deserialize_with = "lenient_list")]
    pub skills: Vec<String>,
    #[serde(alias = "idiomas", deserialize_with = "lenient_list")]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvInfo {
    #[serde(deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub filename: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub overall_score: Option<f64>,
    pub processed_status: Option<ProcessedStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessedStatus {
    Completed,
    Other(String),
}

impl From<String> for ProcessedStatus {
    fn from(value: String) -> Self {
        if value.eq_ignore_ascii_case("completed") {
            Self::Completed
        } else {
            Self::Other(value)
        }
    }
}

impl From<ProcessedStatus> for String {
    fn from(value: ProcessedStatus) -> Self {
        match value {
            ProcessedStatus::Completed => "completed".to_string(),
            ProcessedStatus::Other(s) => s,
        }
    }
}

impl CandidateRecord {
    /// Name with the legacy `classic_data` fallback
    pub fn display_name(&self) -> Option<&str> {
        self.personal_info
            .name
            .as_deref()
            .or_else(|| self.classic_data.as_ref()?.name.as_deref())
    }

    pub fn display_email(&self) -> Option<&str> {
        self.personal_info
            .email
            .as_deref()
            .or_else(|| self.classic_data.as_ref()?.email.as_deref())
    }

    pub fn display_phone(&self) -> Option<&str> {
        self.personal_info
            .phone
            .as_deref()
            .or_else(|| self.classic_data.as_ref()?.phone.as_deref())
    }

    pub fn has_online_profiles(&self) -> bool {
        let p = &self.personal_info;
        p.linkedin.is_some() || p.github.is_some() || p.portfolio.is_some()
    }
}

// ===== Lenient field decoding =====

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_text))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(value_as_text).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_id_resolved_from_alternate_key() {
        let m: CandidateMatch =
            serde_json::from_str(r#"{"cv_id": 42, "nombre": "Ana", "score": "81.5"}"#).unwrap();
        assert_eq!(m.candidate_id.as_deref(), Some("42"));
        assert_eq!(m.name.as_deref(), Some("Ana"));
        assert_eq!(m.score, Some(81.5));
    }

    #[test]
    fn test_match_id_skips_empty_values() {
        let m: CandidateMatch =
            serde_json::from_str(r#"{"candidate_id": "", "id": null, "cvId": "x-9"}"#).unwrap();
        assert_eq!(m.candidate_id.as_deref(), Some("x-9"));
    }

    #[test]
    fn test_match_keeps_every_distinct_id() {
        let m: CandidateMatch =
            serde_json::from_str(r#"{"candidate_id": "c1", "cv_id": 7, "id": "c1"}"#).unwrap();
        assert_eq!(m.candidate_id.as_deref(), Some("c1"));
        assert_eq!(m.alternate_ids, vec!["c1", "7"]);
    }

    #[test]
    fn test_match_id_from_metadata() {
        let m: CandidateMatch =
            serde_json::from_str(r#"{"metadata": {"cv_id": "15", "role": "Desarrollador"}}"#)
                .unwrap();
        assert_eq!(m.candidate_id.as_deref(), Some("15"));
        assert_eq!(m.role.as_deref(), Some("Desarrollador"));
    }

    #[test]
    fn test_experience_label_is_seniority() {
        let m: CandidateMatch =
            serde_json::from_str(r#"{"id": "1", "metadata": {"experience": "Junior"}}"#).unwrap();
        assert_eq!(m.seniority.as_deref(), Some("Junior"));
        assert_eq!(m.years_experience, None);
    }

    #[test]
    fn test_unknown_match_strength_is_none() {
        let m: CandidateMatch =
            serde_json::from_str(r#"{"id": "1", "match_strength": "Fantástico"}"#).unwrap();
        assert_eq!(m.match_strength, None);
        let m: CandidateMatch =
            serde_json::from_str(r#"{"id": "1", "match_strength": "excelente"}"#).unwrap();
        assert_eq!(m.match_strength, Some(MatchStrength::Excelente));
    }

    #[test]
    fn test_record_accepts_spanish_field_names() {
        let json = r#"{
            "cv_info": {"id": 3, "filename": "ana.pdf", "overall_score": 77, "processed_status": "completed"},
            "personal_info": {"nombre": "Ana Pérez", "email": "ana@example.com", "telefono": null},
            "professional_info": {"industria": "Tecnología", "rol": "Backend", "anhos_experiencia": 4},
            "skills_and_languages": {"habilidades": ["Rust", "SQL"], "idiomas": ["Español"]}
        }"#;
        let record: CandidateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.cv_info.id.as_deref(), Some("3"));
        assert_eq!(record.cv_info.processed_status, Some(ProcessedStatus::Completed));
        assert_eq!(record.display_name(), Some("Ana Pérez"));
        assert_eq!(record.display_phone(), None);
        assert_eq!(record.professional_info.years_experience, Some(4.0));
        assert_eq!(record.skills_and_languages.skills, vec!["Rust", "SQL"]);
    }

    #[test]
    fn test_record_falls_back_to_classic_data() {
        let json = r#"{"classic_data": {"nombre": "Luis", "telefono": "555-1234"}}"#;
        let record: CandidateRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_name(), Some("Luis"));
        assert_eq!(record.display_phone(), Some("555-1234"));
        assert!(!record.has_online_profiles());
    }

    #[test]
    fn test_empty_record_parses() {
        let record: CandidateRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, CandidateRecord::default());
    }
}
