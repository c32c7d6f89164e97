// src/ui/placeholder.rs
//! What to show when a candidate field is missing. Every rendered optional
//! field is listed here so no view invents its own fallback.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    // search cards
    MatchName,
    MatchFilename,
    MatchRole,
    MatchYears,
    MatchIndustry,
    MatchScore,
    MatchSeniority,
    MatchPreview,
    MatchSimilarity,
    MatchStrength,
    // detail header
    HeaderName,
    HeaderRole,
    HeaderIndustry,
    // detail panels
    Industry,
    Role,
    Position,
    Email,
    Phone,
    Location,
    CvId,
    CvFilename,
}

pub const NOT_AVAILABLE: &str = "N/A";

pub fn fallback(field: Field) -> &'static str {
    match field {
        Field::MatchName
        | Field::MatchFilename
        | Field::MatchRole
        | Field::MatchYears
        | Field::MatchIndustry
        | Field::MatchScore
        | Field::MatchSeniority
        | Field::MatchPreview
        | Field::MatchSimilarity
        | Field::MatchStrength => NOT_AVAILABLE,
        Field::HeaderName => "Candidato",
        Field::HeaderRole => "Profesional",
        Field::HeaderIndustry => "Sin especificar",
        Field::Industry => "No especificada",
        Field::Role | Field::Position => "No especificado",
        Field::Email | Field::Phone | Field::Location | Field::CvId | Field::CvFilename => {
            "No disponible"
        }
    }
}

/// The value, or the field's fallback when missing or blank
pub fn show(field: Field, value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback(field).to_string(),
    }
}

/// Percentage display for a 0-100 score, or the fallback
pub fn show_percent(field: Field, value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}%", v.round() as i64),
        _ => fallback(field).to_string(),
    }
}
