// src/ui/results.rs
//! Candidate cards for a list of search matches

use serde::Serialize;
use std::fmt::Write as _;
use thiserror::Error;
use tracing::warn;

use crate::types::{CandidateMatch, MatchStrength};
use crate::ui::placeholder::{show, show_percent, Field};

pub const EMPTY_RESULTS_MESSAGE: &str = "No se encontraron candidatos para esta búsqueda.";

pub const NEUTRAL_COLOR: &str = "#6B7280";

pub fn strength_color(strength: Option<MatchStrength>) -> &'static str {
    match strength {
        Some(MatchStrength::Excelente) => "#10B981",
        Some(MatchStrength::Bueno) => "#3B82F6",
        Some(MatchStrength::Regular) => "#F59E0B",
        Some(MatchStrength::Bajo) => "#EF4444",
        None => NEUTRAL_COLOR,
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("No se puede abrir este candidato: no tiene un identificador válido.")]
    MissingIdentifier,
    #[error("No existe el resultado número {0}.")]
    OutOfRange(usize),
    #[error("Vuelve a la búsqueda para abrir otro candidato.")]
    NotSearching,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateCard {
    pub position: usize,
    pub candidate_id: Option<String>,
    pub name: String,
    pub filename: String,
    pub role: String,
    pub years_experience: String,
    pub industry: String,
    pub score: String,
    pub seniority: String,
    pub preview: String,
    pub strength: String,
    pub strength_color: &'static str,
    pub similarity: String,
}

impl CandidateCard {
    pub fn from_match(position: usize, m: &CandidateMatch) -> Self {
        Self {
            position,
            candidate_id: m.candidate_id.clone(),
            name: show(Field::MatchName, m.name.as_deref()),
            filename: show(Field::MatchFilename, m.filename.as_deref()),
            role: show(Field::MatchRole, m.role.as_deref()),
            years_experience: show(Field::MatchYears, m.years_experience.as_deref()),
            industry: show(Field::MatchIndustry, m.industry.as_deref()),
            score: show_percent(Field::MatchScore, m.score),
            seniority: show(Field::MatchSeniority, m.seniority.as_deref()),
            preview: show(Field::MatchPreview, m.preview.as_deref()),
            strength: m
                .match_strength
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| show(Field::MatchStrength, None)),
            strength_color: strength_color(m.match_strength),
            similarity: show_percent(Field::MatchSimilarity, m.similarity.map(|s| s * 100.0)),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "#{} {} [{} {}]",
            self.position, self.name, self.strength, self.strength_color
        );
        let _ = writeln!(out, "   Archivo: {}", self.filename);
        let _ = writeln!(
            out,
            "   Rol: {} | Experiencia: {} | Industria: {}",
            self.role, self.years_experience, self.industry
        );
        let _ = writeln!(
            out,
            "   Puntuación: {} | Seniority: {} | Similitud: {}",
            self.score, self.seniority, self.similarity
        );
        let _ = write!(out, "   {}", self.preview);
        out
    }
}

/// Matches in the order the service ranked them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultList {
    matches: Vec<CandidateMatch>,
}

impl ResultList {
    pub fn new(matches: Vec<CandidateMatch>) -> Self {
        Self { matches }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[CandidateMatch] {
        &self.matches
    }

    /// Cards are numbered from 1
    pub fn cards(&self) -> Vec<CandidateCard> {
        self.matches
            .iter()
            .enumerate()
            .map(|(i, m)| CandidateCard::from_match(i + 1, m))
            .collect()
    }

    pub fn render(&self) -> String {
        if self.is_empty() {
            return EMPTY_RESULTS_MESSAGE.to_string();
        }
        self.cards()
            .iter()
            .map(CandidateCard::render)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Hand the card's identifier to `on_select`. `position` is 1-based, as displayed.
    pub fn select<F, R>(&self, position: usize, on_select: F) -> Result<R, SelectionError>
    where
        F: FnOnce(&str) -> R,
    {
        let candidate = position
            .checked_sub(1)
            .and_then(|i| self.matches.get(i))
            .ok_or(SelectionError::OutOfRange(position))?;

        match candidate.candidate_id.as_deref() {
            Some(id) => Ok(on_select(id)),
            None => {
                warn!("Selected match #{} has no identifier", position);
                Err(SelectionError::MissingIdentifier)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches_from(json: &str) -> Vec<CandidateMatch> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_results_render_message() {
        let list = ResultList::new(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render(), EMPTY_RESULTS_MESSAGE);
    }

    #[test]
    fn test_missing_fields_show_na() {
        let list = ResultList::new(matches_from(r#"[{"id": "1"}]"#));
        let card = &list.cards()[0];
        assert_eq!(card.name, "N/A");
        assert_eq!(card.score, "N/A");
        assert_eq!(card.strength_color, NEUTRAL_COLOR);
        assert!(list.render().contains("Rol: N/A"));
    }

    #[test]
    fn test_order_is_preserved() {
        let list = ResultList::new(matches_from(
            r#"[{"id": "low", "score": 10}, {"id": "high", "score": 99}]"#,
        ));
        let cards = list.cards();
        assert_eq!(cards[0].candidate_id.as_deref(), Some("low"));
        assert_eq!(cards[1].position, 2);
    }

    #[test]
    fn test_strength_colors() {
        assert_eq!(strength_color(Some(MatchStrength::Excelente)), "#10B981");
        assert_eq!(strength_color(Some(MatchStrength::Bajo)), "#EF4444");
        assert_eq!(strength_color(None), NEUTRAL_COLOR);
    }

    #[test]
    fn test_select_with_alternate_identifier() {
        let list = ResultList::new(matches_from(r#"[{"cvId": "cv-77", "name": "Rita"}]"#));
        let mut selected = None;
        list.select(1, |id| selected = Some(id.to_string())).unwrap();
        assert_eq!(selected.as_deref(), Some("cv-77"));
    }

    #[test]
    fn test_select_without_identifier_is_rejected() {
        let list = ResultList::new(matches_from(r#"[{"name": "Sin id"}]"#));
        let mut called = false;
        let result = list.select(1, |_| called = true);
        assert_eq!(result, Err(SelectionError::MissingIdentifier));
        assert!(!called);
        assert!(!SelectionError::MissingIdentifier.to_string().is_empty());
        assert_eq!(list.select(0, |_| ()), Err(SelectionError::OutOfRange(0)));
        assert_eq!(list.select(2, |_| ()), Err(SelectionError::OutOfRange(2)));
    }
}
