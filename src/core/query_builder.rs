// src/core/query_builder.rs
//! Turns the search form state into a model prompt and search query parameters

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::utils::{fold_accents, non_blank};

pub const DEFAULT_RESULT_COUNT: u32 = 10;

const DEFAULT_AREA: &str = "cualquier área";
const DEFAULT_YEARS: &str = "alguna";
const DEFAULT_SKILLS: &str = "habilidades generales";
const DEFAULT_LANGUAGES: &str = "no especificado";

// ===== Filter vocabulary =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProfessionalArea {
    Administracion,
    Marketing,
    Ingenieria,
    Salud,
    Educacion,
    Tecnologia,
    Logistica,
    Legal,
    Ventas,
    Diseno,
}

impl ProfessionalArea {
    pub const ALL: [ProfessionalArea; 10] = [
        Self::Administracion,
        Self::Marketing,
        Self::Ingenieria,
        Self::Salud,
        Self::Educacion,
        Self::Tecnologia,
        Self::Logistica,
        Self::Legal,
        Self::Ventas,
        Self::Diseno,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Administracion => "Administración",
            Self::Marketing => "Marketing",
            Self::Ingenieria => "Ingeniería",
            Self::Salud => "Salud",
            Self::Educacion => "Educación",
            Self::Tecnologia => "Tecnología",
            Self::Logistica => "Logística",
            Self::Legal => "Legal",
            Self::Ventas => "Ventas",
            Self::Diseno => "Diseño",
        }
    }

    /// Industry label the search endpoint filters on
    pub fn industry_label(&self) -> Option<&'static str> {
        INDUSTRY_BY_AREA
            .iter()
            .find(|(area, _)| area == self)
            .map(|(_, industry)| *industry)
    }
}

/// Area → industry lookup. Labels match the service's industry names one to one.
const INDUSTRY_BY_AREA: &[(ProfessionalArea, &str)] = &[
    (ProfessionalArea::Administracion, "Administración"),
    (ProfessionalArea::Marketing, "Marketing"),
    (ProfessionalArea::Ingenieria, "Ingeniería"),
    (ProfessionalArea::Salud, "Salud"),
    (ProfessionalArea::Educacion, "Educación"),
    (ProfessionalArea::Tecnologia, "Tecnología"),
    (ProfessionalArea::Logistica, "Logística"),
    (ProfessionalArea::Legal, "Legal"),
    (ProfessionalArea::Ventas, "Ventas"),
    (ProfessionalArea::Diseno, "Diseño"),
];

impl FromStr for ProfessionalArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_accents(s);
        Self::ALL
            .into_iter()
            .find(|area| fold_accents(area.label()) == wanted)
            .ok_or_else(|| format!("Unknown professional area: {}", s))
    }
}

impl fmt::Display for ProfessionalArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fixed skill vocabulary offered as toggles. Ordering follows the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Skill {
    Liderazgo,
    TrabajoEnEquipo,
    AtencionAlCliente,
    ResolucionDeProblemas,
    ManejoDeExcel,
    Ingles,
    Comunicacion,
    AnalisisDeDatos,
}

impl Skill {
    pub const ALL: [Skill; 8] = [
        Self::Liderazgo,
        Self::TrabajoEnEquipo,
        Self::AtencionAlCliente,
        Self::ResolucionDeProblemas,
        Self::ManejoDeExcel,
        Self::Ingles,
        Self::Comunicacion,
        Self::AnalisisDeDatos,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Liderazgo => "Liderazgo",
            Self::TrabajoEnEquipo => "Trabajo en equipo",
            Self::AtencionAlCliente => "Atención al cliente",
            Self::ResolucionDeProblemas => "Resolución de problemas",
            Self::ManejoDeExcel => "Manejo de Excel",
            Self::Ingles => "Inglés",
            Self::Comunicacion => "Comunicación",
            Self::AnalisisDeDatos => "Análisis de datos",
        }
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold_accents(s);
        Self::ALL
            .into_iter()
            .find(|skill| fold_accents(skill.label()) == wanted)
            .ok_or_else(|| format!("Unknown skill: {}", s))
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ===== Filter state =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub free_text: String,
    pub area: Option<ProfessionalArea>,
    pub required_skills: BTreeSet<Skill>,
    pub years_experience: Option<u32>,
    pub required_languages: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the skill if absent, remove it if present
    pub fn toggle_skill(&mut self, skill: Skill) {
        if !self.required_skills.remove(&skill) {
            self.required_skills.insert(skill);
        }
    }

    pub fn with_area(mut self, area: ProfessionalArea) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.required_skills.insert(skill);
        self
    }

    pub fn with_years(mut self, years: u32) -> Self {
        self.years_experience = Some(years);
        self
    }

    pub fn with_languages(mut self, languages: &str) -> Self {
        self.required_languages = languages.to_string();
        self
    }

    pub fn with_free_text(mut self, text: &str) -> Self {
        self.free_text = text.to_string();
        self
    }

    /// Text sent as `query` to the search endpoint: the free text when given,
    /// otherwise the prompt built from the structured filters.
    pub fn search_query(&self) -> String {
        match non_blank(&self.free_text) {
            Some(text) => text.to_string(),
            None => build_prompt(self),
        }
    }
}

// ===== Builders =====

/// Build the recruiter prompt sent to the model endpoint
pub fn build_prompt(filters: &FilterState) -> String {
    let area = filters.area.map(|a| a.label()).unwrap_or(DEFAULT_AREA);
    let years = filters
        .years_experience
        .map(|y| y.to_string())
        .unwrap_or_else(|| DEFAULT_YEARS.to_string());
    let skills = if filters.required_skills.is_empty() {
        DEFAULT_SKILLS.to_string()
    } else {
        filters
            .required_skills
            .iter()
            .map(Skill::label)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let languages = non_blank(&filters.required_languages).unwrap_or(DEFAULT_LANGUAGES);

    let mut prompt = format!(
        "Busco un perfil profesional en el área de {} con aproximadamente {} años de experiencia.\n\
         Debe tener habilidades como {} y manejar los siguientes idiomas: {}.",
        area, years, skills, languages
    );

    if let Some(extra) = non_blank(&filters.free_text) {
        prompt.push_str("\nDescripción adicional: ");
        prompt.push_str(extra);
    }

    prompt.trim().to_string()
}

/// Minimum score threshold derived from the requested years of experience
pub fn min_score_for_years(years: u32) -> u32 {
    match years {
        y if y >= 5 => 70,
        y if y >= 2 => 50,
        _ => 30,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchParams {
    pub n_results: u32,
    pub use_embeddings: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            n_results: DEFAULT_RESULT_COUNT,
            use_embeddings: true,
            industry_filter: None,
            min_score: None,
        }
    }
}

impl SearchParams {
    /// Wire representation, `query` excluded
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("n_results", self.n_results.to_string()),
            ("use_embeddings", self.use_embeddings.to_string()),
        ];
        if let Some(industry) = &self.industry_filter {
            pairs.push(("industry_filter", industry.clone()));
        }
        if let Some(min_score) = self.min_score {
            pairs.push(("min_score", min_score.to_string()));
        }
        pairs
    }
}

pub fn build_search_params(filters: &FilterState) -> SearchParams {
    let context = build_context_filters(filters);
    SearchParams {
        industry_filter: context.industry_filter,
        min_score: context.min_score,
        ..SearchParams::default()
    }
}

/// Optional filters forwarded along with a model question
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AskContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_score: Option<u32>,
}

impl AskContext {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(industry) = &self.industry_filter {
            pairs.push(("industry_filter", industry.clone()));
        }
        if let Some(min_score) = self.min_score {
            pairs.push(("min_score", min_score.to_string()));
        }
        pairs
    }
}

pub fn build_context_filters(filters: &FilterState) -> AskContext {
    AskContext {
        industry_filter: filters
            .area
            .and_then(|a| a.industry_label())
            .map(str::to_string),
        min_score: filters.years_experience.map(min_score_for_years),
    }
}
