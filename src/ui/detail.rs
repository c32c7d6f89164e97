// src/ui/detail.rs
//! Candidate detail view: load state, tabs and panel rendering

use std::fmt::Write as _;
use std::str::FromStr;
use tracing::{info, warn};

use crate::core::metrics::{compute_metrics, DerivedMetrics, ExperienceLevel, ScoreBand};
use crate::core::service_client::CandidateServiceClient;
use crate::core::view_task::ViewScope;
use crate::types::{CandidateRecord, ProcessedStatus};
use crate::ui::placeholder::{show, Field};

pub const LOADING_MESSAGE: &str = "Cargando perfil del candidato...";
pub const BACK_LABEL: &str = "Volver";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Overview,
    Skills,
    Experience,
    Contact,
}

impl DetailTab {
    pub const ALL: [DetailTab; 4] = [Self::Overview, Self::Skills, Self::Experience, Self::Contact];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Overview => "Resumen",
            Self::Skills => "Habilidades",
            Self::Experience => "Experiencia",
            Self::Contact => "Contacto",
        }
    }
}

impl FromStr for DetailTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::utils::fold_accents(s).as_str() {
            "overview" | "resumen" => Ok(Self::Overview),
            "skills" | "habilidades" => Ok(Self::Skills),
            "experience" | "experiencia" => Ok(Self::Experience),
            "contact" | "contacto" => Ok(Self::Contact),
            other => Err(format!(
                "Unknown tab: {}. Use overview, skills, experience or contact",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(Box<CandidateRecord>),
    Error(String),
}

/// Detail of one candidate. Any identifier it was reached by may be tried.
#[derive(Debug)]
pub struct DetailView {
    candidate_ids: Vec<String>,
    state: LoadState,
    tab: DetailTab,
    scope: ViewScope,
}

impl DetailView {
    pub fn new(candidate_ids: Vec<String>) -> Self {
        Self {
            candidate_ids,
            state: LoadState::Idle,
            tab: DetailTab::default(),
            scope: ViewScope::new(),
        }
    }

    pub fn for_id(candidate_id: &str) -> Self {
        Self::new(vec![candidate_id.to_string()])
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn active_tab(&self) -> DetailTab {
        self.tab
    }

    pub fn candidate_ids(&self) -> &[String] {
        &self.candidate_ids
    }

    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// Switching tabs never refetches
    pub fn select_tab(&mut self, tab: DetailTab) {
        self.tab = tab;
    }

    pub fn record(&self) -> Option<&CandidateRecord> {
        match &self.state {
            LoadState::Ready(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    pub fn metrics(&self) -> Option<DerivedMetrics> {
        self.record().map(compute_metrics)
    }

    /// idle -> loading -> ready | error. A ready view is never reloaded.
    pub async fn load(&mut self, client: &CandidateServiceClient) {
        if matches!(self.state, LoadState::Ready(_)) {
            return;
        }

        self.state = LoadState::Loading;
        info!("Loading candidate detail for {:?}", self.candidate_ids);

        let result = self
            .scope
            .run(client.fetch_detail_any(&self.candidate_ids))
            .await;

        self.state = match result {
            Some(Ok(record)) => LoadState::Ready(Box::new(record)),
            Some(Err(e)) => {
                warn!("Candidate detail failed: {}", e);
                LoadState::Error(e.user_message())
            }
            None => LoadState::Idle,
        };
    }

    pub fn render(&self) -> String {
        match &self.state {
            LoadState::Idle | LoadState::Loading => LOADING_MESSAGE.to_string(),
            LoadState::Error(message) => format!("{}\n\n[{}]", message, BACK_LABEL),
            LoadState::Ready(record) => {
                let mut out = render_header(record);
                out.push_str(&render_tab_bar(self.tab));
                out.push('\n');
                let metrics = compute_metrics(record);
                let panel = match self.tab {
                    DetailTab::Overview => render_overview(record, &metrics),
                    DetailTab::Skills => render_skills(record, &metrics),
                    DetailTab::Experience => render_experience(record, &metrics),
                    DetailTab::Contact => render_contact(record, &self.candidate_ids),
                };
                out.push_str(&panel);
                out
            }
        }
    }
}

fn render_header(record: &CandidateRecord) -> String {
    format!(
        "[{}] {}\n{} • {}\n\n",
        BACK_LABEL,
        show(Field::HeaderName, record.display_name()),
        show(Field::HeaderRole, record.professional_info.role.as_deref()),
        show(
            Field::HeaderIndustry,
            record.professional_info.industry.as_deref()
        ),
    )
}

fn render_tab_bar(active: DetailTab) -> String {
    DetailTab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                tab.label().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn years_of(record: &CandidateRecord) -> String {
    let years = record.professional_info.years_experience.unwrap_or(0.0);
    format!("{} años", years)
}

fn render_overview(record: &CandidateRecord, metrics: &DerivedMetrics) -> String {
    let score = record.cv_info.overall_score.unwrap_or(0.0);
    let band = ScoreBand::from_score(score);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Puntuación General: {}/100 ({}, {})",
        score.round(),
        band,
        band.color()
    );
    let _ = writeln!(
        out,
        "Experiencia: {} ({})",
        years_of(record),
        metrics.experience_level
    );
    let _ = writeln!(out, "Habilidades: {} detectadas", metrics.skill_count);
    let _ = writeln!(out, "Idiomas: {}", metrics.language_count);
    let _ = write!(
        out,
        "Valor de Mercado: {} ({}% completo)",
        metrics.market_value, metrics.profile_completeness_percent
    );
    out
}

fn render_skills(record: &CandidateRecord, metrics: &DerivedMetrics) -> String {
    let skills = &record.skills_and_languages.skills;
    let languages = &record.skills_and_languages.languages;
    let mut out = String::new();

    let _ = writeln!(out, "Habilidades técnicas ({})", metrics.skill_count);
    if skills.is_empty() {
        let _ = writeln!(out, "  Sin habilidades registradas");
    }
    for skill in skills {
        let _ = writeln!(out, "  - {}", skill);
    }

    let _ = writeln!(out, "Idiomas ({})", metrics.language_count);
    if languages.is_empty() {
        let _ = write!(out, "  Sin idiomas registrados");
    }
    let listed: Vec<String> = languages.iter().map(|l| format!("  - {}", l)).collect();
    out.push_str(&listed.join("\n"));
    out
}

fn render_experience(record: &CandidateRecord, metrics: &DerivedMetrics) -> String {
    let info = &record.professional_info;
    let mut out = String::new();
    let _ = writeln!(out, "Años de experiencia: {}", years_of(record));
    let _ = writeln!(out, "Industria: {}", show(Field::Industry, info.industry.as_deref()));
    let _ = writeln!(out, "Rol: {}", show(Field::Role, info.role.as_deref()));
    let _ = writeln!(out, "Puesto: {}", show(Field::Position, info.position.as_deref()));
    let level = match metrics.experience_level {
        ExperienceLevel::Senior => "Senior - amplia experiencia profesional",
        ExperienceLevel::Mid => "Mid - experiencia intermedia",
        ExperienceLevel::Junior => "Junior - inicio de carrera",
    };
    let _ = write!(out, "Nivel: {}", level);
    out
}

fn render_contact(record: &CandidateRecord, candidate_ids: &[String]) -> String {
    let personal = &record.personal_info;
    let mut out = String::new();
    let _ = writeln!(out, "Email: {}", show(Field::Email, record.display_email()));
    let _ = writeln!(out, "Teléfono: {}", show(Field::Phone, record.display_phone()));
    let _ = writeln!(
        out,
        "Ubicación: {}",
        show(Field::Location, personal.location.as_deref())
    );

    let links = [
        ("LinkedIn", &personal.linkedin),
        ("GitHub", &personal.github),
        ("Portafolio", &personal.portfolio),
    ];
    if record.has_online_profiles() {
        for (label, link) in links {
            if let Some(url) = link {
                let _ = writeln!(out, "{}: {}", label, url);
            }
        }
    } else {
        let _ = writeln!(out, "No hay perfiles en línea disponibles");
    }

    let cv = &record.cv_info;
    let fallback_id = candidate_ids.first().map(String::as_str);
    let _ = writeln!(
        out,
        "ID del CV: {}",
        show(Field::CvId, cv.id.as_deref().or(fallback_id))
    );
    let _ = writeln!(out, "Archivo: {}", show(Field::CvFilename, cv.filename.as_deref()));
    let status = match &cv.processed_status {
        Some(ProcessedStatus::Completed) => "Procesado",
        _ => "Pendiente",
    };
    let _ = write!(out, "Estado: {}", status);
    out
}
