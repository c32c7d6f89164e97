// src/core/metrics.rs
//! Display metrics derived from a candidate record

use serde::Serialize;
use std::fmt;

use crate::types::CandidateRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn from_years(years: f64) -> Self {
        if years >= 5.0 {
            Self::Senior
        } else if years >= 2.0 {
            Self::Mid
        } else {
            Self::Junior
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Junior => "Junior",
            Self::Mid => "Mid",
            Self::Senior => "Senior",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarketValue {
    Bajo,
    Medio,
    MedioAlto,
    Alto,
}

impl MarketValue {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Alto
        } else if score >= 60.0 {
            Self::MedioAlto
        } else if score >= 40.0 {
            Self::Medio
        } else {
            Self::Bajo
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Bajo => "Bajo",
            Self::Medio => "Medio",
            Self::MedioAlto => "Medio-Alto",
            Self::Alto => "Alto",
        }
    }
}

/// Qualitative band and colour for an overall CV score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreBand {
    Excelente,
    Bueno,
    Regular,
    Bajo,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::Excelente
        } else if score >= 60.0 {
            Self::Bueno
        } else if score >= 40.0 {
            Self::Regular
        } else {
            Self::Bajo
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excelente => "Excelente",
            Self::Bueno => "Bueno",
            Self::Regular => "Regular",
            Self::Bajo => "Bajo",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Excelente => "#10B981",
            Self::Bueno => "#F59E0B",
            Self::Regular => "#F97316",
            Self::Bajo => "#EF4444",
        }
    }
}

macro_rules! impl_label_display {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

impl_label_display!(ExperienceLevel, MarketValue, ScoreBand);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub experience_level: ExperienceLevel,
    pub profile_completeness_percent: u8,
    pub market_value: MarketValue,
    pub skill_count: usize,
    pub language_count: usize,
}

const WEIGHT_NAME: u8 = 20;
const WEIGHT_EMAIL: u8 = 20;
const WEIGHT_INDUSTRY: u8 = 15;
const WEIGHT_ROLE: u8 = 15;
const WEIGHT_SKILLS: u8 = 20;
const WEIGHT_LANGUAGES: u8 = 10;

pub fn compute_metrics(record: &CandidateRecord) -> DerivedMetrics {
    let personal = &record.personal_info;
    let professional = &record.professional_info;
    let skills = &record.skills_and_languages.skills;
    let languages = &record.skills_and_languages.languages;

    let years = professional.years_experience.unwrap_or(0.0);
    let score = record.cv_info.overall_score.unwrap_or(0.0);

    let weighted = [
        (personal.name.is_some(), WEIGHT_NAME),
        (personal.email.is_some(), WEIGHT_EMAIL),
        (professional.industry.is_some(), WEIGHT_INDUSTRY),
        (professional.role.is_some(), WEIGHT_ROLE),
        (!skills.is_empty(), WEIGHT_SKILLS),
        (!languages.is_empty(), WEIGHT_LANGUAGES),
    ];
    let completeness: u8 = weighted
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, weight)| *weight)
        .sum();

    DerivedMetrics {
        experience_level: ExperienceLevel::from_years(years),
        profile_completeness_percent: completeness.min(100),
        market_value: MarketValue::from_score(score),
        skill_count: skills.len(),
        language_count: languages.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::candidate::{PersonalInfo, ProfessionalInfo, SkillsAndLanguages};

    fn record_with_years(years: Option<f64>) -> CandidateRecord {
        CandidateRecord {
            professional_info: ProfessionalInfo {
                years_experience: years,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_completeness_without_role() {
        let record = CandidateRecord {
            personal_info: PersonalInfo {
                name: Some("Ana".to_string()),
                email: Some("ana@example.com".to_string()),
                ..Default::default()
            },
            professional_info: ProfessionalInfo {
                industry: Some("Salud".to_string()),
                ..Default::default()
            },
            skills_and_languages: SkillsAndLanguages {
                skills: vec!["a".into(), "b".into(), "c".into()],
                languages: vec!["Español".into()],
            },
            ..Default::default()
        };
        let metrics = compute_metrics(&record);
        assert_eq!(metrics.profile_completeness_percent, 85);
        assert_eq!(metrics.skill_count, 3);
        assert_eq!(metrics.language_count, 1);
    }

    #[test]
    fn test_completeness_full_profile_is_100() {
        let mut record = CandidateRecord::default();
        record.personal_info.name = Some("Ana".into());
        record.personal_info.email = Some("a@b.c".into());
        record.professional_info.industry = Some("Legal".into());
        record.professional_info.role = Some("Abogada".into());
        record.skills_and_languages.skills = vec!["Litigio".into()];
        record.skills_and_languages.languages = vec!["Inglés".into()];
        assert_eq!(compute_metrics(&record).profile_completeness_percent, 100);
        assert_eq!(
            compute_metrics(&CandidateRecord::default()).profile_completeness_percent,
            0
        );
    }

    #[test]
    fn test_experience_levels() {
        let level = |y| compute_metrics(&record_with_years(y)).experience_level;
        assert_eq!(level(Some(6.0)), ExperienceLevel::Senior);
        assert_eq!(level(Some(5.0)), ExperienceLevel::Senior);
        assert_eq!(level(Some(3.0)), ExperienceLevel::Mid);
        assert_eq!(level(Some(2.0)), ExperienceLevel::Mid);
        assert_eq!(level(Some(0.0)), ExperienceLevel::Junior);
        assert_eq!(level(None), ExperienceLevel::Junior);
    }

    #[test]
    fn test_market_value_tiers() {
        assert_eq!(MarketValue::from_score(39.9), MarketValue::Bajo);
        assert_eq!(MarketValue::from_score(40.0), MarketValue::Medio);
        assert_eq!(MarketValue::from_score(79.0), MarketValue::MedioAlto);
        assert_eq!(MarketValue::from_score(80.0), MarketValue::Alto);
        assert_eq!(MarketValue::MedioAlto.to_string(), "Medio-Alto");
        assert_eq!(
            compute_metrics(&CandidateRecord::default()).market_value,
            MarketValue::Bajo
        );
    }

    #[test]
    fn test_score_band_colors() {
        assert_eq!(ScoreBand::from_score(85.0).color(), "#10B981");
        assert_eq!(ScoreBand::from_score(60.0), ScoreBand::Bueno);
        assert_eq!(ScoreBand::from_score(10.0).label(), "Bajo");
    }
}
