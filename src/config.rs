// src/config.rs
use anyhow::{Context, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LOG_FILE: &str = "/tmp/cvenom-search.log";
const CONFIG_FILE: &str = "config.yaml";

/// Which detail route the service exposes. Both have been deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetailPath {
    #[default]
    Analysis,
    AnalisisCompleto,
}

/// Characters left as-is in a path segment: RFC 3986 unreserved
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

impl DetailPath {
    /// Route for one candidate; the identifier is percent-encoded as a single segment
    pub fn endpoint(&self, candidate_id: &str) -> String {
        let id = utf8_percent_encode(candidate_id, PATH_SEGMENT);
        match self {
            Self::Analysis => format!("/cv/{}/analysis", id),
            Self::AnalisisCompleto => format!("/cv/{}/analisis-completo", id),
        }
    }
}

impl FromStr for DetailPath {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "analysis" => Ok(Self::Analysis),
            "analisis-completo" | "analisis_completo" => Ok(Self::AnalisisCompleto),
            other => anyhow::bail!(
                "Unknown detail path: {}. Use analysis or analisis-completo",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub service_url: String,
    pub detail_path: DetailPath,
    /// `None` keeps the transport default (no request timeout)
    pub timeout_seconds: Option<u64>,
    pub log_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            detail_path: DetailPath::default(),
            timeout_seconds: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

/// One environment section of `config.yaml`; every key optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FileSection {
    service_url: Option<String>,
    detail_path: Option<DetailPath>,
    timeout_seconds: Option<u64>,
    log_file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: FileSection,
    production: FileSection,
}

impl ClientConfig {
    /// Defaults, then `config.yaml` if present, then environment variables
    pub fn load() -> Result<Self> {
        let environment = Self::environment();
        let mut config = Self::default();

        let config_path = PathBuf::from(CONFIG_FILE);
        if config_path.exists() {
            config.apply_file(&config_path, &environment)?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Section of `config.yaml` in use: CVENOM_ENV, ENVIRONMENT or ENV, else `local`
    pub fn environment() -> String {
        Self::environment_from(|key| std::env::var(key).ok())
    }

    fn environment_from<F>(lookup: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        ["CVENOM_ENV", "ENVIRONMENT", "ENV"]
            .iter()
            .find_map(|key| lookup(key))
            .unwrap_or_else(|| "local".to_string())
    }

    fn apply_file(&mut self, path: &Path, environment: &str) -> Result<()> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        self.apply_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn apply_yaml(&mut self, content: &str, environment: &str) -> Result<()> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };

        if let Some(url) = section.service_url {
            self.service_url = url;
        }
        if let Some(path) = section.detail_path {
            self.detail_path = path;
        }
        if section.timeout_seconds.is_some() {
            self.timeout_seconds = section.timeout_seconds;
        }
        if let Some(log_file) = section.log_file {
            self.log_file = log_file;
        }
        self.service_url = normalize_url(&self.service_url);
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CV_SERVICE_URL") {
            self.service_url = normalize_url(&url);
        }
        if let Some(path) = lookup("CV_DETAIL_PATH") {
            self.detail_path = path.parse()?;
        }
        if let Some(timeout) = lookup("CV_TIMEOUT_SECS") {
            let secs = timeout
                .trim()
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("CV_TIMEOUT_SECS must be a whole number of seconds"))?;
            self.timeout_seconds = (secs > 0).then_some(secs);
        }
        if let Some(log_file) = lookup("CV_LOG_FILE") {
            self.log_file = PathBuf::from(log_file);
        }
        Ok(())
    }

    pub fn with_service_url(mut self, url: &str) -> Self {
        self.service_url = normalize_url(url);
        self
    }

    pub fn with_detail_path(mut self, path: DetailPath) -> Self {
        self.detail_path = path;
        self
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
