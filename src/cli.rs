// src/cli.rs
use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::core::query_builder::{FilterState, ProfessionalArea, Skill};
use crate::core::service_client::CandidateServiceClient;
use crate::core::upload::{
    format_file_size, FileOutcome, PendingFile, UploadFlow, UploadObserver, ACCEPTED_EXTENSIONS,
};
use crate::ui::detail::{DetailTab, DetailView, LoadState};
use crate::ui::shell::{render_navbar, App, SearchPanel, SearchStatus, SearchView};

#[derive(Parser)]
#[command(name = "cv-search")]
#[command(about = "Search, inspect and upload candidate CVs through the Candidate Service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Candidate Service base URL (overrides config.yaml and CV_SERVICE_URL)
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Search candidates with structured filters and/or free text
    Search {
        /// Professional area, e.g. "Tecnología"
        #[arg(long)]
        area: Option<ProfessionalArea>,
        /// Required skill; repeat for several
        #[arg(long = "skill")]
        skills: Vec<Skill>,
        /// Minimum years of experience
        #[arg(long)]
        years: Option<u32>,
        /// Required languages, free text
        #[arg(long)]
        languages: Option<String>,
        /// Additional description; used as the search query when present
        #[arg(long)]
        text: Option<String>,
        /// Ask the model with the built prompt instead of running a search
        #[arg(long)]
        ask: bool,
        /// Open the detail of the N-th result (1-based)
        #[arg(long)]
        open: Option<usize>,
        /// Detail tab shown with --open
        #[arg(long, default_value = "overview")]
        tab: DetailTab,
    },
    /// Ask the model a free-form question about the candidate pool
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Show a candidate's detail; extra ids are tried in order
    Detail {
        #[arg(required = true)]
        ids: Vec<String>,
        #[arg(long, default_value = "overview")]
        tab: DetailTab,
    },
    /// Upload CV documents one at a time
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List the professional areas, skills and accepted file types
    Areas,
}

pub async fn handle_command(cli: Cli, mut config: ClientConfig) -> Result<()> {
    if let Some(url) = &cli.service_url {
        config = config.with_service_url(url);
    }
    let json_output = cli.json;

    match cli.command {
        Command::Areas => {
            print_vocabularies(json_output)?;
            Ok(())
        }

        Command::Search {
            area,
            skills,
            years,
            languages,
            text,
            ask,
            open,
            tab,
        } => {
            let client = CandidateServiceClient::new(&config)?;
            let mut filters = FilterState::new();
            filters.area = area;
            filters.required_skills = skills.into_iter().collect();
            filters.years_experience = years;
            filters.required_languages = languages.unwrap_or_default();
            filters.free_text = text.unwrap_or_default();

            let mut view = SearchView::new(filters);
            if ask {
                view.focus(SearchPanel::Chat);
                view.ask_with_filters(&client).await;
                return print_answer(&view, json_output);
            }

            view.search(&client).await;
            if let SearchStatus::Error(message) = view.status() {
                anyhow::bail!("{}", message);
            }
            info!("Search returned {} match(es)", view.results().len());

            let Some(position) = open else {
                if json_output {
                    println!("{}", serde_json::to_string_pretty(&view.results().cards())?);
                } else {
                    println!("{}", render_navbar());
                    println!();
                    println!("{}", view.render());
                }
                return Ok(());
            };

            let mut app = App::new(view);
            app.open_result(position)?;
            let Some(detail) = app.detail_view() else {
                anyhow::bail!("Detail view did not open");
            };
            detail.select_tab(tab);
            detail.load(&client).await;
            print_detail(detail, json_output)
        }

        Command::Ask { question } => {
            let client = CandidateServiceClient::new(&config)?;
            let mut view = SearchView::default();
            view.focus(SearchPanel::Chat);
            view.chat_input = question.join(" ");
            view.ask_chat(&client).await?;
            print_answer(&view, json_output)
        }

        Command::Detail { ids, tab } => {
            let client = CandidateServiceClient::new(&config)?;
            let mut detail = DetailView::new(ids);
            detail.select_tab(tab);
            detail.load(&client).await;
            print_detail(&detail, json_output)
        }

        Command::Upload { files } => {
            let client = CandidateServiceClient::new(&config)?;
            let mut flow = UploadFlow::new();
            flow.select_files(&files);

            let mut observer = SpinnerObserver::new(json_output);
            let report = flow.upload_all(&client, &mut observer).await?;
            observer.done();

            if json_output {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} ({} ok, {} con error)",
                    report.summary,
                    report.succeeded(),
                    report.failed()
                );
            }
            Ok(())
        }
    }
}

fn print_answer(view: &SearchView, json_output: bool) -> Result<()> {
    let answer = view.answer().unwrap_or_default();
    if json_output {
        println!("{}", serde_json::to_string_pretty(&json!({ "answer": answer }))?);
    } else {
        println!("{}", answer);
    }
    if let SearchStatus::Error(message) = view.status() {
        anyhow::bail!("{}", message);
    }
    Ok(())
}

fn print_detail(detail: &DetailView, json_output: bool) -> Result<()> {
    if let LoadState::Error(message) = detail.state() {
        error!("Detail for {:?} failed: {}", detail.candidate_ids(), message);
        anyhow::bail!("{}", message);
    }

    if json_output {
        let payload = json!({
            "candidate_ids": detail.candidate_ids(),
            "record": detail.record(),
            "metrics": detail.metrics(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", detail.render());
    }
    Ok(())
}

fn print_vocabularies(json_output: bool) -> Result<()> {
    let areas: Vec<&str> = ProfessionalArea::ALL.iter().map(|a| a.label()).collect();
    let skills: Vec<&str> = Skill::ALL.iter().map(|s| s.label()).collect();

    if json_output {
        let payload = json!({
            "areas": areas,
            "skills": skills,
            "accepted_extensions": ACCEPTED_EXTENSIONS,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Áreas profesionales:");
    for area in areas {
        println!("  - {}", area);
    }
    println!("Habilidades:");
    for skill in skills {
        println!("  - {}", skill);
    }
    println!("Tipos de archivo aceptados: .{}", ACCEPTED_EXTENSIONS.join(", ."));
    Ok(())
}

/// Spinner per file; the service gives no byte-level progress
struct SpinnerObserver {
    spinner: Option<ProgressBar>,
}

impl SpinnerObserver {
    fn new(quiet: bool) -> Self {
        if quiet {
            return Self { spinner: None };
        }
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|e| {
                error!("Invalid spinner template: {}", e);
                ProgressStyle::default_spinner()
            });
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner: Some(spinner),
        }
    }

    fn done(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }
}

impl UploadObserver for SpinnerObserver {
    fn started(&mut self, index: usize, total: usize, file: &PendingFile) {
        if let Some(spinner) = &self.spinner {
            let size = file.size.map(format_file_size).unwrap_or_default();
            spinner.set_message(format!(
                "Subiendo {}/{}: {} ({}, {})",
                index + 1,
                total,
                file.name,
                file.type_label(),
                size
            ));
        }
    }

    fn finished(&mut self, _index: usize, file: &PendingFile, outcome: &FileOutcome) {
        if let Some(spinner) = &self.spinner {
            let line = match outcome {
                FileOutcome::Uploaded(_) => format!("✅ {}", file.name),
                FileOutcome::Failed(message) => format!("❌ {}", message),
            };
            spinner.println(line);
        }
    }
}
