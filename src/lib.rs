// src/lib.rs
//! Client for the Candidate Service: filtered CV search, model questions,
//! candidate detail and document upload.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod types;
pub mod ui;
pub mod utils;

pub use crate::config::{ClientConfig, DetailPath};
pub use crate::core::{CandidateServiceClient, FilterState, UploadFlow, ViewScope};
pub use crate::error::ServiceError;
pub use crate::types::{CandidateMatch, CandidateRecord};
pub use crate::ui::{App, DetailView, ResultList, SearchView};
