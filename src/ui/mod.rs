// src/ui/mod.rs
//! Text views over the Candidate Service: search results, candidate detail and navigation

pub mod detail;
pub mod placeholder;
pub mod results;
pub mod shell;

pub use detail::{DetailTab, DetailView, LoadState};
pub use results::{CandidateCard, ResultList, SelectionError};
pub use shell::{App, SearchPanel, SearchStatus, SearchView, View};
