// src/core/mod.rs
//! Query building, the Candidate Service client and the non-visual flows

pub mod metrics;
pub mod query_builder;
pub mod service_client;
pub mod upload;
pub mod view_task;

pub use metrics::{compute_metrics, DerivedMetrics};
pub use query_builder::{build_prompt, build_search_params, FilterState};
pub use service_client::CandidateServiceClient;
pub use upload::UploadFlow;
pub use view_task::ViewScope;
