pub mod candidate;
pub mod response;

pub use candidate::{CandidateMatch, CandidateRecord, MatchStrength, ProcessedStatus};
pub use response::{AskResponse, SearchResponse, UploadAck};
