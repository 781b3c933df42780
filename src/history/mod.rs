//! Analysis history: the in-memory record store and its query engine

pub mod query;
pub mod store;

pub use query::{AnalysesResponse, AnalysisQuery, AnalysisStats, DEFAULT_LIMIT};
pub use store::AnalysisStore;
