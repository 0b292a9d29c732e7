pub mod config;
pub mod errors;
pub mod extraction;
pub mod ingest;
pub mod requirement;
pub mod screening;
pub mod similarity;
pub mod state;
pub mod vocabulary;
