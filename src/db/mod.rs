pub mod connection;
pub mod job_repository;
pub mod listing;
pub mod migrations;
pub mod models;
pub mod saved_job_repository;

pub use job_repository::JobRepository;
pub use saved_job_repository::{SaveOutcome, SavedJobRepository};
