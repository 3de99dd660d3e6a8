//! Out-of-process jobs that poll the CRM over its GraphQL endpoint and append
//! human-readable lines to log files. A system scheduler runs them; nothing
//! here coordinates one job with another.

use thiserror::Error;

pub mod client;
pub mod heartbeat;
pub mod log_sink;
pub mod reminders;
pub mod report;
pub mod restock;

pub use client::GraphQlClient;

/// `2024-05-01 13:45:00`, used by every job except the heartbeat.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum JobError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("response carried no data")]
    MissingData,

    #[error("log file error: {0}")]
    Io(#[from] std::io::Error),
}

pub type JobResult<T> = Result<T, JobError>;
