use std::path::PathBuf;

use thiserror::Error;

use crate::validate::RecordIssue;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no route catalogue files (*.routes.json) found under {0}")]
    MissingCatalogue(PathBuf),

    #[error("{} malformed permission record(s): {}", .0.len(), summarize(.0))]
    InvalidRecords(Vec<RecordIssue>),
}

pub type Result<T> = std::result::Result<T, ResolveError>;

fn summarize(issues: &[RecordIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
