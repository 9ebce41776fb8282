use std::path::PathBuf;

/// Errors that stop the review host before or after a session.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("config parse failed: {0}")]
    Config(String),

    #[error("invalid canvas config: {0}")]
    Canvas(#[from] review_canvas::config::ConfigError),

    #[error("failed to read script {path}: {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("script parse failed: {0}")]
    ScriptParse(serde_json::Error),

    #[error("report serialization failed: {0}")]
    Report(serde_json::Error),
}
