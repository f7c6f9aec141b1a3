use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid field path: {0:?}")]
    InvalidPath(String),

    #[error("Field path {path} descends through a non-container value at {segment}")]
    PathConflict { path: String, segment: String },

    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Gateway rejected the request: {0}")]
    Rejected(String),

    #[error("Gateway returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode gateway payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Editor is not open")]
    EditorClosed,

    #[error("Editor is busy: {0}")]
    EditorBusy(&'static str),

    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    #[error("Page {requested} is outside 1..={pages}")]
    PageOutOfRange { requested: u32, pages: u32 },

    #[error("Record has no server id")]
    MissingId,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short text suitable for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(problems) => problems.join("\n"),
            AppError::Rejected(message) => message.clone(),
            AppError::HttpStatus { status, .. } => format!("Request failed ({})", status),
            AppError::Transport(_) => "Network error, please try again".to_string(),
            AppError::Decode(_) => "Unexpected response from server".to_string(),
            other => other.to_string(),
        }
    }
}
