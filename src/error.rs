use thiserror::Error;

pub type TasklyticsResult<T> = Result<T, TasklyticsError>;

#[derive(Error, Debug)]
pub enum TasklyticsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authorization error: {0}")]
    Auth(String),
}

impl TasklyticsError {
    /// True for failures talking to the remote spreadsheet or the credential issuer.
    ///
    /// Callers decide the retry policy; nothing in this crate retries.
    pub fn is_transport(&self) -> bool {
        matches!(self, TasklyticsError::Transport(_) | TasklyticsError::Auth(_))
    }
}

impl From<reqwest::Error> for TasklyticsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TasklyticsError::Transport(format!("request timed out: {}", err))
        } else {
            TasklyticsError::Transport(err.to_string())
        }
    }
}

impl From<calamine::Error> for TasklyticsError {
    fn from(err: calamine::Error) -> Self {
        TasklyticsError::Excel(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for TasklyticsError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        TasklyticsError::Excel(err.to_string())
    }
}
