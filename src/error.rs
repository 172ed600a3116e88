use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Collected arguments do not match the declared parameter count
    #[error("{0}")]
    Validation(String),

    /// The host rejected or failed the session start request
    #[error("Failed to start debug session: {0}")]
    Launch(String),

    #[error("DAP error: {0}")]
    Dap(String),

    #[error("Adapter closed the connection")]
    Disconnected,

    #[error("Process error: {0}")]
    Process(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl Error {
    /// Process exit code used by the command-line host
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Validation(_) => 2,
            Error::Launch(_) => 3,
            Error::Dap(_) | Error::Disconnected | Error::Process(_) => 4,
            Error::InvalidRequest(_) => 64,
            Error::Config(_) => 78,
            Error::Io(_) | Error::Json(_) => 1,
        }
    }
}
