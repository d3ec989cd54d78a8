use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("PUSHBULLET_TOKEN not set. Please set it in environment variable or config.toml")]
    MissingToken,

    /// The transport could not be reached; nothing was sent.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    /// True when the push never left this process, so another transport may
    /// retry it without delivering it twice.
    pub fn is_unsent(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_builder(),
            Self::Transport(_) => true,
            _ => false,
        }
    }
}
