use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("not signed in")]
    Auth,
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    /// True when local session state is no longer usable and the caller
    /// should send the user back to sign-in. Only the server can tell us a
    /// token went bad, so a 401 from any call lands here too.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, AppError::Auth)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}
