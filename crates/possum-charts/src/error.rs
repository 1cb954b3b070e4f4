use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Canvas element not found")]
    MissingCanvas,

    #[error("Chart backend error: {0}")]
    Backend(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;
