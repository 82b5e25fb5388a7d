use strandfx_core::FieldError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HarnessError>;

pub const EXIT_INVALID_ARGUMENT: i32 = 2;
pub const EXIT_CONFIG: i32 = 3;
pub const EXIT_IO: i32 = 4;
pub const EXIT_JSON: i32 = 5;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backdrop config rejected: {0}")]
    Config(#[from] FieldError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl HarnessError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => EXIT_INVALID_ARGUMENT,
            Self::Config(_) => EXIT_CONFIG,
            Self::Io(_) => EXIT_IO,
            Self::Json(_) => EXIT_JSON,
        }
    }
}
