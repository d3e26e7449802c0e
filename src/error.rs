//! Ошибки клиента, сгруппированные по слоям.

use thiserror::Error;

/// Ошибки обращения к удалённому API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Сервер ответил 401: сессия уже сброшена, пользователь отправлен на логин.
    #[error("Unauthorized")]
    Unauthorized,
    #[error("API Error: {status} {body}")]
    Http { status: u16, body: String },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Ошибки хранилища сессии.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
