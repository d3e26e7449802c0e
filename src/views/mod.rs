//! Представления: состояние экрана плюс асинхронная загрузка через `ApiClient`.
//! Общего кеша нет, каждое представление при загрузке заново ходит в API.

pub mod admin;
pub mod booking;
pub mod catalog;
pub mod login;
pub mod movie_detail;
pub mod my_tickets;

use thiserror::Error;

use crate::error::ApiError;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Плашка с результатом действия.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl Banner {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: BannerKind::Error, text: text.into() }
    }
}
