//! Клиент удалённого API кинотеатра.
//!
//! Три базовые операции: `fetch` (GET), `submit` (POST) и `remove` (DELETE).
//! Каждая подставляет Bearer-токен из `SessionContext`, если он есть.
//! На 401 клиент сбрасывает сессию, переводит навигацию на логин и
//! возвращает `ApiError::Unauthorized`. Пустое тело успешного ответа даёт `None`.
//!
//! Типизированные эндпоинты разложены по файлам `auth`, `catalog`, `bookings`, `admin`.

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod catalog;

use reqwest::{header, Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::{
    config::ApiConfig,
    error::{ApiError, ApiResult},
    router::Navigator,
    session::SessionContext,
};

#[derive(Clone)]
pub struct ApiClient {
    /// Базовый URL без завершающего слэша.
    base_url: String,
    http_client: reqwest::Client,
    session: SessionContext,
    navigator: Navigator,
}

impl ApiClient {
    pub fn from_config(
        config: &ApiConfig,
        session: SessionContext,
        navigator: Navigator,
    ) -> ApiResult<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { base_url, http_client, session, navigator })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// GET `path`.
    pub async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Option<T>> {
        let body = self.send(Method::GET, path, None::<&()>).await?;
        decode_body(&body)
    }

    /// POST `path` с JSON-телом.
    pub async fn submit<B, T>(&self, path: &str, payload: &B) -> ApiResult<Option<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::POST, path, Some(payload)).await?;
        decode_body(&body)
    }

    /// DELETE `path`. Тело ответа не разбирается.
    pub async fn remove(&self, path: &str) -> ApiResult<()> {
        self.send(Method::DELETE, path, None::<&()>).await.map(|_| ())
    }

    async fn send<B>(&self, method: Method, path: &str, payload: Option<&B>) -> ApiResult<String>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|e| {
            error!("{} {} failed: {:?}", method, path, e);
            ApiError::Transport(e)
        })?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("{} {} -> 401, signing out", method, path);
            self.session.invalidate();
            self.navigator.to_login();
            return Err(ApiError::Unauthorized);
        }

        let text = response.text().await?;

        if !status.is_success() {
            error!("{} {} -> {}: {}", method, path, status.as_u16(), text);
            return Err(ApiError::Http { status: status.as_u16(), body: text });
        }

        Ok(text)
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> ApiResult<Option<T>> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(body)?))
}

/// Список из ответа: всё, что не массив (null, объект, пустое тело), даёт пустой список.
/// Элементы разбираются по одному, битые пропускаются.
pub(crate) fn list_or_empty<T: DeserializeOwned>(value: Option<Value>) -> ApiResult<Vec<T>> {
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    let total = items.len();
    let decoded: Vec<T> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Skipping malformed list item: {}", e);
                None
            }
        })
        .collect();
    if decoded.len() < total {
        warn!("Decoded {} of {} list items", decoded.len(), total);
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_is_none() {
        let decoded: Option<Value> = decode_body("  \n").unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn non_array_list_is_empty() {
        let items: Vec<i64> = list_or_empty(Some(serde_json::json!({"error": "x"}))).unwrap();
        assert!(items.is_empty());
        let items: Vec<i64> = list_or_empty(Some(serde_json::json!([1, 2]))).unwrap();
        assert_eq!(items, vec![1, 2]);
    }

    #[test]
    fn malformed_items_are_skipped() {
        let items: Vec<i64> = list_or_empty(Some(serde_json::json!([1, "two", null, 3]))).unwrap();
        assert_eq!(items, vec![1, 3]);
    }
}
