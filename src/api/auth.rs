use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiResult;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl ApiClient {
    /// POST /auth/login
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let request = LoginRequest { username, password };
        Ok(self.submit("/auth/login", &request).await?.unwrap_or_default())
    }
}
