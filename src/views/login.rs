use tracing::{error, info, warn};
use validator::Validate;

use crate::api::ApiClient;
use crate::models::{Identity, Role};
use crate::router::{Navigator, Route};
use crate::session::SessionContext;

pub const INVALID_RESPONSE: &str = "Invalid response from server";
pub const LOGIN_FAILED: &str = "Invalid credentials or server error";

#[derive(Debug, Clone, Default, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Default)]
pub struct LoginView {
    pub form: LoginForm,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl LoginView {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            form: LoginForm { username: username.into(), password: password.into() },
            ..Default::default()
        }
    }

    /// Отправляет форму. При успехе сессия записана и навигация ушла в каталог.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Identity> {
        if let Err(e) = self.form.validate() {
            warn!("Login form invalid: {}", e);
            self.error = Some(e.to_string());
            return None;
        }

        self.is_loading = true;
        self.error = None;
        let result = api.login(self.form.username.trim(), &self.form.password).await;
        self.is_loading = false;

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Login failed: {}", e);
                self.error = Some(LOGIN_FAILED.to_string());
                return None;
            }
        };

        let token = match response.token.filter(|t| !t.is_empty()) {
            Some(token) => token,
            None => {
                self.error = Some(INVALID_RESPONSE.to_string());
                return None;
            }
        };

        let identity = Identity::from_login(self.form.username.trim(), Role::from_claim(response.role.as_deref()));
        if let Err(e) = api.session().sign_in(token, identity.clone()) {
            error!("Failed to persist session: {}", e);
            self.error = Some(LOGIN_FAILED.to_string());
            return None;
        }

        api.navigator().navigate(Route::Catalog, Some(&identity));
        info!("Login ok for {}", identity.name);
        Some(identity)
    }
}

/// Выход: очищает сессию и уводит на логин.
pub fn logout(session: &SessionContext, navigator: &Navigator) {
    if let Err(e) = session.sign_out() {
        warn!("Failed to clear session storage on logout: {}", e);
    }
    navigator.to_login();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_fields_fail_validation() {
        let form = LoginForm { username: String::new(), password: "x".into() };
        let errors = form.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(LoginForm { username: "u".into(), password: "p".into() }.validate().is_ok());
    }
}
