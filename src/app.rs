use tracing::info;

use crate::{
    api::ApiClient,
    config::Config,
    error::ApiResult,
    router::{Navigator, Route},
    session::{FileSessionStore, SessionContext, SessionStore},
};

/// Всё, что нужно представлениям: конфиг, сессия, навигация и API-клиент.
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub session: SessionContext,
    pub navigator: Navigator,
    pub api: ApiClient,
}

impl App {
    /// Сессия читается из файла, начальный маршрут проходит через охрану.
    pub fn bootstrap(config: Config) -> ApiResult<Self> {
        let store = FileSessionStore::new(&config.session.storage_path);
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: impl SessionStore + 'static) -> ApiResult<Self> {
        let session = SessionContext::init(store);
        let identity = session.identity();
        let navigator = Navigator::new(Route::Catalog.resolve(identity.as_ref()));
        let api = ApiClient::from_config(&config.api, session.clone(), navigator.clone())?;

        info!(
            "Client ready: api={}, env={}, route={}",
            config.api.base_url,
            config.app.environment,
            navigator.current()
        );

        Ok(Self { config, session, navigator, api })
    }

    /// Переход по маршруту от имени текущего пользователя.
    pub fn navigate(&self, route: Route) -> Route {
        self.navigator.navigate(route, self.session.identity().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Identity, Role};
    use crate::session::{MemorySessionStore, StoredSession};

    fn config() -> Config {
        Config::for_api("http://localhost:8081/", "unused.json")
    }

    #[test]
    fn signed_out_starts_at_login() {
        let app = App::with_store(config(), MemorySessionStore::new()).unwrap();
        assert_eq!(app.navigator.current(), Route::Login);
        assert_eq!(app.navigate(Route::MyTickets), Route::Login);
    }

    #[test]
    fn restored_user_cannot_open_admin() {
        let store = MemorySessionStore::with_session(StoredSession {
            token: "t".into(),
            user: Identity::from_login("bob", Role::User),
        });
        let app = App::with_store(config(), store).unwrap();
        assert_eq!(app.navigator.current(), Route::Catalog);
        assert_eq!(app.navigate(Route::Admin), Route::Catalog);
        assert_eq!(app.navigate(Route::MyTickets), Route::MyTickets);
    }

    #[test]
    fn rejects_bad_base_url() {
        let result = App::with_store(Config::for_api("not a url", "unused.json"), MemorySessionStore::new());
        assert!(result.is_err());
    }
}
