//! Маршруты приложения и охрана доступа по роли.

use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::models::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Catalog,
    MovieDetail(i64),
    Booking { movie_id: i64, screening_id: i64 },
    MyTickets,
    Admin,
}

impl Route {
    /// Разбирает путь вида `/movie/7`. Неизвестный путь ведёт в каталог.
    pub fn parse(path: &str) -> Route {
        let path = path.trim().trim_start_matches('#');
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Catalog,
            ["login"] => Route::Login,
            ["tickets"] => Route::MyTickets,
            ["admin"] => Route::Admin,
            ["movie", id] => id.parse().map(Route::MovieDetail).unwrap_or(Route::Catalog),
            ["book", movie_id, screening_id] => match (movie_id.parse(), screening_id.parse()) {
                (Ok(movie_id), Ok(screening_id)) => Route::Booking { movie_id, screening_id },
                _ => Route::Catalog,
            },
            _ => Route::Catalog,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Catalog => "/".to_string(),
            Route::MovieDetail(id) => format!("/movie/{}", id),
            Route::Booking { movie_id, screening_id } => format!("/book/{}/{}", movie_id, screening_id),
            Route::MyTickets => "/tickets".to_string(),
            Route::Admin => "/admin".to_string(),
        }
    }

    /// Куда реально попадёт пользователь с данной сессией.
    pub fn resolve(self, identity: Option<&Identity>) -> Route {
        match (self, identity) {
            (_, None) => Route::Login,
            (Route::Login, Some(_)) => Route::Catalog,
            (Route::Admin, Some(user)) if !user.is_admin() => Route::Catalog,
            (route, Some(_)) => route,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Пункт бокового меню.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

pub fn nav_items(identity: &Identity) -> Vec<NavItem> {
    let mut items = vec![
        NavItem { label: "Movies", route: Route::Catalog },
        NavItem { label: "My Tickets", route: Route::MyTickets },
    ];
    if identity.is_admin() {
        items.push(NavItem { label: "Admin Panel", route: Route::Admin });
    }
    items
}

/// Текущий маршрут. Общий для представлений и API-клиента.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<RwLock<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        Self { current: Arc::new(RwLock::new(initial)) }
    }

    pub fn current(&self) -> Route {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Переход с учётом охраны маршрутов. Возвращает итоговый маршрут.
    pub fn navigate(&self, route: Route, identity: Option<&Identity>) -> Route {
        let resolved = route.resolve(identity);
        debug!("navigate -> {}", resolved);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = resolved.clone();
        resolved
    }

    /// Принудительный переход на логин (после 401 или выхода).
    pub fn to_login(&self) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Route::Login;
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}
