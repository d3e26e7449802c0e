//! Админ-панель: вкладки статистики, импорта, фильмов, сеансов и создания сеанса.
//!
//! Каждое действие делает один запрос, а затем состояние меняется через
//! `AdminState::apply` по исходу запроса. Списки правятся только после
//! успешного ответа.

use tracing::{error, info, warn};
use validator::{Validate, ValidationError, ValidationErrors};

use super::Banner;
use crate::api::ApiClient;
use crate::models::{screening::parse_local_date_time, AdminStats, CreateScreeningRequest, Hall, Movie, Screening};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdminTab {
    #[default]
    Stats,
    Import,
    Movies,
    Sessions,
    Create,
}

impl AdminTab {
    pub const ALL: [AdminTab; 5] = [AdminTab::Stats, AdminTab::Import, AdminTab::Movies, AdminTab::Sessions, AdminTab::Create];

    pub fn label(&self) -> &'static str {
        match self {
            AdminTab::Stats => "Overview",
            AdminTab::Import => "Import",
            AdminTab::Movies => "Movies",
            AdminTab::Sessions => "Sessions",
            AdminTab::Create => "Create",
        }
    }

    fn needs_movies(&self) -> bool {
        matches!(self, AdminTab::Movies | AdminTab::Sessions | AdminTab::Create)
    }
}

/// Форма создания сеанса.
#[derive(Debug, Clone, Validate)]
pub struct CreateScreeningForm {
    #[validate(required(message = "Select a movie"))]
    pub movie_id: Option<i64>,
    #[validate(required(message = "Select a hall"))]
    pub hall_id: Option<i64>,
    /// "2026-10-18T19:30"
    #[validate(custom(function = "start_time"))]
    pub date: String,
    #[validate(custom(function = "positive_price"))]
    pub price: String,
}

impl Default for CreateScreeningForm {
    fn default() -> Self {
        Self { movie_id: None, hall_id: None, date: String::new(), price: "12.50".to_string() }
    }
}

fn start_time(value: &str) -> Result<(), ValidationError> {
    parse_local_date_time(value.trim())
        .map(|_| ())
        .map_err(|_| ValidationError::new("start_time"))
}

fn positive_price(value: &str) -> Result<(), ValidationError> {
    match value.trim().parse::<f64>() {
        Ok(p) if p > 0.0 && p.is_finite() => Ok(()),
        _ => Err(ValidationError::new("price")),
    }
}

impl CreateScreeningForm {
    pub fn to_request(&self) -> Result<CreateScreeningRequest, ValidationErrors> {
        self.validate()?;
        let invalid = |field: &'static str| {
            let mut errors = ValidationErrors::new();
            errors.add(field, ValidationError::new(field));
            errors
        };
        let start_time = parse_local_date_time(self.date.trim()).map_err(|_| invalid("date"))?;
        let price: f64 = self.price.trim().parse().map_err(|_| invalid("price"))?;

        Ok(CreateScreeningRequest {
            movie_id: self.movie_id.ok_or_else(|| invalid("movie_id"))?,
            hall_id: self.hall_id.ok_or_else(|| invalid("hall_id"))?,
            start_time,
            price,
        })
    }
}

/// Исходы запросов, из которых собирается состояние панели.
#[derive(Debug, Clone)]
pub enum AdminEvent {
    TabSelected(AdminTab),
    StatsLoaded(Result<AdminStats, String>),
    MoviesLoaded(Result<Vec<Movie>, String>),
    HallsLoaded(Result<Vec<Hall>, String>),
    SessionMovieChosen(Option<i64>),
    ScreeningsLoaded { movie_id: i64, result: Result<Vec<Screening>, String> },
    MovieDeleted { movie_id: i64, result: Result<(), String> },
    ScreeningDeleted { screening_id: i64, result: Result<(), String> },
    ScreeningCreated(Result<(), String>),
    MovieImported { tmdb_id: String, result: Result<(), String> },
    Finished,
}

#[derive(Debug, Clone, Default)]
pub struct AdminState {
    pub tab: AdminTab,
    pub stats: Option<AdminStats>,
    pub movies: Vec<Movie>,
    pub halls: Vec<Hall>,
    pub session_movie: Option<i64>,
    pub screenings: Vec<Screening>,
    pub banner: Option<Banner>,
    pub is_loading: bool,
    pub create_form: CreateScreeningForm,
    pub tmdb_id: String,
}

impl AdminState {
    pub fn apply(&mut self, event: AdminEvent) {
        match event {
            AdminEvent::TabSelected(tab) => {
                self.tab = tab;
                self.banner = None;
                self.is_loading = true;
            }
            // статистика не критична: при ошибке показываем нули
            AdminEvent::StatsLoaded(result) => {
                self.stats = Some(result.unwrap_or_default());
            }
            AdminEvent::MoviesLoaded(Ok(movies)) => self.movies = movies,
            AdminEvent::HallsLoaded(Ok(halls)) => self.halls = halls,
            AdminEvent::MoviesLoaded(Err(_)) | AdminEvent::HallsLoaded(Err(_)) => {}
            AdminEvent::SessionMovieChosen(movie_id) => {
                self.session_movie = movie_id;
                self.screenings.clear();
            }
            AdminEvent::ScreeningsLoaded { movie_id, result } => {
                // ответ по уже не выбранному фильму игнорируем
                if self.session_movie == Some(movie_id) {
                    if let Ok(screenings) = result {
                        self.screenings = screenings;
                    }
                }
            }
            AdminEvent::MovieDeleted { movie_id, result: Ok(()) } => {
                self.movies.retain(|m| m.id != movie_id);
                if self.session_movie == Some(movie_id) {
                    self.session_movie = None;
                    self.screenings.clear();
                }
                self.banner = Some(Banner::success("Movie deleted successfully"));
            }
            AdminEvent::MovieDeleted { result: Err(_), .. } => {
                self.banner = Some(Banner::error("Failed to delete movie"));
            }
            AdminEvent::ScreeningDeleted { screening_id, result: Ok(()) } => {
                self.screenings.retain(|s| s.id != screening_id);
                self.banner = Some(Banner::success("Screening deleted"));
            }
            AdminEvent::ScreeningDeleted { result: Err(_), .. } => {
                self.banner = Some(Banner::error("Failed to delete screening"));
            }
            AdminEvent::ScreeningCreated(Ok(())) => {
                self.create_form.date.clear();
                self.banner = Some(Banner::success("Session created successfully"));
                self.is_loading = false;
            }
            AdminEvent::ScreeningCreated(Err(_)) => {
                self.banner = Some(Banner::error("Failed to create session."));
                self.is_loading = false;
            }
            AdminEvent::MovieImported { tmdb_id, result: Ok(()) } => {
                self.tmdb_id.clear();
                self.banner = Some(Banner::success(format!("Movie (ID: {}) imported successfully", tmdb_id)));
                self.is_loading = false;
            }
            AdminEvent::MovieImported { result: Err(_), .. } => {
                self.banner = Some(Banner::error("Failed to import movie. Check TMDB ID."));
                self.is_loading = false;
            }
            AdminEvent::Finished => self.is_loading = false,
        }
    }
}

pub struct AdminPanel {
    api: ApiClient,
    pub state: AdminState,
}

impl AdminPanel {
    pub fn new(api: ApiClient) -> Self {
        Self { api, state: AdminState::default() }
    }

    /// Переключает вкладку и загружает её данные.
    pub async fn select_tab(&mut self, tab: AdminTab) {
        self.state.apply(AdminEvent::TabSelected(tab));

        if tab == AdminTab::Stats {
            let result = self.api.admin_stats().await.map_err(|e| {
                warn!("Stats unavailable, showing zeros: {}", e);
                e.to_string()
            });
            self.state.apply(AdminEvent::StatsLoaded(result));
        } else if tab.needs_movies() {
            let movies = self.api.movies().await.map_err(|e| {
                error!("Failed to load movies: {}", e);
                e.to_string()
            });
            let movies_ok = movies.is_ok();
            self.state.apply(AdminEvent::MoviesLoaded(movies));

            if tab == AdminTab::Create && movies_ok {
                let halls = self.api.halls().await.map_err(|e| {
                    error!("Failed to load halls: {}", e);
                    e.to_string()
                });
                self.state.apply(AdminEvent::HallsLoaded(halls));
            }
        }

        self.state.apply(AdminEvent::Finished);
    }

    /// Выбор фильма на вкладке сеансов. `None` очищает список.
    pub async fn choose_session_movie(&mut self, movie_id: Option<i64>) {
        self.state.apply(AdminEvent::SessionMovieChosen(movie_id));
        let Some(movie_id) = movie_id else { return };

        let result = self.api.screenings_for_movie(movie_id).await.map_err(|e| {
            error!("Failed to load screenings for movie {}: {}", movie_id, e);
            e.to_string()
        });
        self.state.apply(AdminEvent::ScreeningsLoaded { movie_id, result });
    }

    /// Удаляет фильм вместе со всеми его сеансами.
    pub async fn delete_movie(&mut self, movie_id: i64) {
        let result = self.api.delete_movie(movie_id).await.map_err(|e| e.to_string());
        if result.is_ok() {
            info!("Movie {} deleted", movie_id);
        }
        self.state.apply(AdminEvent::MovieDeleted { movie_id, result });
    }

    pub async fn delete_screening(&mut self, screening_id: i64) {
        let result = self.api.delete_screening(screening_id).await.map_err(|e| e.to_string());
        if result.is_ok() {
            info!("Screening {} deleted", screening_id);
        }
        self.state.apply(AdminEvent::ScreeningDeleted { screening_id, result });
    }

    pub async fn create_screening(&mut self) {
        if self.state.is_loading {
            return;
        }
        let request = match self.state.create_form.to_request() {
            Ok(request) => request,
            Err(e) => {
                warn!("Create screening form invalid: {}", e);
                self.state.apply(AdminEvent::ScreeningCreated(Err(e.to_string())));
                return;
            }
        };

        self.state.is_loading = true;
        let result = self.api.create_screening(&request).await.map(|_| ()).map_err(|e| e.to_string());
        if result.is_ok() {
            info!("Screening created for movie {} in hall {}", request.movie_id, request.hall_id);
        }
        self.state.apply(AdminEvent::ScreeningCreated(result));
    }

    /// Импорт фильма по TMDB ID. Пустой ID игнорируется.
    pub async fn import_movie(&mut self) {
        let tmdb_id = self.state.tmdb_id.trim().to_string();
        if tmdb_id.is_empty() || self.state.is_loading {
            return;
        }

        self.state.is_loading = true;
        let result = match tmdb_id.parse::<u64>() {
            Ok(id) => self.api.import_tmdb_movie(id).await.map(|_| ()).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        if result.is_ok() {
            info!("Movie imported from TMDB id {}", tmdb_id);
        }
        self.state.apply(AdminEvent::MovieImported { tmdb_id, result });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::BannerKind;

    fn movie(id: i64) -> Movie {
        serde_json::from_value(serde_json::json!({"id": id, "title": format!("M{}", id)})).unwrap()
    }

    fn state_with_movies() -> AdminState {
        let mut state = AdminState::default();
        state.apply(AdminEvent::MoviesLoaded(Ok(vec![movie(1), movie(2)])));
        state
    }

    #[test]
    fn failed_delete_keeps_list() {
        let mut state = state_with_movies();
        state.apply(AdminEvent::MovieDeleted { movie_id: 1, result: Err("500".into()) });
        assert_eq!(state.movies.len(), 2);
        assert_eq!(state.banner.as_ref().unwrap().kind, BannerKind::Error);
    }

    #[test]
    fn successful_delete_splices() {
        let mut state = state_with_movies();
        state.apply(AdminEvent::MovieDeleted { movie_id: 1, result: Ok(()) });
        assert_eq!(state.movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(state.banner, Some(Banner::success("Movie deleted successfully")));
    }

    #[test]
    fn stats_failure_means_zeros() {
        let mut state = AdminState::default();
        state.apply(AdminEvent::StatsLoaded(Err("503".into())));
        assert_eq!(state.stats, Some(AdminStats::default()));
    }

    #[test]
    fn stale_screenings_are_ignored() {
        let mut state = AdminState::default();
        state.apply(AdminEvent::SessionMovieChosen(Some(2)));
        state.apply(AdminEvent::ScreeningsLoaded { movie_id: 1, result: Ok(vec![]) });
        state.apply(AdminEvent::SessionMovieChosen(None));
        assert!(state.screenings.is_empty());
        assert_eq!(state.session_movie, None);
    }

    #[test]
    fn tab_switch_clears_banner() {
        let mut state = AdminState::default();
        state.apply(AdminEvent::ScreeningCreated(Err("x".into())));
        assert!(state.banner.is_some());
        state.apply(AdminEvent::TabSelected(AdminTab::Movies));
        assert!(state.banner.is_none());
        assert!(state.is_loading);
    }

    #[test]
    fn create_form_validation() {
        let mut form = CreateScreeningForm::default();
        assert!(form.to_request().is_err());

        form.movie_id = Some(3);
        form.hall_id = Some(1);
        form.date = "2026-11-02T18:30".into();
        let request = form.to_request().unwrap();
        assert_eq!(request.price, 12.5);
        assert_eq!(request.start_time.format("%Y-%m-%d %H:%M").to_string(), "2026-11-02 18:30");

        form.price = "-1".into();
        assert!(form.to_request().is_err());
    }

    #[test]
    fn import_success_clears_input() {
        let mut state = AdminState { tmdb_id: "550".into(), ..Default::default() };
        state.apply(AdminEvent::MovieImported { tmdb_id: "550".into(), result: Ok(()) });
        assert!(state.tmdb_id.is_empty());
        assert_eq!(state.banner.unwrap().text, "Movie (ID: 550) imported successfully");
    }
}
