use tracing::{error, info};

use crate::api::ApiClient;
use crate::models::Movie;

/// Фильтр каталога: подстрока в названии или описании без учёта регистра.
/// Пустой запрос возвращает весь список.
pub fn filter_movies(movies: &[Movie], query: &str) -> Vec<Movie> {
    let query = query.trim();
    if query.is_empty() {
        return movies.to_vec();
    }
    let lowered = query.to_lowercase();
    movies.iter().filter(|m| m.matches(&lowered)).cloned().collect()
}

#[derive(Debug, Default)]
pub struct CatalogView {
    pub movies: Vec<Movie>,
    pub filtered: Vec<Movie>,
    pub query: String,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CatalogView {
    pub async fn load(&mut self, api: &ApiClient) {
        self.is_loading = true;
        match api.movies().await {
            Ok(movies) => {
                info!("Catalog loaded: {} movies", movies.len());
                self.filtered = filter_movies(&movies, &self.query);
                self.movies = movies;
                self.error = None;
            }
            Err(e) => {
                error!("Failed to fetch catalog: {}", e);
                self.error = Some(e.to_string());
            }
        }
        self.is_loading = false;
    }

    pub fn search(&mut self, query: &str) -> &[Movie] {
        self.query = query.to_string();
        self.filtered = filter_movies(&self.movies, query);
        &self.filtered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn movie(id: i64, title: &str, description: Option<&str>) -> Movie {
        serde_json::from_value(serde_json::json!({
            "id": id, "title": title, "description": description
        }))
        .unwrap()
    }

    #[test]
    fn dune_scenario() {
        let mut view = CatalogView { movies: vec![movie(1, "Dune", None)], ..Default::default() };
        assert_eq!(view.search("dun").iter().map(|m| m.id).collect::<Vec<_>>(), vec![1]);
        assert!(view.search("xyz").is_empty());
        assert_eq!(view.search("   ").len(), 1);
    }

    #[test]
    fn matches_description_case_insensitively() {
        let movies = vec![
            movie(1, "Alien", Some("In space no one can hear you SCREAM")),
            movie(2, "Heat", None),
        ];
        let found = filter_movies(&movies, "scream");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
    }

    #[test]
    fn every_movie_matches_its_own_title() {
        let movies: Vec<Movie> = (0..20)
            .map(|i| movie(i, &Sentence(1..4).fake::<String>(), Some(&Sentence(3..8).fake::<String>())))
            .collect();
        for m in &movies {
            let hits = filter_movies(&movies, &m.title.to_uppercase());
            assert!(hits.iter().any(|h| h.id == m.id));
        }
    }
}
