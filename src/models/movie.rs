use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, alias = "durationMin")]
    pub duration_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub tmdb_id: Option<i64>,
}

impl Movie {
    /// "2h 46m", либо "TBA" если длительность неизвестна.
    pub fn duration_label(&self) -> String {
        match self.duration_minutes {
            Some(mins) if mins > 0 => format!("{}h {}m", mins / 60, mins % 60),
            _ => "TBA".to_string(),
        }
    }

    /// Регистронезависимый поиск подстроки в названии или описании.
    pub fn matches(&self, lowered_query: &str) -> bool {
        self.title.to_lowercase().contains(lowered_query)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(lowered_query))
                .unwrap_or(false)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_server_movie_with_missing_fields() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 7, "title": "Dune", "durationMinutes": 166, "genres": null, "releaseDate": "2021-10-22"}"#,
        )
        .unwrap();
        assert_eq!(movie.id, 7);
        assert!(movie.genres.is_empty());
        assert_eq!(movie.duration_label(), "2h 46m");
        assert_eq!(movie.release_date, NaiveDate::from_ymd_opt(2021, 10, 22));
    }

    #[test]
    fn duration_label_for_unknown_runtime() {
        let movie: Movie = serde_json::from_str(r#"{"id": 1, "title": "X", "durationMin": 0}"#).unwrap();
        assert_eq!(movie.duration_label(), "TBA");
    }
}
