use chrono::NaiveDateTime;
use tracing::error;

use super::ViewError;
use crate::api::ApiClient;
use crate::models::{Movie, Screening};

/// Формат заголовка дня: "Sun, Oct 18".
pub const DATE_LABEL: &str = "%a, %b %-d";
pub const TIME_LABEL: &str = "%H:%M";

#[derive(Debug, Clone, PartialEq)]
pub struct ShowtimeGroup {
    pub date_label: String,
    pub screenings: Vec<Screening>,
}

/// Только будущие сеансы, по возрастанию времени, сгруппированные по дате
/// в порядке первого появления.
pub fn upcoming_showtimes(screenings: &[Screening], now: NaiveDateTime) -> Vec<ShowtimeGroup> {
    let mut future: Vec<&Screening> = screenings.iter().filter(|s| s.start_time > now).collect();
    future.sort_by_key(|s| s.start_time);

    let mut groups: Vec<ShowtimeGroup> = Vec::new();
    for screening in future {
        let label = screening.start_time.format(DATE_LABEL).to_string();
        match groups.iter_mut().find(|g| g.date_label == label) {
            Some(group) => group.screenings.push(screening.clone()),
            None => groups.push(ShowtimeGroup { date_label: label, screenings: vec![screening.clone()] }),
        }
    }
    groups
}

#[derive(Debug, Default)]
pub struct MovieDetailView {
    pub movie: Option<Movie>,
    pub showtimes: Vec<ShowtimeGroup>,
}

impl MovieDetailView {
    pub async fn load(api: &ApiClient, movie_id: i64, now: NaiveDateTime) -> Result<Self, ViewError> {
        let movies = api.movies().await?;
        let movie = movies
            .into_iter()
            .find(|m| m.id == movie_id)
            .ok_or(ViewError::NotFound("Movie"))?;

        let screenings = api.screenings_for_movie(movie_id).await.map_err(|e| {
            error!("Failed to load screenings for movie {}: {}", movie_id, e);
            e
        })?;

        Ok(Self { showtimes: upcoming_showtimes(&screenings, now), movie: Some(movie) })
    }

    pub fn has_showtimes(&self) -> bool {
        !self.showtimes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(id: i64, start: NaiveDateTime) -> Screening {
        Screening {
            id,
            movie_id: 1,
            cinema_id: None,
            hall_id: 1,
            hall_name: None,
            start_time: start,
            price: 10.0,
            presentation: Default::default(),
            rows: None,
            seats_per_row: None,
        }
    }

    #[test]
    fn keeps_only_future_sorted_and_grouped() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let screenings = vec![
            at(3, now + Duration::days(1)),
            at(1, now - Duration::hours(1)),
            at(2, now + Duration::hours(1)),
            at(4, now + Duration::hours(2)),
            at(5, now),
        ];

        let groups = upcoming_showtimes(&screenings, now);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date_label, "Sun, Oct 18");
        assert_eq!(groups[0].screenings.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(groups[1].date_label, "Mon, Oct 19");
        assert_eq!(groups[1].screenings[0].id, 3);
    }

    #[test]
    fn nothing_upcoming() {
        let now = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert!(upcoming_showtimes(&[at(1, now - Duration::minutes(5))], now).is_empty());
    }
}
