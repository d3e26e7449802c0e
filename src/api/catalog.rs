use serde_json::Value;

use super::{list_or_empty, ApiClient};
use crate::error::ApiResult;
use crate::models::{BookedSeat, Movie, Screening};

impl ApiClient {
    /// GET /movies: весь каталог.
    pub async fn movies(&self) -> ApiResult<Vec<Movie>> {
        list_or_empty(self.fetch::<Value>("/movies").await?)
    }

    /// GET /screenings?movieId=
    pub async fn screenings_for_movie(&self, movie_id: i64) -> ApiResult<Vec<Screening>> {
        let query = serde_urlencoded::to_string(&[("movieId", movie_id)])
            .map_err(|e| crate::error::ApiError::InvalidUrl(e.to_string()))?;
        list_or_empty(self.fetch::<Value>(&format!("/screenings?{}", query)).await?)
    }

    /// GET /screenings/{id}/seats: уже занятые пары (ряд, место).
    pub async fn booked_seats(&self, screening_id: i64) -> ApiResult<Vec<BookedSeat>> {
        list_or_empty(self.fetch::<Value>(&format!("/screenings/{}/seats", screening_id)).await?)
    }
}
