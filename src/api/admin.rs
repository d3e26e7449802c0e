use serde_json::{json, Value};

use super::{list_or_empty, ApiClient};
use crate::error::ApiResult;
use crate::models::{AdminStats, CreateScreeningRequest, Hall, Movie, Screening};

impl ApiClient {
    /// GET /admin/stats
    pub async fn admin_stats(&self) -> ApiResult<AdminStats> {
        Ok(self.fetch("/admin/stats").await?.unwrap_or_default())
    }

    /// GET /admin/halls
    pub async fn halls(&self) -> ApiResult<Vec<Hall>> {
        list_or_empty(self.fetch::<Value>("/admin/halls").await?)
    }

    /// DELETE /admin/movies/{id}. Сеансы фильма сервер удаляет каскадно.
    pub async fn delete_movie(&self, movie_id: i64) -> ApiResult<()> {
        self.remove(&format!("/admin/movies/{}", movie_id)).await
    }

    /// DELETE /admin/screenings/{id}
    pub async fn delete_screening(&self, screening_id: i64) -> ApiResult<()> {
        self.remove(&format!("/admin/screenings/{}", screening_id)).await
    }

    /// POST /admin/movies/import/tmdb/{id}
    pub async fn import_tmdb_movie(&self, tmdb_id: u64) -> ApiResult<Option<Movie>> {
        let imported: Option<Value> = self
            .submit(&format!("/admin/movies/import/tmdb/{}", tmdb_id), &json!({}))
            .await?;
        // сервер может вернуть фильм, а может и пустой объект
        Ok(imported.and_then(|v| serde_json::from_value(v).ok()))
    }

    /// POST /admin/screenings
    pub async fn create_screening(&self, request: &CreateScreeningRequest) -> ApiResult<Option<Screening>> {
        let created: Option<Value> = self.submit("/admin/screenings", request).await?;
        Ok(created.and_then(|v| serde_json::from_value(v).ok()))
    }
}
