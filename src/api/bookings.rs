use serde_json::Value;

use super::{list_or_empty, ApiClient};
use crate::error::ApiResult;
use crate::models::{BookingRequest, Ticket};

impl ApiClient {
    /// POST /bookings: одно место. Любой 2xx значит, что место записано;
    /// билет в ответе необязателен.
    pub async fn book_seat(&self, request: &BookingRequest) -> ApiResult<Option<Ticket>> {
        let booked: Option<Value> = self.submit("/bookings", request).await?;
        Ok(booked.and_then(|v| serde_json::from_value(v).ok()))
    }

    /// GET /bookings/my
    pub async fn my_tickets(&self) -> ApiResult<Vec<Ticket>> {
        list_or_empty(self.fetch::<Value>("/bookings/my").await?)
    }
}
