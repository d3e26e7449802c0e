use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::screening::optional_local_date_time;

/// Билет в том виде, в каком его отдаёт сервер (POST /bookings, GET /bookings/my).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: i64,
    #[serde(default)]
    pub screening_id: Option<i64>,
    #[serde(default)]
    pub row_index: Option<u32>,
    #[serde(default)]
    pub seat_index: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_booked: Option<bool>,
    #[serde(default)]
    pub movie_title: Option<String>,
    #[serde(default, deserialize_with = "optional_local_date_time")]
    pub screening_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "optional_local_date_time")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub hall_name: Option<String>,
}

/// Билет, подготовленный для отображения.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketView {
    pub id: String,
    pub movie_title: String,
    pub start_time: Option<NaiveDateTime>,
    pub hall_name: String,
    pub row: String,
    pub number: u32,
    pub price: Option<f64>,
    pub status: String,
}

/// 0 -> "A", 1 -> "B", ...
pub fn row_letter(row_index: u32) -> String {
    char::from_u32('A' as u32 + row_index)
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string())
}

impl From<Ticket> for TicketView {
    fn from(t: Ticket) -> Self {
        let status = t.status.unwrap_or_else(|| match t.is_booked {
            Some(false) => "cancelled".to_string(),
            _ => "booked".to_string(),
        });
        TicketView {
            id: t.id.to_string(),
            movie_title: t.movie_title.unwrap_or_else(|| "Unknown movie".to_string()),
            start_time: t.screening_time.or(t.start_time),
            hall_name: t.hall_name.unwrap_or_default(),
            row: t.row_index.map(row_letter).unwrap_or_else(|| "?".to_string()),
            number: t.seat_index.unwrap_or(0),
            price: t.price,
            status,
        }
    }
}

impl TicketView {
    /// Короткий номер для корешка билета.
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(8) {
            Some((cut, _)) => &self.id[..cut],
            None => &self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_uses_screening_time_and_row_letter() {
        let ticket: Ticket = serde_json::from_str(
            r#"{"id":123456789012,"screeningId":4,"rowIndex":7,"seatIndex":3,"isBooked":true,
                "movieTitle":"Dune","screeningTime":"2026-10-20T21:00:00","hallName":"IMAX 1"}"#,
        )
        .unwrap();
        let view = TicketView::from(ticket);
        assert_eq!(view.row, "H");
        assert_eq!(view.number, 3);
        assert_eq!(view.status, "booked");
        assert_eq!(view.short_id(), "12345678");
        assert_eq!(view.start_time.unwrap().format("%H:%M").to_string(), "21:00");
    }

    #[test]
    fn view_tolerates_sparse_ticket() {
        let ticket: Ticket = serde_json::from_str(r#"{"id":5}"#).unwrap();
        let view = TicketView::from(ticket);
        assert_eq!(view.row, "?");
        assert_eq!(view.number, 0);
        assert_eq!(view.short_id(), "5");
    }
}
