use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Occupied,
    Selected,
    Vip,
    Locked,
}

/// Место в зале. Не хранится на сервере, строится на клиенте для каждого сеанса.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seat {
    /// "A1".."H10"
    pub id: String,
    pub row: char,
    pub number: u32,
    pub row_index: u32,
    /// Номер кресла в ряду, начиная с 1; именно он уходит в POST /bookings.
    pub seat_index: u32,
    pub status: SeatStatus,
    pub price_modifier: f64,
}

impl Seat {
    pub fn is_vip(&self) -> bool {
        self.price_modifier > 1.0
    }

    pub fn is_bookable(&self) -> bool {
        !matches!(self.status, SeatStatus::Occupied | SeatStatus::Locked)
    }

    pub fn price(&self, base_price: f64) -> f64 {
        base_price * self.price_modifier
    }
}

/// Уже занятая пара (ряд, место) из GET /screenings/{id}/seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSeat {
    pub row_index: u32,
    pub seat_index: u32,
}

/// Тело POST /bookings: одно место за запрос.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub screening_id: i64,
    pub row_index: u32,
    pub seat_index: u32,
}
