//! Оформление заказа: по одному POST /bookings на каждое выбранное место.
//!
//! Запросы идут строго последовательно. Атомарности нет: если место k не
//! удалось забронировать, места до него уже записаны на сервере и не
//! откатываются. Поэтому результат: упорядоченный список независимых
//! исходов по каждому месту, а не один флаг.

use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, ApiResult};
use crate::models::{BookingRequest, Seat, Ticket};

/// Сообщение пользователю при любой неполной оплате.
pub const CHECKOUT_FAILED: &str = "Booking failed. Some seats may have been taken.";

/// То, через что бронируется одно место.
#[allow(async_fn_in_trait)]
pub trait SeatBooker {
    async fn book(&self, request: BookingRequest) -> ApiResult<Option<Ticket>>;
}

impl SeatBooker for ApiClient {
    async fn book(&self, request: BookingRequest) -> ApiResult<Option<Ticket>> {
        self.book_seat(&request).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeatOutcome {
    Committed(Option<Ticket>),
    Failed(String),
    /// Не отправлялось: сессия потеряна раньше.
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeatResult {
    pub seat_id: String,
    pub request: BookingRequest,
    pub outcome: SeatOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutReport {
    pub results: Vec<SeatResult>,
}

impl CheckoutReport {
    pub fn all_committed(&self) -> bool {
        !self.results.is_empty()
            && self.results.iter().all(|r| matches!(r.outcome, SeatOutcome::Committed(_)))
    }

    pub fn committed(&self) -> Vec<&str> {
        self.filter(|o| matches!(o, SeatOutcome::Committed(_)))
    }

    pub fn failed(&self) -> Vec<&str> {
        self.filter(|o| matches!(o, SeatOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.filter(|o| matches!(o, SeatOutcome::Skipped))
    }

    /// Грубое сообщение для пользователя, без разбивки по местам.
    pub fn summary(&self) -> Option<&'static str> {
        (!self.all_committed()).then_some(CHECKOUT_FAILED)
    }

    fn filter(&self, pred: impl Fn(&SeatOutcome) -> bool) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| pred(&r.outcome))
            .map(|r| r.seat_id.as_str())
            .collect()
    }
}

/// Бронирует места по очереди, дожидаясь каждого ответа.
pub async fn submit_seats<B: SeatBooker>(booker: &B, screening_id: i64, seats: &[Seat]) -> CheckoutReport {
    let mut results = Vec::with_capacity(seats.len());
    let mut unauthorized = false;

    for seat in seats {
        let request = BookingRequest {
            screening_id,
            row_index: seat.row_index,
            seat_index: seat.seat_index,
        };

        if unauthorized {
            results.push(SeatResult { seat_id: seat.id.clone(), request, outcome: SeatOutcome::Skipped });
            continue;
        }

        let outcome = match booker.book(request).await {
            Ok(ticket) => {
                info!("Seat {} booked for screening {}", seat.id, screening_id);
                SeatOutcome::Committed(ticket)
            }
            Err(ApiError::Unauthorized) => {
                // без сессии остальные запросы бессмысленны
                warn!("Session lost while booking seat {}", seat.id);
                unauthorized = true;
                SeatOutcome::Failed(ApiError::Unauthorized.to_string())
            }
            Err(e) => {
                error!("Seat {} booking failed: {}", seat.id, e);
                SeatOutcome::Failed(e.to_string())
            }
        };
        results.push(SeatResult { seat_id: seat.id.clone(), request, outcome });
    }

    CheckoutReport { results }
}
