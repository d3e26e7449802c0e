//! Машина состояний бронирования: `Seats -> Payment -> Confirmation`.
//!
//! В `Seats` пользователь выбирает до шести мест; пока выбор не пуст, идёт
//! обратный отсчёт в 300 секунд. По истечении выбор сбрасывается, счётчик
//! возвращается к 300. На сервере при этом ничего не освобождается: места
//! не блокируются до оплаты.

use thiserror::Error;
use tracing::{debug, info, warn};
use validator::{Validate, ValidationErrors};

use super::checkout::CheckoutReport;
use super::payment::PaymentForm;
use super::seat_map::SeatMap;
use crate::models::{BookedSeat, BookingRequest, Screening, Seat};

pub const MAX_SELECTION: usize = 6;
pub const HOLD_SECONDS: u32 = 300;
pub const EXPIRED_NOTICE: &str = "Reservation time expired";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Seats,
    Payment,
    Confirmation,
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("Seat {0} is not available")]
    Unavailable(String),
    #[error("Max {max} seats per booking")]
    LimitReached { max: usize },
    #[error("Unknown seat {0}")]
    UnknownSeat(String),
    #[error("Seats can only be changed while choosing seats")]
    WrongStep,
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Select at least one seat first")]
    EmptySelection,
    #[error("Action not allowed in step {0:?}")]
    WrongStep(Step),
    #[error("Payment is already being processed")]
    AlreadyProcessing,
    #[error("Invalid payment details: {0}")]
    InvalidPayment(#[from] ValidationErrors),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Отсчёт не нужен (пустой выбор или другой шаг).
    Idle,
    Running(u32),
    /// Время вышло, выбор очищен.
    Expired,
}

/// Обратный отсчёт удержания выбора.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    fn new() -> Self {
        Self { remaining: HOLD_SECONDS, running: false }
    }

    fn reset(&mut self) {
        self.remaining = HOLD_SECONDS;
        self.running = false;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

pub fn format_seconds(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone)]
pub struct BookingFlow {
    screening: Screening,
    seat_map: SeatMap,
    selected: Vec<String>,
    step: Step,
    countdown: Countdown,
    processing: bool,
    last_report: Option<CheckoutReport>,
}

impl BookingFlow {
    pub fn new(screening: Screening, booked: &[BookedSeat]) -> Self {
        Self::with_seat_map(screening, SeatMap::new(booked))
    }

    pub fn with_seat_map(screening: Screening, seat_map: SeatMap) -> Self {
        Self {
            screening,
            seat_map,
            selected: Vec::new(),
            step: Step::Seats,
            countdown: Countdown::new(),
            processing: false,
            last_report: None,
        }
    }

    pub fn screening(&self) -> &Screening {
        &self.screening
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn countdown(&self) -> Countdown {
        self.countdown
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn last_report(&self) -> Option<&CheckoutReport> {
        self.last_report.as_ref()
    }

    pub fn selected_ids(&self) -> &[String] {
        &self.selected
    }

    /// Выбранные места в порядке выбора.
    pub fn selected_seats(&self) -> Vec<&Seat> {
        self.selected.iter().filter_map(|id| self.seat_map.get(id)).collect()
    }

    /// Сумма: базовая цена сеанса x множитель каждого места.
    pub fn total_price(&self) -> f64 {
        self.selected_seats().iter().map(|s| s.price(self.screening.price)).sum()
    }

    pub fn format_remaining(&self) -> String {
        format_seconds(self.countdown.remaining)
    }

    pub fn can_proceed(&self) -> bool {
        self.step == Step::Seats && !self.selected.is_empty()
    }

    pub fn toggle(&mut self, seat_id: &str) -> Result<Toggle, SelectionError> {
        if self.step != Step::Seats {
            return Err(SelectionError::WrongStep);
        }
        let seat = self
            .seat_map
            .get(seat_id)
            .ok_or_else(|| SelectionError::UnknownSeat(seat_id.to_string()))?;
        if !seat.is_bookable() {
            return Err(SelectionError::Unavailable(seat_id.to_string()));
        }

        let result = if let Some(pos) = self.selected.iter().position(|id| id == seat_id) {
            self.selected.remove(pos);
            Toggle::Removed
        } else {
            if self.selected.len() >= MAX_SELECTION {
                warn!("Selection limit reached, {} rejected", seat_id);
                return Err(SelectionError::LimitReached { max: MAX_SELECTION });
            }
            self.selected.push(seat_id.to_string());
            Toggle::Added
        };

        debug!("{:?} {}, selection = {:?}", result, seat_id, self.selected);
        self.sync_countdown();
        Ok(result)
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
        self.sync_countdown();
    }

    /// Один тик в секунду.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.needs_countdown() {
            self.countdown.reset();
            return TickOutcome::Idle;
        }

        self.countdown.running = true;
        self.countdown.remaining = self.countdown.remaining.saturating_sub(1);

        if self.countdown.remaining == 0 {
            info!("Hold expired, dropping {} selected seats", self.selected.len());
            self.selected.clear();
            self.countdown.reset();
            return TickOutcome::Expired;
        }
        TickOutcome::Running(self.countdown.remaining)
    }

    pub fn proceed_to_payment(&mut self) -> Result<(), FlowError> {
        if self.step != Step::Seats {
            return Err(FlowError::WrongStep(self.step));
        }
        if self.selected.is_empty() {
            return Err(FlowError::EmptySelection);
        }
        self.step = Step::Payment;
        self.sync_countdown();
        Ok(())
    }

    pub fn back_to_seats(&mut self) -> Result<(), FlowError> {
        if self.step != Step::Payment {
            return Err(FlowError::WrongStep(self.step));
        }
        if self.processing {
            return Err(FlowError::AlreadyProcessing);
        }
        self.step = Step::Seats;
        self.sync_countdown();
        Ok(())
    }

    /// Проверяет карту и переводит поток в режим обработки.
    /// Возвращает места, которые нужно забронировать.
    pub fn begin_payment(&mut self, card: &PaymentForm) -> Result<Vec<Seat>, FlowError> {
        if self.step != Step::Payment {
            return Err(FlowError::WrongStep(self.step));
        }
        if self.processing {
            return Err(FlowError::AlreadyProcessing);
        }
        if self.selected.is_empty() {
            return Err(FlowError::EmptySelection);
        }
        card.validate()?;

        self.processing = true;
        Ok(self.selected_seats().into_iter().cloned().collect())
    }

    /// Применяет результат оформления. Подтверждение только если записаны все места.
    pub fn finish_payment(&mut self, report: CheckoutReport) -> Step {
        self.processing = false;
        if report.all_committed() {
            info!("Checkout complete: {} seats", report.results.len());
            self.step = Step::Confirmation;
        }
        self.last_report = Some(report);
        self.step
    }

    /// Запросы, которые уйдут на сервер при оплате.
    pub fn booking_requests(&self) -> Vec<BookingRequest> {
        self.selected_seats()
            .into_iter()
            .map(|s| BookingRequest {
                screening_id: self.screening.id,
                row_index: s.row_index,
                seat_index: s.seat_index,
            })
            .collect()
    }

    pub fn needs_countdown(&self) -> bool {
        self.step == Step::Seats && !self.selected.is_empty()
    }

    fn sync_countdown(&mut self) {
        if self.needs_countdown() {
            self.countdown.running = true;
        } else {
            self.countdown.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::checkout::{SeatOutcome, SeatResult};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn screening(price: f64) -> Screening {
        Screening {
            id: 77,
            movie_id: 1,
            cinema_id: None,
            hall_id: 2,
            hall_name: Some("Red".into()),
            start_time: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap().and_hms_opt(20, 0, 0).unwrap(),
            price,
            presentation: Default::default(),
            rows: Some(8),
            seats_per_row: Some(10),
        }
    }

    fn flow() -> BookingFlow {
        BookingFlow::new(screening(10.0), &[BookedSeat { row_index: 0, seat_index: 1 }])
    }

    fn card() -> PaymentForm {
        PaymentForm {
            cardholder: "A".into(),
            card_number: "4000000000000002".into(),
            expiry: "01/30".into(),
            cvc: "999".into(),
        }
    }

    fn seat_ids() -> Vec<String> {
        SeatMap::new(&[]).seats().iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn occupied_seat_cannot_be_selected() {
        let mut f = flow();
        assert_eq!(f.toggle("A1"), Err(SelectionError::Unavailable("A1".into())));
        assert!(f.selected_ids().is_empty());
        assert_eq!(f.toggle("Z9"), Err(SelectionError::UnknownSeat("Z9".into())));
    }

    #[test]
    fn seventh_seat_is_rejected_without_change() {
        let mut f = flow();
        for id in ["B1", "B2", "B3", "B4", "B5", "B6"] {
            assert_eq!(f.toggle(id), Ok(Toggle::Added));
        }
        let before = f.selected_ids().to_vec();
        assert_eq!(f.toggle("B7"), Err(SelectionError::LimitReached { max: 6 }));
        assert_eq!(f.selected_ids(), before.as_slice());
        // снять выбор можно всегда
        assert_eq!(f.toggle("B1"), Ok(Toggle::Removed));
        assert_eq!(f.toggle("B7"), Ok(Toggle::Added));
    }

    #[test]
    fn vip_row_costs_one_and_a_half() {
        let mut f = flow();
        f.toggle("A2").unwrap();
        f.toggle("H1").unwrap();
        f.toggle("H2").unwrap();
        assert!((f.total_price() - (10.0 + 15.0 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn countdown_expires_after_300_ticks() {
        let mut f = flow();
        assert_eq!(f.tick(), TickOutcome::Idle);
        f.toggle("C3").unwrap();
        assert!(f.countdown().is_running());

        for expected in (1..HOLD_SECONDS).rev() {
            assert_eq!(f.tick(), TickOutcome::Running(expected));
        }
        assert_eq!(f.format_remaining(), "0:01");
        assert_eq!(f.tick(), TickOutcome::Expired);
        assert!(f.selected_ids().is_empty());
        assert_eq!(f.countdown().remaining(), HOLD_SECONDS);
        assert_eq!(f.tick(), TickOutcome::Idle);
    }

    #[test]
    fn emptying_selection_halts_and_rearms() {
        let mut f = flow();
        f.toggle("C3").unwrap();
        for _ in 0..10 {
            f.tick();
        }
        assert_eq!(f.countdown().remaining(), 290);
        f.toggle("C3").unwrap();
        assert!(!f.countdown().is_running());
        assert_eq!(f.countdown().remaining(), HOLD_SECONDS);
        assert_eq!(f.tick(), TickOutcome::Idle);
        assert_eq!(f.countdown().remaining(), HOLD_SECONDS);
        assert_eq!(f.format_remaining(), "5:00");
    }

    #[test]
    fn payment_requires_selection_and_stops_countdown() {
        let mut f = flow();
        assert!(matches!(f.proceed_to_payment(), Err(FlowError::EmptySelection)));
        f.toggle("D4").unwrap();
        f.tick();
        f.proceed_to_payment().unwrap();
        assert_eq!(f.step(), Step::Payment);
        assert!(!f.countdown().is_running());
        assert_eq!(f.tick(), TickOutcome::Idle);
        assert_eq!(f.toggle("D5"), Err(SelectionError::WrongStep));

        f.back_to_seats().unwrap();
        assert!(f.countdown().is_running());
        assert_eq!(f.countdown().remaining(), HOLD_SECONDS);
    }

    #[test]
    fn partial_checkout_stays_in_payment() {
        let mut f = flow();
        f.toggle("E1").unwrap();
        f.toggle("E2").unwrap();
        f.proceed_to_payment().unwrap();

        assert!(matches!(f.begin_payment(&PaymentForm::default()), Err(FlowError::InvalidPayment(_))));
        let seats = f.begin_payment(&card()).unwrap();
        assert_eq!(seats.len(), 2);
        assert!(matches!(f.begin_payment(&card()), Err(FlowError::AlreadyProcessing)));

        let requests = f.booking_requests();
        let report = CheckoutReport {
            results: vec![
                SeatResult { seat_id: "E1".into(), request: requests[0], outcome: SeatOutcome::Committed(None) },
                SeatResult { seat_id: "E2".into(), request: requests[1], outcome: SeatOutcome::Failed("409".into()) },
            ],
        };
        assert_eq!(f.finish_payment(report), Step::Payment);
        assert!(!f.is_processing());
        assert_eq!(f.last_report().unwrap().failed(), vec!["E2"]);
    }

    #[test]
    fn full_checkout_confirms() {
        let mut f = flow();
        f.toggle("H5").unwrap();
        f.proceed_to_payment().unwrap();
        f.begin_payment(&card()).unwrap();
        let request = f.booking_requests()[0];
        assert_eq!((request.row_index, request.seat_index, request.screening_id), (7, 5, 77));
        let report = CheckoutReport {
            results: vec![SeatResult { seat_id: "H5".into(), request, outcome: SeatOutcome::Committed(None) }],
        };
        assert_eq!(f.finish_payment(report), Step::Confirmation);
        assert!(f.back_to_seats().is_err());
    }

    proptest! {
        #[test]
        fn selection_never_exceeds_cap(picks in proptest::collection::vec(0usize..80, 0..60)) {
            let ids = seat_ids();
            let mut f = flow();
            for i in picks {
                let _ = f.toggle(&ids[i]);
                prop_assert!(f.selected_ids().len() <= MAX_SELECTION);
            }
        }

        #[test]
        fn total_matches_multipliers(picks in proptest::collection::vec(0usize..80, 0..12), price in 1.0f64..50.0) {
            let ids = seat_ids();
            let mut f = BookingFlow::new(screening(price), &[]);
            for i in picks {
                let _ = f.toggle(&ids[i]);
            }
            let expected: f64 = f
                .selected_ids()
                .iter()
                .map(|id| if id.starts_with('H') { price * 1.5 } else { price })
                .sum();
            prop_assert!((f.total_price() - expected).abs() < 1e-6);
        }
    }
}
