//! Экран бронирования: схема зала, выбор мест, оплата, подтверждение.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::ViewError;
use crate::api::ApiClient;
use crate::booking::{
    submit_seats, BookingFlow, CheckoutReport, CountdownEvent, CountdownTimer, FlowError, PaymentForm,
    SelectionError, Step, Toggle,
};
use crate::models::{Movie, Screening};

pub struct BookingView {
    movie: Movie,
    flow: Arc<Mutex<BookingFlow>>,
    timer: Option<CountdownTimer>,
    events: Option<mpsc::UnboundedReceiver<CountdownEvent>>,
}

impl BookingView {
    /// Загружает фильм, сеанс и занятые места.
    pub async fn load(api: &ApiClient, movie_id: i64, screening_id: i64) -> Result<Self, ViewError> {
        let movie = api
            .movies()
            .await?
            .into_iter()
            .find(|m| m.id == movie_id)
            .ok_or(ViewError::NotFound("Movie"))?;

        let screening = api
            .screenings_for_movie(movie_id)
            .await?
            .into_iter()
            .find(|s| s.id == screening_id)
            .ok_or(ViewError::NotFound("Screening"))?;

        let booked = api.booked_seats(screening_id).await?;
        info!(
            "Booking view for '{}' screening {}: {} seats taken",
            movie.title,
            screening_id,
            booked.len()
        );

        Ok(Self::from_parts(movie, BookingFlow::new(screening, &booked)))
    }

    pub fn from_parts(movie: Movie, flow: BookingFlow) -> Self {
        Self { movie, flow: Arc::new(Mutex::new(flow)), timer: None, events: None }
    }

    pub fn movie(&self) -> &Movie {
        &self.movie
    }

    pub fn screening(&self) -> Screening {
        self.flow().screening().clone()
    }

    /// Доступ к состоянию потока для отрисовки.
    pub fn flow(&self) -> MutexGuard<'_, BookingFlow> {
        self.flow.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn toggle(&mut self, seat_id: &str) -> Result<Toggle, SelectionError> {
        let result = self.flow().toggle(seat_id);
        self.sync_timer();
        result
    }

    pub fn proceed_to_payment(&mut self) -> Result<(), FlowError> {
        let result = self.flow().proceed_to_payment();
        self.sync_timer();
        result
    }

    pub fn back_to_seats(&mut self) -> Result<(), FlowError> {
        let result = self.flow().back_to_seats();
        self.sync_timer();
        result
    }

    /// Оплата: по одному запросу на место, последовательно.
    pub async fn pay(&mut self, api: &ApiClient, card: &PaymentForm) -> Result<CheckoutReport, FlowError> {
        let (screening_id, seats) = {
            let mut flow = self.flow();
            let seats = flow.begin_payment(card)?;
            (flow.screening().id, seats)
        };

        let report = submit_seats(api, screening_id, &seats).await;
        if let Some(message) = report.summary() {
            warn!("{} committed={:?} failed={:?}", message, report.committed(), report.failed());
        }

        let step = self.flow().finish_payment(report.clone());
        if step == Step::Confirmation {
            info!("Booking confirmed for '{}'", self.movie.title);
        }
        self.sync_timer();
        Ok(report)
    }

    /// События таймера, накопившиеся с прошлого вызова.
    pub fn drain_events(&mut self) -> Vec<CountdownEvent> {
        let mut drained = Vec::new();
        if let Some(events) = self.events.as_mut() {
            while let Ok(event) = events.try_recv() {
                drained.push(event);
            }
        }
        drained
    }

    pub fn timer_active(&self) -> bool {
        self.timer.as_ref().map(CountdownTimer::is_active).unwrap_or(false)
    }

    /// Запускает таймер, если отсчёт нужен, и снимает, если нет.
    fn sync_timer(&mut self) {
        let needed = self.flow().needs_countdown();
        if needed && !self.timer_active() {
            let (timer, events) = CountdownTimer::start(self.flow.clone());
            self.timer = Some(timer);
            self.events = Some(events);
        } else if !needed {
            if let Some(timer) = self.timer.take() {
                timer.stop();
            }
        }
    }
}
