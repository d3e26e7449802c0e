//! Фоновая задача обратного отсчёта: раз в секунду вызывает `BookingFlow::tick`.
//!
//! Задача завершается сама, когда отсчёт больше не нужен (выбор пуст или шаг
//! сменился), и снимается при удалении `CountdownTimer`.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::flow::{BookingFlow, TickOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Tick(u32),
    Expired,
}

pub struct CountdownTimer {
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn start(flow: Arc<Mutex<BookingFlow>>) -> (Self, mpsc::UnboundedReceiver<CountdownEvent>) {
        Self::start_with_period(flow, Duration::from_secs(1))
    }

    pub fn start_with_period(
        flow: Arc<Mutex<BookingFlow>>,
        period: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<CountdownEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let outcome = flow.lock().unwrap_or_else(|e| e.into_inner()).tick();
                match outcome {
                    TickOutcome::Running(remaining) => {
                        let _ = tx.send(CountdownEvent::Tick(remaining));
                    }
                    TickOutcome::Expired => {
                        let _ = tx.send(CountdownEvent::Expired);
                        break;
                    }
                    TickOutcome::Idle => break,
                }
            }
            debug!("Countdown task finished");
        });

        (Self { handle }, rx)
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Снимает задачу сразу, не дожидаясь drop.
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
