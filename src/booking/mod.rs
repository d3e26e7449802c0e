pub mod checkout;
pub mod flow;
pub mod payment;
pub mod seat_map;
pub mod timer;

pub use checkout::{submit_seats, CheckoutReport, SeatBooker, SeatOutcome, SeatResult, CHECKOUT_FAILED};
pub use flow::{BookingFlow, FlowError, SelectionError, Step, TickOutcome, Toggle, HOLD_SECONDS, MAX_SELECTION};
pub use payment::PaymentForm;
pub use seat_map::SeatMap;
pub use timer::{CountdownEvent, CountdownTimer};
