pub mod user;
pub mod movie;
pub mod screening;
pub mod seat;
pub mod ticket;
pub mod stats;

pub use user::{Identity, Role};
pub use movie::Movie;
pub use screening::{CreateScreeningRequest, Hall, PresentationType, Screening};
pub use seat::{BookedSeat, BookingRequest, Seat, SeatStatus};
pub use ticket::{Ticket, TicketView};
pub use stats::AdminStats;
