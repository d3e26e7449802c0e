pub mod api;
pub mod app;
pub mod booking;
pub mod config;
pub mod error;
pub mod models;
pub mod router;
pub mod session;
pub mod views;

pub use app::App;
