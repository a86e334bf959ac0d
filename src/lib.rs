pub mod app;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod day_key;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod rollover;
pub mod state;
pub mod store;
pub mod summary;
pub mod tracker;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use tracker::Tracker;
