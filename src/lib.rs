pub mod app;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod rolling_log;
pub mod state;
pub mod stats;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use ledger::{Ledger, UpdateOutcome};
pub use state::AppState;
