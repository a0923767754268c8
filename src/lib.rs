pub mod analysis;
pub mod app;
pub mod bounds;
pub mod chart;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod state;
pub mod ui;
pub mod weeks;

pub use analysis::analyze;
pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
