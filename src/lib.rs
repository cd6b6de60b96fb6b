pub mod app;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::ServerConfig;
pub use state::AppState;
pub use storage::load_records;
