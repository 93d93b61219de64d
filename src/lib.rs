pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod insight;
pub mod journal;
pub mod models;
pub mod sanitize;
pub mod state;
pub mod stats;
pub mod storage;
pub mod timer;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use journal::EntryLog;
pub use state::AppState;
pub use storage::{load_entries, resolve_data_path};
