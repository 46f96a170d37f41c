pub mod app;
pub mod cart;
pub mod climate;
pub mod config;
pub mod donation;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod ticker;
pub mod trees;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::{AppState, EcoState};
pub use storage::{load_store, resolve_data_path};
