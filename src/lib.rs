pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod state;
pub mod stats;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::{AppState, CalendarSession, SessionSettings};
pub use storage::{FileStorage, MemoryStorage, RecordStorage};
pub use store::AttendanceStore;
