pub mod app;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod explorer;
pub mod filters;
pub mod handlers;
pub mod loader;
pub mod models;
pub mod pager;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use loader::Loader;
pub use state::AppState;
