mod app;
mod cursor;
mod effects;
pub mod logging;
mod render;

pub use app::{run_app, AppConfig, RunOutcome};
