// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod board;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod game;
pub mod input;
pub mod logging;
pub mod runtime;
pub mod timer;

pub use error::{Error, Result};
