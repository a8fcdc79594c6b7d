pub mod api;
pub mod cli;
pub mod config;
pub mod error;
mod log;
pub mod ui;

pub use error::{Result, WebConfigError};
