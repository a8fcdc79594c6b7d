pub mod handler;

pub use handler::{Action, EventHandler, EventResult};
