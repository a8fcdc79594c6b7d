pub mod app;
pub mod events;
pub mod rendering;
pub mod state;
pub mod utils;

pub use app::WebConfigApp;
pub use events::{Action, EventHandler, EventResult};
pub use rendering::Theme;
pub use state::{Tab, WebConfigState};
