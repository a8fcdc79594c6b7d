pub mod commands;
pub mod menu;
pub mod query;
pub mod saveconfig;

pub use commands::*;
pub use menu::*;
pub use query::*;
pub use saveconfig::*;
