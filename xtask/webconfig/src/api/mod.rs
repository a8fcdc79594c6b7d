//! Client side of the configuration service's JSON/HTTP API.

mod client;
mod dispatch;
mod request;
mod types;

pub use client::{ConfigApi, HttpConfigApi, decode_body, decode_get};
pub use dispatch::Dispatcher;
pub use request::{ApiRequest, ApiResponse, Method, Outgoing, Reply, Ticket, View};
pub use types::*;
