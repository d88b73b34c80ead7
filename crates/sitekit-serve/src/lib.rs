//! Minimal static file server: one blocking connection at a time, a fixed
//! extension map, and an optional delayed browser launch.

pub mod browser;
mod error;
pub mod http;
pub mod mime;
mod server;
mod shutdown;

pub use browser::{open_url_in_default_browser, schedule_browser_open, spawn_delayed};
pub use error::ServeError;
pub use mime::{FALLBACK_CONTENT_TYPE, MimeMap};
pub use server::{ProgressMode, ServerConfig, StaticServer};
pub use shutdown::ShutdownSignal;
