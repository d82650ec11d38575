//! # console-session
//!
//! Session and access-control core for the ERP administration console's
//! Leptos + WASM frontend.
//!
//! This crate holds the authenticated-session store with persisted-credential
//! rehydration, the route guard run before every navigation, the REST
//! clients they rely on, and the display formatters shared by console views.

pub mod config;
pub mod error;
pub mod net;
pub mod routing;
pub mod state;
pub mod util;

pub use config::ApiConfig;
pub use error::AuthError;
pub use routing::guard::{GuardDecision, before_each, decide};
pub use state::session::{Session, SessionStore};

/// Install browser logging and the panic hook. Safe to call more than once.
#[cfg(feature = "hydrate")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}
