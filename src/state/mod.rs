//! Client-side session state.
//!
//! DESIGN
//! ======
//! `session` owns the in-memory identity and its lifecycle; `snapshot` is the
//! storage codec it persists through.

pub mod session;
pub mod snapshot;
