//! Networking modules for the console backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `http` is the shared transport, `api` covers the auth endpoints, `client`
//! is the authenticated CRUD client, and `types` defines the wire schema.

pub mod api;
pub mod client;
pub mod http;
pub mod types;
