//! Request handlers for the relay
//!
//! `request` owns the HTTP surface (CORS, method gate, SSE response) and
//! `streaming` owns the relay task that fills the SSE body.

mod request;
mod streaming;

pub use request::relay_handler;
