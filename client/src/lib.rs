//! Native client for the Farm Advisory server
//!
//! Wraps the `/irrigation_advice` endpoint and runs the local/server
//! reconciliation flow: a synchronous local estimate first, then the
//! authoritative server prescription when (and if) it arrives.

pub mod client;
pub mod error;
pub mod session;

pub use client::{AdvisoryClient, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
pub use error::ClientError;
pub use session::{AdvisorySession, SessionUpdate};
