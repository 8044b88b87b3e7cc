//! Shared irrigation advisory logic for the Farm Advisory platform
//!
//! This crate holds the advisory engine and the types shared between the
//! backend, the browser (via WASM), and the native client.

pub mod irrigation;
pub mod reconcile;
pub mod validation;
pub mod wire;

pub use irrigation::*;
pub use reconcile::*;
pub use validation::*;
pub use wire::*;
