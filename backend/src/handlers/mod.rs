//! HTTP handlers for the Farm Advisory API

mod health;
mod irrigation;

pub use health::*;
pub use irrigation::*;
