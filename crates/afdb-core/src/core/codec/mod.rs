//! Compact C-alpha trace codec.
//!
//! [`ca::decode`] is the pure, stateless entry point used on the request path;
//! [`CoordinateTrace`] wraps its output with point-level accessors.

pub mod ca;
pub mod trace;

pub use ca::{DecodeError, EncodeError, decode, encode};
pub use trace::CoordinateTrace;
