//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - Company and invoice routes
//! - Health check routes
//! - A JSON fallback and the error translation layer

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
pub use router::build_router;
