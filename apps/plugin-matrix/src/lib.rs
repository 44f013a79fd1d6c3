//! # Plugin Matrix Library
//!
//! This library exposes the step's modules for testing and integration.
//!
//! The binary uses these modules through the `main.rs` entry point.

pub mod cli;
pub mod client;
pub mod config;
pub mod emitter;
pub mod loader;

// Re-export matrix_core for convenience
pub use matrix_core;
