//! Common types and utilities shared across the crate.
//!
//! This module provides the unified error type, EMU unit conversions, and
//! XML escaping helpers used by both the deck writer and the composer.

// Submodule declarations
pub mod error;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
