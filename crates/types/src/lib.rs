//! Core types, error codes, and configuration for the ballot ledger.
//!
//! This crate provides the foundational types used throughout the workspace:
//! - Identifier newtypes (VoterId, ElectionId, etc.)
//! - Stored entities, registration inputs, and read projections
//! - Stable error codes with user-facing messages
//! - Postcard codec, input validation, and typed configuration

pub mod codec;
pub mod config;
pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types at crate root
pub use codec::{CodecError, decode, encode};
pub use error::ErrorCode;
pub use types::*;
pub use validation::ValidationError;
