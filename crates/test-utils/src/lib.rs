//! Shared test utilities for the ballot ledger crates.
//!
//! This crate provides common test helpers to reduce boilerplate across test modules:
//!
//! - [`TestDir`] - Managed temporary data directory with a database path helper
//! - [`fixtures`] - Known-valid voters, elections, candidates, and admins
//! - [`strategies`] - Proptest generators for registrations and ballot scripts

#![deny(unsafe_code)]
#![cfg_attr(test, allow(clippy::disallowed_methods))]

mod test_dir;
pub use test_dir::TestDir;

pub mod fixtures;
pub mod strategies;
