//! Ballot ledger server library.
//!
//! Provides configuration, bootstrap, bearer sessions, shutdown handling,
//! and the JSON HTTP API over the storage crate.

#![deny(unsafe_code)]

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod session;
pub mod shutdown;
pub mod state;
