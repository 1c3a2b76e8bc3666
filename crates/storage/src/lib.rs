//! Storage engine for the ballot ledger.
//!
//! This crate provides:
//! - redb-based persistent storage with in-memory support for tests
//! - The ballot ledger: one atomic transaction per cast vote
//! - The tally reader: ranked results with rounded percentages
//! - The registry: voters, elections, candidates, administrators
//! - Dashboard statistics and voting history

mod engine;
mod error;
mod keys;
mod ledger;
mod registry;
mod rows;
mod stats;
mod tables;
mod tally;

pub use engine::StorageEngine;
pub use error::{Result, StoreError};
pub use keys::{election_candidate_bounds, election_candidate_key};
pub use ledger::{BallotError, BallotLedger};
pub use registry::{Registry, RegistryError, password_digest};
pub use stats::{RECENT_BALLOTS, StatsReader};
pub use tables::Tables;
pub use tally::{TallyReader, project};
