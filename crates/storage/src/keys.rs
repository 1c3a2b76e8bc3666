//! Composite key encoding for the `election_candidates` index.
//!
//! Keys are `{election_id:8BE}{candidate_id:8BE}`. Big-endian encoding keeps
//! redb's byte ordering equal to numeric ordering, so a range scan over one
//! election yields its candidates in ascending id order.

use ballot_ledger_types::{CandidateId, ElectionId};

/// Length of an encoded election/candidate key.
pub const ELECTION_CANDIDATE_KEY_LEN: usize = 16;

/// Encodes an `election_candidates` key.
pub fn election_candidate_key(
    election_id: ElectionId,
    candidate_id: CandidateId,
) -> [u8; ELECTION_CANDIDATE_KEY_LEN] {
    let mut key = [0u8; ELECTION_CANDIDATE_KEY_LEN];
    key[..8].copy_from_slice(&election_id.value().to_be_bytes());
    key[8..].copy_from_slice(&candidate_id.value().to_be_bytes());
    key
}

/// Returns the inclusive key bounds covering every candidate of an election.
pub fn election_candidate_bounds(
    election_id: ElectionId,
) -> ([u8; ELECTION_CANDIDATE_KEY_LEN], [u8; ELECTION_CANDIDATE_KEY_LEN]) {
    (
        election_candidate_key(election_id, CandidateId::new(0)),
        election_candidate_key(election_id, CandidateId::new(u64::MAX)),
    )
}
