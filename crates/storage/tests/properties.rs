//! Property tests for the ballot ledger and tally projection.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::disallowed_methods)]

mod common;

use std::collections::HashSet;

use ballot_ledger_storage::{BallotError, project};
use ballot_ledger_test_utils::strategies::{
    arb_ballot_script, arb_new_voter, arb_vote_counts, reference_percentage,
};
use ballot_ledger_types::{Candidate, CandidateId, ElectionId};
use chrono::Utc;
use common::Harness;
use proptest::prelude::*;

const VOTERS: usize = 5;

/// Expected outcome of one attempt, mirroring the precondition order.
#[derive(Debug, PartialEq, Eq)]
enum Expected {
    Accepted,
    AlreadyVoted,
    ElectionNotActive,
    InvalidCandidate,
}

fn classify(outcome: &Result<ballot_ledger_types::Ballot, BallotError>) -> Expected {
    match outcome {
        Ok(_) => Expected::Accepted,
        Err(BallotError::AlreadyVoted { .. }) => Expected::AlreadyVoted,
        Err(BallotError::ElectionNotActive { .. }) => Expected::ElectionNotActive,
        Err(BallotError::InvalidCandidate { .. }) => Expected::InvalidCandidate,
        Err(BallotError::Store { source }) => panic!("store failure: {source}"),
    }
}

fn candidate_row(id: u64, votes: u64) -> Candidate {
    Candidate {
        id: CandidateId::new(id),
        election_id: ElectionId::new(1),
        name: format!("C{id}"),
        party: String::new(),
        symbol: String::new(),
        constituency: String::new(),
        description: String::new(),
        image_url: None,
        vote_count: votes,
        created_at: Utc::now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Replays random ballot scripts and checks each outcome against a model,
    /// then checks the counter-consistency invariant per election.
    #[test]
    fn counters_match_ballots(script in arb_ballot_script(VOTERS, 4, 3)) {
        let h = Harness::in_memory();
        let open_a = h.election("Open A", true);
        let open_b = h.election("Open B", true);
        let closed = h.election("Closed", false);
        let elections = [open_a, open_b, closed];

        let mut candidates = h.candidates(open_a, &["A1", "A2"]);
        candidates.extend(h.candidates(open_b, &["B1"]));
        candidates.extend(h.candidates(closed, &["C1"]));
        let owner = [open_a, open_a, open_b, closed];

        let voters = h.voters(1, VOTERS as u64);
        let mut voted = HashSet::new();

        for attempt in script {
            let voter = voters[attempt.voter];
            let election = elections[attempt.election];
            let expected = if voted.contains(&voter) {
                Expected::AlreadyVoted
            } else if election == closed {
                Expected::ElectionNotActive
            } else if owner[attempt.candidate] != election {
                Expected::InvalidCandidate
            } else {
                Expected::Accepted
            };

            let outcome = h.ledger.cast_ballot(voter, candidates[attempt.candidate], election);
            prop_assert_eq!(classify(&outcome), expected);
            if outcome.is_ok() {
                voted.insert(voter);
            }
        }

        for election in elections {
            let results = h.tally.get_results(election).unwrap();
            let ballots = h.tally.count_ballots(election).unwrap();
            prop_assert_eq!(results.total_votes, ballots);
        }
        let dashboard = h.stats.dashboard().unwrap();
        prop_assert_eq!(dashboard.total_votes, voted.len() as u64);
    }

    /// Integer rounding agrees with exact half-up rounding.
    #[test]
    fn percentages_match_reference(counts in arb_vote_counts()) {
        let rows: Vec<Candidate> = counts
            .iter()
            .enumerate()
            .map(|(i, &votes)| candidate_row(i as u64 + 1, votes))
            .collect();
        let results = project(ElectionId::new(1), &rows);
        let total: u64 = counts.iter().sum();
        prop_assert_eq!(results.total_votes, total);
        for row in &results.results {
            prop_assert_eq!(row.percentage, reference_percentage(row.vote_count, total));
        }
    }

    /// Ranking is descending by votes and stable for ties.
    #[test]
    fn ranking_is_stable(counts in arb_vote_counts()) {
        let rows: Vec<Candidate> = counts
            .iter()
            .enumerate()
            .map(|(i, &votes)| candidate_row(i as u64 + 1, votes))
            .collect();
        let results = project(ElectionId::new(1), &rows);
        for pair in results.results.windows(2) {
            prop_assert!(pair[0].vote_count >= pair[1].vote_count);
            if pair[0].vote_count == pair[1].vote_count {
                prop_assert!(pair[0].candidate_id < pair[1].candidate_id);
            }
        }
    }

    /// Registration accepts any well-formed voter exactly once.
    #[test]
    fn registration_is_unique(voter in arb_new_voter()) {
        let h = Harness::in_memory();
        prop_assert!(h.registry.register_voter(voter.clone()).is_ok());
        prop_assert!(h.registry.register_voter(voter).is_err());
        prop_assert_eq!(h.registry.list_voters().unwrap().len(), 1);
    }
}

#[test]
fn test_tally_is_idempotent() {
    let h = Harness::in_memory();
    let election = h.election("General", true);
    let candidates = h.candidates(election, &["Asha", "Bala"]);
    h.cast_counts(election, &candidates, &[3, 4]);

    let first = h.tally.get_results(election).unwrap();
    let second = h.tally.get_results(election).unwrap();
    assert_eq!(first, second);
}
