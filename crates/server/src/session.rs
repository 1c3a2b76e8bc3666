//! Bearer-token sessions.
//!
//! A successful identity verification or admin login issues an opaque
//! UUIDv4 token. Handlers resolve the token at the edge and hand the core a
//! plain [`VoterId`] or [`AdminId`]; nothing below the HTTP layer knows about
//! sessions.

use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use ballot_ledger_types::{AdminId, VoterId, config::SessionConfig};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// Who a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// A verified voter.
    Voter(VoterId),
    /// An administrator.
    Admin(AdminId),
}

impl Identity {
    /// The `userType` reported to clients.
    pub fn user_type(self) -> &'static str {
        match self {
            Identity::Voter(_) => "voter",
            Identity::Admin(_) => "admin",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    identity: Identity,
    expires_at: DateTime<Utc>,
}

/// Minimum spacing, in seconds, between expiry sweeps triggered by `issue`.
const SWEEP_INTERVAL_SECS: i64 = 60;

/// In-memory session table shared by all handlers.
///
/// Sessions do not survive a restart. Expired sessions are evicted when
/// presented, and swept in bulk by `issue` at most once a minute, so
/// abandoned logins do not accumulate.
#[derive(Debug, Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<String, Session>>,
    ttl: Duration,
    /// Millisecond timestamp before which `issue` skips the sweep.
    next_sweep_ms: Arc<AtomicI64>,
}

impl SessionStore {
    /// Creates an empty store whose sessions live for `config.ttl`.
    pub fn new(config: &SessionConfig) -> Self {
        let ttl = Duration::from_std(config.ttl).unwrap_or(Duration::MAX);
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl,
            next_sweep_ms: Arc::new(AtomicI64::new(0)),
        }
    }

    /// Issues a new token for `identity`.
    pub fn issue(&self, identity: Identity) -> String {
        self.issue_at(identity, Utc::now())
    }

    fn issue_at(&self, identity: Identity, now: DateTime<Utc>) -> String {
        self.maybe_sweep(now);
        let token = Uuid::new_v4().to_string();
        let expires_at = now.checked_add_signed(self.ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.sessions.insert(token.clone(), Session { identity, expires_at });
        tracing::debug!(user_type = identity.user_type(), "Session issued");
        token
    }

    /// Returns the identity behind `token`, evicting it if expired.
    pub fn resolve(&self, token: &str) -> Option<Identity> {
        self.resolve_at(token, Utc::now())
    }

    fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> Option<Identity> {
        let session = *self.sessions.get(token)?;
        if session.expires_at <= now {
            self.sessions.remove(token);
            tracing::debug!(user_type = session.identity.user_type(), "Session expired");
            return None;
        }
        Some(session.identity)
    }

    /// Ends the session. Returns whether the token was known.
    pub fn revoke(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// Drops every expired session and returns how many were removed.
    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| session.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }

    /// Purges expired sessions once the sweep interval has elapsed. Only the
    /// caller that wins the timestamp exchange performs the sweep.
    fn maybe_sweep(&self, now: DateTime<Utc>) {
        let now_ms = now.timestamp_millis();
        let due = self.next_sweep_ms.load(Ordering::Acquire);
        if now_ms < due {
            return;
        }
        let next = now_ms.saturating_add(SWEEP_INTERVAL_SECS * 1000);
        if self
            .next_sweep_ms
            .compare_exchange(due, next, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let purged = self.purge_expired_at(now);
        if purged > 0 {
            tracing::debug!(purged, remaining = self.len(), "Expired sessions swept");
        }
    }

    /// Number of live and not yet evicted sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the store holds no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
