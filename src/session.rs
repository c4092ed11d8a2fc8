// Session store - one isolated ledger per anonymous session
//
// Owned by whoever serves requests (the API server keeps it in axum state
// behind a Mutex). Dropping a session drops its ledger. Sessions idle past
// the timeout are dropped when a new one is created, and the store never
// holds more than `max_sessions` ledgers.

use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::info;
use uuid::Uuid;

use crate::ledger::Ledger;

pub type SessionId = Uuid;

pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(3600);

#[derive(Debug)]
struct Session {
    ledger: Ledger,
    last_seen: Instant,
}

#[derive(Debug)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cap of zero is treated as one
    pub fn with_limits(max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            max_sessions: max_sessions.max(1),
            idle_timeout,
        }
    }

    /// Start a session with an empty ledger
    pub fn create(&mut self) -> SessionId {
        self.create_at(Instant::now())
    }

    pub(crate) fn create_at(&mut self, now: Instant) -> SessionId {
        self.evict_idle(now);
        while self.sessions.len() >= self.max_sessions {
            self.evict_least_recent();
        }

        let id = Uuid::new_v4();
        self.sessions.insert(
            id,
            Session {
                ledger: Ledger::new(),
                last_seen: now,
            },
        );
        info!(session = %id, active = self.sessions.len(), "session created");
        id
    }

    /// Drop every session not touched within the idle timeout; returns how
    /// many were dropped
    pub fn evict_idle(&mut self, now: Instant) -> usize {
        let timeout = self.idle_timeout;
        let before = self.sessions.len();
        self.sessions
            .retain(|_, session| now.saturating_duration_since(session.last_seen) < timeout);

        let evicted = before - self.sessions.len();
        if evicted > 0 {
            info!(evicted, active = self.sessions.len(), "idle sessions expired");
        }
        evicted
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .sessions
            .iter()
            .min_by_key(|(_, session)| session.last_seen)
            .map(|(id, _)| *id);

        if let Some(id) = oldest {
            self.sessions.remove(&id);
            info!(session = %id, "session limit reached, dropped least recently used");
        }
    }

    /// End a session; returns false when it did not exist
    pub fn remove(&mut self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            info!(session = %id, active = self.sessions.len(), "session ended");
        }
        removed
    }

    pub fn ledger(&self, id: &SessionId) -> Option<&Ledger> {
        self.sessions.get(id).map(|session| &session.ledger)
    }

    /// Mutable access counts as activity and refreshes the idle clock
    pub fn ledger_mut(&mut self, id: &SessionId) -> Option<&mut Ledger> {
        self.ledger_mut_at(id, Instant::now())
    }

    pub(crate) fn ledger_mut_at(&mut self, id: &SessionId, now: Instant) -> Option<&mut Ledger> {
        self.sessions.get_mut(id).map(|session| {
            session.last_seen = now;
            &mut session.ledger
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{Category, Transaction, TransactionKind};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn test_sessions_are_isolated() {
        let mut store = SessionStore::new();
        let a = store.create();
        let b = store.create();
        assert_ne!(a, b);

        let tx = Transaction::new(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            TransactionKind::Expense,
            Category::Shopping,
            Decimal::new(15, 0),
            None,
        )
        .unwrap();
        store.ledger_mut(&a).unwrap().add(tx);

        assert_eq!(store.ledger(&a).unwrap().len(), 1);
        assert!(store.ledger(&b).unwrap().is_empty());
    }

    #[test]
    fn test_remove_session() {
        let mut store = SessionStore::new();
        let id = store.create();
        assert_eq!(store.len(), 1);

        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.ledger(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_idle_sessions_expire_on_create() {
        let mut store = SessionStore::with_limits(100, Duration::from_secs(60));
        let start = Instant::now();

        let stale = store.create_at(start);
        let active = store.create_at(start);
        store.ledger_mut_at(&active, start + Duration::from_secs(50));

        let fresh = store.create_at(start + Duration::from_secs(90));

        assert!(store.ledger(&stale).is_none());
        assert!(store.ledger(&active).is_some());
        assert!(store.ledger(&fresh).is_some());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_cap_drops_least_recently_used() {
        let mut store = SessionStore::with_limits(2, Duration::from_secs(3600));
        let start = Instant::now();

        let first = store.create_at(start);
        let second = store.create_at(start + Duration::from_secs(1));
        store.ledger_mut_at(&first, start + Duration::from_secs(2));

        let third = store.create_at(start + Duration::from_secs(3));

        assert_eq!(store.len(), 2);
        assert!(store.ledger(&second).is_none());
        assert!(store.ledger(&first).is_some());
        assert!(store.ledger(&third).is_some());
    }

    #[test]
    fn test_many_creates_stay_bounded() {
        let mut store = SessionStore::with_limits(8, Duration::from_secs(3600));
        let start = Instant::now();

        for i in 0..1000 {
            store.create_at(start + Duration::from_millis(i));
        }
        assert_eq!(store.len(), 8);
    }
}
