//! Shared application state.

use dlmm_lp_domain::RiskStyle;
use dlmm_lp_execution::advisor::Advisor;
use dlmm_lp_execution::balance::BalanceValidator;
use dlmm_lp_execution::session::ChatSession;
use dlmm_lp_execution::submit::PositionSubmitter;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

/// Idle time after which a session is dropped.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

/// A session shared between handlers.
pub type SharedSession = Arc<Mutex<ChatSession>>;

/// A stored session and the last time a handler touched it.
#[derive(Clone)]
pub struct SessionEntry {
    pub session: SharedSession,
    pub last_used: Instant,
}

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Pool, range and chat orchestration.
    pub advisor: Arc<Advisor>,
    /// Wallet balance checks.
    pub balance: Arc<BalanceValidator>,
    /// Position pre-flight.
    pub positions: Arc<PositionSubmitter>,
    /// In-memory chat sessions.
    pub sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    /// Sessions idle for longer than this are swept on the next create.
    pub session_ttl: Duration,
    /// Server start time.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(
        advisor: Arc<Advisor>,
        balance: Arc<BalanceValidator>,
        positions: Arc<PositionSubmitter>,
    ) -> Self {
        Self {
            advisor,
            balance,
            positions,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            session_ttl: DEFAULT_SESSION_TTL,
            started_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Opens a session and returns it. Idle sessions are swept first.
    pub async fn create_session(&self, style: Option<RiskStyle>) -> SharedSession {
        let session = ChatSession::new().with_style(style);
        let id = session.id;
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        Self::sweep(&mut sessions, self.session_ttl);
        sessions.insert(
            id,
            SessionEntry {
                session: Arc::clone(&shared),
                last_used: Instant::now(),
            },
        );
        shared
    }

    /// Looks up a session and marks it as used.
    pub async fn session(&self, id: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(id)?;
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// Drops a session. Returns `false` when it did not exist.
    pub async fn remove_session(&self, id: &Uuid) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Drops every session idle for longer than the TTL.
    pub async fn sweep_expired(&self) -> usize {
        Self::sweep(&mut *self.sessions.write().await, self.session_ttl)
    }

    fn sweep(sessions: &mut HashMap<Uuid, SessionEntry>, ttl: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_used.elapsed() < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!(evicted, remaining = sessions.len(), "Expired sessions swept");
        }
        evicted
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
