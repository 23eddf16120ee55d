//! Application state: fallback catalog, optional remote provider, guardrails,
//! and the per-user session store.
//!
//! This module owns:
//!   - the static catalog (built-in seeds + TOML bank)
//!   - the optional catalog provider (absent => fallback-only mode)
//!   - HTTP sessions keyed by id, each behind its own mutex; idle ones are
//!     swept (and the oldest evicted past the cap) whenever a new one opens
//!
//! Nothing here reads the environment; `main` builds the parts and injects them.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::config::{Guardrails, SessionLimits};
use crate::patterns::{PATTERN_TABLE, TABLE_VERSION};
use crate::provider::CatalogProvider;
use crate::session::Session;

pub type SharedSession = Arc<Mutex<Session>>;

struct SessionSlot {
    session: SharedSession,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub provider: Option<Arc<dyn CatalogProvider>>,
    pub guardrails: Guardrails,
    idle_ttl: Duration,
    max_sessions: usize,
    sessions: Arc<RwLock<HashMap<String, SessionSlot>>>,
}

impl AppState {
    #[instrument(level = "info", skip_all)]
    pub fn new(catalog: Catalog, provider: Option<Arc<dyn CatalogProvider>>, guardrails: Guardrails) -> Self {
        match &provider {
            Some(p) => info!(target: "professor", provider = %p.name(), "Remote catalog provider enabled."),
            None => info!(target: "professor", "Remote catalog provider disabled. Serving the built-in catalog only."),
        }
        info!(
            target: "professor",
            min_input_chars = guardrails.min_input_chars,
            max_input_chars = guardrails.max_input_chars,
            patterns = PATTERN_TABLE.len(),
            table = TABLE_VERSION,
            "Canvas guardrails and keyword table"
        );
        let limits = SessionLimits::default();
        Self {
            catalog: Arc::new(catalog),
            provider,
            guardrails,
            idle_ttl: limits.idle_ttl(),
            max_sessions: limits.max_sessions,
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_session_limits(mut self, idle_ttl: Duration, max_sessions: usize) -> Self {
        self.idle_ttl = idle_ttl;
        self.max_sessions = max_sessions.max(1);
        info!(
            target: "professor",
            idle_secs = idle_ttl.as_secs(),
            max_sessions = self.max_sessions,
            "Session store limits"
        );
        self
    }

    /// Fallback-only state with default guardrails.
    #[cfg(test)]
    pub fn offline() -> Self {
        Self::new(Catalog::default(), None, Guardrails::default())
    }

    pub fn provider_name(&self) -> &str {
        self.provider.as_ref().map(|p| p.name()).unwrap_or("none")
    }

    /// Create an empty session and return its id.
    pub async fn open_session(&self) -> String {
        self.session(None).await.0
    }

    /// Look up a session by id. Unknown or missing ids get a fresh session;
    /// the returned id is the one the caller must use from now on.
    #[instrument(level = "debug", skip(self))]
    pub async fn session(&self, id: Option<&str>) -> (String, SharedSession) {
        let mut map = self.sessions.write().await;
        if let Some(id) = id {
            if let Some(slot) = map.get_mut(id) {
                slot.last_seen = Instant::now();
                return (id.to_string(), slot.session.clone());
            }
        }

        self.sweep(&mut map);
        let id = Uuid::new_v4().to_string();
        let s = Arc::new(Mutex::new(Session::new()));
        map.insert(id.clone(), SessionSlot { session: s.clone(), last_seen: Instant::now() });
        debug!(target: "canvas", session_id = %id, live = map.len(), "Session opened");
        (id, s)
    }

    /// Drop idle sessions, then the least recently used ones until there is room for one more.
    fn sweep(&self, map: &mut HashMap<String, SessionSlot>) {
        let before = map.len();
        map.retain(|_, slot| slot.last_seen.elapsed() < self.idle_ttl);
        while map.len() >= self.max_sessions {
            let oldest = map
                .iter()
                .min_by_key(|(_, slot)| slot.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    map.remove(&id);
                }
                None => break,
            }
        }
        let evicted = before - map.len();
        if evicted > 0 {
            info!(target: "canvas", evicted, live = map.len(), "Sessions evicted");
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn close_session(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Phase;

    #[tokio::test]
    async fn sessions_are_independent_and_reusable() {
        let state = AppState::offline();
        let (a, sa) = state.session(None).await;
        let (b, _sb) = state.session(Some("does-not-exist")).await;
        assert_ne!(a, b);
        assert_eq!(state.session_count().await, 2);

        sa.lock().await.enter_phase(Phase::Tests);
        let (a2, sa2) = state.session(Some(&a)).await;
        assert_eq!(a, a2);
        assert_eq!(sa2.lock().await.current_phase, Phase::Tests);

        let (_, sb2) = state.session(Some(&b)).await;
        assert_eq!(sb2.lock().await.current_phase, Phase::Constraints);

        assert!(state.close_session(&a).await);
        assert!(!state.close_session(&a).await);
        assert_eq!(state.provider_name(), "none");
    }

    #[tokio::test]
    async fn idle_sessions_are_swept_on_open() {
        let state = AppState::offline().with_session_limits(Duration::from_millis(20), 100);
        for _ in 0..10 {
            state.session(None).await;
        }
        assert_eq!(state.session_count().await, 10);

        tokio::time::sleep(Duration::from_millis(40)).await;
        let (fresh, _) = state.session(None).await;
        assert_eq!(state.session_count().await, 1);
        assert_eq!(state.session(Some(&fresh)).await.0, fresh);
    }

    #[tokio::test]
    async fn least_recently_used_session_is_evicted_at_the_cap() {
        let state = AppState::offline().with_session_limits(Duration::from_secs(3600), 2);
        let (a, _) = state.session(None).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        let (b, _) = state.session(None).await;
        tokio::time::sleep(Duration::from_millis(5)).await;
        // Touching `a` makes `b` the oldest.
        state.session(Some(&a)).await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        let (c, _) = state.session(None).await;
        assert_eq!(state.session_count().await, 2);
        assert!(state.close_session(&a).await);
        assert!(state.close_session(&c).await);
        assert!(!state.close_session(&b).await);
    }

    #[tokio::test]
    async fn anonymous_traffic_stays_bounded() {
        let state = AppState::offline().with_session_limits(Duration::from_secs(3600), 50);
        for _ in 0..1000 {
            state.session(None).await;
        }
        assert_eq!(state.session_count().await, 50);
    }
}
