//! Session store: per-browser-session state shared by the pages.
//!
//! Each session is an explicit `SessionContext` with typed optional fields,
//! looked up by the id the page keeps in `sessionStorage`. Values are written
//! only after an action succeeds. Nothing is persisted.
//!
//! The page cannot tell the server when a tab closes, so sessions idle for
//! longer than the store's TTL are treated as gone: evicted on access and by a
//! periodic sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

pub mod handlers;

pub const DEFAULT_IDLE_TTL_MINUTES: i64 = 120;

#[derive(Debug, Clone, Serialize)]
pub struct SessionContext {
    pub cv_text: Option<String>,
    pub jd_text: Option<String>,
    pub fixed_cv: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    last_seen: DateTime<Utc>,
}

impl SessionContext {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            cv_text: None,
            jd_text: None,
            fixed_cv: None,
            created_at: now,
            updated_at: now,
            last_seen: now,
        }
    }

    /// A fixed CV is only valid for the (cv, jd) pair it was produced from,
    /// so replacing either input drops it.
    pub fn set_cv_text(&mut self, text: String) {
        self.cv_text = Some(text);
        self.fixed_cv = None;
    }

    pub fn set_jd_text(&mut self, text: String) {
        self.jd_text = Some(text);
        self.fixed_cv = None;
    }

    /// Stores `fixed_cv` only if it was produced from the inputs the session
    /// holds now. Returns `false` (and stores nothing) when either input was
    /// replaced in the meantime.
    pub fn set_fixed_cv(&mut self, cv_used: &str, jd_used: &str, fixed_cv: String) -> bool {
        let current = self.cv_text.as_deref() == Some(cv_used)
            && self.jd_text.as_deref() == Some(jd_used);
        if current {
            self.fixed_cv = Some(fixed_cv);
        }
        current
    }
}

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionContext>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(Duration::minutes(DEFAULT_IDLE_TTL_MINUTES))
    }
}

impl SessionStore {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().insert(id, SessionContext::new());
        id
    }

    /// Returns a copy; handlers never hold the lock across an await.
    /// Counts as activity for the idle TTL.
    pub fn get(&self, id: Uuid) -> Option<SessionContext> {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let ctx = self.live_entry(&mut sessions, id, now)?;
        ctx.last_seen = now;
        Some(ctx.clone())
    }

    /// Applies `f` to the session. Returns `None` if the session does not
    /// exist or has expired.
    pub fn update<F, T>(&self, id: Uuid, f: F) -> Option<T>
    where
        F: FnOnce(&mut SessionContext) -> T,
    {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let ctx = self.live_entry(&mut sessions, id, now)?;
        let out = f(ctx);
        ctx.updated_at = now;
        ctx.last_seen = now;
        Some(out)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Drops every session idle past the TTL. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, ctx| !self.is_expired(ctx, now));
        before - sessions.len()
    }

    /// Runs `sweep_expired` every `every` on the tokio runtime.
    pub fn spawn_sweeper(self: &Arc<Self>, every: StdDuration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.sweep_expired();
                if evicted > 0 {
                    info!("Evicted {evicted} idle session(s), {} active", store.len());
                }
            }
        })
    }

    fn is_expired(&self, ctx: &SessionContext, now: DateTime<Utc>) -> bool {
        now - ctx.last_seen > self.idle_ttl
    }

    /// Looks up `id`, evicting it first if it has gone idle.
    fn live_entry<'a>(
        &self,
        sessions: &'a mut HashMap<Uuid, SessionContext>,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Option<&'a mut SessionContext> {
        let expired = self.is_expired(sessions.get(&id)?, now);
        if expired {
            sessions.remove(&id);
            info!("Session {id} expired");
            return None;
        }
        sessions.get_mut(&id)
    }

    /// Moves a session's last activity into the past.
    #[cfg(test)]
    pub(crate) fn backdate(&self, id: Uuid, by: Duration) {
        if let Some(ctx) = self.sessions.write().get_mut(&id) {
            ctx.last_seen -= by;
        }
    }
}
