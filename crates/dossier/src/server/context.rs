//! Shared server state: the service, the activity log and dashboard sessions

use herald::activity::ActivityLog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::service::DossierService;
use crate::state::{Action, AppState};

struct Session {
  state: AppState,
  touched: Instant,
}

impl Session {
  fn new(state: AppState) -> Self {
    Self { state, touched: Instant::now() }
  }
}

/// One [`AppState`] per dashboard session, bounded in count and idle time
///
/// Sessions with a running analysis are never expired for idleness; they are
/// evicted for space only when every stored session is running.
#[derive(Clone)]
pub struct SessionStore {
  sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
  max_sessions: usize,
  idle_ttl: Duration,
}

impl SessionStore {
  pub fn new(max_sessions: usize, idle_ttl: Duration) -> Self {
    Self {
      sessions: Arc::new(RwLock::new(HashMap::new())),
      max_sessions: max_sessions.max(1),
      idle_ttl,
    }
  }

  pub async fn create(&self, state: AppState) -> Uuid {
    let id = Uuid::new_v4();
    let mut sessions = self.sessions.write().await;

    let now = Instant::now();
    sessions.retain(|_, s| s.state.loading || now.duration_since(s.touched) < self.idle_ttl);

    while sessions.len() >= self.max_sessions {
      let oldest = sessions
        .iter()
        .min_by_key(|(_, s)| (s.state.loading, s.touched))
        .map(|(id, _)| *id);
      match oldest {
        Some(oldest) => {
          sessions.remove(&oldest);
          tracing::debug!(session = %oldest, "evicted dashboard session");
        }
        None => break,
      }
    }

    sessions.insert(id, Session::new(state));
    id
  }

  /// Snapshot of session `id`
  pub async fn get(&self, id: Uuid) -> Option<AppState> {
    let mut sessions = self.sessions.write().await;
    sessions.get_mut(&id).map(|s| {
      s.touched = Instant::now();
      s.state.clone()
    })
  }

  /// Run `f` against session `id` under the write lock
  pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut AppState) -> R) -> Option<R> {
    self.sessions.write().await.get_mut(&id).map(|s| {
      s.touched = Instant::now();
      f(&mut s.state)
    })
  }

  /// Apply `action` to session `id`; `None` when the session is gone
  pub async fn dispatch(&self, id: Uuid, action: Action) -> Option<bool> {
    self.update(id, |state| state.reduce(action)).await
  }

  pub async fn len(&self) -> usize {
    self.sessions.read().await.len()
  }

  pub async fn is_empty(&self) -> bool {
    self.sessions.read().await.is_empty()
  }
}

/// Axum state for every route
#[derive(Clone)]
pub struct AppContext {
  pub service: DossierService,
  pub sessions: SessionStore,
  pub activity: ActivityLog,
}

impl AppContext {
  pub fn new(service: DossierService, activity: ActivityLog) -> Self {
    let config = service.config();
    let sessions =
      SessionStore::new(config.max_sessions, Duration::from_secs(config.session_idle_secs));
    Self { service, sessions, activity }
  }
}
