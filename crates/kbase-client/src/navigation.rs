use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub type NavigateFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Moves the front end between views without the request pipeline
/// knowing how routing works. One callback at a time; without one, the
/// fallback performs a hard redirect so a navigation is never dropped.
pub struct NavigationCoordinator {
    callback: RwLock<Option<NavigateFn>>,
    fallback: NavigateFn,
    current: RwLock<String>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Default for NavigationCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback(hard_redirect)
    }

    #[must_use]
    pub fn with_fallback<F>(fallback: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            callback: RwLock::new(None),
            fallback: Arc::new(fallback),
            current: RwLock::new("/".to_string()),
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Installs the navigation callback, replacing any previous one.
    pub fn register<F>(&self, navigate: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let mut guard = self
            .callback
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if guard.is_some() {
            debug!("replacing navigation callback");
        }
        *guard = Some(Arc::new(navigate));
    }

    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    #[must_use]
    pub fn current_route(&self) -> String {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records where the front end is without navigating.
    pub fn set_current_route(&self, route: &str) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = route.to_string();
    }

    pub fn navigate(&self, route: &str) {
        self.set_current_route(route);
        let callback = self
            .callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match callback {
            Some(navigate) => navigate(route),
            None => (self.fallback)(route),
        }
    }

    /// Spawns a one-shot timer that navigates to `route` after `delay`.
    /// Scheduled redirects cannot be cancelled and repeated schedules are
    /// not merged. Must be called from within a tokio runtime.
    pub fn schedule_redirect(self: &Arc<Self>, route: &str, delay: Duration) {
        let coordinator = Arc::clone(self);
        let route = route.to_string();
        debug!(route = %route, delay_ms = delay.as_millis(), "redirect scheduled");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            coordinator.navigate(&route);
        });
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|handle| !handle.is_finished());
        pending.push(handle);
    }

    /// Number of scheduled redirects that have not fired yet.
    #[must_use]
    pub fn pending_redirects(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    /// Waits until every scheduled redirect has fired.
    pub async fn settle(&self) {
        loop {
            let handles = std::mem::take(
                &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
            );
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(err) = handle.await {
                    warn!("redirect task failed: {err}");
                }
            }
        }
    }
}

impl std::fmt::Debug for NavigationCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationCoordinator")
            .field("registered", &self.is_registered())
            .field("current", &self.current_route())
            .finish()
    }
}

fn hard_redirect(route: &str) {
    warn!(route = %route, "no navigation callback registered; forcing redirect");
    eprintln!("Redirecting to {route}");
}
