//! Single-owner state store
//!
//! One actor task owns the current [`AppState`]. Both sources (the
//! permission stream and the catalog fetch) only send [`Action`]s into its
//! channel; the actor applies them one at a time with [`reduce`] and
//! publishes every new snapshot on a `tokio::sync::watch` channel.
//!
//! # Subscription semantics
//!
//! Subscriptions are hot: a new subscriber first receives the snapshot that
//! is current at the time it subscribes, then every later change. There is
//! no history. A slow subscriber may skip intermediate snapshots but always
//! catches up to the latest one, and never observes a half-applied update.
//! Identical consecutive snapshots are published once.
//!
//! # Example
//!
//! ```no_run
//! use futures::StreamExt;
//! use libcities::app::StateStore;
//! use libcities::catalog::mock::MockCatalog;
//! use libcities::location::{permission_channel, PermissionStatus};
//!
//! # async fn example() {
//! let mut store = StateStore::new();
//! let (reporter, statuses) = permission_channel();
//!
//! store.attach_permissions(statuses);
//! store.fetch_catalog(MockCatalog::success(vec![]));
//! reporter.report(PermissionStatus::Granted);
//!
//! let mut snapshots = store.subscribe();
//! while let Some(state) = snapshots.next().await {
//!     println!("{:?}", state);
//! }
//! # }
//! ```

use futures::future;
use futures::stream::{BoxStream, Stream, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, trace, warn};

use super::actions::Action;
use super::reducer::reduce;
use super::state::AppState;
use crate::catalog::{CatalogService, FetchResult};
use crate::location::PermissionStatus;

/// Lazy, unbounded sequence of snapshots returned by [`StateStore::subscribe`]
pub type StateStream = BoxStream<'static, AppState>;

/// Owner of the application state
pub struct StateStore {
    actions: mpsc::UnboundedSender<Action>,
    snapshots: watch::Receiver<AppState>,
    actor: JoinHandle<()>,
    sources: JoinSet<()>,
}

impl StateStore {
    /// Start the store with both fields `Loading`
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn new() -> Self {
        let (actions, receiver) = mpsc::unbounded_channel();
        let (publisher, snapshots) = watch::channel(AppState::new());
        let actor = tokio::spawn(run(receiver, publisher));

        Self {
            actions,
            snapshots,
            actor,
            sources: JoinSet::new(),
        }
    }

    /// Latest published snapshot
    pub fn current(&self) -> AppState {
        self.snapshots.borrow().clone()
    }

    /// Subscribe to snapshots, starting with the current one
    ///
    /// The stream ends once the store has shut down.
    pub fn subscribe(&self) -> StateStream {
        WatchStream::new(self.snapshots.clone()).boxed()
    }

    /// Wait for the first snapshot matching `predicate`
    ///
    /// Returns `None` if the store shuts down first.
    pub async fn wait_for<F>(&self, mut predicate: F) -> Option<AppState>
    where
        F: FnMut(&AppState) -> bool,
    {
        self.subscribe()
            .filter(|state| future::ready(predicate(state)))
            .next()
            .await
    }

    /// Record a new permission status; replaces only `gps`
    pub fn on_permission_update(&self, status: PermissionStatus) {
        self.dispatch(Action::PermissionChanged(status));
    }

    /// Record the catalog outcome; replaces only `cities`
    pub fn on_fetch_result(&self, result: FetchResult) {
        self.dispatch(Action::CatalogFetched(result));
    }

    fn dispatch(&self, action: Action) {
        if self.actions.send(action).is_err() {
            warn!("State store is no longer running, dropping action");
        }
    }

    /// Forward a permission stream into the store until it ends
    pub fn attach_permissions<S>(&mut self, statuses: S)
    where
        S: Stream<Item = PermissionStatus> + Send + 'static,
    {
        let actions = self.actions.clone();
        self.sources.spawn(async move {
            let mut statuses = Box::pin(statuses);
            while let Some(status) = statuses.next().await {
                debug!(?status, "Location permission changed");
                if actions.send(Action::PermissionChanged(status)).is_err() {
                    break;
                }
            }
            debug!("Permission stream ended");
        });
    }

    /// Fetch the catalog once in the background and feed the outcome into
    /// the store
    pub fn fetch_catalog<C>(&mut self, catalog: C)
    where
        C: CatalogService + 'static,
    {
        let actions = self.actions.clone();
        self.sources.spawn(async move {
            let result = catalog.list_cities().await;
            match &result {
                Ok(body) => info!(status = %body.status, cities = body.city_count(), "Catalog fetch resolved"),
                Err(e) => warn!(error = %e, "Catalog fetch failed"),
            }
            if actions.send(Action::CatalogFetched(result)).is_err() {
                warn!("State store is no longer running, dropping catalog result");
            }
        });
    }

    /// Stop forwarding sources and wait for the actor to exit
    ///
    /// Updates already queued are applied before the actor stops.
    pub async fn shutdown(self) {
        let StateStore {
            actions,
            snapshots,
            actor,
            mut sources,
        } = self;

        sources.shutdown().await;
        drop(actions);
        drop(snapshots);
        if let Err(e) = actor.await {
            warn!(error = %e, "State store actor ended abnormally");
        }
        info!("State store shut down");
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn run(mut actions: mpsc::UnboundedReceiver<Action>, publisher: watch::Sender<AppState>) {
    let mut state = AppState::new();

    while let Some(action) = actions.recv().await {
        trace!(?action, "Applying action");
        state = reduce(state, action);

        let next = state.clone();
        publisher.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{CitiesState, GpsState};
    use crate::catalog::mock::MockCatalog;
    use crate::location::{permission_channel, PermissionRationale};
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn test_starts_loading() {
        let store = StateStore::new();
        assert_eq!(store.current(), AppState::new());
    }

    #[tokio::test]
    async fn test_direct_updates_are_published() {
        let store = StateStore::new();
        store.on_permission_update(PermissionStatus::Granted);

        let state = timeout(WAIT, store.wait_for(|s| s.gps == GpsState::Granted))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.cities, CitiesState::Loading);
        assert_eq!(store.current().gps, GpsState::Granted);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_current_snapshot_first() {
        let store = StateStore::new();
        store.on_permission_update(PermissionStatus::Revoked {
            rationale: PermissionRationale::Optional,
        });
        timeout(WAIT, store.wait_for(|s| s.gps != GpsState::Loading))
            .await
            .unwrap();

        let mut late = store.subscribe();
        let first = timeout(WAIT, late.next()).await.unwrap().unwrap();
        assert_eq!(
            first.gps,
            GpsState::Revoked {
                requires_rationale: false
            }
        );
    }

    #[tokio::test]
    async fn test_attached_sources_merge() {
        let mut store = StateStore::new();
        let (reporter, statuses) = permission_channel();
        store.attach_permissions(statuses);
        store.fetch_catalog(MockCatalog::error_status(Some("maintenance")));
        reporter.report(PermissionStatus::Granted);

        let state = timeout(WAIT, store.wait_for(|s| !s.is_loading()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(state.gps, GpsState::Granted);
        assert_eq!(
            state.cities,
            CitiesState::Failed {
                message: "maintenance".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_subscription_ends_after_shutdown() {
        let store = StateStore::new();
        let mut snapshots = store.subscribe();
        assert_eq!(snapshots.next().await, Some(AppState::new()));

        timeout(WAIT, store.shutdown()).await.unwrap();
        assert_eq!(timeout(WAIT, snapshots.next()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_shutdown_with_pending_fetch() {
        let mut store = StateStore::new();
        store.fetch_catalog(MockCatalog::success(vec![]).with_delay(Duration::from_secs(60)));
        let snapshots = store.subscribe();

        timeout(WAIT, store.shutdown()).await.unwrap();

        let seen: Vec<AppState> = timeout(WAIT, snapshots.collect()).await.unwrap();
        assert_eq!(seen, vec![AppState::new()]);
    }

    #[tokio::test]
    async fn test_queued_updates_applied_before_shutdown() {
        let store = StateStore::new();
        let snapshots = store.subscribe();

        store.on_permission_update(PermissionStatus::Granted);
        store.on_fetch_result(Err(crate::error::FetchError::Status(502)));
        timeout(WAIT, store.shutdown()).await.unwrap();

        let seen: Vec<AppState> = timeout(WAIT, snapshots.collect()).await.unwrap();
        let last = seen.last().unwrap();
        assert_eq!(last.gps, GpsState::Granted);
        assert_eq!(
            last.cities,
            CitiesState::Failed {
                message: crate::app::UNKNOWN_ERROR.to_string()
            }
        );
    }
}
