// Viewport synchronization: fetch what is visible, collapse by point, redraw.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::domain::entities::Notice;
use crate::domain::errors::ClientError;
use crate::domain::ports::{CommentApi, MapSurface, Notifier};
use crate::use_cases::dedup::dedupe_by_location;
use crate::use_cases::markers::MarkerLifecycleManager;

/// Engine state; at most one fetch is ever outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
}

/// What a single `sync` call did.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// Markers were replaced; `markers` is how many are now on the map.
    Rendered { markers: usize },
    /// Another fetch was outstanding, so this request was discarded.
    Dropped,
    /// The surface had no bounds yet.
    Skipped,
    /// The fetch failed and the markers were left untouched.
    Failed(ClientError),
}

/// Clears the fetching flag on every exit path.
struct FetchGuard<'a>(&'a AtomicBool);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Keeps the marker set in step with the visible map region.
pub struct ViewportSyncEngine<A, M, N> {
    api: Arc<A>,
    surface: Arc<M>,
    markers: MarkerLifecycleManager<M>,
    notifier: Arc<N>,
    fetching: AtomicBool,
}

impl<A, M, N> ViewportSyncEngine<A, M, N>
where
    A: CommentApi,
    M: MapSurface,
    N: Notifier,
{
    pub fn new(
        api: Arc<A>,
        surface: Arc<M>,
        markers: MarkerLifecycleManager<M>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            api,
            surface,
            markers,
            notifier,
            fetching: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SyncState {
        if self.fetching.load(Ordering::Acquire) {
            SyncState::Fetching
        } else {
            SyncState::Idle
        }
    }

    pub fn markers(&self) -> &MarkerLifecycleManager<M> {
        &self.markers
    }

    /// Runs one sync cycle against the bounds visible right now.
    ///
    /// Requests made while a fetch is in flight are dropped, not queued.
    pub async fn sync(&self) -> SyncOutcome {
        if self
            .fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync dropped; fetch already in flight");
            return SyncOutcome::Dropped;
        }
        let _guard = FetchGuard(&self.fetching);

        let bounds = match self.surface.bounds().ok_or(ClientError::NotReady) {
            Ok(bounds) => bounds,
            Err(err) => {
                debug!(error = %err, "sync skipped");
                return SyncOutcome::Skipped;
            }
        };

        match self.api.comments_in_bounds(bounds).await {
            Ok(comments) => {
                let fetched = comments.len();
                let representatives = dedupe_by_location(comments);
                let report = self.markers.replace_all(representatives).await;
                debug!(fetched, markers = report.created, "viewport synced");
                SyncOutcome::Rendered {
                    markers: report.created,
                }
            }
            Err(err) => {
                warn!(error = %err, "viewport fetch failed");
                self.notifier
                    .notify(Notice::Failure(format!("could not load comments: {err}")));
                SyncOutcome::Failed(err)
            }
        }
    }
}
