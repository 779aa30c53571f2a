// Map event loop: turns surface events into syncs and thread loads.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{MapEvent, Notice};
use crate::domain::ports::{CommentApi, MapSurface, Notifier};
use crate::use_cases::{CommentThreadStore, SyncOutcome, ViewportSyncEngine};

/// Handles events until every sender is gone, then waits for the work it
/// started. Marker click handlers only hold weak senders, so dropping the
/// owner's sender is what ends the loop.
pub async fn run_event_loop<A, M, N>(
    mut events: mpsc::Receiver<MapEvent>,
    sync: Arc<ViewportSyncEngine<A, M, N>>,
    threads: Arc<CommentThreadStore<A>>,
    notifier: Arc<N>,
) where
    A: CommentApi + 'static,
    M: MapSurface + 'static,
    N: Notifier + 'static,
{
    let mut tasks = JoinSet::new();

    while let Some(event) = events.recv().await {
        debug!(?event, "map event");
        match event {
            // Each of these may be dropped by the engine if a fetch is in flight.
            MapEvent::Ready | MapEvent::MoveEnd | MapEvent::ZoomEnd => {
                let sync = sync.clone();
                tasks.spawn(async move {
                    match sync.sync().await {
                        SyncOutcome::Rendered { markers } => debug!(markers, "markers rendered"),
                        SyncOutcome::Dropped => debug!("sync dropped"),
                        SyncOutcome::Skipped => debug!("sync skipped; no bounds yet"),
                        // Already reported by the engine.
                        SyncOutcome::Failed(_) => {}
                    }
                });
            }
            MapEvent::DoubleClick(point) => {
                threads.open_new_point(point).await;
                info!(lat = point.lat, lng = point.lng, "new comment point selected");
            }
            MapEvent::MarkerClicked(point) => {
                let threads = threads.clone();
                let notifier = notifier.clone();
                tasks.spawn(async move {
                    if let Err(err) = threads.load(point).await {
                        warn!(error = %err, "thread load failed");
                        notifier.notify(Notice::Failure(format!("could not load comments: {err}")));
                    }
                });
            }
        }

        while let Some(result) = tasks.try_join_next() {
            log_join(result);
        }
    }

    while let Some(result) = tasks.join_next().await {
        log_join(result);
    }
    debug!("map event loop finished");
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(err) = result {
        error!(error = %err, "map event task failed");
    }
}
