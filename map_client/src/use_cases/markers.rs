// Marker lifecycle: the only writer of markers on the map surface.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::domain::entities::{Comment, MapEvent, MarkerClick, MarkerHandle, MarkerSpec};
use crate::domain::ports::MapSurface;

/// Longest text preview shown on a marker before it is cut.
pub const PREVIEW_CHARS: usize = 20;

/// A rendered marker and the comment it stands for.
struct MarkerRecord {
    handle: MarkerHandle,
    comment: Comment,
}

/// Result of one bulk replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceReport {
    pub removed: usize,
    pub created: usize,
    pub failed: usize,
}

/// Owns every marker currently on the surface.
pub struct MarkerLifecycleManager<M> {
    surface: Arc<M>,
    events: mpsc::WeakSender<MapEvent>,
    records: Mutex<Vec<MarkerRecord>>,
}

impl<M> MarkerLifecycleManager<M>
where
    M: MapSurface,
{
    pub fn new(surface: Arc<M>, events: mpsc::WeakSender<MapEvent>) -> Self {
        Self {
            surface,
            events,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Removes every owned marker, then creates one per representative.
    ///
    /// Markers that the surface refuses are skipped; the ones that were
    /// created stay owned and are removed on the next call.
    pub async fn replace_all(&self, representatives: Vec<Comment>) -> ReplaceReport {
        let mut records = self.records.lock().await;

        let handles: Vec<MarkerHandle> = records.iter().map(|r| r.handle).collect();
        self.surface.remove_markers(&handles);
        records.clear();

        let mut failed = 0;
        for comment in representatives {
            let spec = MarkerSpec {
                point: comment.point,
                author: comment.name.clone(),
                preview: preview(&comment.text),
                on_click: MarkerClick::new(comment.point, self.events.clone()),
            };
            match self.surface.add_marker(spec) {
                Ok(handle) => records.push(MarkerRecord { handle, comment }),
                Err(err) => {
                    failed += 1;
                    warn!(comment_id = comment.id, error = %err, "failed to create marker");
                }
            }
        }

        let report = ReplaceReport {
            removed: handles.len(),
            created: records.len(),
            failed,
        };
        debug!(?report, "markers replaced");
        report
    }

    pub async fn marker_count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// Comments currently represented on the map, in creation order.
    pub async fn rendered(&self) -> Vec<Comment> {
        let records = self.records.lock().await;
        records.iter().map(|r| r.comment.clone()).collect()
    }
}

/// First `PREVIEW_CHARS` characters of `text`, with `...` when cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
