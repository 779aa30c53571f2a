// Detail-view state: every thread at the selected point.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{Comment, GeoPoint};
use crate::domain::errors::ClientError;
use crate::domain::ports::CommentApi;

/// Point shown in the detail view and its threads, oldest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThreadSnapshot {
    pub point: Option<GeoPoint>,
    pub comments: Vec<Comment>,
}

pub struct CommentThreadStore<A> {
    api: Arc<A>,
    current: RwLock<ThreadSnapshot>,
}

impl<A> CommentThreadStore<A>
where
    A: CommentApi,
{
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            current: RwLock::new(ThreadSnapshot::default()),
        }
    }

    /// Replaces the held threads with everything at exactly `point`.
    ///
    /// On failure the previous contents stay. Overlapping loads all land and
    /// the last one to arrive wins.
    pub async fn load(&self, point: GeoPoint) -> Result<usize, ClientError> {
        let mut comments = self.api.comments_at(point).await?;
        comments.sort_by_key(|c| (c.created_at, c.id));
        for comment in &mut comments {
            comment.replies.sort_by_key(|r| (r.created_at, r.id));
        }

        let loaded = comments.len();
        let mut current = self.current.write().await;
        *current = ThreadSnapshot {
            point: Some(point),
            comments,
        };
        debug!(lat = point.lat, lng = point.lng, loaded, "threads loaded");
        Ok(loaded)
    }

    /// Selects a point with no comments yet, without asking the server.
    pub async fn open_new_point(&self, point: GeoPoint) {
        let mut current = self.current.write().await;
        *current = ThreadSnapshot {
            point: Some(point),
            comments: Vec::new(),
        };
    }

    pub async fn selected(&self) -> Option<GeoPoint> {
        self.current.read().await.point
    }

    pub async fn snapshot(&self) -> ThreadSnapshot {
        self.current.read().await.clone()
    }

    pub async fn close(&self) {
        *self.current.write().await = ThreadSnapshot::default();
    }
}
