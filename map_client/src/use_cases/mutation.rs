// Writes (new comments, replies, deletions) followed by the dual refresh.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::entities::{CommentPayload, Credential, GeoPoint, MutationTarget, Notice};
use crate::domain::errors::ClientError;
use crate::domain::ports::{AuthApi, CommentApi, MapSurface, Notifier};
use crate::use_cases::session::SessionManager;
use crate::use_cases::thread_store::CommentThreadStore;
use crate::use_cases::viewport_sync::{SyncOutcome, ViewportSyncEngine};

/// Submits user writes and, once the server accepts one, reloads the detail
/// view and then the viewport markers before returning.
pub struct MutationCoordinator<A, M, N> {
    api: Arc<A>,
    threads: Arc<CommentThreadStore<A>>,
    sync: Arc<ViewportSyncEngine<A, M, N>>,
    notifier: Arc<N>,
}

impl<A, M, N> MutationCoordinator<A, M, N>
where
    A: CommentApi,
    M: MapSurface,
    N: Notifier,
{
    pub fn new(
        api: Arc<A>,
        threads: Arc<CommentThreadStore<A>>,
        sync: Arc<ViewportSyncEngine<A, M, N>>,
        notifier: Arc<N>,
    ) -> Self {
        Self {
            api,
            threads,
            sync,
            notifier,
        }
    }

    /// Posts a new comment or a reply. Without a credential nothing is sent.
    pub async fn submit(
        &self,
        credential: Option<&Credential>,
        payload: CommentPayload,
        target: MutationTarget,
    ) -> Result<(), ClientError> {
        let credential = self.require(credential)?;
        if payload.text.trim().is_empty() {
            return Err(self.fail(ClientError::rejected("text is required")));
        }

        let written = match target {
            MutationTarget::NewComment(point) => self
                .api
                .create_comment(credential, payload, point)
                .await
                .map(|()| "comment posted"),
            MutationTarget::Reply { comment_id, .. } => self
                .api
                .create_reply(credential, payload, comment_id)
                .await
                .map(|()| "reply posted"),
        };
        let message = written.map_err(|err| self.fail(err))?;

        info!(?target, "{message}");
        self.notifier.notify(Notice::Success(message.to_string()));
        self.refresh(Some(target.point())).await;
        Ok(())
    }

    /// Deletes a comment (its replies go with it server-side).
    pub async fn delete_comment(
        &self,
        credential: Option<&Credential>,
        comment_id: u64,
    ) -> Result<(), ClientError> {
        let credential = self.require(credential)?;
        self.api
            .delete_comment(credential, comment_id)
            .await
            .map_err(|err| self.fail(err))?;

        info!(comment_id, "comment deleted");
        self.notifier
            .notify(Notice::Success("comment deleted".to_string()));
        self.refresh(self.threads.selected().await).await;
        Ok(())
    }

    pub async fn delete_reply(
        &self,
        credential: Option<&Credential>,
        reply_id: u64,
    ) -> Result<(), ClientError> {
        let credential = self.require(credential)?;
        self.api
            .delete_reply(credential, reply_id)
            .await
            .map_err(|err| self.fail(err))?;

        info!(reply_id, "reply deleted");
        self.notifier
            .notify(Notice::Success("reply deleted".to_string()));
        self.refresh(self.threads.selected().await).await;
        Ok(())
    }

    /// `submit` with the current session's credential. A refused token
    /// signs the session out.
    pub async fn submit_as<U>(
        &self,
        sessions: &SessionManager<U>,
        payload: CommentPayload,
        target: MutationTarget,
    ) -> Result<(), ClientError>
    where
        U: AuthApi,
    {
        let credential = sessions.credential();
        sessions.settle(self.submit(credential.as_ref(), payload, target).await)
    }

    pub async fn delete_comment_as<U>(
        &self,
        sessions: &SessionManager<U>,
        comment_id: u64,
    ) -> Result<(), ClientError>
    where
        U: AuthApi,
    {
        let credential = sessions.credential();
        sessions.settle(self.delete_comment(credential.as_ref(), comment_id).await)
    }

    pub async fn delete_reply_as<U>(
        &self,
        sessions: &SessionManager<U>,
        reply_id: u64,
    ) -> Result<(), ClientError>
    where
        U: AuthApi,
    {
        let credential = sessions.credential();
        sessions.settle(self.delete_reply(credential.as_ref(), reply_id).await)
    }

    fn require<'c>(
        &self,
        credential: Option<&'c Credential>,
    ) -> Result<&'c Credential, ClientError> {
        credential.ok_or_else(|| self.fail(ClientError::unauthorized("log in to post or delete")))
    }

    fn fail(&self, err: ClientError) -> ClientError {
        warn!(error = %err, "mutation failed");
        self.notifier.notify(Notice::Failure(err.to_string()));
        err
    }

    // Thread store first, then markers. Refresh failures are reported but do
    // not undo the write that already succeeded.
    async fn refresh(&self, point: Option<GeoPoint>) {
        if let Some(point) = point {
            if let Err(err) = self.threads.load(point).await {
                warn!(error = %err, "thread refresh failed");
                self.notifier
                    .notify(Notice::Failure(format!("could not reload comments: {err}")));
            }
        }

        match self.sync.sync().await {
            // One fetch at a time; the next viewport event picks the write up.
            SyncOutcome::Dropped => debug!("marker refresh dropped; fetch already in flight"),
            SyncOutcome::Skipped => debug!("marker refresh skipped; map not ready"),
            SyncOutcome::Rendered { .. } | SyncOutcome::Failed(_) => {}
        }
    }
}
