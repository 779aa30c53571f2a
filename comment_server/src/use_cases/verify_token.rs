use crate::domain::entities::Session;
use crate::domain::errors::CommentError;
use crate::domain::ports::{Clock, SessionStore};

// Token verification use case with injected dependencies.
pub struct VerifyTokenUseCase<C, S> {
    pub clock: C,
    pub store: S,
}

impl<C, S> VerifyTokenUseCase<C, S>
where
    C: Clock,
    S: SessionStore,
{
    pub async fn execute(&self, token: &str) -> Result<Session, CommentError> {
        let session = self
            .store
            .get(token)
            .await
            .map_err(|_| CommentError::StorageFailure)?
            .ok_or(CommentError::InvalidToken)?;

        if session.expires_at <= self.clock.now_epoch_seconds() {
            // Best-effort cleanup of expired session.
            let _ = self.store.remove(token).await;
            return Err(CommentError::SessionExpired);
        }

        Ok(session)
    }
}
