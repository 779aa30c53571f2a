use crate::domain::errors::CommentError;
use crate::domain::ports::SessionStore;

// Revokes a bearer token. Unknown tokens are not an error.
pub struct LogoutUseCase<S> {
    pub store: S,
}

impl<S> LogoutUseCase<S>
where
    S: SessionStore,
{
    // Returns whether a live session was removed.
    pub async fn execute(&self, token: &str) -> Result<bool, CommentError> {
        self.store
            .remove(token)
            .await
            .map_err(|_| CommentError::StorageFailure)
    }
}
