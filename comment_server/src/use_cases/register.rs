use crate::domain::errors::CommentError;
use crate::domain::ports::{AccountStore, Clock, SessionStore};
use crate::use_cases::login::{IssuedSession, issue_session};
use crate::use_cases::password::hash_password;

// Registration use case; a successful registration is also a login.
pub struct RegisterUseCase<A, S, C> {
    pub accounts: A,
    pub sessions: S,
    pub clock: C,
    pub ttl_seconds: u64,
    pub min_password_length: usize,
}

impl<A, S, C> RegisterUseCase<A, S, C>
where
    A: AccountStore,
    S: SessionStore,
    C: Clock,
{
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedSession, CommentError> {
        let username = username.trim();
        let password = password.trim();

        if username.is_empty() || password.is_empty() {
            return Err(CommentError::MissingCredentials);
        }
        if password.chars().count() < self.min_password_length {
            return Err(CommentError::WeakPassword {
                min_length: self.min_password_length,
            });
        }

        let password_hash = hash_password(password).map_err(|_| CommentError::StorageFailure)?;
        let account = self
            .accounts
            .insert(username.to_string(), password_hash)
            .await
            .map_err(|_| CommentError::StorageFailure)?
            .ok_or(CommentError::UsernameTaken)?;

        issue_session(&self.sessions, &self.clock, self.ttl_seconds, &account).await
    }
}
