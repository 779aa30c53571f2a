use uuid::Uuid;

use crate::domain::entities::{Account, Session};
use crate::domain::errors::CommentError;
use crate::domain::ports::{AccountStore, Clock, SessionStore};
use crate::use_cases::password::verify_password;

// Session handed back to the caller after login or registration.
#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub user_id: u64,
    pub username: String,
    pub expires_at: u64,
}

// Login use case with injected dependencies.
pub struct LoginUseCase<A, S, C> {
    pub accounts: A,
    pub sessions: S,
    pub clock: C,
    pub ttl_seconds: u64,
}

impl<A, S, C> LoginUseCase<A, S, C>
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
        let account = self
            .accounts
            .find_by_username(username.trim())
            .await
            .map_err(|_| CommentError::StorageFailure)?
            .ok_or(CommentError::InvalidCredentials)?;

        // A malformed stored hash is treated like a wrong password.
        let matches = verify_password(password.trim(), &account.password_hash).unwrap_or(false);
        if !matches {
            return Err(CommentError::InvalidCredentials);
        }

        issue_session(&self.sessions, &self.clock, self.ttl_seconds, &account).await
    }
}

pub(crate) async fn issue_session<S, C>(
    sessions: &S,
    clock: &C,
    ttl_seconds: u64,
    account: &Account,
) -> Result<IssuedSession, CommentError>
where
    S: SessionStore,
    C: Clock,
{
    let token = Uuid::new_v4().to_string();
    let expires_at = clock.now_epoch_seconds() + ttl_seconds;

    sessions
        .insert(
            token.clone(),
            Session {
                user_id: account.id,
                username: account.username.clone(),
                expires_at,
            },
        )
        .await
        .map_err(|_| CommentError::StorageFailure)?;

    Ok(IssuedSession {
        token,
        user_id: account.id,
        username: account.username.clone(),
        expires_at,
    })
}
