// Session collaborator: who is signed in and which credential to attach.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use tracing::{info, warn};

use crate::domain::entities::{Credential, Session, UserIdentity};
use crate::domain::errors::ClientError;
use crate::domain::ports::AuthApi;

/// Holds the current session. Nothing here is persisted.
pub struct SessionManager<A> {
    auth: Arc<A>,
    current: RwLock<Option<Session>>,
}

impl<A> SessionManager<A>
where
    A: AuthApi,
{
    pub fn new(auth: Arc<A>) -> Self {
        Self {
            auth,
            current: RwLock::new(None),
        }
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, ClientError> {
        let session = self.auth.login(username, password).await?;
        Ok(self.replace(session))
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, ClientError> {
        let session = self.auth.register(username, password).await?;
        Ok(self.replace(session))
    }

    /// Adopts an existing token after the server confirms who it belongs to.
    pub async fn resume(&self, credential: Credential) -> Result<UserIdentity, ClientError> {
        let user = self.auth.current_user(&credential).await?;
        Ok(self.replace(Session { credential, user }))
    }

    /// Drops the local session and revokes it server-side when possible.
    pub async fn logout(&self) {
        let Some(session) = self.take() else {
            return;
        };
        if let Err(err) = self.auth.logout(&session.credential).await {
            warn!(error = %err, "server-side logout failed");
        }
        info!(user_id = session.user.id, "logged out");
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn credential(&self) -> Option<Credential> {
        self.read().as_ref().map(|s| s.credential.clone())
    }

    pub fn current_user(&self) -> Option<UserIdentity> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    /// Forgets the session when the server has refused its token.
    /// Returns true when a session was dropped.
    pub fn invalidate_if_rejected(&self, err: &ClientError) -> bool {
        if !matches!(err, ClientError::Authorization { .. }) {
            return false;
        }
        let dropped = self.take();
        if let Some(session) = &dropped {
            warn!(user_id = session.user.id, "session rejected by server; signed out");
        }
        dropped.is_some()
    }

    /// Passes `result` through, signing out first when it is a token refusal.
    pub fn settle<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        if let Err(err) = &result {
            self.invalidate_if_rejected(err);
        }
        result
    }

    fn replace(&self, session: Session) -> UserIdentity {
        let user = session.user.clone();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        info!(user_id = user.id, username = %user.username, "signed in");
        user
    }

    fn take(&self) -> Option<Session> {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.current.read().unwrap_or_else(PoisonError::into_inner)
    }
}
