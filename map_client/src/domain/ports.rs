use async_trait::async_trait;

use crate::domain::entities::{
    Comment, CommentPayload, Credential, GeoPoint, MarkerHandle, MarkerSpec, Notice, Session,
    UserIdentity, ViewportBounds,
};
use crate::domain::errors::ClientError;

// Port for the comment/reply HTTP endpoints.
#[async_trait]
pub trait CommentApi: Send + Sync {
    // Ascending by creation time.
    async fn comments_in_bounds(
        &self,
        bounds: ViewportBounds,
    ) -> Result<Vec<Comment>, ClientError>;
    // Comments at exactly `point`, each with nested replies.
    async fn comments_at(&self, point: GeoPoint) -> Result<Vec<Comment>, ClientError>;
    async fn create_comment(
        &self,
        credential: &Credential,
        payload: CommentPayload,
        point: GeoPoint,
    ) -> Result<(), ClientError>;
    async fn create_reply(
        &self,
        credential: &Credential,
        payload: CommentPayload,
        comment_id: u64,
    ) -> Result<(), ClientError>;
    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: u64,
    ) -> Result<(), ClientError>;
    async fn delete_reply(
        &self,
        credential: &Credential,
        reply_id: u64,
    ) -> Result<(), ClientError>;
}

// Port for the account endpoints behind the session collaborator.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<Session, ClientError>;
    async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError>;
    async fn current_user(&self, credential: &Credential) -> Result<UserIdentity, ClientError>;
    async fn logout(&self, credential: &Credential) -> Result<(), ClientError>;
}

// Port for the rendering surface. Calls are synchronous and cheap.
pub trait MapSurface: Send + Sync {
    // None until the surface has a viewport.
    fn bounds(&self) -> Option<ViewportBounds>;
    fn add_marker(&self, spec: MarkerSpec) -> Result<MarkerHandle, String>;
    fn remove_markers(&self, handles: &[MarkerHandle]);
}

// Port for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}
