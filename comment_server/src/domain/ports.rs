use async_trait::async_trait;

use crate::domain::entities::{
    Account, Bounds, NewComment, NewReply, Session, StoredComment, StoredReply,
};

// Port for comment and reply persistence.
#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert_comment(&self, comment: NewComment) -> Result<StoredComment, String>;
    async fn comments_in_bounds(&self, bounds: Bounds) -> Result<Vec<StoredComment>, String>;
    async fn comments_at(&self, lat: f64, lng: f64) -> Result<Vec<StoredComment>, String>;
    async fn comment(&self, comment_id: u64) -> Result<Option<StoredComment>, String>;
    async fn replies_for(&self, comment_id: u64) -> Result<Vec<StoredReply>, String>;
    // Returns None when the parent comment does not exist.
    async fn insert_reply(&self, reply: NewReply) -> Result<Option<StoredReply>, String>;
    // Both deletes only remove rows owned by `user_id`; comment deletes cascade.
    async fn delete_comment(&self, comment_id: u64, user_id: u64) -> Result<bool, String>;
    async fn delete_reply(&self, reply_id: u64, user_id: u64) -> Result<bool, String>;
}

// Port for registered accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    // Returns None when the username is already taken.
    async fn insert(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<Option<Account>, String>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, String>;
}

// Port for session storage used by auth use cases.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session) -> Result<(), String>;
    async fn get(&self, token: &str) -> Result<Option<Session>, String>;
    async fn remove(&self, token: &str) -> Result<bool, String>;
}

// Port for uploaded image blobs; `save` returns the stored file name.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn save(&self, extension: Option<String>, bytes: Vec<u8>) -> Result<String, String>;
    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, String>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
