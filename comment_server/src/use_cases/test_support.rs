use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{
    Account, Bounds, NewComment, NewReply, Session, StoredComment, StoredReply,
};
use crate::domain::ports::{AccountStore, Clock, CommentStore, ImageStore, SessionStore};

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

#[derive(Default)]
struct Tables {
    sessions: HashMap<String, Session>,
    accounts: Vec<Account>,
    comments: Vec<StoredComment>,
    replies: Vec<StoredReply>,
    images: HashMap<String, Vec<u8>>,
}

// One fake backing every port so use cases can share state across calls.
#[derive(Clone)]
pub(crate) struct RecordingStore {
    tables: Arc<Mutex<Tables>>,
    failures: FailureFlags,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::default())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, session: Session) {
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.sessions.insert(token.into(), session);
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<Session> {
        let guard = self.tables.lock().expect("tables mutex poisoned");
        guard.sessions.get(token).cloned()
    }

    pub(crate) fn insert_test_comment(&self, comment: StoredComment) {
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.comments.push(comment);
    }

    pub(crate) fn insert_test_reply(&self, reply: StoredReply) {
        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.replies.push(reply);
    }

    pub(crate) fn test_comment_count(&self) -> usize {
        self.tables.lock().expect("tables mutex poisoned").comments.len()
    }

    pub(crate) fn test_reply_count(&self) -> usize {
        self.tables.lock().expect("tables mutex poisoned").replies.len()
    }

    pub(crate) fn test_image_count(&self) -> usize {
        self.tables.lock().expect("tables mutex poisoned").images.len()
    }
}

pub(crate) fn test_comment(id: u64, user_id: Option<u64>, lat: f64, lng: f64) -> StoredComment {
    StoredComment {
        id,
        user_id,
        name: "Pilot".to_string(),
        text: format!("comment {id}"),
        img_url: None,
        lat,
        lng,
        created_at: 1_700_000_000 + id,
    }
}

pub(crate) fn test_reply(id: u64, comment_id: u64, user_id: Option<u64>) -> StoredReply {
    StoredReply {
        id,
        comment_id,
        user_id,
        name: "Pilot".to_string(),
        text: format!("reply {id}"),
        img_url: None,
        created_at: 1_700_000_100 + id,
    }
}

#[async_trait]
impl SessionStore for RecordingStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        guard.sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard.sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard.sessions.remove(token).is_some())
    }
}

#[async_trait]
impl AccountStore for RecordingStore {
    async fn insert(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<Option<Account>, String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        if guard.accounts.iter().any(|a| a.username == username) {
            return Ok(None);
        }
        let account = Account {
            id: guard.accounts.len() as u64 + 1,
            username,
            password_hash,
        };
        guard.accounts.push(account.clone());
        Ok(Some(account))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }
}

#[async_trait]
impl CommentStore for RecordingStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<StoredComment, String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        let stored = StoredComment {
            id: guard.comments.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            user_id: comment.user_id,
            name: comment.name,
            text: comment.text,
            img_url: comment.img_url,
            lat: comment.lat,
            lng: comment.lng,
            created_at: comment.created_at,
        };
        guard.comments.push(stored.clone());
        Ok(stored)
    }

    async fn comments_in_bounds(&self, bounds: Bounds) -> Result<Vec<StoredComment>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .comments
            .iter()
            .filter(|c| bounds.contains(c.lat, c.lng))
            .cloned()
            .collect())
    }

    async fn comments_at(&self, lat: f64, lng: f64) -> Result<Vec<StoredComment>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .comments
            .iter()
            .filter(|c| c.lat == lat && c.lng == lng)
            .cloned()
            .collect())
    }

    async fn comment(&self, comment_id: u64) -> Result<Option<StoredComment>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn replies_for(&self, comment_id: u64) -> Result<Vec<StoredReply>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard
            .replies
            .iter()
            .filter(|r| r.comment_id == comment_id)
            .cloned()
            .collect())
    }

    async fn insert_reply(&self, reply: NewReply) -> Result<Option<StoredReply>, String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        if !guard.comments.iter().any(|c| c.id == reply.comment_id) {
            return Ok(None);
        }
        let stored = StoredReply {
            id: guard.replies.iter().map(|r| r.id).max().unwrap_or(0) + 1,
            comment_id: reply.comment_id,
            user_id: reply.user_id,
            name: reply.name,
            text: reply.text,
            img_url: reply.img_url,
            created_at: reply.created_at,
        };
        guard.replies.push(stored.clone());
        Ok(Some(stored))
    }

    async fn delete_comment(&self, comment_id: u64, user_id: u64) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        let before = guard.comments.len();
        guard
            .comments
            .retain(|c| !(c.id == comment_id && c.user_id == Some(user_id)));
        let deleted = guard.comments.len() != before;
        if deleted {
            guard.replies.retain(|r| r.comment_id != comment_id);
        }
        Ok(deleted)
    }

    async fn delete_reply(&self, reply_id: u64, user_id: u64) -> Result<bool, String> {
        if self.failures.remove {
            return Err("remove failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        let before = guard.replies.len();
        guard
            .replies
            .retain(|r| !(r.id == reply_id && r.user_id == Some(user_id)));
        Ok(guard.replies.len() != before)
    }
}

#[async_trait]
impl ImageStore for RecordingStore {
    async fn save(&self, extension: Option<String>, bytes: Vec<u8>) -> Result<String, String> {
        if self.failures.insert {
            return Err("insert failed".to_string());
        }

        let mut guard = self.tables.lock().expect("tables mutex poisoned");
        let name = match extension {
            Some(ext) => format!("image-{}.{ext}", guard.images.len() + 1),
            None => format!("image-{}", guard.images.len() + 1),
        };
        guard.images.insert(name.clone(), bytes);
        Ok(name)
    }

    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, String> {
        if self.failures.get {
            return Err("get failed".to_string());
        }

        let guard = self.tables.lock().expect("tables mutex poisoned");
        Ok(guard.images.get(name).cloned())
    }
}
