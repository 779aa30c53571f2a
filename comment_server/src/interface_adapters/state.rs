use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{
    Account, Bounds, NewComment, NewReply, Session, StoredComment, StoredReply,
};
use crate::domain::ports::{AccountStore, Clock, CommentStore, ImageStore, SessionStore};

// Comment and reply rows plus their id counters.
#[derive(Default)]
pub struct CommentTables {
    pub comments: Vec<StoredComment>,
    pub replies: Vec<StoredReply>,
    pub next_comment_id: u64,
    pub next_reply_id: u64,
}

// Accounts keyed by username.
#[derive(Default)]
pub struct AccountTable {
    pub by_username: HashMap<String, Account>,
    pub next_id: u64,
}

// Application state holding every in-memory table.
#[derive(Clone)]
pub struct AppState {
    pub comments: Arc<Mutex<CommentTables>>,
    pub accounts: Arc<Mutex<AccountTable>>,
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub images: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub token_ttl_seconds: u64,
}

impl AppState {
    pub fn new(token_ttl_seconds: u64) -> Self {
        Self {
            comments: Arc::new(Mutex::new(CommentTables::default())),
            accounts: Arc::new(Mutex::new(AccountTable::default())),
            sessions: Arc::new(Mutex::new(HashMap::new())),
            images: Arc::new(Mutex::new(HashMap::new())),
            token_ttl_seconds,
        }
    }

    pub fn comment_store(&self) -> InMemoryCommentStore {
        InMemoryCommentStore {
            tables: self.comments.clone(),
        }
    }

    pub fn account_store(&self) -> InMemoryAccountStore {
        InMemoryAccountStore {
            table: self.accounts.clone(),
        }
    }

    pub fn session_store(&self) -> InMemorySessionStore {
        InMemorySessionStore {
            sessions: self.sessions.clone(),
        }
    }

    pub fn image_store(&self) -> InMemoryImageStore {
        InMemoryImageStore {
            images: self.images.clone(),
        }
    }
}

// In-memory comment store adapter.
#[derive(Clone)]
pub struct InMemoryCommentStore {
    pub tables: Arc<Mutex<CommentTables>>,
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn insert_comment(&self, comment: NewComment) -> Result<StoredComment, String> {
        let mut tables = self.tables.lock().await;
        tables.next_comment_id += 1;
        let stored = StoredComment {
            id: tables.next_comment_id,
            user_id: comment.user_id,
            name: comment.name,
            text: comment.text,
            img_url: comment.img_url,
            lat: comment.lat,
            lng: comment.lng,
            created_at: comment.created_at,
        };
        tables.comments.push(stored.clone());
        Ok(stored)
    }

    async fn comments_in_bounds(&self, bounds: Bounds) -> Result<Vec<StoredComment>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| bounds.contains(c.lat, c.lng))
            .cloned()
            .collect())
    }

    async fn comments_at(&self, lat: f64, lng: f64) -> Result<Vec<StoredComment>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.lat == lat && c.lng == lng)
            .cloned()
            .collect())
    }

    async fn comment(&self, comment_id: u64) -> Result<Option<StoredComment>, String> {
        let tables = self.tables.lock().await;
        Ok(tables.comments.iter().find(|c| c.id == comment_id).cloned())
    }

    async fn replies_for(&self, comment_id: u64) -> Result<Vec<StoredReply>, String> {
        let tables = self.tables.lock().await;
        Ok(tables
            .replies
            .iter()
            .filter(|r| r.comment_id == comment_id)
            .cloned()
            .collect())
    }

    async fn insert_reply(&self, reply: NewReply) -> Result<Option<StoredReply>, String> {
        let mut tables = self.tables.lock().await;
        if !tables.comments.iter().any(|c| c.id == reply.comment_id) {
            return Ok(None);
        }
        tables.next_reply_id += 1;
        let stored = StoredReply {
            id: tables.next_reply_id,
            comment_id: reply.comment_id,
            user_id: reply.user_id,
            name: reply.name,
            text: reply.text,
            img_url: reply.img_url,
            created_at: reply.created_at,
        };
        tables.replies.push(stored.clone());
        Ok(Some(stored))
    }

    async fn delete_comment(&self, comment_id: u64, user_id: u64) -> Result<bool, String> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables
            .comments
            .iter()
            .position(|c| c.id == comment_id && c.user_id == Some(user_id))
        else {
            return Ok(false);
        };
        tables.comments.remove(index);
        tables.replies.retain(|r| r.comment_id != comment_id);
        Ok(true)
    }

    async fn delete_reply(&self, reply_id: u64, user_id: u64) -> Result<bool, String> {
        let mut tables = self.tables.lock().await;
        let Some(index) = tables
            .replies
            .iter()
            .position(|r| r.id == reply_id && r.user_id == Some(user_id))
        else {
            return Ok(false);
        };
        tables.replies.remove(index);
        Ok(true)
    }
}

// In-memory account store adapter.
#[derive(Clone)]
pub struct InMemoryAccountStore {
    pub table: Arc<Mutex<AccountTable>>,
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn insert(
        &self,
        username: String,
        password_hash: String,
    ) -> Result<Option<Account>, String> {
        let mut table = self.table.lock().await;
        if table.by_username.contains_key(&username) {
            return Ok(None);
        }
        table.next_id += 1;
        let account = Account {
            id: table.next_id,
            username: username.clone(),
            password_hash,
        };
        table.by_username.insert(username, account.clone());
        Ok(Some(account))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, String> {
        let table = self.table.lock().await;
        Ok(table.by_username.get(username).cloned())
    }
}

// In-memory session store adapter.
#[derive(Clone)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.lock().await;
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>, String> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> Result<bool, String> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }
}

// In-memory image blob adapter; names are random so uploads never collide.
#[derive(Clone)]
pub struct InMemoryImageStore {
    pub images: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn save(&self, extension: Option<String>, bytes: Vec<u8>) -> Result<String, String> {
        let name = match extension {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        let mut images = self.images.lock().await;
        images.insert(name.clone(), bytes);
        Ok(name)
    }

    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, String> {
        let images = self.images.lock().await;
        Ok(images.get(name).cloned())
    }
}

// System clock adapter used by the use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}
