// Registered account stored in memory.
#[derive(Clone, Debug)]
pub struct Account {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
}

// Bearer session record keyed by token.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user_id: u64,
    pub username: String,
    pub expires_at: u64,
}

// Top-level comment as persisted; the point never changes after insert.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredComment {
    pub id: u64,
    // None for anonymous comments.
    pub user_id: Option<u64>,
    pub name: String,
    pub text: String,
    pub img_url: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: u64,
}

// Reply belonging to exactly one comment.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredReply {
    pub id: u64,
    pub comment_id: u64,
    pub user_id: Option<u64>,
    pub name: String,
    pub text: String,
    pub img_url: Option<String>,
    pub created_at: u64,
}

// Comment with its replies in creation order.
#[derive(Clone, Debug, PartialEq)]
pub struct CommentThread {
    pub comment: StoredComment,
    pub replies: Vec<StoredReply>,
}

// Insert payload for a comment; the store assigns the id.
#[derive(Clone, Debug)]
pub struct NewComment {
    pub user_id: Option<u64>,
    pub name: String,
    pub text: String,
    pub img_url: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: u64,
}

// Insert payload for a reply; the store assigns the id.
#[derive(Clone, Debug)]
pub struct NewReply {
    pub comment_id: u64,
    pub user_id: Option<u64>,
    pub name: String,
    pub text: String,
    pub img_url: Option<String>,
    pub created_at: u64,
}

// Rectangle used by the viewport listing, inclusive on every edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub sw_lat: f64,
    pub sw_lng: f64,
    pub ne_lat: f64,
    pub ne_lng: f64,
}

impl Bounds {
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.sw_lat..=self.ne_lat).contains(&lat) && (self.sw_lng..=self.ne_lng).contains(&lng)
    }
}

// Who is writing; anonymous comment authors carry no user id.
#[derive(Clone, Debug, PartialEq)]
pub struct Author {
    pub user_id: Option<u64>,
    pub name: String,
}

impl Author {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            name: ANONYMOUS_NAME.to_string(),
        }
    }
}

impl From<&Session> for Author {
    fn from(session: &Session) -> Self {
        Self {
            user_id: Some(session.user_id),
            name: session.username.clone(),
        }
    }
}

pub const ANONYMOUS_NAME: &str = "guest";

// Uploaded image bytes with the client-supplied file name.
#[derive(Clone, Debug)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// Public path under which stored images are served.
pub const IMAGE_PATH_PREFIX: &str = "/static/img";
