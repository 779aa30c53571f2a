use serde::{Deserialize, Serialize};

use crate::domain::entities::{CommentThread, StoredComment, StoredReply};

// Request payload for register and login.
#[derive(Debug, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// Public view of an account.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: u64,
    pub username: String,
}

// Response payload for register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub access_token: String,
    pub expires_at: u64,
    pub user: UserView,
}

// Response payload for the current-user lookup.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: UserView,
}

// Response payload for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
    pub revoked: bool,
}

// Query string of the viewport listing; parsed by hand so bad input gets a JSON error.
#[derive(Debug, Deserialize)]
pub struct BoundsQuery {
    pub sw_lat: Option<String>,
    pub sw_lng: Option<String>,
    pub ne_lat: Option<String>,
    pub ne_lng: Option<String>,
}

// Query string of the single-point listing.
#[derive(Debug, Deserialize)]
pub struct PointQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReplyView {
    pub id: u64,
    pub comment_id: u64,
    pub user_id: Option<u64>,
    pub name: String,
    pub text: String,
    pub img_url: Option<String>,
    pub created_at: u64,
}

impl From<StoredReply> for ReplyView {
    fn from(reply: StoredReply) -> Self {
        Self {
            id: reply.id,
            comment_id: reply.comment_id,
            user_id: reply.user_id,
            name: reply.name,
            text: reply.text,
            img_url: reply.img_url,
            created_at: reply.created_at,
        }
    }
}

// Comment as sent over the wire; `replies` is omitted from the viewport listing.
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: u64,
    pub user_id: Option<u64>,
    pub name: String,
    pub text: String,
    pub img_url: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<Vec<ReplyView>>,
}

impl From<StoredComment> for CommentView {
    fn from(comment: StoredComment) -> Self {
        Self {
            id: comment.id,
            user_id: comment.user_id,
            name: comment.name,
            text: comment.text,
            img_url: comment.img_url,
            lat: comment.lat,
            lng: comment.lng,
            created_at: comment.created_at,
            replies: None,
        }
    }
}

impl From<CommentThread> for CommentView {
    fn from(thread: CommentThread) -> Self {
        let replies = thread.replies.into_iter().map(ReplyView::from).collect();
        Self {
            replies: Some(replies),
            ..CommentView::from(thread.comment)
        }
    }
}

// Response payload for both comment listings.
#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub success: bool,
    pub comments: Vec<CommentView>,
}

// Response payload for a single comment with its replies.
#[derive(Debug, Serialize)]
pub struct CommentDetailResponse {
    pub success: bool,
    pub comment: CommentView,
    pub replies: Vec<ReplyView>,
}

#[derive(Debug, Serialize)]
pub struct CreatedCommentResponse {
    pub success: bool,
    pub comment: CommentView,
}

#[derive(Debug, Serialize)]
pub struct CreatedReplyResponse {
    pub success: bool,
    pub reply: ReplyView,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub msg: String,
}

// Error envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
