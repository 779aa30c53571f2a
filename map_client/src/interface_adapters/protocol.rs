// Wire DTOs for the comment service. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Comment, GeoPoint, Reply, UserIdentity};

#[derive(Debug, Deserialize)]
pub struct ReplyDto {
    pub id: u64,
    pub comment_id: u64,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub text: String,
    #[serde(default)]
    pub img_url: Option<String>,
    pub created_at: u64,
}

impl From<ReplyDto> for Reply {
    fn from(dto: ReplyDto) -> Self {
        Self {
            id: dto.id,
            comment_id: dto.comment_id,
            name: dto.name,
            user_id: dto.user_id,
            text: dto.text,
            img_url: dto.img_url,
            created_at: dto.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<u64>,
    pub text: String,
    #[serde(default)]
    pub img_url: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub created_at: u64,
    #[serde(default)]
    pub replies: Vec<ReplyDto>,
}

impl From<CommentDto> for Comment {
    fn from(dto: CommentDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            user_id: dto.user_id,
            text: dto.text,
            img_url: dto.img_url,
            created_at: dto.created_at,
            point: GeoPoint::new(dto.lat, dto.lng),
            replies: dto.replies.into_iter().map(Reply::from).collect(),
        }
    }
}

// `{ success, comments }` listing envelope.
#[derive(Debug, Deserialize)]
pub struct CommentsEnvelope {
    pub success: bool,
    #[serde(default)]
    pub comments: Vec<CommentDto>,
    #[serde(default)]
    pub error: Option<String>,
}

// `{ success, error? }` envelope returned by every write.
#[derive(Debug, Deserialize)]
pub struct MutationEnvelope {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

// Error body; every field optional so foreign error pages still parse.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[derive(Debug, Serialize)]
pub struct CredentialsRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct UserDto {
    pub id: u64,
    pub username: String,
}

impl From<UserDto> for UserIdentity {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            username: dto.username,
        }
    }
}

// Register/login envelope.
#[derive(Debug, Deserialize)]
pub struct AuthEnvelope {
    pub success: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MeEnvelope {
    pub success: bool,
    #[serde(default)]
    pub user: Option<UserDto>,
    #[serde(default)]
    pub error: Option<String>,
}
