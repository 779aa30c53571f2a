// Domain-level errors for comment and account workflows.
#[derive(Debug, PartialEq)]
pub enum CommentError {
    MissingCredentials,
    WeakPassword { min_length: usize },
    UsernameTaken,
    InvalidCredentials,
    InvalidToken,
    SessionExpired,
    MissingText,
    CommentNotFound { comment_id: u64 },
    Forbidden,
    StorageFailure,
}

impl std::fmt::Display for CommentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentError::MissingCredentials => write!(f, "username and password are required"),
            CommentError::WeakPassword { min_length } => {
                write!(f, "password must be at least {min_length} characters")
            }
            CommentError::UsernameTaken => write!(f, "username already exists"),
            CommentError::InvalidCredentials => write!(f, "invalid username or password"),
            CommentError::InvalidToken => write!(f, "invalid session token"),
            CommentError::SessionExpired => write!(f, "session expired"),
            CommentError::MissingText => write!(f, "text is required"),
            CommentError::CommentNotFound { comment_id } => {
                write!(f, "comment {comment_id} not found")
            }
            CommentError::Forbidden => write!(f, "only the author may delete this"),
            CommentError::StorageFailure => write!(f, "storage error"),
        }
    }
}

impl std::error::Error for CommentError {}
