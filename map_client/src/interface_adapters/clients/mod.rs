pub mod auth;
pub mod comments;
mod response;

pub use auth::AuthClient;
pub use comments::CommentClient;
