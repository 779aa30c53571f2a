use crate::interface_adapters::handlers::{
    comment_detail, comments_at, comments_in_bounds, create_comment, create_reply,
    delete_comment, delete_reply, image, login, logout, me, register,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

// Uploads carry one image each; keep the body cap above typical phone photos.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/users/me", get(me))
        .route("/api/comments/all", get(comments_in_bounds))
        .route("/api/comments", get(comments_at).post(create_comment))
        .route(
            "/api/comments/{id}",
            get(comment_detail).delete(delete_comment),
        )
        .route("/api/replies", post(create_reply))
        .route("/api/replies/{id}", delete(delete_reply))
        .route("/static/img/{name}", get(image))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
