use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{info, warn};

use crate::domain::entities::{Author, Bounds, ImageUpload, Session};
use crate::domain::errors::CommentError;
use crate::domain::ports::ImageStore;
use crate::interface_adapters::protocol::{
    AuthRequest, AuthResponse, BoundsQuery, CommentDetailResponse, CommentView, CommentsResponse,
    CreatedCommentResponse, CreatedReplyResponse, DeletedResponse, ErrorResponse, LogoutResponse,
    MeResponse, PointQuery, ReplyView, UserView,
};
use crate::interface_adapters::state::{AppState, SystemClock};
use crate::use_cases::comments::{
    CommentDraft, CreateCommentUseCase, DeleteCommentUseCase, ListCommentsUseCase,
};
use crate::use_cases::login::{IssuedSession, LoginUseCase};
use crate::use_cases::logout::LogoutUseCase;
use crate::use_cases::register::RegisterUseCase;
use crate::use_cases::replies::{CreateReplyUseCase, DeleteReplyUseCase, ReplyDraft};
use crate::use_cases::verify_token::VerifyTokenUseCase;

pub const MIN_PASSWORD_LENGTH: usize = 6;

type HandlerError = (StatusCode, Json<ErrorResponse>);

// Handler for account registration; registering also logs in.
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), HandlerError> {
    let use_case = RegisterUseCase {
        accounts: state.account_store(),
        sessions: state.session_store(),
        clock: SystemClock,
        ttl_seconds: state.token_ttl_seconds,
        min_password_length: MIN_PASSWORD_LENGTH,
    };

    let issued = use_case
        .execute(&payload.username, &payload.password)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Account))?;

    info!(user_id = issued.user_id, "account registered");
    Ok((StatusCode::CREATED, Json(auth_response(issued))))
}

// Handler for password login.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<Json<AuthResponse>, HandlerError> {
    let use_case = LoginUseCase {
        accounts: state.account_store(),
        sessions: state.session_store(),
        clock: SystemClock,
        ttl_seconds: state.token_ttl_seconds,
    };

    let issued = use_case
        .execute(&payload.username, &payload.password)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Account))?;

    Ok(Json(auth_response(issued)))
}

// Handler for revoking the bearer token.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, HandlerError> {
    let token = bearer_token(&headers).ok_or_else(missing_bearer)?;
    let use_case = LogoutUseCase {
        store: state.session_store(),
    };

    let revoked = use_case
        .execute(token)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Session))?;

    Ok(Json(LogoutResponse {
        success: true,
        revoked,
    }))
}

// Handler returning the account behind the bearer token.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MeResponse>, HandlerError> {
    let session = authenticate(&state, &headers).await?;

    Ok(Json(MeResponse {
        success: true,
        user: UserView {
            id: session.user_id,
            username: session.username,
        },
    }))
}

// Handler for the viewport listing.
pub async fn comments_in_bounds(
    State(state): State<AppState>,
    Query(query): Query<BoundsQuery>,
) -> Result<Json<CommentsResponse>, HandlerError> {
    let bounds = Bounds {
        sw_lat: parse_coordinate(query.sw_lat, "sw_lat")?,
        sw_lng: parse_coordinate(query.sw_lng, "sw_lng")?,
        ne_lat: parse_coordinate(query.ne_lat, "ne_lat")?,
        ne_lng: parse_coordinate(query.ne_lng, "ne_lng")?,
    };
    let use_case = ListCommentsUseCase {
        store: state.comment_store(),
    };

    let comments = use_case
        .in_bounds(bounds)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Read))?;

    Ok(Json(CommentsResponse {
        success: true,
        comments: comments.into_iter().map(CommentView::from).collect(),
    }))
}

// Handler for every thread at one exact point.
pub async fn comments_at(
    State(state): State<AppState>,
    Query(query): Query<PointQuery>,
) -> Result<Json<CommentsResponse>, HandlerError> {
    let lat = parse_coordinate(query.lat, "lat")?;
    let lng = parse_coordinate(query.lng, "lng")?;
    let use_case = ListCommentsUseCase {
        store: state.comment_store(),
    };

    let threads = use_case
        .at_point(lat, lng)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Read))?;

    Ok(Json(CommentsResponse {
        success: true,
        comments: threads.into_iter().map(CommentView::from).collect(),
    }))
}

// Handler for one comment and its replies.
pub async fn comment_detail(
    State(state): State<AppState>,
    Path(comment_id): Path<u64>,
) -> Result<Json<CommentDetailResponse>, HandlerError> {
    let use_case = ListCommentsUseCase {
        store: state.comment_store(),
    };

    let thread = use_case
        .thread(comment_id)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Read))?;

    Ok(Json(CommentDetailResponse {
        success: true,
        comment: CommentView::from(thread.comment),
        replies: thread.replies.into_iter().map(ReplyView::from).collect(),
    }))
}

// Handler for posting a comment; a missing bearer posts as the anonymous author.
#[tracing::instrument(skip_all)]
pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedCommentResponse>), HandlerError> {
    let author = match bearer_token(&headers) {
        Some(_) => Author::from(&authenticate(&state, &headers).await?),
        None => Author::anonymous(),
    };
    let form = read_form(multipart).await?;
    let draft = CommentDraft {
        text: form.text.unwrap_or_default(),
        lat: parse_coordinate(form.lat, "lat")?,
        lng: parse_coordinate(form.lng, "lng")?,
        image: form.image,
    };
    let use_case = CreateCommentUseCase {
        store: state.comment_store(),
        images: state.image_store(),
        clock: SystemClock,
    };

    let comment = use_case
        .execute(author, draft)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Write))?;

    info!(comment_id = comment.id, lat = comment.lat, lng = comment.lng, "comment created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedCommentResponse {
            success: true,
            comment: CommentView::from(comment),
        }),
    ))
}

// Handler for replying to a comment; requires a session.
#[tracing::instrument(skip_all)]
pub async fn create_reply(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedReplyResponse>), HandlerError> {
    let session = authenticate(&state, &headers).await?;
    let form = read_form(multipart).await?;
    let comment_id = form
        .comment_id
        .as_deref()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, "comment_id is required"))?;
    let draft = ReplyDraft {
        comment_id,
        text: form.text.unwrap_or_default(),
        image: form.image,
    };
    let use_case = CreateReplyUseCase {
        store: state.comment_store(),
        images: state.image_store(),
        clock: SystemClock,
    };

    let reply = use_case
        .execute(Author::from(&session), draft)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Write))?;

    info!(reply_id = reply.id, comment_id, "reply created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedReplyResponse {
            success: true,
            reply: ReplyView::from(reply),
        }),
    ))
}

// Handler for deleting a comment and its replies.
#[tracing::instrument(skip_all)]
pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<u64>,
) -> Result<Json<DeletedResponse>, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    let use_case = DeleteCommentUseCase {
        store: state.comment_store(),
    };

    use_case
        .execute(comment_id, session.user_id)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::DeleteComment))?;

    info!(comment_id, "comment deleted");
    Ok(Json(DeletedResponse {
        success: true,
        msg: "comment deleted".to_string(),
    }))
}

// Handler for deleting a reply.
#[tracing::instrument(skip_all)]
pub async fn delete_reply(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(reply_id): Path<u64>,
) -> Result<Json<DeletedResponse>, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    let use_case = DeleteReplyUseCase {
        store: state.comment_store(),
    };

    use_case
        .execute(reply_id, session.user_id)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::DeleteReply))?;

    info!(reply_id, "reply deleted");
    Ok(Json(DeletedResponse {
        success: true,
        msg: "reply deleted".to_string(),
    }))
}

// Handler serving uploaded image bytes.
pub async fn image(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    match state.image_store().load(&name).await {
        Ok(Some(bytes)) => ([(header::CONTENT_TYPE, content_type_for(&name))], bytes).into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "image not found").into_response(),
        Err(err) => {
            warn!(error = %err, "failed to load image");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage error").into_response()
        }
    }
}

// Multipart fields shared by the comment and reply forms.
#[derive(Default)]
struct FormFields {
    text: Option<String>,
    lat: Option<String>,
    lng: Option<String>,
    comment_id: Option<String>,
    image: Option<ImageUpload>,
}

async fn read_form(mut multipart: Multipart) -> Result<FormFields, HandlerError> {
    let mut form = FormFields::default();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        warn!(error = %err, "malformed multipart body");
        error_response(StatusCode::BAD_REQUEST, "malformed form data")
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| error_response(StatusCode::BAD_REQUEST, "malformed image upload"))?;
            form.image = Some(ImageUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|_| error_response(StatusCode::BAD_REQUEST, "malformed form data"))?;
        match name.as_str() {
            "text" => form.text = Some(value),
            "lat" => form.lat = Some(value),
            "lng" => form.lng = Some(value),
            "comment_id" => form.comment_id = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

fn parse_coordinate(value: Option<String>, field: &str) -> Result<f64, HandlerError> {
    value
        .as_deref()
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| error_response(StatusCode::BAD_REQUEST, &format!("invalid {field}")))
}

// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, HandlerError> {
    let token = bearer_token(headers).ok_or_else(missing_bearer)?;
    let use_case = VerifyTokenUseCase {
        clock: SystemClock,
        store: state.session_store(),
    };

    use_case
        .execute(token)
        .await
        .map_err(|err| map_comment_error(err, ErrorContext::Session))
}

fn missing_bearer() -> HandlerError {
    error_response(StatusCode::UNAUTHORIZED, "missing bearer token")
}

fn auth_response(issued: IssuedSession) -> AuthResponse {
    AuthResponse {
        success: true,
        access_token: issued.token,
        expires_at: issued.expires_at,
        user: UserView {
            id: issued.user_id,
            username: issued.username,
        },
    }
}

fn content_type_for(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, ext)| ext) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            error: message.to_string(),
        }),
    )
}

// Maps domain errors to HTTP responses by endpoint context.
enum ErrorContext {
    Account,
    Session,
    Read,
    Write,
    DeleteComment,
    DeleteReply,
}

fn map_comment_error(err: CommentError, context: ErrorContext) -> HandlerError {
    let message = err.to_string();
    match (context, err) {
        (_, CommentError::StorageFailure) => {
            warn!(error = %message, "storage failure");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &message)
        }
        (ErrorContext::Account, CommentError::InvalidCredentials) => {
            error_response(StatusCode::UNAUTHORIZED, &message)
        }
        (ErrorContext::Account, CommentError::UsernameTaken) => {
            error_response(StatusCode::CONFLICT, &message)
        }
        (_, CommentError::InvalidToken | CommentError::SessionExpired) => {
            error_response(StatusCode::UNAUTHORIZED, &message)
        }
        (ErrorContext::Write, CommentError::CommentNotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, "parent comment not found")
        }
        (_, CommentError::CommentNotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, &message)
        }
        (ErrorContext::DeleteComment, CommentError::Forbidden) => error_response(
            StatusCode::FORBIDDEN,
            "only the author may delete this comment",
        ),
        (ErrorContext::DeleteReply, CommentError::Forbidden) => error_response(
            StatusCode::FORBIDDEN,
            "reply not found or not owned by you",
        ),
        (_, CommentError::Forbidden) => error_response(StatusCode::FORBIDDEN, &message),
        (
            _,
            CommentError::MissingCredentials
            | CommentError::WeakPassword { .. }
            | CommentError::MissingText
            | CommentError::InvalidCredentials
            | CommentError::UsernameTaken,
        ) => error_response(StatusCode::BAD_REQUEST, &message),
    }
}
