// Comment listing, creation and deletion workflows.

use std::path::Path;

use crate::domain::entities::{
    Author, Bounds, CommentThread, IMAGE_PATH_PREFIX, ImageUpload, NewComment, StoredComment,
};
use crate::domain::errors::CommentError;
use crate::domain::ports::{Clock, CommentStore, ImageStore};

// Read-side use case shared by the map viewport and the detail view.
pub struct ListCommentsUseCase<S> {
    pub store: S,
}

impl<S> ListCommentsUseCase<S>
where
    S: CommentStore,
{
    // Comments inside the rectangle, oldest first.
    pub async fn in_bounds(&self, bounds: Bounds) -> Result<Vec<StoredComment>, CommentError> {
        let mut comments = self
            .store
            .comments_in_bounds(bounds)
            .await
            .map_err(|_| CommentError::StorageFailure)?;
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    // Every thread at exactly this point, oldest first at both levels.
    pub async fn at_point(&self, lat: f64, lng: f64) -> Result<Vec<CommentThread>, CommentError> {
        let mut comments = self
            .store
            .comments_at(lat, lng)
            .await
            .map_err(|_| CommentError::StorageFailure)?;
        comments.sort_by_key(|c| (c.created_at, c.id));

        let mut threads = Vec::with_capacity(comments.len());
        for comment in comments {
            threads.push(self.load_thread(comment).await?);
        }
        Ok(threads)
    }

    pub async fn thread(&self, comment_id: u64) -> Result<CommentThread, CommentError> {
        let comment = self
            .store
            .comment(comment_id)
            .await
            .map_err(|_| CommentError::StorageFailure)?
            .ok_or(CommentError::CommentNotFound { comment_id })?;
        self.load_thread(comment).await
    }

    async fn load_thread(&self, comment: StoredComment) -> Result<CommentThread, CommentError> {
        let mut replies = self
            .store
            .replies_for(comment.id)
            .await
            .map_err(|_| CommentError::StorageFailure)?;
        replies.sort_by_key(|r| (r.created_at, r.id));
        Ok(CommentThread { comment, replies })
    }
}

// Fields accepted for a new top-level comment.
#[derive(Debug)]
pub struct CommentDraft {
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub image: Option<ImageUpload>,
}

// Comment creation use case; anonymous authors are allowed.
pub struct CreateCommentUseCase<S, I, C> {
    pub store: S,
    pub images: I,
    pub clock: C,
}

impl<S, I, C> CreateCommentUseCase<S, I, C>
where
    S: CommentStore,
    I: ImageStore,
    C: Clock,
{
    pub async fn execute(
        &self,
        author: Author,
        draft: CommentDraft,
    ) -> Result<StoredComment, CommentError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(CommentError::MissingText);
        }

        let img_url = save_image(&self.images, draft.image).await?;

        self.store
            .insert_comment(NewComment {
                user_id: author.user_id,
                name: author.name,
                text: text.to_string(),
                img_url,
                lat: draft.lat,
                lng: draft.lng,
                created_at: self.clock.now_epoch_seconds(),
            })
            .await
            .map_err(|_| CommentError::StorageFailure)
    }
}

// Author-only comment deletion; replies go with it.
pub struct DeleteCommentUseCase<S> {
    pub store: S,
}

impl<S> DeleteCommentUseCase<S>
where
    S: CommentStore,
{
    pub async fn execute(&self, comment_id: u64, user_id: u64) -> Result<(), CommentError> {
        let exists = self
            .store
            .comment(comment_id)
            .await
            .map_err(|_| CommentError::StorageFailure)?
            .is_some();
        if !exists {
            return Err(CommentError::CommentNotFound { comment_id });
        }

        let deleted = self
            .store
            .delete_comment(comment_id, user_id)
            .await
            .map_err(|_| CommentError::StorageFailure)?;
        if !deleted {
            return Err(CommentError::Forbidden);
        }
        Ok(())
    }
}

// Store an optional upload and return its public path; empty uploads are ignored.
pub(crate) async fn save_image<I>(
    images: &I,
    image: Option<ImageUpload>,
) -> Result<Option<String>, CommentError>
where
    I: ImageStore,
{
    let Some(image) = image else {
        return Ok(None);
    };
    if image.file_name.is_empty() || image.bytes.is_empty() {
        return Ok(None);
    }

    let extension = Path::new(&image.file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase());

    let name = images
        .save(extension, image.bytes)
        .await
        .map_err(|_| CommentError::StorageFailure)?;
    Ok(Some(format!("{IMAGE_PATH_PREFIX}/{name}")))
}
