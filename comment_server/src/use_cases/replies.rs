use crate::domain::entities::{Author, ImageUpload, NewReply, StoredReply};
use crate::domain::errors::CommentError;
use crate::domain::ports::{Clock, CommentStore, ImageStore};
use crate::use_cases::comments::save_image;

// Fields accepted for a reply.
#[derive(Debug)]
pub struct ReplyDraft {
    pub comment_id: u64,
    pub text: String,
    pub image: Option<ImageUpload>,
}

// Reply creation use case; callers must already hold an authenticated author.
pub struct CreateReplyUseCase<S, I, C> {
    pub store: S,
    pub images: I,
    pub clock: C,
}

impl<S, I, C> CreateReplyUseCase<S, I, C>
where
    S: CommentStore,
    I: ImageStore,
    C: Clock,
{
    pub async fn execute(
        &self,
        author: Author,
        draft: ReplyDraft,
    ) -> Result<StoredReply, CommentError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(CommentError::MissingText);
        }

        let comment_id = draft.comment_id;
        let parent = self
            .store
            .comment(comment_id)
            .await
            .map_err(|_| CommentError::StorageFailure)?;
        if parent.is_none() {
            return Err(CommentError::CommentNotFound { comment_id });
        }

        let img_url = save_image(&self.images, draft.image).await?;

        self.store
            .insert_reply(NewReply {
                comment_id,
                user_id: author.user_id,
                name: author.name,
                text: text.to_string(),
                img_url,
                created_at: self.clock.now_epoch_seconds(),
            })
            .await
            .map_err(|_| CommentError::StorageFailure)?
            // The parent can vanish between the check and the insert.
            .ok_or(CommentError::CommentNotFound { comment_id })
    }
}

// Author-only reply deletion.
pub struct DeleteReplyUseCase<S> {
    pub store: S,
}

impl<S> DeleteReplyUseCase<S>
where
    S: CommentStore,
{
    pub async fn execute(&self, reply_id: u64, user_id: u64) -> Result<(), CommentError> {
        let deleted = self
            .store
            .delete_reply(reply_id, user_id)
            .await
            .map_err(|_| CommentError::StorageFailure)?;
        if !deleted {
            return Err(CommentError::Forbidden);
        }
        Ok(())
    }
}
