use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::domain::entities::{
    Comment, CommentPayload, Credential, GeoPoint, ImageUpload, ViewportBounds,
};
use crate::domain::errors::ClientError;
use crate::domain::ports::CommentApi;
use crate::interface_adapters::clients::response::{decode, ensure_success, transport};
use crate::interface_adapters::protocol::{CommentsEnvelope, MutationEnvelope};

// Thin reqwest client for the comment and reply endpoints.
#[derive(Clone)]
pub struct CommentClient {
    http: reqwest::Client,
    base_url: String,
}

impl CommentClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    async fn list(&self, url: String) -> Result<Vec<Comment>, ClientError> {
        let response = self.http.get(url).send().await.map_err(transport)?;
        let envelope: CommentsEnvelope = decode(response).await?;
        ensure_success(envelope.success, envelope.error)?;
        Ok(envelope.comments.into_iter().map(Comment::from).collect())
    }

    async fn post_form(
        &self,
        path: &str,
        credential: &Credential,
        form: Form,
    ) -> Result<(), ClientError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .post(url)
            .bearer_auth(credential.as_str())
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;
        let envelope: MutationEnvelope = decode(response).await?;
        ensure_success(envelope.success, envelope.error)
    }

    async fn delete(&self, url: String, credential: &Credential) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(url)
            .bearer_auth(credential.as_str())
            .send()
            .await
            .map_err(transport)?;
        let envelope: MutationEnvelope = decode(response).await?;
        ensure_success(envelope.success, envelope.error)
    }
}

// Text first, then the optional image under the `image` field.
fn payload_form(payload: CommentPayload) -> Form {
    let form = Form::new().text("text", payload.text);
    match payload.image {
        Some(ImageUpload { file_name, bytes }) if !bytes.is_empty() => {
            form.part("image", Part::bytes(bytes).file_name(file_name))
        }
        _ => form,
    }
}

#[async_trait]
impl CommentApi for CommentClient {
    async fn comments_in_bounds(
        &self,
        bounds: ViewportBounds,
    ) -> Result<Vec<Comment>, ClientError> {
        // `{}` on f64 prints the shortest string that parses back to the same value.
        let url = format!(
            "{}/api/comments/all?sw_lat={}&sw_lng={}&ne_lat={}&ne_lng={}",
            self.base_url, bounds.sw.lat, bounds.sw.lng, bounds.ne.lat, bounds.ne.lng
        );
        let comments = self.list(url).await?;
        debug!(count = comments.len(), "fetched viewport comments");
        Ok(comments)
    }

    async fn comments_at(&self, point: GeoPoint) -> Result<Vec<Comment>, ClientError> {
        let url = format!(
            "{}/api/comments?lat={}&lng={}",
            self.base_url, point.lat, point.lng
        );
        self.list(url).await
    }

    async fn create_comment(
        &self,
        credential: &Credential,
        payload: CommentPayload,
        point: GeoPoint,
    ) -> Result<(), ClientError> {
        let form = payload_form(payload)
            .text("lat", point.lat.to_string())
            .text("lng", point.lng.to_string());
        self.post_form("/api/comments", credential, form).await
    }

    async fn create_reply(
        &self,
        credential: &Credential,
        payload: CommentPayload,
        comment_id: u64,
    ) -> Result<(), ClientError> {
        let form = payload_form(payload).text("comment_id", comment_id.to_string());
        self.post_form("/api/replies", credential, form).await
    }

    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: u64,
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/comments/{comment_id}", self.base_url);
        self.delete(url, credential).await
    }

    async fn delete_reply(
        &self,
        credential: &Credential,
        reply_id: u64,
    ) -> Result<(), ClientError> {
        let url = format!("{}/api/replies/{reply_id}", self.base_url);
        self.delete(url, credential).await
    }
}
