use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::entities::{
    Comment, CommentPayload, Credential, GeoPoint, MarkerHandle, MarkerSpec, Notice, Reply,
    Session, UserIdentity, ViewportBounds,
};
use crate::domain::errors::ClientError;
use crate::domain::ports::{AuthApi, CommentApi, MapSurface, Notifier};

pub(crate) fn point(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat, lng)
}

pub(crate) fn bounds(sw_lat: f64, sw_lng: f64, ne_lat: f64, ne_lng: f64) -> ViewportBounds {
    ViewportBounds {
        sw: point(sw_lat, sw_lng),
        ne: point(ne_lat, ne_lng),
    }
}

pub(crate) fn test_comment(id: u64, at: GeoPoint, created_at: u64, text: &str) -> Comment {
    Comment {
        id,
        name: "Pilot".to_string(),
        user_id: Some(1),
        text: text.to_string(),
        img_url: None,
        created_at,
        point: at,
        replies: Vec::new(),
    }
}

#[derive(Clone, Default)]
pub(crate) struct FailureFlags {
    pub reads: Option<ClientError>,
    pub writes: Option<ClientError>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct CallCounts {
    pub bounds_fetches: usize,
    pub point_fetches: usize,
    pub writes: usize,
}

#[derive(Default)]
struct ApiData {
    comments: Vec<Comment>,
    next_id: u64,
    clock: u64,
    failures: FailureFlags,
    calls: CallCounts,
}

// Gate that holds viewport fetches open until released.
pub(crate) struct FetchGate {
    pub started: Notify,
    pub release: Notify,
}

// In-memory comment API that records calls and can fail or stall on demand.
#[derive(Clone, Default)]
pub(crate) struct FakeCommentApi {
    data: Arc<Mutex<ApiData>>,
    gate: Option<Arc<FetchGate>>,
}

impl FakeCommentApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_gate(mut self) -> (Self, Arc<FetchGate>) {
        let gate = Arc::new(FetchGate {
            started: Notify::new(),
            release: Notify::new(),
        });
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub(crate) fn seed(&self, comment: Comment) {
        let mut data = self.data.lock().expect("api mutex poisoned");
        data.next_id = data.next_id.max(comment.id);
        data.clock = data.clock.max(comment.created_at);
        data.comments.push(comment);
    }

    pub(crate) fn set_failures(&self, failures: FailureFlags) {
        self.data.lock().expect("api mutex poisoned").failures = failures;
    }

    pub(crate) fn calls(&self) -> CallCounts {
        self.data.lock().expect("api mutex poisoned").calls
    }

    pub(crate) fn stored(&self) -> Vec<Comment> {
        self.data.lock().expect("api mutex poisoned").comments.clone()
    }

    fn write<T>(
        &self,
        apply: impl FnOnce(&mut ApiData) -> Result<T, ClientError>,
    ) -> Result<T, ClientError> {
        let mut data = self.data.lock().expect("api mutex poisoned");
        data.calls.writes += 1;
        if let Some(err) = data.failures.writes.clone() {
            return Err(err);
        }
        apply(&mut data)
    }
}

fn inside(bounds: &ViewportBounds, at: &GeoPoint) -> bool {
    (bounds.sw.lat..=bounds.ne.lat).contains(&at.lat)
        && (bounds.sw.lng..=bounds.ne.lng).contains(&at.lng)
}

#[async_trait]
impl CommentApi for FakeCommentApi {
    async fn comments_in_bounds(
        &self,
        bounds: ViewportBounds,
    ) -> Result<Vec<Comment>, ClientError> {
        self.data.lock().expect("api mutex poisoned").calls.bounds_fetches += 1;

        if let Some(gate) = &self.gate {
            gate.started.notify_one();
            gate.release.notified().await;
        }

        let data = self.data.lock().expect("api mutex poisoned");
        if let Some(err) = data.failures.reads.clone() {
            return Err(err);
        }
        let mut found: Vec<Comment> = data
            .comments
            .iter()
            .filter(|c| inside(&bounds, &c.point))
            .map(|c| Comment {
                replies: Vec::new(),
                ..c.clone()
            })
            .collect();
        found.sort_by_key(|c| (c.created_at, c.id));
        Ok(found)
    }

    async fn comments_at(&self, at: GeoPoint) -> Result<Vec<Comment>, ClientError> {
        let mut data = self.data.lock().expect("api mutex poisoned");
        data.calls.point_fetches += 1;
        if let Some(err) = data.failures.reads.clone() {
            return Err(err);
        }
        let mut found: Vec<Comment> = data
            .comments
            .iter()
            .filter(|c| c.point.same_location(&at))
            .cloned()
            .collect();
        found.sort_by_key(|c| (c.created_at, c.id));
        Ok(found)
    }

    async fn create_comment(
        &self,
        _credential: &Credential,
        payload: CommentPayload,
        at: GeoPoint,
    ) -> Result<(), ClientError> {
        self.write(|data| {
            data.next_id += 1;
            data.clock += 1;
            let comment = Comment {
                id: data.next_id,
                name: "Pilot".to_string(),
                user_id: Some(1),
                text: payload.text,
                img_url: None,
                created_at: data.clock,
                point: at,
                replies: Vec::new(),
            };
            data.comments.push(comment);
            Ok(())
        })
    }

    async fn create_reply(
        &self,
        _credential: &Credential,
        payload: CommentPayload,
        comment_id: u64,
    ) -> Result<(), ClientError> {
        self.write(|data| {
            data.clock += 1;
            let created_at = data.clock;
            let parent = data
                .comments
                .iter_mut()
                .find(|c| c.id == comment_id)
                .ok_or_else(|| ClientError::ServerRejection {
                    status: Some(404),
                    message: "parent comment not found".to_string(),
                })?;
            let id = parent.replies.len() as u64 + 1;
            parent.replies.push(Reply {
                id,
                comment_id,
                name: "Pilot".to_string(),
                user_id: Some(1),
                text: payload.text,
                img_url: None,
                created_at,
            });
            Ok(())
        })
    }

    async fn delete_comment(
        &self,
        _credential: &Credential,
        comment_id: u64,
    ) -> Result<(), ClientError> {
        self.write(|data| {
            data.comments.retain(|c| c.id != comment_id);
            Ok(())
        })
    }

    async fn delete_reply(
        &self,
        _credential: &Credential,
        reply_id: u64,
    ) -> Result<(), ClientError> {
        self.write(|data| {
            for comment in &mut data.comments {
                comment.replies.retain(|r| r.id != reply_id);
            }
            Ok(())
        })
    }
}

#[derive(Default)]
struct SurfaceData {
    bounds: Option<ViewportBounds>,
    markers: BTreeMap<MarkerHandle, MarkerSpec>,
    next_handle: u64,
    // Fail every add once this many markers have been created in total.
    fail_after: Option<usize>,
    created: usize,
    removed: usize,
}

// Map surface that records marker traffic.
#[derive(Clone, Default)]
pub(crate) struct RecordingSurface {
    data: Arc<Mutex<SurfaceData>>,
}

impl RecordingSurface {
    pub(crate) fn ready(view: ViewportBounds) -> Self {
        let surface = Self::default();
        surface.set_bounds(Some(view));
        surface
    }

    pub(crate) fn set_bounds(&self, view: Option<ViewportBounds>) {
        self.data.lock().expect("surface mutex poisoned").bounds = view;
    }

    pub(crate) fn fail_after(&self, created: usize) {
        self.data.lock().expect("surface mutex poisoned").fail_after = Some(created);
    }

    pub(crate) fn markers(&self) -> Vec<MarkerSpec> {
        let data = self.data.lock().expect("surface mutex poisoned");
        data.markers.values().cloned().collect()
    }

    pub(crate) fn previews(&self) -> Vec<String> {
        self.markers().into_iter().map(|m| m.preview).collect()
    }

    pub(crate) fn removed(&self) -> usize {
        self.data.lock().expect("surface mutex poisoned").removed
    }
}

impl MapSurface for RecordingSurface {
    fn bounds(&self) -> Option<ViewportBounds> {
        self.data.lock().expect("surface mutex poisoned").bounds
    }

    fn add_marker(&self, spec: MarkerSpec) -> Result<MarkerHandle, String> {
        let mut data = self.data.lock().expect("surface mutex poisoned");
        if data.fail_after.is_some_and(|limit| data.created >= limit) {
            return Err("marker layer unavailable".to_string());
        }
        data.next_handle += 1;
        data.created += 1;
        let handle = MarkerHandle(data.next_handle);
        data.markers.insert(handle, spec);
        Ok(handle)
    }

    fn remove_markers(&self, handles: &[MarkerHandle]) {
        let mut data = self.data.lock().expect("surface mutex poisoned");
        for handle in handles {
            if data.markers.remove(handle).is_some() {
                data.removed += 1;
            }
        }
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub(crate) fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub(crate) fn failures(&self) -> usize {
        self.notices()
            .iter()
            .filter(|n| matches!(n, Notice::Failure(_)))
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("notifier mutex poisoned").push(notice);
    }
}

// Account API with one known user and a switchable token check.
#[derive(Clone, Default)]
pub(crate) struct FakeAuthApi {
    revoked: Arc<Mutex<bool>>,
}

impl FakeAuthApi {
    pub(crate) fn revoke_tokens(&self) {
        *self.revoked.lock().expect("auth mutex poisoned") = true;
    }

    fn session(username: &str) -> Session {
        Session {
            credential: Credential::new(format!("token-{username}")),
            user: UserIdentity {
                id: 1,
                username: username.to_string(),
            },
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuthApi {
    async fn register(&self, username: &str, _password: &str) -> Result<Session, ClientError> {
        Ok(Self::session(username))
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session, ClientError> {
        if password != "secret-pass" {
            return Err(ClientError::unauthorized("invalid username or password"));
        }
        Ok(Self::session(username))
    }

    async fn current_user(&self, credential: &Credential) -> Result<UserIdentity, ClientError> {
        if *self.revoked.lock().expect("auth mutex poisoned") {
            return Err(ClientError::unauthorized("session expired"));
        }
        let username = credential
            .as_str()
            .strip_prefix("token-")
            .ok_or_else(|| ClientError::unauthorized("invalid session token"))?;
        Ok(Self::session(username).user)
    }

    async fn logout(&self, _credential: &Credential) -> Result<(), ClientError> {
        Ok(())
    }
}
