// Domain entities shared by the marker engine and its adapters.

use tokio::sync::mpsc;

/// A point on the map. Two points are the same location only when both
/// components are bit-for-bit equal as received.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Exact identity key; no tolerance is applied.
    pub fn location_key(&self) -> (u64, u64) {
        (self.lat.to_bits(), self.lng.to_bits())
    }

    pub fn same_location(&self, other: &GeoPoint) -> bool {
        self.location_key() == other.location_key()
    }
}

/// Visible map rectangle, south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds {
    pub sw: GeoPoint,
    pub ne: GeoPoint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub id: u64,
    pub comment_id: u64,
    pub name: String,
    pub user_id: Option<u64>,
    pub text: String,
    pub img_url: Option<String>,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: u64,
    pub name: String,
    // None for anonymous authors.
    pub user_id: Option<u64>,
    pub text: String,
    pub img_url: Option<String>,
    pub created_at: u64,
    pub point: GeoPoint,
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserIdentity {
    pub id: u64,
    pub username: String,
}

/// Bearer credential attached to mutating calls.
#[derive(Clone, PartialEq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Authenticated session held by the session collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub credential: Credential,
    pub user: UserIdentity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Text plus optional image sent with a new comment or reply.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentPayload {
    pub text: String,
    pub image: Option<ImageUpload>,
}

impl CommentPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            image: None,
        }
    }
}

/// What a submission writes to: a new thread at a point, or a reply to a
/// comment shown at a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MutationTarget {
    NewComment(GeoPoint),
    Reply { comment_id: u64, point: GeoPoint },
}

impl MutationTarget {
    pub fn point(&self) -> GeoPoint {
        match self {
            MutationTarget::NewComment(point) => *point,
            MutationTarget::Reply { point, .. } => *point,
        }
    }
}

/// Events raised by the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Ready,
    MoveEnd,
    ZoomEnd,
    DoubleClick(GeoPoint),
    MarkerClicked(GeoPoint),
}

/// Surface-issued marker id. Only the marker manager and the surface see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Click handler bound to one marker. It holds a weak sender so live markers
/// never keep the event channel open on their own.
#[derive(Debug, Clone)]
pub struct MarkerClick {
    point: GeoPoint,
    events: mpsc::WeakSender<MapEvent>,
}

impl MarkerClick {
    pub fn new(point: GeoPoint, events: mpsc::WeakSender<MapEvent>) -> Self {
        Self { point, events }
    }

    pub fn point(&self) -> GeoPoint {
        self.point
    }

    /// Reports the marker's point as selected for the detail view.
    /// Returns false when the event loop is gone or its queue is full.
    pub fn fire(&self) -> bool {
        match self.events.upgrade() {
            Some(events) => events.try_send(MapEvent::MarkerClicked(self.point)).is_ok(),
            None => false,
        }
    }
}

/// Everything the surface needs to draw one marker.
#[derive(Debug, Clone)]
pub struct MarkerSpec {
    pub point: GeoPoint,
    pub author: String,
    pub preview: String,
    pub on_click: MarkerClick,
}

/// User-facing notification (the toast of a graphical client).
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Failure(String),
}
