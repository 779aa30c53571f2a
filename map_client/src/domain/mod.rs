// Domain layer: map geometry, comment records and the ports the engine drives.

pub mod entities;
pub mod errors;
pub mod ports;

pub use entities::{
    Comment, CommentPayload, Credential, GeoPoint, ImageUpload, MapEvent, MarkerClick,
    MarkerHandle, MarkerSpec, MutationTarget, Notice, Reply, Session, UserIdentity,
    ViewportBounds,
};
pub use errors::ClientError;
