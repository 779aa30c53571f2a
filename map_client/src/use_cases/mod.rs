// Use cases layer: the marker engine and the workflows around it.

pub mod dedup;
pub mod markers;
pub mod mutation;
pub mod session;
pub mod thread_store;
pub mod viewport_sync;

#[cfg(test)]
pub(crate) mod test_support;

pub use dedup::dedupe_by_location;
pub use markers::{MarkerLifecycleManager, ReplaceReport};
pub use mutation::MutationCoordinator;
pub use session::SessionManager;
pub use thread_store::{CommentThreadStore, ThreadSnapshot};
pub use viewport_sync::{SyncOutcome, SyncState, ViewportSyncEngine};
