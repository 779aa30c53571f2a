// Shared primitives for one-time server bootstrapping across integration tests.
#![allow(dead_code)]

use std::{
    // `Arc` shares data between threads; `OnceLock` writes a value only once.
    sync::{Arc, Mutex, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

use map_client::domain::{Credential, MapEvent, Notice, ViewportBounds};
use map_client::domain::ports::Notifier;
use map_client::interface_adapters::{AuthClient, CommentClient, HeadlessMap};
use map_client::use_cases::{
    CommentThreadStore, MarkerLifecycleManager, MutationCoordinator, SessionManager,
    ViewportSyncEngine,
};
use tokio::sync::mpsc;

// Global base URL used by all tests after the server publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the server bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

pub const TIMEOUT: Duration = Duration::from_secs(5);
pub const PASSWORD: &str = "correct-horse";

// Ensure the comment server is running and return the shared base URL.
pub fn ensure_server() -> &'static str {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        // Local one-time slot where the server thread publishes its selected URL.
        let published_url = Arc::new(OnceLock::<String>::new());
        // Clone so the spawned thread can write into the same shared slot.
        let published_url_thread = Arc::clone(&published_url);
        // Spawn an OS thread so the server outlives individual `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            // Each server thread owns its own Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            // Run async server startup and serving on this dedicated runtime.
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Capture the exact address that was assigned by the OS.
                let addr = listener.local_addr().expect("get local addr");
                // Publish the final base URL so test code can target the right server.
                let _ = published_url_thread.set(format!("http://{}", addr));
                // Start serving requests until the test process exits.
                comment_server::run(listener).await.expect("server failed");
            });
        });
        // Block until URL is published and the bound port starts accepting connections.
        wait_for_server_url_and_readiness(published_url);
    });

    // Return the stable shared URL used by all tests in this binary.
    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Wait for URL publication and then wait for the server socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    // Poll until the server thread publishes the base URL.
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Persist the URL globally so every test gets the same endpoint.
    let _ = SERVER_URL.set(base_url.clone());

    // Strip the scheme so we can use host:port for raw TCP readiness checks.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing server bind/accept.
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    // Fail fast if startup never reached an accepting state.
    panic!("server did not become ready in time");
}

// The server is shared by every test in a binary, so accounts must not collide.
pub fn unique_username(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &id[..8])
}

// Registers a fresh account and returns its credential.
pub async fn register(prefix: &str) -> Credential {
    let auth = AuthClient::new(ensure_server(), TIMEOUT).expect("auth client");
    let sessions = SessionManager::new(Arc::new(auth));
    sessions
        .register(&unique_username(prefix), PASSWORD)
        .await
        .expect("register should succeed");
    sessions.credential().expect("session after register")
}

pub fn bounds(sw_lat: f64, sw_lng: f64, ne_lat: f64, ne_lng: f64) -> ViewportBounds {
    ViewportBounds {
        sw: map_client::domain::GeoPoint::new(sw_lat, sw_lng),
        ne: map_client::domain::GeoPoint::new(ne_lat, ne_lng),
    }
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier mutex poisoned").clone()
    }

    pub fn failures(&self) -> usize {
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

pub type Engine = ViewportSyncEngine<CommentClient, HeadlessMap, RecordingNotifier>;

// The marker engine wired to the real reqwest client and the headless surface.
pub struct MapHarness {
    pub api: Arc<CommentClient>,
    pub surface: Arc<HeadlessMap>,
    pub notifier: RecordingNotifier,
    pub threads: Arc<CommentThreadStore<CommentClient>>,
    pub engine: Arc<Engine>,
    pub coordinator: MutationCoordinator<CommentClient, HeadlessMap, RecordingNotifier>,
    pub events: mpsc::Receiver<MapEvent>,
    // Keeps marker click handlers deliverable for the life of the test.
    _events_tx: mpsc::Sender<MapEvent>,
}

impl MapHarness {
    pub fn new(viewport: ViewportBounds) -> Self {
        Self::against(ensure_server(), viewport)
    }

    pub fn against(base_url: &str, viewport: ViewportBounds) -> Self {
        let api = Arc::new(CommentClient::new(base_url, TIMEOUT).expect("comment client"));
        let surface = Arc::new(HeadlessMap::with_viewport(viewport));
        let notifier = RecordingNotifier::default();
        let shared_notifier = Arc::new(notifier.clone());
        let (events_tx, events) = mpsc::channel(16);
        let threads = Arc::new(CommentThreadStore::new(api.clone()));
        let engine = Arc::new(ViewportSyncEngine::new(
            api.clone(),
            surface.clone(),
            MarkerLifecycleManager::new(surface.clone(), events_tx.downgrade()),
            shared_notifier.clone(),
        ));
        let coordinator = MutationCoordinator::new(
            api.clone(),
            threads.clone(),
            engine.clone(),
            shared_notifier,
        );
        Self {
            api,
            surface,
            notifier,
            threads,
            engine,
            coordinator,
            events,
            _events_tx: events_tx,
        }
    }

    pub fn previews(&self) -> Vec<String> {
        self.surface
            .markers()
            .into_iter()
            .map(|m| m.preview)
            .collect()
    }
}
