// Framework bootstrap for the headless map client.

use crate::domain::entities::{MapEvent, MarkerSpec, UserIdentity, ViewportBounds};
use crate::frameworks::{config, telemetry};
use crate::interface_adapters::{
    AuthClient, CommentClient, HeadlessMap, TracingNotifier, run_event_loop,
};
use crate::use_cases::{
    CommentThreadStore, MarkerLifecycleManager, SessionManager, ViewportSyncEngine,
};

use std::{io::Result, sync::Arc, time::Duration};
use tokio::sync::mpsc;

pub struct ClientSettings {
    pub api_url: String,
    pub timeout: Duration,
    pub viewport: ViewportBounds,
    pub credentials: Option<(String, String)>,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        Self {
            api_url: config::comments_api_url(),
            timeout: config::api_timeout(),
            viewport: config::viewport(),
            credentials: config::credentials(),
        }
    }
}

// What one headless pass saw.
pub struct RunReport {
    // Server-confirmed identity; None when running signed out.
    pub user: Option<UserIdentity>,
    pub markers: Vec<MarkerSpec>,
}

/// One pass of the map: optional sign-in, a `Ready` event, and the markers
/// that sync produced once the event loop has drained.
pub async fn run(settings: ClientSettings) -> Result<RunReport> {
    let comments = CommentClient::new(settings.api_url.clone(), settings.timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize comment client: {e}")))?;
    let auth = AuthClient::new(settings.api_url.clone(), settings.timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize auth client: {e}")))?;
    tracing::debug!(
        api_url = %settings.api_url,
        timeout_ms = settings.timeout.as_millis(),
        "comment api configured"
    );

    let sessions = SessionManager::new(Arc::new(auth));
    let user = match &settings.credentials {
        Some((username, password)) => sign_in(&sessions, username, password).await,
        None => None,
    };

    let api = Arc::new(comments);
    let surface = Arc::new(HeadlessMap::with_viewport(settings.viewport));
    let notifier = Arc::new(TracingNotifier);
    let (events_tx, events_rx) = mpsc::channel(config::EVENT_CHANNEL_CAPACITY);

    let threads = Arc::new(CommentThreadStore::new(api.clone()));
    let engine = Arc::new(ViewportSyncEngine::new(
        api,
        surface.clone(),
        MarkerLifecycleManager::new(surface.clone(), events_tx.downgrade()),
        notifier.clone(),
    ));
    let event_loop = tokio::spawn(run_event_loop(events_rx, engine, threads, notifier));

    events_tx
        .send(MapEvent::Ready)
        .await
        .map_err(|e| std::io::Error::other(format!("map event loop closed: {e}")))?;
    // Last strong sender; the loop ends once its pending work is done.
    drop(events_tx);
    event_loop
        .await
        .map_err(|e| std::io::Error::other(format!("map event loop failed: {e}")))?;

    sessions.logout().await;
    Ok(RunReport {
        user,
        markers: surface.markers(),
    })
}

// Reading the map works signed out, so every failure here only logs.
async fn sign_in(
    sessions: &SessionManager<AuthClient>,
    username: &str,
    password: &str,
) -> Option<UserIdentity> {
    if let Err(err) = sessions.login(username, password).await {
        tracing::warn!(error = %err, "login failed; continuing anonymously");
        return None;
    }

    // The issued token is checked against the server before it is trusted.
    let credential = sessions.credential()?;
    match sessions.settle(sessions.resume(credential).await) {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "session confirmed");
            Some(user)
        }
        Err(err) => {
            tracing::warn!(error = %err, "session check failed; continuing anonymously");
            None
        }
    }
}

pub async fn run_with_config() -> Result<()> {
    telemetry::init_runtime();

    let report = run(ClientSettings::from_env()).await?;
    let signed_in_as = report.user.as_ref().map(|user| user.username.as_str());
    tracing::info!(
        count = report.markers.len(),
        user = signed_in_as.unwrap_or("anonymous"),
        "viewport rendered"
    );
    for marker in &report.markers {
        tracing::info!(
            lat = marker.point.lat,
            lng = marker.point.lng,
            author = %marker.author,
            preview = %marker.preview,
            "marker"
        );
    }
    Ok(())
}
