use std::{env, time::Duration};

use crate::domain::entities::{GeoPoint, ViewportBounds};

// Runtime constants and env-backed settings for the headless client.

pub fn comments_api_url() -> String {
    env::var("COMMENTS_API_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string())
}

pub fn api_timeout() -> Duration {
    let millis = env::var("COMMENTS_API_TIMEOUT_MS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(5000);
    Duration::from_millis(millis)
}

pub fn viewport() -> ViewportBounds {
    match env::var("MAP_VIEWPORT") {
        Ok(raw) => parse_viewport(&raw).unwrap_or_else(|| {
            tracing::warn!(value = %raw, "invalid MAP_VIEWPORT; using default");
            DEFAULT_VIEWPORT
        }),
        Err(_) => DEFAULT_VIEWPORT,
    }
}

// Both must be set for the binary to sign in.
pub fn credentials() -> Option<(String, String)> {
    let username = env::var("MAP_USERNAME").ok()?;
    let password = env::var("MAP_PASSWORD").ok()?;
    Some((username, password))
}

// `sw_lat,sw_lng,ne_lat,ne_lng`
pub fn parse_viewport(raw: &str) -> Option<ViewportBounds> {
    let values = raw
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect::<Option<Vec<f64>>>()?;
    let [sw_lat, sw_lng, ne_lat, ne_lng] = values.as_slice() else {
        return None;
    };
    Some(ViewportBounds {
        sw: GeoPoint::new(*sw_lat, *sw_lng),
        ne: GeoPoint::new(*ne_lat, *ne_lng),
    })
}

pub const DEFAULT_VIEWPORT: ViewportBounds = ViewportBounds {
    sw: GeoPoint {
        lat: 34.20,
        lng: 117.10,
    },
    ne: GeoPoint {
        lat: 34.25,
        lng: 117.20,
    },
};

pub const EVENT_CHANNEL_CAPACITY: usize = 64;
