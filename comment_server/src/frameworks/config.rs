use std::env;

// Runtime constants for the comment service.

pub fn http_port() -> u16 {
    env::var("COMMENT_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000)
}

// Bearer token lifetime; defaults to 100 hours.
pub fn token_ttl_seconds() -> u64 {
    let hours = env::var("TOKEN_TTL_HOURS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|hours| *hours > 0)
        .unwrap_or(100);
    hours * 60 * 60
}
