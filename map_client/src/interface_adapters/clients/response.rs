// Shared response handling for the reqwest clients.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::errors::ClientError;
use crate::interface_adapters::protocol::ErrorEnvelope;

pub(crate) fn transport(err: reqwest::Error) -> ClientError {
    ClientError::Network(err.to_string())
}

// 2xx bodies are decoded into `T`; 401 maps to Authorization and any other
// status to ServerRejection carrying the server's message when it sent one.
pub(crate) async fn decode<T>(response: Response) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return response.json::<T>().await.map_err(|err| {
            if err.is_decode() {
                ClientError::ServerRejection {
                    status: Some(status.as_u16()),
                    message: format!("malformed response: {err}"),
                }
            } else {
                transport(err)
            }
        });
    }

    let message = response
        .json::<ErrorEnvelope>()
        .await
        .ok()
        .and_then(ErrorEnvelope::into_message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::unauthorized(message));
    }
    Err(ClientError::ServerRejection {
        status: Some(status.as_u16()),
        message,
    })
}

// A 2xx body that still says `success: false` is a rejection.
pub(crate) fn ensure_success(success: bool, error: Option<String>) -> Result<(), ClientError> {
    if success {
        return Ok(());
    }
    Err(ClientError::rejected(
        error.unwrap_or_else(|| "request failed".to_string()),
    ))
}
