use std::fmt;

// Error taxonomy for every engine operation. None of these are fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    // The request could not complete (connect, timeout, body read).
    Network(String),
    // Non-2xx status, `success: false` or a malformed payload.
    ServerRejection {
        status: Option<u16>,
        message: String,
    },
    // No credential for a mutation, or the server refused the token.
    Authorization { message: String },
    // The map surface cannot report bounds yet.
    NotReady,
}

impl ClientError {
    pub fn rejected(message: impl Into<String>) -> Self {
        ClientError::ServerRejection {
            status: None,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ClientError::Authorization {
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(err) => write!(f, "network error: {err}"),
            ClientError::ServerRejection { status, message } => {
                if let Some(status) = status {
                    write!(f, "server rejected request ({status}): {message}")
                } else {
                    write!(f, "request rejected: {message}")
                }
            }
            ClientError::Authorization { message } => write!(f, "not authorized: {message}"),
            ClientError::NotReady => write!(f, "map surface not ready"),
        }
    }
}

impl std::error::Error for ClientError {}
