use config::ConfigError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::library_ref::LibraryRefError;
use crate::models::RemoteError;
use crate::object_id::ObjectIdError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    InvalidId(#[from] ObjectIdError),

    #[error(transparent)]
    InvalidRef(#[from] LibraryRefError),

    #[error("error parsing url: {0}")]
    Url(#[from] url::ParseError),

    #[error("error encoding object to JSON: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("error creating http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("error making request to server: {0}")]
    Request(#[source] reqwest::Error),

    #[error("error reading response from server: {0}")]
    ReadBody(#[source] reqwest::Error),

    #[error("error decoding {kind}: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The registry rejected the request and said why.
    #[error("{operation} did not succeed: {error}")]
    Remote {
        operation: &'static str,
        error: RemoteError,
    },

    #[error("{operation} did not succeed: http status code: {}", .status.as_u16())]
    UnexpectedStatus {
        operation: &'static str,
        status: StatusCode,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status the registry answered with, for rejections.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Remote { error, .. } => StatusCode::from_u16(error.code).ok(),
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        ClientError::Config(err.to_string())
    }
}
