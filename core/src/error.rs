//! Error types for the PetFriends API client.
//!
//! # Design
//! HTTP status codes are never errors here: a 403 or a 400 is a normal
//! `ApiResponse` the caller asserts on. `ClientError` only covers failures
//! that prevent a request from being sent or a response from being read.

use std::io;
use std::path::PathBuf;

use crate::http::HttpMethod;

/// Errors returned by `PetFriends` operations and request builders.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A photo attachment could not be read from disk.
    #[error("cannot read photo {}: {source}", .path.display())]
    Photo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Form fields or query parameters could not be url-encoded.
    #[error("encoding failed: {0}")]
    Encode(String),

    /// The HTTP exchange did not complete (connection, timeout, I/O).
    #[error("{method} {url} failed: {message}")]
    Transport {
        method: HttpMethod,
        url: String,
        message: String,
    },
}

impl From<serde_urlencoded::ser::Error> for ClientError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        ClientError::Encode(err.to_string())
    }
}
