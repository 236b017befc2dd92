//! Errors raised while setting up or running a scenario.

use petfriends_core::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("authentication failed with status {status}")]
    Auth { status: u16 },

    #[error("{operation} returned status {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation} response has no `{field}` field")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },

    #[error(transparent)]
    Client(#[from] ClientError),
}
