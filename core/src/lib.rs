//! Blocking API client for the PetFriends pet-management service.
//!
//! # Overview
//! Wraps authentication, pet listing, creation, update, deletion and photo
//! upload. Every operation returns an [`ApiResponse`]: the transport-level
//! status code plus the body, parsed as JSON when possible and kept as raw
//! text otherwise.
//!
//! # Design
//! - `RequestBuilder` is stateless; it only knows `base_url` and turns
//!   operations into plain-data `HttpRequest` values.
//! - `Transport` is the single I/O seam. `UreqTransport` is the default and
//!   applies a request timeout; tests can plug in canned transports.
//! - Status codes are never turned into errors, so callers assert on them
//!   directly. `ClientError` is reserved for transport and local I/O failures.

pub mod client;
pub mod error;
pub mod http;
pub mod photo;
pub mod response;
pub mod types;

pub use client::{PetFriends, RequestBuilder};
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport, DEFAULT_TIMEOUT};
pub use photo::{Multipart, Photo};
pub use response::{ApiResponse, ResponseBody};
pub use types::{AuthKey, Credential, PetFields, PetFilter, PetRecord};
