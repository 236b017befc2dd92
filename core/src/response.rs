//! Normalized result of every PetFriends operation.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::http::HttpResponse;
use crate::types::{AuthKey, PetRecord};

/// Response body, parsed as JSON when possible.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Anything that is not valid JSON, including an empty body.
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(raw),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }
}

/// Status code plus best-effort parsed body.
///
/// `status` is always the transport-level status; nothing is mapped to an
/// error. The accessors return `None` when the body does not have the
/// requested shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Top-level JSON field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.as_json()?.get(name)
    }

    /// Top-level string field.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.field(name)?.as_str()
    }

    /// The `key` field of a `/api/key` response, if non-empty.
    pub fn key(&self) -> Option<&str> {
        self.str_field("key").filter(|key| !key.is_empty())
    }

    pub fn auth_key(&self) -> Option<AuthKey> {
        self.key().map(AuthKey::new)
    }

    /// The `pets` list of a listing response.
    pub fn pets(&self) -> Option<Vec<PetRecord>> {
        self.field("pets").and_then(from_value)
    }

    /// The body as a single pet record (create, update, set photo).
    pub fn pet(&self) -> Option<PetRecord> {
        self.body.as_json().and_then(from_value)
    }

    /// Raw text when the body was not JSON.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            ResponseBody::Text(text) => Some(text),
            ResponseBody::Json(_) => None,
        }
    }
}

impl From<HttpResponse> for ApiResponse {
    fn from(response: HttpResponse) -> Self {
        Self {
            status: response.status,
            body: ResponseBody::parse(response.body),
        }
    }
}

fn from_value<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}
