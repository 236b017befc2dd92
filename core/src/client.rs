//! Request builders and the blocking PetFriends client.
//!
//! # Design
//! `RequestBuilder` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response goes through `ApiResponse::from`.
//! `PetFriends` glues the two together with a `Transport`, so each operation
//! is one build, one round-trip and one parse.

use std::path::Path;

use tracing::debug;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::photo::{Multipart, Photo};
use crate::response::ApiResponse;
use crate::types::{AuthKey, Credential, PetFields, PetFilter};

const AUTH_HEADER: &str = "auth_key";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Stateless builder for PetFriends API requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_get_api_key(&self, credential: &Credential) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), credential.email.clone()),
                ("password".to_string(), credential.password.clone()),
            ],
            body: None,
        }
    }

    pub fn build_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: &PetFilter,
    ) -> Result<HttpRequest, ClientError> {
        let query = serde_urlencoded::to_string([("filter", filter.as_str())])?;
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}/api/pets?{query}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        })
    }

    pub fn build_add_new_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo: &Photo,
    ) -> HttpRequest {
        let form = fields
            .entries()
            .into_iter()
            .fold(Multipart::new(), |form, (name, value)| form.text(name, value))
            .file("pet_photo", photo);
        self.multipart(HttpMethod::Post, format!("{}/api/pets", self.base_url), auth_key, form)
    }

    pub fn build_add_new_no_photo_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> Result<HttpRequest, ClientError> {
        self.form(
            HttpMethod::Post,
            format!("{}/api/create_pet_simple", self.base_url),
            auth_key,
            fields,
        )
    }

    pub fn build_add_photo_to_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo: &Photo,
    ) -> HttpRequest {
        let form = Multipart::new().file("pet_photo", photo);
        self.multipart(
            HttpMethod::Post,
            format!("{}/api/pets/set_photo/{pet_id}", self.base_url),
            auth_key,
            form,
        )
    }

    pub fn build_update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        fields: &PetFields,
    ) -> Result<HttpRequest, ClientError> {
        self.form(
            HttpMethod::Put,
            format!("{}/api/pets/{pet_id}", self.base_url),
            auth_key,
            fields,
        )
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/api/pets/{pet_id}", self.base_url),
            headers: vec![auth_header(auth_key)],
            body: None,
        }
    }

    fn form(
        &self,
        method: HttpMethod,
        url: String,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_urlencoded::to_string(fields)?;
        Ok(HttpRequest {
            method,
            url,
            headers: vec![
                auth_header(auth_key),
                ("content-type".to_string(), FORM_CONTENT_TYPE.to_string()),
            ],
            body: Some(body.into_bytes()),
        })
    }

    fn multipart(
        &self,
        method: HttpMethod,
        url: String,
        auth_key: &AuthKey,
        form: Multipart,
    ) -> HttpRequest {
        let (content_type, body) = form.finish();
        HttpRequest {
            method,
            url,
            headers: vec![auth_header(auth_key), ("content-type".to_string(), content_type)],
            body: Some(body),
        }
    }
}

fn auth_header(auth_key: &AuthKey) -> (String, String) {
    (AUTH_HEADER.to_string(), auth_key.as_str().to_string())
}

/// Blocking client for the PetFriends API.
///
/// Every operation returns the status code and parsed body as an
/// [`ApiResponse`], whatever the status. Only transport and local I/O
/// failures are errors. No retries.
#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    requests: RequestBuilder,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            requests: RequestBuilder::new(base_url),
            transport,
        }
    }

    pub fn requests(&self) -> &RequestBuilder {
        &self.requests
    }

    pub fn get_api_key(&self, credential: &Credential) -> Result<ApiResponse, ClientError> {
        debug!(email = %credential.email, "requesting api key");
        self.send(self.requests.build_get_api_key(credential))
    }

    pub fn get_list_of_pets(
        &self,
        auth_key: &AuthKey,
        filter: &PetFilter,
    ) -> Result<ApiResponse, ClientError> {
        self.send(self.requests.build_list_of_pets(auth_key, filter)?)
    }

    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
        photo_path: &Path,
    ) -> Result<ApiResponse, ClientError> {
        let photo = Photo::from_path(photo_path)?;
        self.send(self.requests.build_add_new_pet(auth_key, fields, &photo))
    }

    pub fn add_new_no_photo_pet(
        &self,
        auth_key: &AuthKey,
        fields: &PetFields,
    ) -> Result<ApiResponse, ClientError> {
        self.send(self.requests.build_add_new_no_photo_pet(auth_key, fields)?)
    }

    pub fn add_photo_to_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: &Path,
    ) -> Result<ApiResponse, ClientError> {
        let photo = Photo::from_path(photo_path)?;
        self.send(self.requests.build_add_photo_to_pet_info(auth_key, pet_id, &photo))
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        fields: &PetFields,
    ) -> Result<ApiResponse, ClientError> {
        self.send(self.requests.build_update_pet_info(auth_key, pet_id, fields)?)
    }

    /// Deletes a pet by id. The service answers 200 even for unknown ids.
    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ClientError> {
        self.send(self.requests.build_delete_pet(auth_key, pet_id))
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ClientError> {
        let response: HttpResponse = self.transport.execute(request)?;
        let response = ApiResponse::from(response);
        debug!(
            status = response.status,
            json = response.body.as_json().is_some(),
            "parsed response"
        );
        Ok(response)
    }
}
