//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! These types mirror the pet service's JSON schema but are defined
//! independently from the mock-server crate; the harness scenarios catch any
//! drift between the two.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Account credentials used to obtain an [`AuthKey`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Opaque token returned by `GET /api/key`, required by every other call.
///
/// Serializes as `{"key": "..."}`, the shape the service returns.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthKey {
    key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Debug for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthKey(***)")
    }
}

/// A pet as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_photo: Option<String>,
}

impl PetRecord {
    /// True when the service stored a photo for this pet.
    pub fn has_photo(&self) -> bool {
        self.pet_photo.as_deref().is_some_and(|photo| !photo.is_empty())
    }
}

/// The service is inconsistent about `age`: numbers and strings both occur.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Age::deserialize(deserializer)? {
        Age::Text(text) => text,
        Age::Number(number) => number.to_string(),
    })
}

/// Fields submitted when creating or updating a pet. Absent fields are
/// omitted from the encoded form; on update they stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animal_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl PetFields {
    pub fn new(
        name: impl Into<String>,
        animal_type: impl Into<String>,
        age: impl ToString,
    ) -> Self {
        Self {
            name: Some(name.into()),
            animal_type: Some(animal_type.into()),
            age: Some(age.to_string()),
        }
    }

    /// Present fields in submission order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", self.name.as_deref()),
            ("animal_type", self.animal_type.as_deref()),
            ("age", self.age.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value)))
        .collect()
    }
}

/// Listing filter for `GET /api/pets`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PetFilter {
    /// Every pet on the service (`filter=`).
    #[default]
    All,
    /// Only the caller's pets (`filter=my_pets`).
    MyPets,
    /// Any other literal, sent verbatim. The service rejects these.
    Other(String),
}

impl PetFilter {
    pub fn as_str(&self) -> &str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
            PetFilter::Other(value) => value,
        }
    }
}

impl From<&str> for PetFilter {
    fn from(value: &str) -> Self {
        match value {
            "" => PetFilter::All,
            "my_pets" => PetFilter::MyPets,
            other => PetFilter::Other(other.to_string()),
        }
    }
}
