//! Authenticated scenario sessions and disposable pet records.
//!
//! Every scenario starts by opening a [`Session`], which owns the client and
//! the `AuthKey` for the duration of the test. State a scenario mutates
//! should come from [`Session::disposable_pet`], which deletes the record
//! again when the guard goes out of scope.

use std::ops::Deref;
use std::path::Path;

use petfriends_core::{
    ApiResponse, AuthKey, PetFields, PetFilter, PetFriends, PetRecord, ResponseBody,
};
use tracing::{debug, info, warn};

use crate::config::HarnessConfig;
use crate::error::HarnessError;

#[derive(Debug)]
pub struct Session {
    client: PetFriends,
    auth_key: AuthKey,
}

impl Session {
    /// Builds a client from `config` and acquires an auth key.
    pub fn open(config: &HarnessConfig) -> Result<Self, HarnessError> {
        let client = config.client();
        let resp = client.get_api_key(&config.credential)?;
        if !resp.is_success() {
            return Err(HarnessError::Auth {
                status: resp.status,
            });
        }
        let auth_key = resp.auth_key().ok_or(HarnessError::MissingField {
            operation: "get_api_key",
            field: "key",
        })?;
        info!(email = %config.credential.email, base_url = %config.base_url, "session opened");
        Ok(Self { client, auth_key })
    }

    pub fn client(&self) -> &PetFriends {
        &self.client
    }

    pub fn auth_key(&self) -> &AuthKey {
        &self.auth_key
    }

    /// Lists pets, requiring a 200 and a `pets` field.
    pub fn list(&self, filter: &PetFilter) -> Result<Vec<PetRecord>, HarnessError> {
        let resp = expect_ok(
            "get_list_of_pets",
            self.client.get_list_of_pets(&self.auth_key, filter)?,
        )?;
        resp.pets().ok_or(HarnessError::MissingField {
            operation: "get_list_of_pets",
            field: "pets",
        })
    }

    pub fn my_pets(&self) -> Result<Vec<PetRecord>, HarnessError> {
        self.list(&PetFilter::MyPets)
    }

    pub fn all_pets(&self) -> Result<Vec<PetRecord>, HarnessError> {
        self.list(&PetFilter::All)
    }

    /// Returns the caller's first pet, creating one from `seed` when the
    /// account owns none. The seeded pet is left in place.
    pub fn ensure_my_pet(&self, seed: &PetFields, photo: &Path) -> Result<PetRecord, HarnessError> {
        if let Some(pet) = self.my_pets()?.into_iter().next() {
            return Ok(pet);
        }
        debug!(?seed, "account has no pets, seeding one");
        self.create(seed, Some(photo))?;
        self.my_pets()?
            .into_iter()
            .next()
            .ok_or(HarnessError::MissingField {
                operation: "get_list_of_pets",
                field: "pets",
            })
    }

    /// Creates a pet that is deleted when the returned guard is dropped.
    pub fn disposable_pet(
        &self,
        fields: &PetFields,
        photo: Option<&Path>,
    ) -> Result<DisposablePet<'_>, HarnessError> {
        let pet = self.create(fields, photo)?;
        debug!(id = %pet.id, "created disposable pet");
        Ok(DisposablePet {
            session: self,
            pet,
            released: false,
        })
    }

    fn create(&self, fields: &PetFields, photo: Option<&Path>) -> Result<PetRecord, HarnessError> {
        let resp = match photo {
            Some(photo) => self.client.add_new_pet(&self.auth_key, fields, photo)?,
            None => self.client.add_new_no_photo_pet(&self.auth_key, fields)?,
        };
        let operation = if photo.is_some() {
            "add_new_pet"
        } else {
            "add_new_no_photo_pet"
        };
        expect_ok(operation, resp)?
            .pet()
            .ok_or(HarnessError::MissingField {
                operation,
                field: "id",
            })
    }
}

/// Requires a 200 response.
pub fn expect_ok(operation: &'static str, resp: ApiResponse) -> Result<ApiResponse, HarnessError> {
    if resp.is_success() {
        return Ok(resp);
    }
    let body = match &resp.body {
        ResponseBody::Json(value) => value.to_string(),
        ResponseBody::Text(text) => text.clone(),
    };
    Err(HarnessError::UnexpectedStatus {
        operation,
        status: resp.status,
        body,
    })
}

/// A pet owned by one scenario. Deleted on drop unless already released.
#[derive(Debug)]
pub struct DisposablePet<'a> {
    session: &'a Session,
    pet: PetRecord,
    released: bool,
}

impl DisposablePet<'_> {
    pub fn record(&self) -> &PetRecord {
        &self.pet
    }

    /// Deletes the pet now and returns the service's answer.
    pub fn release(mut self) -> Result<ApiResponse, HarnessError> {
        self.released = true;
        let resp = self
            .session
            .client
            .delete_pet(&self.session.auth_key, &self.pet.id)?;
        Ok(resp)
    }
}

impl Deref for DisposablePet<'_> {
    type Target = PetRecord;

    fn deref(&self) -> &PetRecord {
        &self.pet
    }
}

impl Drop for DisposablePet<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        match self
            .session
            .client
            .delete_pet(&self.session.auth_key, &self.pet.id)
        {
            Ok(resp) if resp.is_success() => debug!(id = %self.pet.id, "disposable pet deleted"),
            Ok(resp) => {
                warn!(id = %self.pet.id, status = resp.status, "disposable pet not deleted")
            }
            Err(err) => warn!(id = %self.pet.id, error = %err, "disposable pet not deleted"),
        }
    }
}
