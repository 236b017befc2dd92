use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::FormRejection,
        DefaultBodyLimit, Multipart, Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

/// Create/update payload. Every field is optional on the wire; handlers
/// decide which ones are required.
#[derive(Debug, Default, Deserialize)]
pub struct PetForm {
    pub name: Option<String>,
    pub animal_type: Option<String>,
    pub age: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub filter: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: HashMap<String, String>,
    keys: HashMap<String, String>,
    /// Newest first.
    pets: Vec<Pet>,
}

pub type Db = Arc<RwLock<Store>>;

/// Request body cap. Photos of a few MiB must fit.
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Error responses. The real service answers errors with plain text/HTML, so
/// these do too.
#[derive(Debug)]
pub enum Rejection {
    Forbidden,
    BadRequest(String),
    NotFound(String),
    /// Body could not be read; carries the extractor's own status
    /// (413 for oversized uploads, 415 for a wrong content type).
    Unreadable(StatusCode, String),
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self {
            Rejection::Forbidden => (
                StatusCode::FORBIDDEN,
                "Forbidden: invalid credentials or auth_key",
            )
                .into_response(),
            Rejection::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            Rejection::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            Rejection::Unreadable(status, message) => (status, message).into_response(),
        }
    }
}

fn bad_multipart(err: MultipartError) -> Rejection {
    match err.status() {
        StatusCode::BAD_REQUEST => Rejection::BadRequest(err.body_text()),
        status => Rejection::Unreadable(status, err.body_text()),
    }
}

fn unreadable_multipart(rejection: MultipartRejection) -> Rejection {
    Rejection::Unreadable(rejection.status(), rejection.body_text())
}

fn unreadable_form(rejection: FormRejection) -> Rejection {
    Rejection::Unreadable(rejection.status(), rejection.body_text())
}

fn missing_photo() -> Rejection {
    Rejection::BadRequest("Field 'pet_photo' is required".to_string())
}

/// Builds the router with the given `(email, password)` accounts.
pub fn app<I, E, P>(accounts: I) -> Router
where
    I: IntoIterator<Item = (E, P)>,
    E: Into<String>,
    P: Into<String>,
{
    let store = Store {
        accounts: accounts
            .into_iter()
            .map(|(email, password)| (email.into(), password.into()))
            .collect(),
        ..Store::default()
    };
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run<I, E, P>(listener: TcpListener, accounts: I) -> Result<(), std::io::Error>
where
    I: IntoIterator<Item = (E, P)>,
    E: Into<String>,
    P: Into<String>,
{
    axum::serve(listener, app(accounts)).await
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Resolves the `auth_key` header to the owning account.
fn authorize(store: &Store, headers: &HeaderMap) -> Result<String, Rejection> {
    header(headers, "auth_key")
        .and_then(|key| store.keys.get(key))
        .cloned()
        .ok_or(Rejection::Forbidden)
}

fn required(value: Option<String>, field: &str) -> Result<String, Rejection> {
    value
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Rejection::BadRequest(format!("Field '{field}' is required")))
}

fn validate_age(age: &str) -> Result<String, Rejection> {
    let age = age.trim();
    age.parse::<u32>()
        .map(|_| age.to_string())
        .map_err(|_| Rejection::BadRequest(format!("Age must be a number, got '{age}'")))
}

/// Only JPEG and PNG are accepted, detected by magic bytes.
fn photo_data_uri(data: &[u8]) -> Result<String, Rejection> {
    let mime = if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else {
        return Err(Rejection::BadRequest(
            "Unsupported photo format, use jpg, jpeg or png".to_string(),
        ));
    };
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(data)))
}

fn now() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default();
    format!("{secs:.6}")
}

fn new_pet(owner: String, form: PetForm, pet_photo: String) -> Result<Pet, Rejection> {
    let name = required(form.name, "name")?;
    let animal_type = required(form.animal_type, "animal_type")?;
    let age = validate_age(&required(form.age, "age")?)?;
    Ok(Pet {
        id: Uuid::new_v4().simple().to_string(),
        name,
        animal_type,
        age,
        pet_photo,
        user_id: owner,
        created_at: now(),
    })
}

async fn read_upload(mut multipart: Multipart) -> Result<(PetForm, Option<Bytes>), Rejection> {
    let mut form = PetForm::default();
    let mut photo = None;
    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pet_photo" => photo = Some(field.bytes().await.map_err(bad_multipart)?),
            "name" => form.name = Some(field.text().await.map_err(bad_multipart)?),
            "animal_type" => form.animal_type = Some(field.text().await.map_err(bad_multipart)?),
            "age" => form.age = Some(field.text().await.map_err(bad_multipart)?),
            other => debug!(field = other, "ignoring multipart field"),
        }
    }
    Ok((form, photo))
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Rejection> {
    let (Some(email), Some(password)) = (header(&headers, "email"), header(&headers, "password"))
    else {
        return Err(Rejection::Forbidden);
    };
    let mut store = db.write().await;
    if store.accounts.get(email).map(String::as_str) != Some(password) {
        return Err(Rejection::Forbidden);
    }
    let key = Uuid::new_v4().simple().to_string();
    store.keys.insert(key.clone(), email.to_string());
    info!(email, "issued api key");
    Ok(Json(json!({ "key": key })))
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, Rejection> {
    let store = db.read().await;
    let owner = authorize(&store, &headers)?;
    let pets: Vec<&Pet> = match query.filter.as_deref().unwrap_or_default() {
        "" => store.pets.iter().collect(),
        "my_pets" => store.pets.iter().filter(|pet| pet.user_id == owner).collect(),
        other => {
            return Err(Rejection::BadRequest(format!("Filter value is incorrect: '{other}'")))
        }
    };
    Ok(Json(json!({ "pets": pets })))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Pet>, Rejection> {
    let owner = authorize(&*db.read().await, &headers)?;
    let (form, photo) = read_upload(multipart.map_err(unreadable_multipart)?).await?;
    let photo = photo.ok_or_else(missing_photo)?;
    let pet = new_pet(owner, form, photo_data_uri(&photo)?)?;
    db.write().await.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    form: Result<Form<PetForm>, FormRejection>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let owner = authorize(&store, &headers)?;
    let Form(form) = form.map_err(unreadable_form)?;
    let pet = new_pet(owner, form, String::new())?;
    store.pets.insert(0, pet.clone());
    Ok(Json(pet))
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Pet>, Rejection> {
    let owner = authorize(&*db.read().await, &headers)?;
    let (_, photo) = read_upload(multipart.map_err(unreadable_multipart)?).await?;
    let photo = photo.ok_or_else(missing_photo)?;
    let data_uri = photo_data_uri(&photo)?;

    let mut store = db.write().await;
    let pet = owned_pet(&mut store, &owner, &id)?;
    pet.pet_photo = data_uri;
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    form: Result<Form<PetForm>, FormRejection>,
) -> Result<Json<Pet>, Rejection> {
    let mut store = db.write().await;
    let owner = authorize(&store, &headers)?;
    let Form(form) = form.map_err(unreadable_form)?;
    let age = form.age.as_deref().map(validate_age).transpose()?;
    let pet = owned_pet(&mut store, &owner, &id)?;
    if let Some(name) = form.name {
        pet.name = name;
    }
    if let Some(animal_type) = form.animal_type {
        pet.animal_type = animal_type;
    }
    if let Some(age) = age {
        pet.age = age;
    }
    Ok(Json(pet.clone()))
}

/// Answers 200 whether or not the pet existed, like the real service.
async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    let mut store = db.write().await;
    let owner = authorize(&store, &headers)?;
    let before = store.pets.len();
    store.pets.retain(|pet| !(pet.id == id && pet.user_id == owner));
    debug!(%id, removed = before - store.pets.len(), "delete pet");
    Ok(StatusCode::OK)
}

fn owned_pet<'a>(store: &'a mut Store, owner: &str, id: &str) -> Result<&'a mut Pet, Rejection> {
    store
        .pets
        .iter_mut()
        .find(|pet| pet.id == id && pet.user_id == owner)
        .ok_or_else(|| Rejection::NotFound(format!("Pet '{id}' not found")))
}
