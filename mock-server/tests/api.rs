use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use petfriends_mock::{app, Pet, MAX_BODY_BYTES};
use serde_json::Value;
use tower::ServiceExt;

const EMAIL: &str = "user@example.com";
const PASSWORD: &str = "secret";
const BOUNDARY: &str = "----mock-test-boundary";
const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];
const TIFF: &[u8] = b"II*\0\x08\0\0\0";

fn service() -> Router {
    app([(EMAIL, PASSWORD)])
}

async fn send(app: &Router, request: Request<Body>) -> axum::response::Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn key_request(email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .uri("/api/key")
        .header("email", email)
        .header("password", password)
        .body(Body::empty())
        .unwrap()
}

async fn login(app: &Router) -> String {
    let resp = send(app, key_request(EMAIL, PASSWORD)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    body["key"].as_str().unwrap().to_string()
}

fn authed(method: &str, uri: &str, key: &str) -> http::request::Builder {
    Request::builder().method(method).uri(uri).header("auth_key", key)
}

fn form_request(method: &str, uri: &str, key: &str, body: &str) -> Request<Body> {
    authed(method, uri, key)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(uri: &str, key: &str, fields: &[(&str, &str)], photo: &[u8]) -> Request<Body> {
    let mut data = Vec::new();
    for (name, value) in fields {
        let part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        );
        data.extend_from_slice(part.as_bytes());
    }
    data.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"pet_photo\"; filename=\"p\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    data.extend_from_slice(photo);
    data.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    authed("POST", uri, key)
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(data))
        .unwrap()
}

async fn list(app: &Router, key: &str, filter: &str) -> Vec<Pet> {
    let resp = send(
        app,
        authed("GET", &format!("/api/pets?filter={filter}"), key)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    serde_json::from_value(body["pets"].clone()).unwrap()
}

async fn create_simple(app: &Router, key: &str, body: &str) -> Pet {
    let resp = send(app, form_request("POST", "/api/create_pet_simple", key, body)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await
}

// --- key ---

#[tokio::test]
async fn api_key_for_valid_user() {
    let app = service();
    let key = login(&app).await;
    assert_eq!(key.len(), 32);
}

#[tokio::test]
async fn api_key_wrong_password_returns_403() {
    let app = service();
    let resp = send(&app, key_request(EMAIL, "valid_password")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn api_key_missing_headers_returns_403() {
    let app = service();
    let resp = send(&app, Request::builder().uri("/api/key").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// --- list ---

#[tokio::test]
async fn list_pets_empty() {
    let app = service();
    let key = login(&app).await;
    assert!(list(&app, &key, "").await.is_empty());
    assert!(list(&app, &key, "my_pets").await.is_empty());
}

#[tokio::test]
async fn list_pets_without_filter_param() {
    let app = service();
    let key = login(&app).await;
    let resp = send(&app, authed("GET", "/api/pets", &key).body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn list_pets_unknown_filter_returns_400() {
    let app = service();
    let key = login(&app).await;
    let req = authed("GET", "/api/pets?filter=any", &key)
        .body(Body::empty())
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_pets_bad_key_returns_403() {
    let app = service();
    let req = authed("GET", "/api/pets?filter=", "nope")
        .body(Body::empty())
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn my_pets_only_lists_own_pets() {
    let app = app([(EMAIL, PASSWORD), ("other@example.com", "pw")]);
    let key = login(&app).await;
    let other = {
        let resp = send(&app, key_request("other@example.com", "pw")).await;
        let body: Value = body_json(resp).await;
        body["key"].as_str().unwrap().to_string()
    };
    create_simple(&app, &key, "name=Mine&animal_type=cat&age=1").await;
    create_simple(&app, &other, "name=Theirs&animal_type=dog&age=2").await;

    let mine = list(&app, &key, "my_pets").await;
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Mine");
    assert_eq!(list(&app, &key, "").await.len(), 2);
}

// --- create ---

#[tokio::test]
async fn create_pet_with_photo() {
    let app = service();
    let key = login(&app).await;
    let resp = send(
        &app,
        multipart_request(
            "/api/pets",
            &key,
            &[("name", "Барбоскин"), ("animal_type", "двортерьер"), ("age", "4")],
            JPEG,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pet: Pet = body_json(resp).await;
    assert_eq!(pet.name, "Барбоскин");
    assert!(pet.pet_photo.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn create_pet_with_tiff_returns_400() {
    let app = service();
    let key = login(&app).await;
    let resp = send(
        &app,
        multipart_request(
            "/api/pets",
            &key,
            &[("name", "a"), ("animal_type", "b"), ("age", "1")],
            TIFF,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_simple_invalid_age_returns_400() {
    let app = service();
    let key = login(&app).await;
    let resp = send(
        &app,
        form_request("POST", "/api/create_pet_simple", &key, "name=Pies&animal_type=Pies&age=kot"),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_simple_empty_form_returns_400() {
    let app = service();
    let key = login(&app).await;
    let resp = send(&app, form_request("POST", "/api/create_pet_simple", &key, "")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_simple_fake_key_returns_403() {
    let app = service();
    let resp = send(
        &app,
        form_request(
            "POST",
            "/api/create_pet_simple",
            "z1z1z1",
            "name=Pies&animal_type=Pies&age=4",
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_simple_without_content_type_returns_415() {
    let app = service();
    let key = login(&app).await;
    let req = authed("POST", "/api/create_pet_simple", &key)
        .body(Body::from("name=Pies&animal_type=Pies&age=4"))
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn fake_key_is_checked_before_the_body() {
    let app = service();
    let cases = [
        ("POST", "/api/pets"),
        ("POST", "/api/create_pet_simple"),
        ("POST", "/api/pets/set_photo/missing"),
        ("PUT", "/api/pets/missing"),
    ];
    for (method, uri) in cases {
        let req = authed(method, uri, "z1z1z1")
            .body(Body::from("not a form"))
            .unwrap();
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{method} {uri}");
    }
}

#[tokio::test]
async fn create_pet_accepts_photo_of_a_few_mib() {
    let app = service();
    let key = login(&app).await;
    let mut photo = JPEG.to_vec();
    photo.resize(3 * 1024 * 1024, 0);
    let resp = send(
        &app,
        multipart_request(
            "/api/pets",
            &key,
            &[("name", "Big"), ("animal_type", "cat"), ("age", "3")],
            &photo,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let pet: Pet = body_json(resp).await;
    assert!(pet.pet_photo.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn oversized_upload_returns_413() {
    let app = service();
    let key = login(&app).await;
    let mut photo = JPEG.to_vec();
    photo.resize(MAX_BODY_BYTES + 1, 0);
    let resp = send(
        &app,
        multipart_request(
            "/api/pets",
            &key,
            &[("name", "Huge"), ("animal_type", "cat"), ("age", "3")],
            &photo,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(list(&app, &key, "my_pets").await.is_empty());
}

// --- set photo / update ---

#[tokio::test]
async fn set_photo_unknown_pet_returns_404() {
    let app = service();
    let key = login(&app).await;
    let resp = send(&app, multipart_request("/api/pets/set_photo/missing", &key, &[], JPEG)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_unknown_pet_returns_404() {
    let app = service();
    let key = login(&app).await;
    let resp = send(&app, form_request("PUT", "/api/pets/missing", &key, "name=x")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- delete ---

#[tokio::test]
async fn delete_unknown_pet_still_returns_200() {
    let app = service();
    let key = login(&app).await;
    let req = authed("DELETE", "/api/pets/a1a1", &key)
        .body(Body::empty())
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

// --- full lifecycle ---

#[tokio::test]
async fn pet_lifecycle() {
    let app = service();
    let key = login(&app).await;

    // create without photo
    let created = create_simple(&app, &key, "name=Pies&animal_type=Pies&age=2").await;
    assert_eq!(created.name, "Pies");
    assert!(created.pet_photo.is_empty());
    let id = created.id.clone();

    // attach photo
    let uri = format!("/api/pets/set_photo/{id}");
    let resp = send(&app, multipart_request(&uri, &key, &[], JPEG)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let with_photo: Pet = body_json(resp).await;
    assert!(!with_photo.pet_photo.is_empty());

    // partial update: name only
    let uri = format!("/api/pets/{id}");
    let resp = send(&app, form_request("PUT", &uri, &key, "name=Murzik")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Pet = body_json(resp).await;
    assert_eq!(updated.name, "Murzik");
    assert_eq!(updated.age, "2"); // unchanged

    // update with bad age is rejected and leaves the pet unchanged
    let resp = send(&app, form_request("PUT", &uri, &key, "age=old")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let pets = list(&app, &key, "my_pets").await;
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].age, "2");

    // delete
    let req = authed("DELETE", &uri, &key).body(Body::empty()).unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(list(&app, &key, "my_pets").await.is_empty());
}
