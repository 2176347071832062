//! In-process stand-in for the PetFriends service.
//!
//! Reproduces the observed behavior the scenarios rely on, leniencies
//! included: negative ages are stored as-is, a text file sent with a new pet
//! is accepted (the pet just has no photo), deleting an unknown id answers
//! 200, while updating an unknown id answers 400 and attaching a photo to an
//! unknown id or attaching a non-image answers 500. Auth failures come back
//! as an HTML page, not JSON.

use axum::{
    Json, Router,
    extract::{Form, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
};
use petfriends::Pet;
use serde::Deserialize;
use serde_json::json;
use std::{collections::HashMap, net::SocketAddr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock, task::JoinHandle};

const FORBIDDEN_PAGE: &str = "<!doctype html>\n<title>403 Forbidden</title>\n<h1>Forbidden</h1>\n\
     <p>Please provide 'auth_key' Header</p>";

const SERVER_ERROR_PAGE: &str = "<!doctype html>\n<title>500 Internal Server Error</title>\n\
     <h1>Internal Server Error</h1>";

pub const NEIGHBOUR_EMAIL: &str = "neighbour@petfriends.test";
const NEIGHBOUR_PASSWORD: &str = "neighbour-pass";

struct Account {
    password: String,
    key: String,
    user_id: String,
}

struct StoredPet {
    pet: Pet,
    owner_key: String,
}

#[derive(Default)]
struct Store {
    accounts: HashMap<String, Account>,
    /// Newest first, like the real listing.
    pets: Vec<StoredPet>,
    next_id: u64,
}

type Db = Arc<RwLock<Store>>;

impl Store {
    fn add_account(&mut self, email: &str, password: &str) -> String {
        let n = self.accounts.len() + 1;
        let key = format!("{:056x}", 0xFA4E_0000_u64 + n as u64);
        self.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                key: key.clone(),
                user_id: format!("user-{:04}", n),
            },
        );
        key
    }

    /// The key from the `auth_key` header, if the service issued it.
    fn authorize(&self, headers: &HeaderMap) -> Option<String> {
        let key = headers.get("auth_key")?.to_str().ok()?;
        self.accounts
            .values()
            .any(|a| a.key == key)
            .then(|| key.to_string())
    }

    fn insert_pet(
        &mut self,
        owner_key: &str,
        name: String,
        animal_type: String,
        age: String,
        pet_photo: String,
    ) -> Pet {
        self.next_id += 1;
        let user_id = self
            .accounts
            .values()
            .find(|a| a.key == owner_key)
            .map(|a| a.user_id.clone());

        let pet = Pet {
            id: format!("pet-{:06}", self.next_id),
            name,
            animal_type,
            age,
            pet_photo,
            created_at: Some(format!("{}.0", 1_700_000_000 + self.next_id)),
            user_id,
        };
        self.pets.insert(
            0,
            StoredPet {
                pet: pet.clone(),
                owner_key: owner_key.to_string(),
            },
        );
        pet
    }

    fn owned_pet_mut(&mut self, key: &str, pet_id: &str) -> Option<&mut Pet> {
        self.pets
            .iter_mut()
            .find(|p| p.pet.id == pet_id && p.owner_key == key)
            .map(|p| &mut p.pet)
    }
}

// ============================================================================
// Server handle
// ============================================================================

/// A running fake bound to an ephemeral local port; stops on drop.
pub struct FakeService {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl FakeService {
    /// Start with one account for `email`/`password` and a second account
    /// that already owns two pets, so the "all pets" listing is never empty.
    pub async fn start(email: &str, password: &str) -> Self {
        let mut store = Store::default();
        store.add_account(email, password);
        let neighbour = store.add_account(NEIGHBOUR_EMAIL, NEIGHBOUR_PASSWORD);
        for (name, animal_type, age) in [("Barsik", "cat", "2"), ("Sharik", "dog", "4")] {
            store.insert_pet(
                &neighbour,
                name.to_string(),
                animal_type.to_string(),
                age.to_string(),
                String::new(),
            );
        }

        let db: Db = Arc::new(RwLock::new(store));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake service");
        let addr = listener.local_addr().expect("Fake service has no address");

        let app = app(db);
        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Fake service stopped unexpectedly");
        });

        Self { addr, handle }
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn app(db: Db) -> Router {
    Router::new()
        .route("/api/key", get(get_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{pet_id}", post(set_photo))
        .route("/api/pets/{pet_id}", put(update_pet).delete(delete_pet))
        .with_state(db)
}

// ============================================================================
// Handlers
// ============================================================================

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, Html(FORBIDDEN_PAGE)).into_response()
}

fn bad_request(msg: &str) -> Response {
    (StatusCode::BAD_REQUEST, Html(format!("<p>{}</p>", msg))).into_response()
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(SERVER_ERROR_PAGE)).into_response()
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn get_key(State(db): State<Db>, headers: HeaderMap) -> Response {
    let store = db.read().await;
    match store.accounts.get(header(&headers, "email")) {
        Some(account) if account.password == header(&headers, "password") => {
            Json(json!({ "key": account.key })).into_response()
        }
        _ => forbidden(),
    }
}

#[derive(Deserialize)]
struct ListParams {
    filter: Option<String>,
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Response {
    let store = db.read().await;
    let Some(key) = store.authorize(&headers) else {
        return forbidden();
    };

    let pets: Vec<&Pet> = match params.filter.as_deref().unwrap_or_default() {
        "" => store.pets.iter().map(|p| &p.pet).collect(),
        "my_pets" => store
            .pets
            .iter()
            .filter(|p| p.owner_key == key)
            .map(|p| &p.pet)
            .collect(),
        _ => return bad_request("Filter value is incorrect"),
    };

    Json(json!({ "pets": pets })).into_response()
}

#[derive(Default)]
struct Upload {
    name: Option<String>,
    animal_type: Option<String>,
    age: Option<String>,
    photo: Option<Vec<u8>>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, Response> {
    let mut upload = Upload::default();
    let malformed = |e: axum::extract::multipart::MultipartError| bad_request(&e.body_text());

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pet_photo" => upload.photo = Some(field.bytes().await.map_err(malformed)?.to_vec()),
            "name" => upload.name = Some(field.text().await.map_err(malformed)?),
            "animal_type" => upload.animal_type = Some(field.text().await.map_err(malformed)?),
            "age" => upload.age = Some(field.text().await.map_err(malformed)?),
            _ => {}
        }
    }

    Ok(upload)
}

/// Data URL for recognised image bytes, `None` for anything else.
fn photo_data_url(bytes: &[u8]) -> Option<String> {
    let mime = if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else {
        return None;
    };
    Some(format!("data:{};base64,<{} bytes>", mime, bytes.len()))
}

async fn create_pet(State(db): State<Db>, headers: HeaderMap, multipart: Multipart) -> Response {
    let Some(key) = db.read().await.authorize(&headers) else {
        return forbidden();
    };

    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    let (Some(name), Some(animal_type), Some(age)) = (upload.name, upload.animal_type, upload.age)
    else {
        return bad_request("Provide name, animal_type and age");
    };

    // Non-image photos are silently dropped
    let photo = upload
        .photo
        .as_deref()
        .and_then(photo_data_url)
        .unwrap_or_default();

    let pet = db
        .write()
        .await
        .insert_pet(&key, name, animal_type, age, photo);
    Json(pet).into_response()
}

#[derive(Deserialize)]
struct PetForm {
    name: Option<String>,
    animal_type: Option<String>,
    age: Option<String>,
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(form): Form<PetForm>,
) -> Response {
    let mut store = db.write().await;
    let Some(key) = store.authorize(&headers) else {
        return forbidden();
    };

    let (Some(name), Some(animal_type), Some(age)) = (form.name, form.animal_type, form.age) else {
        return bad_request("Provide name, animal_type and age");
    };

    Json(store.insert_pet(&key, name, animal_type, age, String::new())).into_response()
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    multipart: Multipart,
) -> Response {
    let Some(key) = db.read().await.authorize(&headers) else {
        return forbidden();
    };

    let upload = match read_upload(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };
    let Some(bytes) = upload.photo else {
        return bad_request("Provide pet_photo");
    };
    let Some(photo) = photo_data_url(&bytes) else {
        return server_error();
    };

    let mut store = db.write().await;
    match store.owned_pet_mut(&key, &pet_id) {
        Some(pet) => {
            pet.pet_photo = photo;
            Json(pet.clone()).into_response()
        }
        None => server_error(),
    }
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
    Form(form): Form<PetForm>,
) -> Response {
    let mut store = db.write().await;
    let Some(key) = store.authorize(&headers) else {
        return forbidden();
    };

    let Some(pet) = store.owned_pet_mut(&key, &pet_id) else {
        return bad_request("Pet with this id wasn't found!");
    };
    if let Some(name) = form.name {
        pet.name = name;
    }
    if let Some(animal_type) = form.animal_type {
        pet.animal_type = animal_type;
    }
    if let Some(age) = form.age {
        pet.age = age;
    }

    Json(pet.clone()).into_response()
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(pet_id): Path<String>,
) -> Response {
    let mut store = db.write().await;
    let Some(key) = store.authorize(&headers) else {
        return forbidden();
    };

    // Unknown or foreign ids are accepted without effect
    store
        .pets
        .retain(|p| !(p.pet.id == pet_id && p.owner_key == key));

    StatusCode::OK.into_response()
}
