//! HTTP client for the PetFriends API.
//!
//! Every operation returns `Ok(ApiResponse)` for any HTTP status, 4xx and 5xx
//! included. `Err` is reserved for transport failures and for photo files
//! that cannot be read from disk.

use crate::config::Context;
use crate::error::ClientError;
use crate::types::{ApiKey, ApiResponse, PetFilter, ResponseBody};
use crate::ua::user_agent;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Header carrying the API key on authenticated calls.
pub const AUTH_HEADER: &str = "auth_key";

/// Multipart field name for photo uploads.
pub const PHOTO_FIELD: &str = "pet_photo";

/// Stateless wrapper over the PetFriends endpoints.
///
/// Holds only the HTTP connection pool and the base URL, so one instance can
/// be cloned freely or built fresh per test.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(ctx: &Context) -> Result<Self, ClientError> {
        Self::with_base_url(&ctx.api_url())
    }

    /// Create a client for an explicit base URL (mock servers, staging).
    pub fn with_base_url(base_url: &str) -> Result<Self, ClientError> {
        Self::build(base_url, None)
    }

    /// Like [`ApiClient::with_base_url`] but with a whole-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn pet_path(prefix: &str, pet_id: &str) -> String {
        format!("{}/{}", prefix, urlencoding::encode(pet_id))
    }

    /// `GET /api/key` with the account email and password as headers.
    pub async fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ClientError> {
        let request = self
            .client
            .get(self.url("/api/key"))
            .header("email", email)
            .header("password", password);

        self.send("GET", "/api/key", request).await
    }

    /// `GET /api/pets?filter=...`
    pub async fn get_list_of_pets(
        &self,
        auth_key: &ApiKey,
        filter: PetFilter,
    ) -> Result<ApiResponse, ClientError> {
        let request = self
            .client
            .get(self.url("/api/pets"))
            .header(AUTH_HEADER, auth_key.as_str())
            .query(&[("filter", filter.as_query())]);

        debug!(key = %auth_key, %filter, "listing pets");
        self.send("GET", "/api/pets", request).await
    }

    /// `POST /api/pets` as multipart, photo included.
    pub async fn add_new_pet(
        &self,
        auth_key: &ApiKey,
        name: &str,
        animal_type: &str,
        age: &str,
        photo_path: &Path,
    ) -> Result<ApiResponse, ClientError> {
        let form = Form::new()
            .text("name", name.to_string())
            .text("animal_type", animal_type.to_string())
            .text("age", age.to_string())
            .part(PHOTO_FIELD, photo_part(photo_path).await?);

        let request = self
            .client
            .post(self.url("/api/pets"))
            .header(AUTH_HEADER, auth_key.as_str())
            .multipart(form);

        self.send("POST", "/api/pets", request).await
    }

    /// `POST /api/create_pet_simple` as a url-encoded form, no photo.
    pub async fn add_new_pet_simple(
        &self,
        auth_key: &ApiKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ClientError> {
        let request = self
            .client
            .post(self.url("/api/create_pet_simple"))
            .header(AUTH_HEADER, auth_key.as_str())
            .form(&[("name", name), ("animal_type", animal_type), ("age", age)]);

        self.send("POST", "/api/create_pet_simple", request).await
    }

    /// `POST /api/pets/set_photo/{pet_id}` as multipart.
    pub async fn add_photo_of_pet(
        &self,
        auth_key: &ApiKey,
        pet_id: &str,
        photo_path: &Path,
    ) -> Result<ApiResponse, ClientError> {
        let form = Form::new().part(PHOTO_FIELD, photo_part(photo_path).await?);
        let path = Self::pet_path("/api/pets/set_photo", pet_id);

        let request = self
            .client
            .post(self.url(&path))
            .header(AUTH_HEADER, auth_key.as_str())
            .multipart(form);

        self.send("POST", &path, request).await
    }

    /// `PUT /api/pets/{pet_id}` as a url-encoded form.
    pub async fn update_pet_info(
        &self,
        auth_key: &ApiKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ClientError> {
        let path = Self::pet_path("/api/pets", pet_id);

        let request = self
            .client
            .put(self.url(&path))
            .header(AUTH_HEADER, auth_key.as_str())
            .form(&[("name", name), ("animal_type", animal_type), ("age", age)]);

        self.send("PUT", &path, request).await
    }

    /// `DELETE /api/pets/{pet_id}`
    pub async fn delete_pet(&self, auth_key: &ApiKey, pet_id: &str) -> Result<ApiResponse, ClientError> {
        let path = Self::pet_path("/api/pets", pet_id);

        let request = self
            .client
            .delete(self.url(&path))
            .header(AUTH_HEADER, auth_key.as_str());

        self.send("DELETE", &path, request).await
    }

    async fn send(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<ApiResponse, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        debug!(method, path, status = status.as_u16(), bytes = text.len(), "petfriends response");

        Ok(ApiResponse::new(status, ResponseBody::from_text(text)))
    }
}

/// Read a photo from disk into a multipart part.
///
/// The bytes go out untouched; the service decides whether they are an image.
async fn photo_part(path: &Path) -> Result<Part, ClientError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::photo_read(path, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());

    Ok(Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(photo_mime(path))?)
}

/// MIME type announced for a photo, by file extension.
pub fn photo_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
}
