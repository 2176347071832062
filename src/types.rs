//! Wire types for the PetFriends API.
//!
//! The service owns every entity; these types only describe what comes back
//! over the wire. Nothing here validates field contents.

use crate::error::ClientError;
use reqwest::StatusCode;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Auth
// ============================================================================

/// Opaque token issued by `GET /api/key`.
///
/// `Display` masks the token; use [`ApiKey::as_str`] when the raw value is
/// needed for a header.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First few characters followed by an ellipsis, for logs.
    pub fn masked(&self) -> String {
        let prefix: String = self.0.chars().take(6).collect();
        format!("{}…", prefix)
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.masked()).finish()
    }
}

// ============================================================================
// Pets
// ============================================================================

/// Listing filter for `GET /api/pets`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetFilter {
    /// Every pet visible to the service.
    #[default]
    All,
    /// Only pets created with the authenticated key.
    MyPets,
}

impl PetFilter {
    pub fn as_query(self) -> &'static str {
        match self {
            Self::All => "",
            Self::MyPets => "my_pets",
        }
    }
}

impl fmt::Display for PetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::MyPets => write!(f, "my_pets"),
        }
    }
}

/// A pet record as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    /// Free-form; the service does not check sign or type.
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    /// Base64 data URL, empty when the pet has no photo.
    #[serde(default)]
    pub pet_photo: String,
    #[serde(
        default,
        deserialize_with = "opt_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Pet {
    pub fn has_photo(&self) -> bool {
        !self.pet_photo.is_empty()
    }
}

/// Body of `GET /api/pets`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn ids(&self) -> Vec<&str> {
        self.pets.iter().map(|p| p.id.as_str()).collect()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|p| p.id == id)
    }

    pub fn first(&self) -> Option<&Pet> {
        self.pets.first()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected string or number, got {}",
            other
        ))),
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Parsed response body: JSON when the payload parses, raw text otherwise.
///
/// The service answers most errors with an HTML page, so a text body is a
/// normal outcome rather than a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }

    /// True when the body is a JSON object with a top-level `key`.
    pub fn has_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Top-level field of a JSON object body.
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Json(Value::Object(map)) => map.get(key),
            _ => None,
        }
    }

    /// Top-level string field of a JSON object body.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }

    /// Whether `needle` occurs anywhere in the body, JSON or text.
    pub fn mentions(&self, needle: &str) -> bool {
        match self {
            Self::Json(value) => value.to_string().contains(needle),
            Self::Text(text) => text.contains(needle),
        }
    }

    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value.clone())?),
            Self::Text(text) => Err(ClientError::Other(format!(
                "expected a JSON body, got text: {}",
                truncate(text, 80)
            ))),
        }
    }
}

impl fmt::Display for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{}", value),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Status code plus parsed body. Every HTTP outcome, including 4xx/5xx,
/// arrives as one of these.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self { status, body }
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// The `key` field of an auth response.
    pub fn api_key(&self) -> Option<ApiKey> {
        self.body.str_field("key").map(ApiKey::new)
    }

    pub fn pets(&self) -> Result<PetList, ClientError> {
        self.body.parse()
    }

    pub fn pet(&self) -> Result<Pet, ClientError> {
        self.body.parse()
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{}...", head)
    }
}
