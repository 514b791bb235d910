use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

fn is_default<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// The `{"data": ...}` wrapper every successful response is sent in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Bookkeeping fields the registry maintains on every record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    #[serde(default, skip_serializing_if = "is_default")]
    pub deleted: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Top level namespace owner (user or organisation)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Identifiers of the collections owned by this entity
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub size: i64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub quota: i64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub default_private: bool,
}

/// Named group of containers owned by an entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Identifier of the owning entity
    #[serde(default)]
    pub entity: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<String>,
    #[serde(default, skip_serializing_if = "is_default")]
    pub size: i64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub private: bool,
}

/// Image repository owned by a collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(flatten)]
    pub audit: Audit,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub full_description: String,
    /// Identifier of the owning collection
    #[serde(default)]
    pub collection: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub image_tags: TagMap,
    #[serde(default, skip_serializing_if = "is_default")]
    pub size: i64,
    #[serde(default, skip_serializing_if = "is_default")]
    pub download_count: i64,
}

/// Content addressed artifact stored in a container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(flatten)]
    pub audit: Audit,
    pub hash: String,
    #[serde(default)]
    pub description: String,
    /// Identifier of the owning container
    #[serde(default)]
    pub container: String,
    #[serde(default, skip_serializing_if = "is_default")]
    pub uploaded: bool,
    #[serde(default, skip_serializing_if = "is_default")]
    pub size: i64,
}

/// Tag name to image identifier
pub type TagMap = HashMap<String, String>;

/// A single tag assignment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTag {
    #[serde(rename = "Tag")]
    pub tag: String,
    #[serde(rename = "ImageID")]
    pub image_id: String,
}

/// Everything a search matched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(rename = "entity", default)]
    pub entities: Vec<Entity>,
    #[serde(rename = "collection", default)]
    pub collections: Vec<Collection>,
    #[serde(rename = "container", default)]
    pub containers: Vec<Container>,
    #[serde(rename = "image", default)]
    pub images: Vec<Image>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.collections.is_empty()
            && self.containers.is_empty()
            && self.images.is_empty()
    }
}

// Error body sent with non-success responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<RemoteError>,
}

/// Error details reported by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    pub code: u16,
    pub message: String,
}

impl RemoteError {
    /// Decode the error details from a response body, if it carries any.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<ErrorResponse>(body).ok()?.error
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = StatusCode::from_u16(self.code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("");
        write!(f, "{} ({} {})", self.message, self.code, reason)
    }
}
