use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Length in bytes of a registry object identifier.
pub const OBJECT_ID_LEN: usize = 12;

/// Error type for object identifier parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectIdError {
    #[error("invalid object id {0:?}: not hexadecimal")]
    InvalidHex(String),
    #[error("invalid object id {id:?}: expected 12 bytes, got {len}")]
    InvalidLength { id: String, len: usize },
}

/// Identifier the registry assigns to every entity, collection, container and image.
///
/// Parsing accepts upper or lower case hex; the string form is always lower case,
/// which is what the registry expects in parent references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    pub fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    /// Canonical hex form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = ObjectIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| ObjectIdError::InvalidHex(s.to_string()))?;
        let len = bytes.len();
        let bytes: [u8; OBJECT_ID_LEN] = bytes
            .try_into()
            .map_err(|_| ObjectIdError::InvalidLength { id: s.to_string(), len })?;
        Ok(ObjectId(bytes))
    }
}

impl serde::Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ObjectId::from_str(&s).map_err(serde::de::Error::custom)
    }
}
