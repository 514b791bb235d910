use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const SCHEME: &str = "library://";
const DEFAULT_TAG: &str = "latest";

/// Error type for library reference parsing
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LibraryRefError {
    #[error("invalid library reference format: {0}")]
    InvalidFormat(String),
}

/// A human readable reference to a container in the library,
/// `[library://][[entity/]collection/]container[:tag[,tag...]]`.
///
/// Missing entity or collection components are left empty and resolved by
/// the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRef {
    pub entity: String,
    pub collection: String,
    pub container: String,
    /// Never empty; defaults to `latest`
    pub tags: Vec<String>,
}

impl LibraryRef {
    pub fn new(entity: String, collection: String, container: String, tags: Vec<String>) -> Self {
        Self {
            entity,
            collection,
            container,
            tags,
        }
    }

    /// Reference string accepted by the entity lookup.
    pub fn entity_ref(&self) -> String {
        self.entity.clone()
    }

    /// Reference string accepted by the collection lookup.
    pub fn collection_ref(&self) -> String {
        format!("{}/{}", self.entity, self.collection)
    }

    /// Reference string accepted by the container lookup.
    pub fn container_ref(&self) -> String {
        format!("{}/{}/{}", self.entity, self.collection, self.container)
    }

    /// Reference string accepted by the image lookup, for the given tag.
    pub fn image_ref(&self, tag: &str) -> String {
        format!("{}:{}", self.container_ref(), tag)
    }
}

impl FromStr for LibraryRef {
    type Err = LibraryRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LibraryRefError::InvalidFormat(s.to_string());
        let rest = s.strip_prefix(SCHEME).unwrap_or(s);

        let parts: Vec<&str> = rest.split('/').collect();
        let (entity, collection, container) = match parts.as_slice() {
            [container] => ("", "", *container),
            [collection, container] => ("", *collection, *container),
            [entity, collection, container] => (*entity, *collection, *container),
            _ => return Err(invalid()),
        };

        let (container, tags) = match container.split_once(':') {
            Some((name, tags)) => {
                let tags: Vec<String> = tags.split(',').map(|t| t.trim().to_string()).collect();
                if tags.iter().any(|t| t.is_empty()) {
                    return Err(invalid());
                }
                (name, tags)
            }
            None => (container, vec![DEFAULT_TAG.to_string()]),
        };

        if container.is_empty() || (parts.len() > 1 && collection.is_empty()) {
            return Err(invalid());
        }
        if parts.len() == 3 && entity.is_empty() {
            return Err(invalid());
        }

        Ok(LibraryRef {
            entity: entity.to_string(),
            collection: collection.to_string(),
            container: container.to_string(),
            tags,
        })
    }
}

impl fmt::Display for LibraryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SCHEME)?;
        if !self.entity.is_empty() {
            write!(f, "{}/", self.entity)?;
        }
        if !self.collection.is_empty() {
            write!(f, "{}/", self.collection)?;
        }
        write!(f, "{}:{}", self.container, self.tags.join(","))
    }
}
