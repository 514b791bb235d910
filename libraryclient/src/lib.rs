//! Client for the library registry API: entities, collections, containers,
//! images, tags and search.

pub mod client;
pub mod config;
pub mod error;
pub mod hash;
pub mod library_ref;
pub mod models;
pub mod object_id;
pub mod resources;
pub mod search;
pub mod tags;

// Re-export main client types for convenience
pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use hash::{image_file_hash, image_hash};
pub use library_ref::LibraryRef;
pub use models::{
    Collection, Container, Entity, Envelope, Image, ImageTag, RemoteError, SearchResults, TagMap,
};
pub use object_id::ObjectId;
pub use resources::{Resource, DEFAULT_DESCRIPTION};
