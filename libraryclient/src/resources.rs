use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::client::{decode_envelope, Client};
use crate::error::Result;
use crate::models::{Collection, Container, Entity, Image};
use crate::object_id::ObjectId;

/// Description used for records created without one.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// A record kind served under `/v1/<PATH>`.
pub trait Resource: Serialize + DeserializeOwned {
    /// Plural path segment, e.g. `entities`
    const PATH: &'static str;
    /// Name used in decode errors
    const KIND: &'static str;
}

impl Resource for Entity {
    const PATH: &'static str = "entities";
    const KIND: &'static str = "entity";
}

impl Resource for Collection {
    const PATH: &'static str = "collections";
    const KIND: &'static str = "collection";
}

impl Resource for Container {
    const PATH: &'static str = "containers";
    const KIND: &'static str = "container";
}

impl Resource for Image {
    const PATH: &'static str = "images";
    const KIND: &'static str = "image";
}

impl Client {
    /// Look up a record by reference or identifier; `Ok(None)` if it does not exist.
    pub async fn get<R: Resource>(&self, reference: &str) -> Result<Option<R>> {
        let path = format!("/v1/{}/{}", R::PATH, reference);
        match self.api_get(&path).await? {
            Some(body) => decode_envelope(&body, R::KIND).map(Some),
            None => Ok(None),
        }
    }

    /// Create a record and return it as stored by the registry.
    pub async fn create<R: Resource>(&self, record: &R) -> Result<R> {
        let path = format!("/v1/{}", R::PATH);
        let body = self.api_create(&path, record).await?;
        decode_envelope(&body, R::KIND)
    }

    pub async fn get_entity(&self, entity_ref: &str) -> Result<Option<Entity>> {
        self.get(entity_ref).await
    }

    pub async fn get_collection(&self, collection_ref: &str) -> Result<Option<Collection>> {
        self.get(collection_ref).await
    }

    pub async fn get_container(&self, container_ref: &str) -> Result<Option<Container>> {
        self.get(container_ref).await
    }

    pub async fn get_image(&self, image_ref: &str) -> Result<Option<Image>> {
        self.get(image_ref).await
    }

    /// Create an entity; requires a token allowed to do so.
    #[instrument(skip(self))]
    pub async fn create_entity(&self, name: &str) -> Result<Entity> {
        let entity = Entity {
            name: name.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            ..Default::default()
        };
        self.create(&entity).await
    }

    #[instrument(skip(self))]
    pub async fn create_collection(&self, name: &str, entity_id: &str) -> Result<Collection> {
        let entity: ObjectId = entity_id.parse()?;
        let collection = Collection {
            name: name.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            entity: entity.to_hex(),
            ..Default::default()
        };
        self.create(&collection).await
    }

    #[instrument(skip(self))]
    pub async fn create_container(&self, name: &str, collection_id: &str) -> Result<Container> {
        let collection: ObjectId = collection_id.parse()?;
        let container = Container {
            name: name.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            collection: collection.to_hex(),
            ..Default::default()
        };
        self.create(&container).await
    }

    #[instrument(skip(self))]
    pub async fn create_image(
        &self,
        hash: &str,
        container_id: &str,
        description: Option<&str>,
    ) -> Result<Image> {
        let container: ObjectId = container_id.parse()?;
        let image = Image {
            hash: hash.to_string(),
            description: description.unwrap_or(DEFAULT_DESCRIPTION).to_string(),
            container: container.to_hex(),
            ..Default::default()
        };
        self.create(&image).await
    }
}
