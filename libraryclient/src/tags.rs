use tracing::{info, instrument, warn};

use crate::client::{decode_envelope, Client};
use crate::error::Result;
use crate::models::{ImageTag, TagMap};
use crate::object_id::ObjectId;

impl Client {
    /// Current tags of a container.
    pub async fn get_tags(&self, container_id: &str) -> Result<TagMap> {
        let path = format!("/v1/tags/{}", container_id);
        let body = self.api_fetch(&path, "tag lookup").await?;
        decode_envelope(&body, "tags")
    }

    /// Point one tag of a container at an image.
    pub async fn set_tag(&self, container_id: &str, tag: &ImageTag) -> Result<()> {
        let path = format!("/v1/tags/{}", container_id);
        self.api_post(&path, tag, "tag update").await?;
        Ok(())
    }

    /// Point each of `tags` at `image_id`, in order.
    ///
    /// Existing tags are overwritten with a warning. Stops at the first tag
    /// the registry refuses; tags set before it stay set.
    #[instrument(skip(self, tags))]
    pub async fn set_tags<S: AsRef<str>>(
        &self,
        container_id: &str,
        image_id: &str,
        tags: &[S],
    ) -> Result<()> {
        let image: ObjectId = image_id.parse()?;

        let existing = self.get_tags(container_id).await?;

        for tag in tags {
            let tag = tag.as_ref();
            info!("Setting tag {}", tag);

            if existing.contains_key(tag) {
                warn!("{} replaces an existing tag", tag);
            }

            let image_tag = ImageTag {
                tag: tag.to_string(),
                image_id: image.to_hex(),
            };
            self.set_tag(container_id, &image_tag).await?;
        }
        Ok(())
    }
}
