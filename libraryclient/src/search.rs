use url::form_urlencoded;

use crate::client::{decode_envelope, Client};
use crate::error::Result;
use crate::models::SearchResults;

impl Client {
    /// Search the library by name for matching entities, collections,
    /// containers and images.
    pub async fn search(&self, value: &str) -> Result<SearchResults> {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("value", value)
            .finish();
        let path = format!("/v1/search?{}", query);

        // A 404 leaves the body empty, which then fails to decode
        let body = self.api_get(&path).await?.unwrap_or_default();

        decode_envelope(&body, "results")
    }
}
