use bytes::Bytes;
use reqwest::{header, Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{Envelope, RemoteError};

const DEFAULT_USER_AGENT: &str = concat!("libraryclient/", env!("CARGO_PKG_VERSION"));

/// A client for a library registry.
///
/// Holds no state besides its configuration; every call is a fresh round trip.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    auth_token: Option<String>,
    client: ReqwestClient,
}

impl Client {
    /// Create a new client from the given configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;

        let user_agent = config
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut builder = ReqwestClient::builder().user_agent(user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(ClientError::HttpClient)?;

        Ok(Self {
            base_url,
            auth_token: config.auth_token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Resolve `path` below the base URL's own path and attach the query verbatim
    fn new_request(&self, method: Method, path: &str, raw_query: Option<&str>) -> RequestBuilder {
        let mut url = self.base_url.clone();
        let full_path = format!("{}{}", self.base_url.path().trim_end_matches('/'), path);
        url.set_path(&full_path);
        url.set_query(raw_query);

        let mut request = self.client.request(method, url);

        if let Some(token) = &self.auth_token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        request
    }

    /// Fetch the raw body at `path`, which may carry a query string.
    ///
    /// Returns `Ok(None)` when the registry answers 404. Any status other than
    /// 200 or 404 is an error, using the registry's error payload when it sent one.
    pub async fn api_get(&self, path: &str) -> Result<Option<Bytes>> {
        debug!("api_get calling {}", path);

        // Split path and raw query apart
        let url = self.base_url.join(path)?;

        let response = self
            .new_request(Method::GET, url.path(), url.query())
            .send()
            .await
            .map_err(ClientError::Request)?;

        match response.status() {
            StatusCode::OK => Ok(Some(read_body(response).await?)),
            StatusCode::NOT_FOUND => {
                drain(response).await;
                Ok(None)
            }
            _ => Err(rejection("get", response).await),
        }
    }

    /// POST `object` as JSON to `path` and return the raw response body.
    ///
    /// Both 200 and 201 count as success.
    pub async fn api_create<T>(&self, path: &str, object: &T) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        debug!("api_create calling {}", path);
        self.post_json(path, object, "creation", &[StatusCode::OK, StatusCode::CREATED])
            .await
    }

    /// GET `path`, accepting nothing but 200.
    pub(crate) async fn api_fetch(&self, path: &str, operation: &'static str) -> Result<Bytes> {
        debug!("{} calling {}", operation, path);

        let response = self
            .new_request(Method::GET, path, None)
            .send()
            .await
            .map_err(ClientError::Request)?;

        if response.status() != StatusCode::OK {
            return Err(rejection(operation, response).await);
        }
        read_body(response).await
    }

    /// POST `object` to `path`, accepting nothing but 200.
    pub(crate) async fn api_post<T>(
        &self,
        path: &str,
        object: &T,
        operation: &'static str,
    ) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        debug!("{} calling {}", operation, path);
        self.post_json(path, object, operation, &[StatusCode::OK]).await
    }

    async fn post_json<T>(
        &self,
        path: &str,
        object: &T,
        operation: &'static str,
        accepted: &[StatusCode],
    ) -> Result<Bytes>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(object).map_err(ClientError::Encode)?;

        let response = self
            .new_request(Method::POST, path, None)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(ClientError::Request)?;

        if !accepted.contains(&response.status()) {
            return Err(rejection(operation, response).await);
        }
        read_body(response).await
    }
}

/// Unwrap the `data` field of an enveloped JSON body.
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &[u8], kind: &'static str) -> Result<T> {
    serde_json::from_slice::<Envelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|source| ClientError::Decode { kind, source })
}

async fn read_body(response: Response) -> Result<Bytes> {
    response.bytes().await.map_err(ClientError::ReadBody)
}

// Consume the rest of the body so the connection can go back to the pool
async fn drain(response: Response) {
    let _ = response.bytes().await;
}

async fn rejection(operation: &'static str, response: Response) -> ClientError {
    let status = response.status();
    let remote = response
        .bytes()
        .await
        .ok()
        .and_then(|body| RemoteError::from_body(&body));

    match remote {
        Some(error) => ClientError::Remote { operation, error },
        None => ClientError::UnexpectedStatus { operation, status },
    }
}
