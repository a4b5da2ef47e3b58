//! HTTP client for the LeanCloud object store
//!
//! Only the handful of class operations the blog needs: conditional queries,
//! object creation and atomic increments.

use compact_str::{CompactString, format_compact};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    config::{ClientConfig, LeanCloudCredentials},
    error::{ClientError, Result},
};
use crate::{
    domain::{LeanCloudCreated, LeanCloudQueryResponse},
    id::ObjectId,
};

const API_VERSION: &str = "1.1";

/// LeanCloud error response format
#[derive(Debug, Deserialize)]
struct LeanCloudApiError {
    code: i64,
    error: CompactString,
}

/// Pure HTTP client for LeanCloud classes
#[derive(Debug)]
pub struct LeanCloudApi {
    client: Client,
    credentials: LeanCloudCredentials,
}

impl LeanCloudApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request.timeout)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            credentials: config.leancloud.clone(),
        })
    }

    /// Objects of `class` matching the `where` condition
    #[instrument(skip(self, condition), fields(condition = %condition))]
    pub async fn find<T>(&self, class: &str, condition: &Value, limit: Option<u32>) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut url = self.class_url(class, None)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("where", &condition.to_string());
            if let Some(limit) = limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        let response = self.request(Method::GET, url).send().await?;
        let found: LeanCloudQueryResponse<T> = self.handle_response(response).await?;
        debug!(class, result_count = found.results.len(), "LeanCloud query finished");
        Ok(found.results)
    }

    /// First object of `class` matching the `where` condition
    pub async fn first<T>(&self, class: &str, condition: &Value) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let results = self.find(class, condition, Some(1)).await?;
        Ok(results.into_iter().next())
    }

    /// Create a new object of `class`
    #[instrument(skip(self, object))]
    pub async fn create<B>(&self, class: &str, object: &B) -> Result<LeanCloudCreated>
    where
        B: Serialize + ?Sized,
    {
        let url = self.class_url(class, None)?;
        let response = self.request(Method::POST, url).json(object).send().await?;
        let created: LeanCloudCreated = self.handle_response(response).await?;
        debug!(class, object_id = %created.object_id, "LeanCloud object created");
        Ok(created)
    }

    /// Atomically add `amount` to a numeric field and return the stored value
    #[instrument(skip(self), fields(object_id = %object_id))]
    pub async fn increment(
        &self,
        class: &str,
        object_id: &ObjectId,
        field: &str,
        amount: i64,
    ) -> Result<u64> {
        let mut url = self.class_url(class, Some(object_id))?;
        url.query_pairs_mut().append_pair("fetchWhenSave", "true");

        let body = json!({ field: { "__op": "Increment", "amount": amount } });
        let response = self.request(Method::PUT, url).json(&body).send().await?;
        let saved: Value = self.handle_response(response).await?;

        saved.get(field).and_then(Value::as_u64).ok_or_else(|| {
            ClientError::leancloud(
                0,
                format_compact!("response to increment carried no numeric `{}`", field),
            )
        })
    }

    /// `{server}/1.1/classes/{class}[/{object_id}]`
    fn class_url(&self, class: &str, object_id: Option<&ObjectId>) -> Result<Url> {
        let mut url = Url::parse(&self.credentials.server_url)?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| ClientError::InvalidUrl {
                url: self.credentials.server_url.clone(),
            })?;
            segments.pop_if_empty().push(API_VERSION).push("classes").push(class);
            if let Some(object_id) = object_id {
                segments.push(object_id.as_str());
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("X-LC-Id", self.credentials.app_id.as_str())
            .header("X-LC-Key", self.credentials.app_key.as_str())
    }

    async fn handle_response<T>(&self, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                warn!(endpoint = %url_path, error = %e, "Failed to parse LeanCloud response");
                ClientError::json_parse(url_path, "Failed to parse response", e)
            });
        }

        match serde_json::from_str::<LeanCloudApiError>(&body) {
            Ok(api_error) => Err(ClientError::leancloud(api_error.code, api_error.error)),
            Err(_) => Err(ClientError::leancloud(
                i64::from(status.as_u16()),
                format_compact!("HTTP {}: {}", status.as_u16(), body),
            )),
        }
    }
}
