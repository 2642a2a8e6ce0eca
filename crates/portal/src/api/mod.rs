//! Laundry REST API client.
//!
//! One configured [`ApiClient`] is created at startup and shared through
//! `AppState`. [`ApiClient::with_token`] derives the authenticated variant for
//! a signed-in user; both variants share the same connection pool.
//!
//! # Wire format
//!
//! - Success bodies are either `{ "data": ..., "meta": ... }` envelopes or a
//!   raw payload; [`decode_data`] accepts both.
//! - Error bodies are `{ "message": "..." }` with a non-2xx status.

mod error;
pub mod types;

pub use error::{ApiError, ApiErrorKind, GENERIC_ERROR_MESSAGE};

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::ApiConfig;

/// Client for the laundry REST API.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
    token: Option<SecretString>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create the anonymous client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::transport(config.base_url.as_str(), &e))?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                api_key: config.api_key.clone(),
            }),
            token: None,
        })
    }

    /// Authenticated variant that sends `Authorization: Bearer <token>`.
    #[must_use]
    pub fn with_token(&self, token: SecretString) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            token: Some(token),
        }
    }

    /// Whether requests carry a user token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `GET path?params` returning the raw JSON body.
    ///
    /// `params` must serialize to a flat object; `null` fields are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or invalid JSON.
    pub async fn get_json<P>(&self, path: &str, params: &P) -> Result<Value, ApiError>
    where
        P: Serialize + ?Sized,
    {
        let query = query_pairs(path, params)?;
        self.execute(Method::GET, path, &query, None).await
    }

    /// `GET path?params` decoded into `T` (envelope or raw).
    ///
    /// # Errors
    ///
    /// See [`ApiClient::get_json`].
    pub async fn get<T, P>(&self, path: &str, params: &P) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let value = self.get_json(path, params).await?;
        decode_data(path, value)
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or invalid JSON.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, Some(body)).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or invalid JSON.
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::PATCH, path, Some(body)).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status or invalid JSON.
    pub async fn delete<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.send::<T, Value>(Method::DELETE, path, None).await
    }

    /// Check that the API answers at all (any HTTP status counts).
    ///
    /// # Errors
    ///
    /// Returns an error if no response arrives.
    pub async fn ping(&self) -> Result<StatusCode, ApiError> {
        let url = self.url("")?;
        self.inner
            .client
            .get(url)
            .send()
            .await
            .map(|response| response.status())
            .map_err(|e| ApiError::transport("/", &e))
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| ApiError::decode(path, e))?;
        let value = self.execute(method, path, &[], body).await?;
        decode_data(path, value)
    }

    #[instrument(skip(self, query, body), fields(authenticated = self.token.is_some()))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let mut url = self.url(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let mut request = self.inner.client.request(method, url);

        if let Some(key) = &self.inner.api_key {
            request = request.header("x-api-key", key.expose_secret());
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(path, &e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(path, &e))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message);
            warn!(status = status.as_u16(), ?message, "API request rejected");
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), bytes = bytes.len(), "API request succeeded");

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::decode(path, e))
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ApiError::InvalidPath(path.to_string()))
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Decode a response body into `T`, unwrapping a `{ data }` envelope when
/// present.
///
/// Paginated types that need `meta` deserialize from the whole envelope, so
/// the body is only unwrapped when `T` does not accept it as-is.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if neither shape fits.
pub fn decode_data<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => Ok(decoded),
        Err(whole_err) => match value {
            Value::Object(mut map) if map.contains_key("data") => {
                let data = map.remove("data").unwrap_or(Value::Null);
                serde_json::from_value(data).map_err(|e| ApiError::decode(path, e))
            }
            _ => Err(ApiError::decode(path, whole_err)),
        },
    }
}

/// Flatten a parameter struct into query pairs.
fn query_pairs<P: Serialize + ?Sized>(
    path: &str,
    params: &P,
) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(params).map_err(|e| ApiError::decode(path, e))?;
    let map = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Object(map) => map,
        other => {
            return Err(ApiError::decode(
                path,
                format!("query parameters must be an object, got {other}"),
            ));
        }
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Params {
        page: u32,
        outlet_id: Option<i32>,
        search: Option<String>,
    }

    #[test]
    fn test_query_pairs_skip_nulls() {
        let pairs = query_pairs(
            "/orders",
            &Params {
                page: 2,
                outlet_id: None,
                search: Some("kemeja".into()),
            },
        )
        .unwrap();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("search".to_string(), "kemeja".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_pairs_unit_params() {
        assert!(query_pairs("/items", &()).unwrap().is_empty());
        assert!(query_pairs("/items", &[1, 2]).is_err());
    }

    #[test]
    fn test_decode_data_unwraps_envelope() {
        #[derive(serde::Deserialize)]
        struct Item {
            name: String,
        }
        let item: Item =
            decode_data("/items/1", serde_json::json!({ "data": { "name": "Kemeja" } })).unwrap();
        assert_eq!(item.name, "Kemeja");

        let raw: Item = decode_data("/items/1", serde_json::json!({ "name": "Celana" })).unwrap();
        assert_eq!(raw.name, "Celana");
    }

    #[test]
    fn test_decode_data_reports_mismatch() {
        let err = decode_data::<u32>("/x", serde_json::json!({ "nope": true })).unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Decode);
    }

    #[test]
    fn test_url_join_keeps_base_path() {
        let config = ApiConfig::new("http://localhost:8000/api").unwrap();
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(
            client.url("/orders/confirm/abc").unwrap().as_str(),
            "http://localhost:8000/api/orders/confirm/abc"
        );
    }
}
