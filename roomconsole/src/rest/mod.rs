pub mod endpoints;

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, AUTHORIZATION};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};

/// HTTP client wrapper for the console REST API.
#[derive(Debug, Clone)]
pub struct ConsoleHttpClient {
    client: Client,
    base_url: String,
}

/// Error payload shared by all non-success responses.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    new_model: Option<serde_json::Value>,
}

impl ConsoleHttpClient {
    pub fn new(config: &ConsoleConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}"))?,
            );
        }
        if let Some(locale) = &config.locale {
            headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_str(locale)?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", config.base_url, config.api_prefix),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON resource.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T> {
        debug!(method = "GET", path, ?query, "request");
        let req = self.client.get(self.url(path)).query(query);
        self.send_json(req, path).await
    }

    /// POST a JSON body, decoding a JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(method = "POST", path, "request");
        let req = self.client.post(self.url(path)).json(body);
        self.send_json(req, path).await
    }

    /// PUT a JSON body, decoding a JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!(method = "PUT", path, "request");
        let req = self.client.put(self.url(path)).json(body);
        self.send_json(req, path).await
    }

    /// POST without a body, for control endpoints whose response is ignored.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        debug!(method = "POST", path, "request");
        let req = self.client.post(self.url(path));
        self.send(req, path).await.map(|_| ())
    }

    /// DELETE a resource. A JSON body may carry the concurrency token.
    pub async fn delete(&self, path: &str, body: Option<&serde_json::Value>) -> Result<()> {
        debug!(method = "DELETE", path, "request");
        let mut req = self.client.delete(self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req, path).await.map(|_| ())
    }

    /// POST a multipart form, decoding a JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        debug!(method = "POST", path, "multipart request");
        let req = self.client.post(self.url(path)).multipart(form);
        self.send_json(req, path).await
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> Result<T> {
        let resp = self.send(req, path).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send(&self, req: RequestBuilder, path: &str) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        debug!(path, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(resp);
        }

        let err = map_error(status, resp).await;
        warn!(path, status = status.as_u16(), error = %err, "request failed");
        Err(err)
    }

    /// Get the API base URL (base URL plus API prefix).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Translate a non-success response into the console error taxonomy.
async fn map_error(status: StatusCode, resp: Response) -> ConsoleError {
    let text = resp.text().await.unwrap_or_default();
    let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
    let message = if body.message.is_empty() {
        text
    } else {
        body.message
    };

    match status.as_u16() {
        401 => ConsoleError::Unauthorized,
        403 => ConsoleError::Forbidden { message },
        404 => ConsoleError::NotFound { message },
        422 => ConsoleError::Validation {
            message,
            errors: body.errors,
        },
        428 => match body.new_model {
            Some(new_model) => ConsoleError::Conflict { message, new_model },
            // A 428 without a fresher copy gives nothing to reconcile against.
            None => ConsoleError::Server {
                status: 428,
                message,
            },
        },
        code => ConsoleError::Server {
            status: code,
            message,
        },
    }
}
