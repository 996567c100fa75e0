use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use crate::model::config::BackendConfig;

/// HTTP verbs the board uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

/// Status code plus decoded JSON body (`Null` for an empty body)
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub data: Value,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Error type for the HTTP helper. Non-2xx responses are not errors here;
/// they come back as a `Response` with that status.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("no backend URL configured (set backend.base_url or pass --base-url)")]
    NoBaseUrl,
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{method} {url} returned malformed JSON: {source}")]
    Decode {
        method: Method,
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Thin JSON-over-HTTP helper: `request(method, path, body) -> {status, data}`
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    path_suffix: String,
    client: Client,
}

impl HttpClient {
    pub fn new(config: &BackendConfig) -> Result<Self, HttpError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HttpError::NoBaseUrl);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(HttpError::Client)?;
        Ok(HttpClient {
            base_url,
            path_suffix: config.path_suffix.trim().to_string(),
            client,
        })
    }

    /// Full URL for a resource path. Leading and trailing slashes on the
    /// path are ignored so `/tasks/` and `tasks` address the same resource.
    pub fn url_for(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        format!("{}/{}{}", self.base_url, path, self.path_suffix)
    }

    pub fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, HttpError> {
        let url = self.url_for(path);
        let mut req = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(body) = body {
            req = req.json(body);
        }

        tracing::debug!(%method, %url, "request");
        let resp = req.send().map_err(|source| HttpError::Transport {
            method,
            url: url.clone(),
            source,
        })?;

        let status = resp.status().as_u16();
        let text = resp.text().map_err(|source| HttpError::Transport {
            method,
            url: url.clone(),
            source,
        })?;
        let data = decode_body(&text, (200..300).contains(&status)).map_err(|source| {
            HttpError::Decode {
                method,
                url: url.clone(),
                source,
            }
        })?;
        tracing::debug!(%method, %url, status, "response");
        Ok(Response { status, data })
    }
}

/// Empty bodies decode to `Null`. Error responses with a non-JSON body also
/// decode to `Null`; a success with a non-JSON body is an error.
fn decode_body(text: &str, success: bool) -> Result<Value, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(text) {
        Ok(v) => Ok(v),
        Err(_) if !success => Ok(Value::Null),
        Err(e) => Err(e),
    }
}
