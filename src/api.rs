// API client module: a small blocking HTTP client for the RobotEvents v2
// API. Every call is a single GET; the response body is returned as an
// untyped JSON value and interpreted later by the renderer.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use crate::endpoints::{Endpoint, PathParams};
use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://www.robotevents.com/api/v2";
pub const TOKEN_ENV: &str = "ROBOT_API_KEY";
pub const BASE_URL_ENV: &str = "ROBOTEVENTS_BASE_URL";
const TOKEN_FILE: &str = ".robotevents_token";

/// Query string pairs, sent in order.
pub type QueryParams = Vec<(String, String)>;

/// One fully specified call: which endpoint, what fills its placeholders
/// and what goes into the query string.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub endpoint: &'static Endpoint,
    pub path_params: PathParams,
    pub query: QueryParams,
}

impl Request {
    pub fn new(endpoint: &'static Endpoint) -> Self {
        Request {
            endpoint,
            path_params: PathParams::new(),
            query: QueryParams::new(),
        }
    }

    pub fn path_param(mut self, key: &str, value: impl ToString) -> Self {
        self.path_params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn query_param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Blocking client holding the reqwest client (with the auth headers
/// baked in) and the API base URL.
#[derive(Clone)]
pub struct RobotEventsClient {
    client: Client,
    base_url: String,
}

impl RobotEventsClient {
    /// Build a client from `ROBOT_API_KEY` (or `~/.robotevents_token`) and
    /// `ROBOTEVENTS_BASE_URL`, falling back to the public API.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(load_token);
        Self::new(base_url, token.as_deref())
    }

    pub fn new(base_url: impl Into<String>, token: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .default_headers(default_headers(token)?)
            .build()?;
        Ok(RobotEventsClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `endpoint` against the base URL and GET it.
    ///
    /// Returns `Ok(None)` when the request never got an answer (connection
    /// refused, DNS, timeout); the failure is logged. A request that could
    /// not be built (bad base URL) is an [`Error::Http`], a non-success
    /// status is an [`Error::Status`].
    pub fn fetch(
        &self,
        endpoint: &Endpoint,
        path_params: &PathParams,
        query: &[(String, String)],
    ) -> Result<Option<Value>> {
        let url = format!("{}{}", self.base_url, endpoint.resolve(path_params)?);
        debug!(%url, ?query, "GET");

        let res = match self.client.get(&url).query(query).send() {
            Ok(res) => res,
            Err(e) if e.is_builder() => return Err(Error::Http(e)),
            Err(e) => {
                error!(%url, "request failed: {}", e);
                return Ok(None);
            }
        };

        let status = res.status();
        info!(%url, status = status.as_u16(), "response");
        let body = match res.text() {
            Ok(body) => body,
            Err(e) => {
                error!(%url, "reading response body failed: {}", e);
                return Ok(None);
            }
        };

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let value =
            serde_json::from_str(&body).map_err(|source| Error::Decode { url, source })?;
        Ok(Some(value))
    }

    pub fn fetch_request(&self, req: &Request) -> Result<Option<Value>> {
        self.fetch(req.endpoint, &req.path_params, &req.query)
    }
}

fn default_headers(token: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    match token {
        Some(t) => {
            let mut val = HeaderValue::from_str(&format!("Bearer {}", t.trim()))?;
            val.set_sensitive(true);
            headers.insert(AUTHORIZATION, val);
        }
        None => warn!(
            "no API token found in {} or ~/{}; requests are unauthenticated",
            TOKEN_ENV, TOKEN_FILE
        ),
    }
    Ok(headers)
}

/// Load the token from the user's home directory file, if present.
fn load_token() -> Option<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let data = std::fs::read_to_string(dir.join(TOKEN_FILE)).ok()?;
    data.lines()
        .next()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
}
