// Error types shared by the registry, the dispatcher and the renderer.
// The binary and the interactive layer wrap these in `anyhow`.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    #[error("Missing required path parameter `{parameter}` for endpoint `{endpoint}`")]
    MissingParameter { endpoint: String, parameter: String },

    #[error("Malformed URL template `{template}`: {message}")]
    Template { template: String, message: String },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status { status: u16, url: String, body: String },

    #[error("Response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("API token cannot be used as a header value: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn missing_parameter(endpoint: &str, parameter: &str) -> Self {
        Self::MissingParameter {
            endpoint: endpoint.to_string(),
            parameter: parameter.to_string(),
        }
    }

    pub fn template(template: &str, message: impl ToString) -> Self {
        Self::Template {
            template: template.to_string(),
            message: message.to_string(),
        }
    }

    /// True for errors that come from the upstream answering with a
    /// non-success status.
    pub fn is_status(&self) -> bool {
        matches!(self, Self::Status { .. })
    }
}
