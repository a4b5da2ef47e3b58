//! Error types for the blog API clients

use compact_str::CompactString;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to parse response from {endpoint}: {message}")]
    JsonParse {
        endpoint: CompactString,
        message: CompactString,
        #[source]
        source: serde_json::Error,
    },

    #[error("GitHub API error: {message}")]
    GithubApi { message: CompactString },

    #[error("GitHub GraphQL error: {message}")]
    GraphQl { message: CompactString },

    #[error("LeanCloud error {code}: {message}")]
    LeanCloud { code: i64, message: CompactString },

    #[error("Authentication failed")]
    Authentication,

    #[error("Not found: {resource}")]
    NotFound { resource: CompactString },

    #[error("Rate limit exceeded")]
    RateLimit { reset: Option<u64> },

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: CompactString },

    #[error("Configuration error: {0}")]
    Config(CompactString),

    #[error("Invalid configuration for {field}: {message}")]
    ConfigValidation {
        field: CompactString,
        message: CompactString,
    },
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Http(e)
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl {
            url: e.to_string().into(),
        }
    }
}

impl ClientError {
    pub fn json_parse(
        endpoint: impl Into<CompactString>,
        message: impl Into<CompactString>,
        source: serde_json::Error,
    ) -> Self {
        Self::JsonParse {
            endpoint: endpoint.into(),
            message: message.into(),
            source,
        }
    }

    pub fn github_api(message: impl Into<CompactString>) -> Self {
        Self::GithubApi {
            message: message.into(),
        }
    }

    pub fn graphql(message: impl Into<CompactString>) -> Self {
        Self::GraphQl {
            message: message.into(),
        }
    }

    pub fn leancloud(code: i64, message: impl Into<CompactString>) -> Self {
        Self::LeanCloud {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<CompactString>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn rate_limit(reset: Option<u64>) -> Self {
        Self::RateLimit { reset }
    }

    pub fn config(message: impl Into<CompactString>) -> Self {
        Self::Config(message.into())
    }

    pub fn config_validation(
        field: impl Into<CompactString>,
        message: impl Into<CompactString>,
    ) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for errors that mean "the resource is not there" rather than "the call failed"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
