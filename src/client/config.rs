//! Configuration and query types for the blog clients

use std::{fmt, path::PathBuf, str::FromStr, time::Duration};

use compact_str::{CompactString, ToCompactString, format_compact};

use super::error::{ClientError, Result};
use crate::config::RuoConfig;

pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// GitHub caps `per_page` at 100
pub const MAX_PAGE_SIZE: u32 = 100;
pub const INSPIRATION_LABEL: &str = "inspiration";

/// Main configuration for the GitHub and LeanCloud clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GitHub REST base URL
    pub base_url: CompactString,
    /// GitHub GraphQL endpoint
    pub graphql_url: CompactString,
    /// Owner of the blog repository
    pub owner: CompactString,
    /// Repository holding the posts as issues
    pub repository: CompactString,
    /// Personal access token
    pub private_token: CompactString,
    pub token_placement: TokenPlacement,
    pub leancloud: LeanCloudCredentials,
    /// Public URL of the site, stored on new counters
    pub site_url: CompactString,
    pub environment: Environment,
    pub request: RequestConfig,
    pub debug: DebugConfig,
}

/// Credentials and server of the LeanCloud application
#[derive(Debug, Clone, Default)]
pub struct LeanCloudCredentials {
    pub app_id: CompactString,
    pub app_key: CompactString,
    /// API server; derived from the app id when not configured
    pub server_url: CompactString,
}

/// Where the GitHub token is sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenPlacement {
    /// `Authorization: token ...` header
    #[default]
    Header,
    /// Legacy `access_token` query parameter
    Query,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    /// Local preview; counters are never touched
    Development,
}

/// HTTP request configuration
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Default number of items per page
    pub page_size: u32,
    pub timeout: Duration,
}

/// Debug and logging configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    /// Dump raw response bodies to disk
    pub log_responses: bool,
    pub log_directory: Option<PathBuf>,
}

/// Page of a paginated listing, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

/// Query parameters for listing posts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub pagination: Pagination,
    pub filter: Option<PostFilter>,
}

/// Restricts a post listing to one tag or one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    Label(CompactString),
    /// Milestone number
    Milestone(u64),
}

/// Filter for the archive count query; milestones are matched by title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveFilter {
    pub label: Option<CompactString>,
    pub milestone: Option<CompactString>,
}

/// Standalone pages stored as closed issues with a marker label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Book,
    Friend,
    About,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_responses: false,
            log_directory: Some(PathBuf::from("ruo-logs")),
        }
    }
}

impl Environment {
    /// Detect the environment from the public site URL.
    ///
    /// Hosts starting with `192.168` or `localhost` are development previews.
    pub fn from_site_url(site_url: &str) -> Self {
        // `localhost:8080` parses as a URL with scheme `localhost`, treat it as a bare host
        let host = match url::Url::parse(site_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                url.host_str().map(|h| h.to_compact_string())
            },
            _ => Some(site_url.to_compact_string()),
        };

        match host {
            Some(host) if is_dev_host(&host) => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

pub fn is_dev_host(host: &str) -> bool {
    host.starts_with("192.168") || host.starts_with("localhost")
}

impl LeanCloudCredentials {
    pub fn new(
        app_id: impl Into<CompactString>,
        app_key: impl Into<CompactString>,
        server_url: Option<CompactString>,
    ) -> Self {
        let app_id = app_id.into();
        let server_url = server_url
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| leancloud_server_url(&app_id));

        Self {
            app_id,
            app_key: app_key.into(),
            server_url,
        }
    }
}

/// Derive the shared API domain of a LeanCloud app from its id
pub fn leancloud_server_url(app_id: &str) -> CompactString {
    let prefix: CompactString = app_id.chars().take(8).collect::<String>().to_lowercase().into();

    match app_id.rsplit_once('-').map(|(_, suffix)| suffix) {
        Some("MdYXbMMI") => format_compact!("https://{}.api.lncldglobal.com", prefix),
        Some("9Nh9j0Va") => format_compact!("https://{}.lc-cn-e1-shared.com", prefix),
        _ => format_compact!("https://{}.lc-cn-n1-shared.com", prefix),
    }
}

/// Upper-case the first character unless it is whitespace
pub fn capitalize_first(value: &str) -> CompactString {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if !first.is_whitespace() => {
            let mut out: CompactString = first.to_uppercase().collect();
            out.push_str(chars.as_str());
            out
        },
        _ => value.into(),
    }
}

impl ClientConfig {
    /// Create a new client configuration for `owner/repository`
    pub fn new(
        owner: impl Into<CompactString>,
        repository: impl Into<CompactString>,
        private_token: impl Into<CompactString>,
    ) -> Self {
        Self {
            base_url: GITHUB_API_URL.into(),
            graphql_url: format_compact!("{}/graphql", GITHUB_API_URL),
            owner: owner.into(),
            repository: repository.into(),
            private_token: private_token.into(),
            token_placement: TokenPlacement::default(),
            leancloud: LeanCloudCredentials::default(),
            site_url: CompactString::default(),
            environment: Environment::default(),
            request: RequestConfig::default(),
            debug: DebugConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("github_url", &self.base_url), ("graphql_url", &self.graphql_url)] {
            if value.is_empty() {
                return Err(ClientError::config_validation(field, "URL cannot be empty"));
            }
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ClientError::config_validation(
                    field,
                    "URL must start with http:// or https://",
                ));
            }
            if url::Url::parse(value).is_err() {
                return Err(ClientError::config_validation(
                    field,
                    "URL is not a valid URL format",
                ));
            }
        }

        if self.owner.is_empty() {
            return Err(ClientError::config_validation(
                "username",
                "GitHub username cannot be empty",
            ));
        }

        if self.repository.is_empty() {
            return Err(ClientError::config_validation(
                "repository",
                "Repository cannot be empty",
            ));
        }

        if self.private_token.is_empty() {
            return Err(ClientError::config_validation(
                "token",
                "GitHub token cannot be empty",
            ));
        }

        if self.request.page_size == 0 || self.request.page_size > MAX_PAGE_SIZE {
            return Err(ClientError::config_validation(
                "page_size",
                "page_size must be between 1 and 100",
            ));
        }

        if self.request.timeout.is_zero() {
            return Err(ClientError::config_validation(
                "timeout",
                "Timeout must be greater than zero",
            ));
        }

        // Counters are skipped entirely in development, credentials may be blank
        if !self.environment.is_development() {
            if self.leancloud.app_id.is_empty() || self.leancloud.app_key.is_empty() {
                return Err(ClientError::config_validation(
                    "leancloud",
                    "LeanCloud appId and appKey are required",
                ));
            }
            if url::Url::parse(&self.leancloud.server_url).is_err() {
                return Err(ClientError::config_validation(
                    "leancloud.server_url",
                    "LeanCloud server URL is not a valid URL format",
                ));
            }
        }

        Ok(())
    }

    /// Create default post query with config values
    pub fn default_post_query(&self) -> PostQuery {
        PostQuery {
            pagination: self.default_pagination(),
            filter: None,
        }
    }

    pub fn default_pagination(&self) -> Pagination {
        Pagination {
            page: 1,
            page_size: self.request.page_size,
        }
    }
}

impl From<&RuoConfig> for ClientConfig {
    fn from(config: &RuoConfig) -> Self {
        let base_url = config.github_url.trim_end_matches('/');
        Self {
            base_url: base_url.into(),
            graphql_url: format_compact!("{}/graphql", base_url),
            leancloud: LeanCloudCredentials::new(
                config.leancloud.app_id.clone(),
                config.leancloud.app_key.clone(),
                config.leancloud.server_url.clone(),
            ),
            site_url: config.site_url.clone(),
            environment: Environment::from_site_url(&config.site_url),
            ..Self::new(
                config.username.clone(),
                config.repository.clone(),
                config.token.reveal(),
            )
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<CompactString>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_graphql_url(mut self, graphql_url: impl Into<CompactString>) -> Self {
        self.graphql_url = graphql_url.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<CompactString>) -> Self {
        self.private_token = token.into();
        self
    }

    pub fn with_token_placement(mut self, placement: TokenPlacement) -> Self {
        self.token_placement = placement;
        self
    }

    pub fn with_leancloud(mut self, leancloud: LeanCloudCredentials) -> Self {
        self.leancloud = leancloud;
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<CompactString>) -> Self {
        self.site_url = site_url.into();
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_request(mut self, request: RequestConfig) -> Self {
        self.request = request;
        self
    }

    /// Enable dumping of response bodies
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug.log_responses = enabled;
        self
    }
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }
}

impl PostQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.pagination.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.pagination.page_size = page_size;
        self
    }

    pub fn with_filter(mut self, filter: Option<PostFilter>) -> Self {
        self.filter = filter;
        self
    }
}

impl ArchiveFilter {
    pub fn label(label: impl Into<CompactString>) -> Self {
        Self {
            label: Some(label.into()),
            milestone: None,
        }
    }

    pub fn milestone(milestone: impl Into<CompactString>) -> Self {
        Self {
            label: None,
            milestone: Some(milestone.into()),
        }
    }
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Book, PageKind::Friend, PageKind::About];

    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Book => "book",
            PageKind::Friend => "friend",
            PageKind::About => "about",
        }
    }

    /// Label carried by the issue holding this page
    pub fn label(self) -> CompactString {
        capitalize_first(self.as_str())
    }
}

impl FromStr for PageKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "book" | "books" => Ok(PageKind::Book),
            "friend" | "friends" => Ok(PageKind::Friend),
            "about" => Ok(PageKind::About),
            other => Err(ClientError::config(format_compact!(
                "unknown page kind: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ClientConfig {
        ClientConfig::new("chanshiyucx", "blog", "0ad1a0539c5b96fd18faaaafba9c7d1362a5746c")
            .with_leancloud(LeanCloudCredentials::new(
                "LjOwR4ELEqbauKvtQbwq5TUw-MdYXbMMI",
                "key",
                None,
            ))
            .with_site_url("https://blog.example.com")
    }

    #[test]
    fn detects_development_hosts() {
        assert_eq!(
            Environment::from_site_url("http://localhost:8080/#/"),
            Environment::Development
        );
        assert_eq!(
            Environment::from_site_url("http://192.168.1.20:8080"),
            Environment::Development
        );
        assert_eq!(
            Environment::from_site_url("https://blog.example.com"),
            Environment::Production
        );
        assert_eq!(Environment::from_site_url(""), Environment::Production);
    }

    #[test]
    fn bare_host_with_port_is_development() {
        assert_eq!(
            Environment::from_site_url("localhost:8080"),
            Environment::Development
        );
        assert_eq!(
            Environment::from_site_url("192.168.1.5:8080"),
            Environment::Development
        );
        assert_eq!(
            Environment::from_site_url("blog.example.com:443"),
            Environment::Production
        );
    }

    #[test]
    fn bare_host_is_accepted() {
        assert!(Environment::from_site_url("localhost").is_development());
    }

    #[test]
    fn capitalizes_first_character_only() {
        assert_eq!(capitalize_first("book"), "Book");
        assert_eq!(capitalize_first("friend links"), "Friend links");
        assert_eq!(capitalize_first(" about"), " about");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("Book"), "Book");
    }

    #[test]
    fn page_kind_labels() {
        assert_eq!(PageKind::Book.label(), "Book");
        assert_eq!(PageKind::Friend.label(), "Friend");
        assert_eq!("About".parse::<PageKind>().unwrap(), PageKind::About);
        assert!("nope".parse::<PageKind>().is_err());
    }

    #[test]
    fn derives_leancloud_server_from_app_id() {
        assert_eq!(
            leancloud_server_url("LjOwR4ELEqbauKvtQbwq5TUw-MdYXbMMI"),
            "https://ljowr4el.api.lncldglobal.com"
        );
        assert_eq!(
            leancloud_server_url("AbCdEfGhIjKl-9Nh9j0Va"),
            "https://abcdefgh.lc-cn-e1-shared.com"
        );
        assert_eq!(
            leancloud_server_url("AbCdEfGhIjKl-gzGzoHsz"),
            "https://abcdefgh.lc-cn-n1-shared.com"
        );
    }

    #[test]
    fn explicit_leancloud_server_wins() {
        let creds = LeanCloudCredentials::new("id-MdYXbMMI", "key", Some("http://127.0.0.1:9".into()));
        assert_eq!(creds.server_url, "http://127.0.0.1:9");
    }

    #[test]
    fn default_pagination_is_first_page_of_ten() {
        let query = PostQuery::new();
        assert_eq!(query.pagination, Pagination::new(1, 10));
        assert_eq!(query.filter, None);
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_token() {
        let err = valid_config().with_token("").validate().unwrap_err();
        assert!(matches!(err, ClientError::ConfigValidation { ref field, .. } if field.as_str() == "token"));
    }

    #[test]
    fn validate_rejects_bad_page_size() {
        let config = valid_config().with_request(RequestConfig {
            page_size: 101,
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_requires_leancloud_only_in_production() {
        let config = valid_config().with_leancloud(LeanCloudCredentials::default());
        assert!(config.validate().is_err());

        let config = config.with_environment(Environment::Development);
        assert!(config.validate().is_ok());
    }
}
