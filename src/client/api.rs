//! Core HTTP client for the GitHub REST and GraphQL APIs

use chrono::Local;
use compact_str::{CompactString, format_compact};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header::HeaderMap};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{
    config::{
        ArchiveFilter, ClientConfig, INSPIRATION_LABEL, MAX_PAGE_SIZE, Pagination, PostFilter,
        PostQuery, TokenPlacement, capitalize_first,
    },
    documents::{self, GraphQlRequest},
    error::{ClientError, Result},
};
use crate::{
    domain::{GraphQlResponse, Issue, Label, Milestone, RepositoryIssuesData, SearchData},
    id::IssueNumber,
};

const USER_AGENT: &str = "ruo-blog-client";

/// Pure HTTP client for the blog repository on GitHub
#[derive(Debug)]
pub struct GithubApi {
    client: Client,
    config: ClientConfig,
}

/// GitHub API error response format
#[derive(Debug, Deserialize)]
struct GithubApiError {
    message: CompactString,
}

/// Issue state filter of the issues endpoint
#[derive(Debug, Clone, Copy)]
enum IssueStateFilter {
    Open,
    Closed,
}

impl IssueStateFilter {
    fn as_str(self) -> &'static str {
        match self {
            IssueStateFilter::Open => "open",
            IssueStateFilter::Closed => "closed",
        }
    }
}

impl GithubApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self { client, config })
    }

    /// Get current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// List published posts (open issues)
    #[instrument(skip(self), fields(page = query.pagination.page, per_page = query.pagination.page_size))]
    pub async fn get_posts(&self, query: &PostQuery) -> Result<Vec<Issue>> {
        let url = self.posts_url(query)?;
        let posts: Vec<Issue> = self.get_json(url).await?;
        debug!(post_count = posts.len(), "Successfully fetched posts");
        Ok(posts)
    }

    /// Get a single post by issue number
    #[instrument(skip(self), fields(number = %number))]
    pub async fn get_post(&self, number: IssueNumber) -> Result<Issue> {
        let url = self.repo_url(&["issues", &number.to_string()])?;
        self.get_json(url).await
    }

    /// List milestones, i.e. categories
    #[instrument(skip(self))]
    pub async fn get_milestones(&self) -> Result<Vec<Milestone>> {
        let url = self.repo_url(&["milestones"])?;
        self.get_json(url).await
    }

    /// List labels, i.e. tags
    #[instrument(skip(self))]
    pub async fn get_labels(&self) -> Result<Vec<Label>> {
        let url = self.labels_url()?;
        self.get_json(url).await
    }

    /// List inspiration entries (closed issues labelled `inspiration`)
    #[instrument(skip(self), fields(page = pagination.page, per_page = pagination.page_size))]
    pub async fn get_inspirations(&self, pagination: &Pagination) -> Result<Vec<Issue>> {
        let url = self.inspirations_url(pagination)?;
        self.get_json(url).await
    }

    /// Get the first closed issue carrying the capitalised `kind` label
    #[instrument(skip(self))]
    pub async fn get_page(&self, kind: &str) -> Result<Option<Issue>> {
        let url = self.page_url(kind)?;
        let issues: Vec<Issue> = self.get_json(url).await?;
        debug!(match_count = issues.len(), "Fetched page candidates");
        Ok(issues.into_iter().next())
    }

    /// Count of published posts
    #[instrument(skip(self))]
    pub async fn archives_count(&self) -> Result<u64> {
        let request = documents::archives_count(&self.config.owner, &self.config.repository);
        let data: RepositoryIssuesData = self.graphql(&request).await?;
        repository_total(data)
    }

    /// Count of inspiration entries
    #[instrument(skip(self))]
    pub async fn inspiration_count(&self) -> Result<u64> {
        let request = documents::inspiration_count(&self.config.owner, &self.config.repository);
        let data: RepositoryIssuesData = self.graphql(&request).await?;
        repository_total(data)
    }

    /// Count of published posts in a tag and/or category
    #[instrument(skip(self))]
    pub async fn filter_archives_count(&self, filter: &ArchiveFilter) -> Result<u64> {
        let request = documents::filter_archives_count(
            &self.config.owner,
            &self.config.repository,
            filter,
        );
        let data: SearchData = self.graphql(&request).await?;
        Ok(data.search.issue_count)
    }

    /// Build URL for the post listing
    pub fn posts_url(&self, query: &PostQuery) -> Result<Url> {
        let mut url = self.issues_url(IssueStateFilter::Open)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.pagination.page.to_string())
                .append_pair("per_page", &query.pagination.page_size.to_string());
            match &query.filter {
                Some(PostFilter::Label(label)) => {
                    pairs.append_pair("labels", label);
                },
                Some(PostFilter::Milestone(number)) => {
                    pairs.append_pair("milestone", &number.to_string());
                },
                None => {},
            }
        }
        Ok(url)
    }

    /// Build URL for the inspiration listing
    pub fn inspirations_url(&self, pagination: &Pagination) -> Result<Url> {
        let mut url = self.issues_url(IssueStateFilter::Closed)?;
        url.query_pairs_mut()
            .append_pair("labels", INSPIRATION_LABEL)
            .append_pair("page", &pagination.page.to_string())
            .append_pair("per_page", &pagination.page_size.to_string());
        Ok(url)
    }

    /// Build URL for a standalone page lookup
    pub fn page_url(&self, kind: &str) -> Result<Url> {
        let mut url = self.issues_url(IssueStateFilter::Closed)?;
        url.query_pairs_mut()
            .append_pair("labels", &capitalize_first(kind));
        Ok(url)
    }

    /// Build URL for the label listing
    pub fn labels_url(&self) -> Result<Url> {
        let mut url = self.repo_url(&["labels"])?;
        url.query_pairs_mut()
            .append_pair("page", "1")
            .append_pair("per_page", &MAX_PAGE_SIZE.to_string());
        Ok(url)
    }

    fn issues_url(&self, state: IssueStateFilter) -> Result<Url> {
        let mut url = self.repo_url(&["issues"])?;
        url.query_pairs_mut().append_pair("state", state.as_str());
        Ok(url)
    }

    /// `{base}/repos/{owner}/{repository}/{segments...}`
    fn repo_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.config.base_url.clone(),
            })?
            .pop_if_empty()
            .push("repos")
            .push(&self.config.owner)
            .push(&self.config.repository)
            .extend(segments);
        Ok(url)
    }

    /// Perform authenticated GET request and deserialize JSON response
    async fn get_json<T>(&self, url: Url) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let response = self.authenticated_request(Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    /// Run a GraphQL document and unwrap its `data`
    async fn graphql<T>(&self, request: &GraphQlRequest) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = Url::parse(&self.config.graphql_url)?;
        // GraphQL only accepts header authentication
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("token {}", self.config.private_token))
            .json(request)
            .send()
            .await?;

        let envelope: GraphQlResponse<T> = self.handle_response(response).await?;
        if let Some(error) = envelope.errors.first() {
            return Err(ClientError::graphql(error.message.clone()));
        }
        envelope
            .data
            .ok_or_else(|| ClientError::graphql("response carried no data"))
    }

    /// Create authenticated request builder
    fn authenticated_request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .header("Accept", "application/vnd.github.v3+json");

        match self.config.token_placement {
            TokenPlacement::Header => request.header(
                "Authorization",
                format!("token {}", self.config.private_token),
            ),
            TokenPlacement::Query => {
                request.query(&[("access_token", self.config.private_token.as_str())])
            },
        }
    }

    /// Handle HTTP response and deserialize JSON
    async fn handle_response<T>(&self, response: Response) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url_path = response.url().path().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.config.debug.log_responses {
            self.log_response_to_file(&url_path, &body);
        }

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| {
                warn!(endpoint = %url_path, error = %e, "Failed to parse GitHub response");
                ClientError::json_parse(url_path, "Failed to parse response", e)
            })
        } else {
            Err(handle_error_response(status, &headers, &body, &url_path))
        }
    }

    /// Log HTTP response to file for debugging
    fn log_response_to_file(&self, path: &str, body: &str) {
        if let Some(log_dir) = &self.config.debug.log_directory {
            if !log_dir.exists() {
                if let Err(e) = std::fs::create_dir_all(log_dir) {
                    warn!("Failed to create log directory: {}", e);
                    return;
                }
            }

            let filename = format!(
                "{}_{}.json",
                Local::now().format("%Y-%m-%d_%H-%M-%S"),
                path.replace('/', "_")
            );

            let log_path = log_dir.join(filename);

            if let Err(e) = std::fs::write(&log_path, body) {
                warn!("Failed to write response log to {:?}: {}", log_path, e);
            } else {
                debug!("Response logged to {:?}", log_path);
            }
        }
    }
}

fn repository_total(data: RepositoryIssuesData) -> Result<u64> {
    data.repository
        .map(|r| r.issues.total_count)
        .ok_or_else(|| ClientError::not_found("Repository"))
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
}

/// Map an error response from GitHub to a client error
fn handle_error_response(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    path: &str,
) -> ClientError {
    let message = serde_json::from_str::<GithubApiError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.into());

    match status.as_u16() {
        401 => ClientError::Authentication,
        403 if header_u64(headers, "x-ratelimit-remaining") == Some(0) => {
            ClientError::rate_limit(header_u64(headers, "x-ratelimit-reset"))
        },
        404 => ClientError::not_found(path),
        422 => ClientError::github_api(format_compact!("Validation Failed: {}", message)),
        429 => ClientError::rate_limit(header_u64(headers, "x-ratelimit-reset")),
        code => ClientError::github_api(format_compact!("HTTP {}: {}", code, message)),
    }
}
