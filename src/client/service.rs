//! High-level blog operations
//!
//! Composes the GitHub and LeanCloud clients. Every operation returns an
//! explicit `Result`; failures are logged here and handed to the caller.

use std::sync::Arc;

use compact_str::CompactString;
use serde_json::json;
use tracing::{debug, error, info, instrument};

use super::{
    api::GithubApi,
    config::{ArchiveFilter, ClientConfig, Environment, PageKind, Pagination, PostQuery},
    error::Result,
    leancloud::LeanCloudApi,
};
use crate::{
    domain::{
        CounterRecord, Hot, Issue, Label, LikeAction, Milestone, NewCounter, NewVisitor, PostRef,
        VisitorRecord,
    },
    id::{IssueNumber, PostId},
};

const COUNTER_CLASS: &str = "Counter";
const VISITOR_CLASS: &str = "Visitor";
const COUNT_FIELD: &str = "time";
/// Title of the counter record holding the site likes
const SITE_COUNTER_TITLE: &str = "site";

/// High-level service for the blog backends
#[derive(Debug, Clone)]
pub struct BlogService {
    github: Arc<GithubApi>,
    leancloud: Arc<LeanCloudApi>,
    environment: Environment,
    site_url: CompactString,
}

/// Log the outcome of an operation and pass it through
fn logged<T>(result: Result<T>, operation: &'static str) -> Result<T> {
    if let Err(e) = &result {
        error!(error = %e, operation, "Blog operation failed");
    }
    result
}

impl BlogService {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let leancloud = Arc::new(LeanCloudApi::new(&config)?);
        let github = Arc::new(GithubApi::new(config)?);
        Ok(Self::from_apis(github, leancloud))
    }

    /// Create service from existing API clients
    pub fn from_apis(github: Arc<GithubApi>, leancloud: Arc<LeanCloudApi>) -> Self {
        let environment = github.config().environment;
        let site_url = github.config().site_url.clone();
        Self {
            github,
            leancloud,
            environment,
            site_url,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        self.github.config()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Number of published posts
    pub async fn archives_count(&self) -> Result<u64> {
        logged(self.github.archives_count().await, "archives_count")
    }

    /// Number of inspiration entries
    pub async fn inspiration_count(&self) -> Result<u64> {
        logged(self.github.inspiration_count().await, "inspiration_count")
    }

    /// Number of published posts in a tag and/or category
    pub async fn filtered_archives_count(&self, filter: &ArchiveFilter) -> Result<u64> {
        logged(
            self.github.filter_archives_count(filter).await,
            "filtered_archives_count",
        )
    }

    /// One page of published posts
    pub async fn posts(&self, query: &PostQuery) -> Result<Vec<Issue>> {
        logged(self.github.get_posts(query).await, "posts")
    }

    pub async fn post(&self, number: IssueNumber) -> Result<Issue> {
        logged(self.github.get_post(number).await, "post")
    }

    /// Categories (milestones)
    pub async fn categories(&self) -> Result<Vec<Milestone>> {
        logged(self.github.get_milestones().await, "categories")
    }

    /// Tags (labels)
    pub async fn tags(&self) -> Result<Vec<Label>> {
        logged(self.github.get_labels().await, "tags")
    }

    pub async fn inspirations(&self, pagination: &Pagination) -> Result<Vec<Issue>> {
        logged(self.github.get_inspirations(pagination).await, "inspirations")
    }

    /// Standalone page (book list, friends, about, ...) by its label name
    pub async fn page(&self, kind: &str) -> Result<Option<Issue>> {
        logged(self.github.get_page(kind).await, "page")
    }

    pub async fn page_of(&self, kind: PageKind) -> Result<Option<Issue>> {
        self.page(kind.as_str()).await
    }

    /// View counts of the given posts; posts never viewed are absent
    #[instrument(skip(self), fields(id_count = ids.len()))]
    pub async fn hot(&self, ids: &[PostId]) -> Result<Hot> {
        if self.environment.is_development() || ids.is_empty() {
            return Ok(Hot::new());
        }

        let condition = json!({ "id": { "$in": ids } });
        let counters: Vec<CounterRecord> = logged(
            self.leancloud.find(COUNTER_CLASS, &condition, None).await,
            "hot",
        )?;

        Ok(counters
            .into_iter()
            .filter_map(|c| c.id.map(|id| (id, c.time)))
            .collect())
    }

    /// Record one view of a post and return its new count
    #[instrument(skip(self), fields(post_id = %post.id))]
    pub async fn increase_hot(&self, post: &PostRef) -> Result<u64> {
        if self.environment.is_development() {
            return Ok(1);
        }

        let condition = json!({ "id": post.id });
        let existing: Option<CounterRecord> = logged(
            self.leancloud.first(COUNTER_CLASS, &condition).await,
            "increase_hot",
        )?;

        let count = match existing {
            Some(counter) => logged(
                self.leancloud
                    .increment(COUNTER_CLASS, &counter.object_id, COUNT_FIELD, 1)
                    .await,
                "increase_hot",
            )?,
            None => {
                let counter = NewCounter {
                    title: post.title.clone(),
                    id: Some(post.id),
                    time: 1,
                    site: self.site_url.clone(),
                };
                logged(
                    self.leancloud.create(COUNTER_CLASS, &counter).await,
                    "increase_hot",
                )?;
                info!(post_id = %post.id, "Created view counter");
                1
            },
        };

        debug!(count, "Post view recorded");
        Ok(count)
    }

    /// Read or add to the site-wide like counter
    #[instrument(skip(self))]
    pub async fn like_site(&self, action: LikeAction) -> Result<u64> {
        if self.environment.is_development() {
            return Ok(0);
        }

        let condition = json!({ "title": SITE_COUNTER_TITLE });
        let existing: Option<CounterRecord> = logged(
            self.leancloud.first(COUNTER_CLASS, &condition).await,
            "like_site",
        )?;

        match (existing, action) {
            (Some(counter), LikeAction::Read) => Ok(counter.time),
            (Some(counter), LikeAction::Increment) => logged(
                self.leancloud
                    .increment(COUNTER_CLASS, &counter.object_id, COUNT_FIELD, 1)
                    .await,
                "like_site",
            ),
            (None, _) => {
                let counter = NewCounter {
                    title: SITE_COUNTER_TITLE.into(),
                    id: None,
                    time: 1,
                    site: self.site_url.clone(),
                };
                logged(
                    self.leancloud.create(COUNTER_CLASS, &counter).await,
                    "like_site",
                )?;
                info!("Created site like counter");
                Ok(1)
            },
        }
    }

    /// Record one visit from `referrer` and return its new count
    #[instrument(skip(self))]
    pub async fn record_visitor(&self, referrer: &str) -> Result<u64> {
        if self.environment.is_development() {
            return Ok(0);
        }

        let condition = json!({ "referrer": referrer });
        let existing: Option<VisitorRecord> = logged(
            self.leancloud.first(VISITOR_CLASS, &condition).await,
            "record_visitor",
        )?;

        match existing {
            Some(visitor) => logged(
                self.leancloud
                    .increment(VISITOR_CLASS, &visitor.object_id, COUNT_FIELD, 1)
                    .await,
                "record_visitor",
            ),
            None => {
                let visitor = NewVisitor {
                    referrer: referrer.into(),
                    time: 1,
                };
                logged(
                    self.leancloud.create(VISITOR_CLASS, &visitor).await,
                    "record_visitor",
                )?;
                Ok(1)
            },
        }
    }
}
