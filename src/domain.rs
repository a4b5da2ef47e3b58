use std::collections::HashMap;

use chrono::{DateTime, Utc};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::id::{IssueNumber, ObjectId, PostId};

/// Hit counts keyed by post id
pub type Hot = HashMap<PostId, u64>;

/// A GitHub issue: a blog post when open, an inspiration / page entry when closed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub id: PostId,
    pub number: IssueNumber,
    pub title: CompactString,
    #[serde(default)]
    pub body: Option<String>,
    pub state: IssueState,
    pub html_url: CompactString,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Issue {
    /// Reference used to key the view counter of this post
    pub fn post_ref(&self) -> PostRef {
        PostRef {
            id: self.id,
            title: self.title.clone(),
        }
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name == name)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
}

/// A GitHub milestone, used as a post category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    pub number: u64,
    pub title: CompactString,
    #[serde(default)]
    pub description: Option<CompactString>,
    #[serde(default)]
    pub open_issues: u32,
    #[serde(default)]
    pub closed_issues: u32,
    #[serde(default)]
    pub state: Option<CompactString>,
}

/// A GitHub label, used as a post tag or a content-type marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: u64,
    pub name: CompactString,
    #[serde(default)]
    pub color: CompactString,
    #[serde(default)]
    pub description: Option<CompactString>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub login: CompactString,
    #[serde(default)]
    pub avatar_url: Option<CompactString>,
    #[serde(default)]
    pub html_url: Option<CompactString>,
}

/// Identity of a post as far as the view counter is concerned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRef {
    pub id: PostId,
    pub title: CompactString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeAction {
    /// Only read the current count
    Read,
    /// Add one like
    Increment,
}

/// `Counter` record stored in LeanCloud
#[derive(Debug, Clone, Deserialize)]
pub struct CounterRecord {
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    #[serde(default)]
    pub id: Option<PostId>,
    #[serde(default)]
    pub title: Option<CompactString>,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub site: Option<CompactString>,
}

/// Body of a new `Counter` record
#[derive(Debug, Clone, Serialize)]
pub struct NewCounter {
    pub title: CompactString,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<PostId>,
    pub time: u64,
    pub site: CompactString,
}

/// `Visitor` record stored in LeanCloud
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorRecord {
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    pub referrer: CompactString,
    #[serde(default)]
    pub time: u64,
}

/// Body of a new `Visitor` record
#[derive(Debug, Clone, Serialize)]
pub struct NewVisitor {
    pub referrer: CompactString,
    pub time: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeanCloudQueryResponse<T> {
    pub results: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeanCloudCreated {
    #[serde(rename = "objectId")]
    pub object_id: ObjectId,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: CompactString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryIssuesData {
    pub repository: Option<RepositoryIssues>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryIssues {
    pub issues: TotalCount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TotalCount {
    #[serde(rename = "totalCount")]
    pub total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchData {
    pub search: SearchCount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCount {
    #[serde(rename = "issueCount")]
    pub issue_count: u64,
}
