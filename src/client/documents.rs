//! GraphQL documents for the count-only queries
//!
//! Documents are fixed; owner, repository and filters travel as variables.

use compact_str::{CompactString, format_compact};
use serde::Serialize;
use serde_json::{Value, json};

use super::config::{ArchiveFilter, INSPIRATION_LABEL};

const ARCHIVES_COUNT: &str = r#"
query ArchivesCount($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    issues(states: OPEN) {
      totalCount
    }
  }
}
"#;

const LABELLED_CLOSED_COUNT: &str = r#"
query LabelledClosedCount($owner: String!, $name: String!, $labels: [String!]) {
  repository(owner: $owner, name: $name) {
    issues(states: CLOSED, labels: $labels) {
      totalCount
    }
  }
}
"#;

const SEARCH_COUNT: &str = r#"
query FilterArchivesCount($search: String!) {
  search(type: ISSUE, query: $search) {
    issueCount
  }
}
"#;

/// Request body sent to the GraphQL endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: Value,
}

/// Total number of open issues, i.e. published posts
pub fn archives_count(owner: &str, repository: &str) -> GraphQlRequest {
    GraphQlRequest {
        query: ARCHIVES_COUNT,
        variables: json!({ "owner": owner, "name": repository }),
    }
}

/// Total number of closed issues labelled `inspiration`
pub fn inspiration_count(owner: &str, repository: &str) -> GraphQlRequest {
    GraphQlRequest {
        query: LABELLED_CLOSED_COUNT,
        variables: json!({
            "owner": owner,
            "name": repository,
            "labels": [INSPIRATION_LABEL],
        }),
    }
}

/// Number of open issues matching a tag and/or category
pub fn filter_archives_count(
    owner: &str,
    repository: &str,
    filter: &ArchiveFilter,
) -> GraphQlRequest {
    GraphQlRequest {
        query: SEARCH_COUNT,
        variables: json!({ "search": search_qualifiers(owner, repository, filter) }),
    }
}

/// Build the issue search string, quoting values that contain spaces
pub fn search_qualifiers(owner: &str, repository: &str, filter: &ArchiveFilter) -> CompactString {
    let mut search = format_compact!("repo:{}/{} is:issue is:open", owner, repository);

    if let Some(milestone) = &filter.milestone {
        search.push_str(" milestone:");
        search.push_str(&quote(milestone));
    }
    if let Some(label) = &filter.label {
        search.push_str(" label:");
        search.push_str(&quote(label));
    }

    search
}

/// Search syntax has no escape for `"`, so it is always dropped
fn quote(value: &str) -> CompactString {
    let value = value.replace('"', "");
    if value.contains(char::is_whitespace) {
        format_compact!("\"{}\"", value)
    } else {
        value.into()
    }
}
