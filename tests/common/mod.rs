#![allow(dead_code)]

use ruo::client::{BlogService, ClientConfig, Environment, LeanCloudCredentials};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const OWNER: &str = "chanshiyucx";
pub const REPOSITORY: &str = "blog";
pub const TOKEN: &str = "test-token";
pub const SITE_URL: &str = "https://blog.example.com";

/// Client configuration pointing both GitHub and LeanCloud at the mock server
pub fn config_for(server: &MockServer, environment: Environment) -> ClientConfig {
    ClientConfig::new(OWNER, REPOSITORY, TOKEN)
        .with_base_url(server.uri())
        .with_graphql_url(format!("{}/graphql", server.uri()))
        .with_leancloud(LeanCloudCredentials::new(
            "appid-MdYXbMMI",
            "appkey",
            Some(server.uri().into()),
        ))
        .with_site_url(SITE_URL)
        .with_environment(environment)
}

pub fn service_for(server: &MockServer, environment: Environment) -> BlogService {
    BlogService::new(config_for(server, environment)).expect("Failed to create service")
}

pub fn issue_json(id: u64, number: u64, title: &str, state: &str) -> Value {
    json!({
        "id": id,
        "number": number,
        "title": title,
        "body": "content",
        "state": state,
        "html_url": format!("https://github.com/{OWNER}/{REPOSITORY}/issues/{number}"),
        "labels": [],
        "milestone": null,
        "comments": 0,
        "user": { "login": OWNER },
        "created_at": "2019-03-01T08:00:00Z",
        "updated_at": "2019-03-02T08:00:00Z",
        "closed_at": null
    })
}
