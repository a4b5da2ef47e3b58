//! Blog backend clients
//!
//! `GithubApi` and `LeanCloudApi` speak HTTP; `BlogService` combines them
//! into the operations a blog front-end needs.

pub mod api;
pub mod config;
pub mod documents;
pub mod error;
pub mod leancloud;
pub mod service;

// Re-export main types for convenience
pub use api::GithubApi;
pub use config::{
    ArchiveFilter, ClientConfig, Environment, LeanCloudCredentials, PageKind, Pagination,
    PostFilter, PostQuery, RequestConfig, TokenPlacement,
};
pub use error::{ClientError, Result};
pub use leancloud::LeanCloudApi;
pub use service::BlogService;
