//! Client for a blog that keeps its posts in GitHub Issues.
//!
//! Posts are open issues, categories are milestones, tags are labels, and
//! standalone pages (inspiration, book list, friends, about) are closed
//! issues carrying a marker label. View counters, site likes and referrer
//! statistics live in the LeanCloud `Counter` and `Visitor` classes.
//!
//! [`client::BlogService`] is the entry point.

pub mod cli;
pub mod client;
pub mod config;
pub mod domain;
pub mod id;
pub mod logging;
pub mod result;
