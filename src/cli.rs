use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::client::{ArchiveFilter, PostFilter, PostQuery, config::DEFAULT_PAGE_SIZE};

#[derive(Debug, Parser)]
#[command(name = "ruo")]
#[command(about = "Query a GitHub Issues blog and its LeanCloud counters")]
#[command(version)]
pub struct Cli {
    /// Configuration file, defaults to ruo.toml in the user config directory
    #[arg(long, short, env = "RUO_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub token, overrides the one in the configuration file
    #[arg(long, env = "RUO_GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Treat the site as a local preview: counters are never touched
    #[arg(long)]
    pub dev: bool,

    /// Verbose stderr logging and raw response dumps
    #[arg(long)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List published posts
    Posts(PostsArgs),
    /// Show one post by issue number
    Post { number: u64 },
    /// List categories (milestones)
    Categories,
    /// List tags (labels)
    Tags,
    /// List inspiration entries
    Inspirations(PageArgs),
    /// Show a standalone page such as book, friend or about
    Page { kind: String },
    /// Count issues through GraphQL
    Count {
        #[command(subcommand)]
        what: CountCommand,
    },
    /// View counts of posts by id
    Hot {
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Record one view of a post
    IncreaseHot {
        /// Post (issue) id
        #[arg(long)]
        id: u64,
        #[arg(long)]
        title: String,
    },
    /// Read or add a site like
    LikeSite {
        #[arg(long, value_enum, default_value_t = LikeArg::Read)]
        action: LikeArg,
    },
    /// Record one visit from a referrer
    Visit { referrer: String },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Debug, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(flatten)]
    pub paging: PageArgs,
    /// Only posts with this tag
    #[arg(long, conflicts_with = "milestone")]
    pub label: Option<String>,
    /// Only posts in this category (milestone number)
    #[arg(long)]
    pub milestone: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum CountCommand {
    /// Published posts
    Archives,
    /// Inspiration entries
    Inspiration,
    /// Published posts in a tag and/or category
    Filtered {
        #[arg(long)]
        label: Option<String>,
        /// Milestone title
        #[arg(long)]
        milestone: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LikeArg {
    Read,
    Increment,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl PostsArgs {
    pub fn to_query(&self) -> PostQuery {
        let filter = match (&self.label, self.milestone) {
            (Some(label), _) => Some(PostFilter::Label(label.as_str().into())),
            (None, Some(milestone)) => Some(PostFilter::Milestone(milestone)),
            (None, None) => None,
        };

        PostQuery::new()
            .with_page(self.paging.page)
            .with_page_size(self.paging.page_size)
            .with_filter(filter)
    }
}

impl CountCommand {
    pub fn to_filter(&self) -> Option<ArchiveFilter> {
        match self {
            CountCommand::Filtered { label, milestone } => Some(ArchiveFilter {
                label: label.as_deref().map(Into::into),
                milestone: milestone.as_deref().map(Into::into),
            }),
            _ => None,
        }
    }
}
