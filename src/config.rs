use std::path::{Path, PathBuf};

use compact_str::CompactString;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::{
    client::{PageKind, config::GITHUB_API_URL},
    result::{Result, RuoError},
};

/// Site configuration as stored in `ruo.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuoConfig {
    pub title: CompactString,
    pub subtitle: CompactString,
    /// Public URL of the site; a `localhost` / `192.168.*` host marks a local preview
    pub site_url: CompactString,
    /// GitHub user owning the blog repository
    pub username: CompactString,
    /// Repository whose issues are the posts
    pub repository: CompactString,
    pub token: GithubToken,
    pub github_url: CompactString,
    /// File log level, `Off` disables the log file
    pub log_level: Option<CompactString>,
    pub gitalk: GitalkConfig,
    pub leancloud: LeanCloudConfig,
    pub archive: PageOptions,
    pub category: PageOptions,
    pub tag: PageOptions,
    pub inspiration: PageOptions,
    pub book: PageOptions,
    pub friend: PageOptions,
    pub about: AboutOptions,
    pub qrcode: Vec<QrCode>,
    pub loading_img: CompactString,
    pub default_cover: CompactString,
    pub aplayer: Vec<Track>,
    pub theme_colors: Vec<CompactString>,
}

/// GitHub token, either whole or split into parts that are joined on use.
///
/// Splitting only keeps naive secret scanners quiet; it is not a protection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GithubToken {
    Whole(CompactString),
    Parts(Vec<CompactString>),
}

/// Gitalk comment widget settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitalkConfig {
    pub display: bool,
    pub client_id: CompactString,
    pub client_secret: CompactString,
    /// Repository holding the comment issues
    pub repo: CompactString,
    pub owner: CompactString,
    pub admin: Vec<CompactString>,
    pub distraction_free_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeanCloudConfig {
    pub app_id: CompactString,
    pub app_key: CompactString,
    /// Overrides the API server derived from the app id
    pub server_url: Option<CompactString>,
}

/// Per-page feature toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOptions {
    pub display: bool,
    pub enable_comment: bool,
    /// Line shown at the top of the page
    pub quote: CompactString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutOptions {
    #[serde(flatten)]
    pub page: PageOptions,
    pub avatar: CompactString,
    pub graduated: CompactString,
    pub college: CompactString,
    pub contact: Vec<Contact>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub icon: CompactString,
    pub link: CompactString,
}

/// Donation QR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCode {
    pub name: CompactString,
    pub img: CompactString,
}

/// Music player track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: CompactString,
    pub artist: CompactString,
    pub url: CompactString,
    pub cover: CompactString,
}

impl Default for RuoConfig {
    fn default() -> Self {
        Self {
            title: "Ruo".into(),
            subtitle: "coding with love".into(),
            site_url: CompactString::default(),
            username: CompactString::default(),
            repository: "blog".into(),
            token: GithubToken::default(),
            github_url: GITHUB_API_URL.into(),
            log_level: None,
            gitalk: GitalkConfig {
                display: true,
                repo: "comment".into(),
                ..Default::default()
            },
            leancloud: LeanCloudConfig::default(),
            archive: PageOptions::default(),
            category: PageOptions::default(),
            tag: PageOptions::default(),
            inspiration: PageOptions::commented(),
            book: PageOptions::commented(),
            friend: PageOptions::commented(),
            about: AboutOptions {
                page: PageOptions::commented(),
                ..Default::default()
            },
            qrcode: Vec::new(),
            loading_img: CompactString::default(),
            default_cover: CompactString::default(),
            aplayer: Vec::new(),
            theme_colors: [
                "#B28FCE", "#86C166", "#F596AA", "#F19483", "#F9BF45", "#FAD689", "#E79460",
                "#2EA9DF", "#FB966E", "#BC9F77", "#867835", "#B9887D",
            ]
            .into_iter()
            .map(CompactString::from)
            .collect(),
        }
    }
}

impl Default for GithubToken {
    fn default() -> Self {
        GithubToken::Whole(CompactString::default())
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            display: true,
            enable_comment: false,
            quote: CompactString::default(),
        }
    }
}

impl PageOptions {
    fn commented() -> Self {
        Self {
            enable_comment: true,
            ..Self::default()
        }
    }
}

impl GithubToken {
    /// The usable token
    pub fn reveal(&self) -> CompactString {
        match self {
            GithubToken::Whole(token) => token.clone(),
            GithubToken::Parts(parts) => parts.iter().map(|p| p.as_str()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reveal().is_empty()
    }
}

impl RuoConfig {
    /// Display and comment toggles of a standalone page
    pub fn page_options(&self, kind: PageKind) -> &PageOptions {
        match kind {
            PageKind::Book => &self.book,
            PageKind::Friend => &self.friend,
            PageKind::About => &self.about.page,
        }
    }

    pub fn with_token(mut self, token: Option<CompactString>) -> Self {
        if let Some(token) = token {
            self.token = GithubToken::Whole(token);
        }
        self
    }
}

pub fn default_config_path() -> PathBuf {
    if let Some(dirs) = BaseDirs::new() {
        dirs.config_dir().join("ruo.toml")
    } else {
        PathBuf::from("ruo.toml")
    }
}

/// Load an existing configuration file
pub fn load_config(config_file: &Path) -> Result<RuoConfig> {
    if !config_file.exists() {
        return Err(RuoError::config_file_not_found(config_file.to_path_buf()));
    }

    confy::load_path(config_file)
        .map_err(|e| RuoError::config_load_error(config_file.to_path_buf(), e))
}

pub fn save_config(config_file: &Path, config: &RuoConfig) -> Result<()> {
    confy::store_path(config_file, config)
        .map_err(|e| RuoError::config_save_error(config_file.to_path_buf(), e))?;

    Ok(())
}
