//! Site configuration (carnet.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding [`SiteConfig::url`]
pub const URL_ENV: &str = "CARNET_URL";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public base URL, without trailing slash
    pub url: String,

    /// Directory holding one sub-directory of posts per locale
    pub content_dir: String,

    /// Image used for posts whose front-matter has none
    pub default_image: String,

    /// Localized pages listed in the sitemap besides posts ("" is the home page)
    pub static_paths: Vec<String>,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            content_dir: "content/posts".to_string(),
            default_image: "/og-default.png".to_string(),
            static_paths: vec![
                String::new(),
                "blog".to_string(),
                "newsletter".to_string(),
            ],
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!("Using {} from environment: {}", URL_ENV, url);
                self.url = url;
            }
        }
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// syntect theme rendered for light color schemes
    pub light_theme: String,
    /// syntect theme rendered for dark color schemes
    pub dark_theme: String,
    /// Keep the theme's background color on `<pre>`
    pub keep_background: bool,
    /// Mark code blocks for CSS line numbering
    pub line_numbers: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            light_theme: "InspiredGitHub".to_string(),
            dark_theme: "base16-ocean.dark".to_string(),
            keep_background: true,
            line_numbers: true,
        }
    }
}
