//! carnet: the content pipeline of a bilingual (fr/en) blog
//!
//! Posts are Markdown files with YAML front-matter, stored one directory per
//! locale. This crate loads and sorts them, renders their bodies to HTML with
//! highlighted code, builds tables of contents and post navigation, and
//! serves the result as JSON or writes sitemap.xml and robots.txt.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentError, MarkdownRenderer, PostRepository};

/// Name of the configuration file at the site root
pub const CONFIG_FILE: &str = "carnet.yml";

/// The main Carnet application
#[derive(Debug, Clone)]
pub struct Carnet {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding the per-locale post directories
    pub posts_dir: PathBuf,
}

impl Carnet {
    /// Create a new Carnet instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let config_path = base_dir.join(CONFIG_FILE);

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Carnet instance with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let posts_dir = base_dir.join(&config.content_dir);

        Self {
            config,
            base_dir,
            posts_dir,
        }
    }

    /// Repository over the post directories
    pub fn repository(&self) -> PostRepository {
        PostRepository::new(&self.posts_dir, &self.config.default_image)
    }

    /// Markdown renderer using the configured highlight themes
    pub fn renderer(&self) -> Result<MarkdownRenderer, ContentError> {
        MarkdownRenderer::with_config(&self.config.highlight)
    }
}
