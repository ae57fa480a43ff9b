//! Generator module - sitemap.xml and robots.txt

use anyhow::{Context, Result};
use indexmap::IndexSet;
use std::fs;
use std::path::Path;

use crate::helpers::{localized_url, post_url};
use crate::i18n::Locale;
use crate::Carnet;

/// Builds the crawler-facing files of the site
pub struct Generator<'a> {
    carnet: &'a Carnet,
}

impl<'a> Generator<'a> {
    pub fn new(carnet: &'a Carnet) -> Self {
        Self { carnet }
    }

    /// Every public URL: static pages for each locale, then each post.
    ///
    /// Only file names are read. A locale whose directory cannot be listed
    /// is logged and contributes no posts.
    pub fn urls(&self) -> Vec<String> {
        let base_url = self.carnet.config.base_url();
        let repo = self.carnet.repository();
        let mut urls: IndexSet<String> = IndexSet::new();

        for &lang in Locale::all() {
            for path in &self.carnet.config.static_paths {
                urls.insert(localized_url(base_url, lang, path));
            }
        }

        for &lang in Locale::all() {
            match repo.slugs(lang) {
                Ok(slugs) => {
                    for slug in slugs {
                        urls.insert(post_url(base_url, lang, &slug));
                    }
                }
                Err(e) => tracing::error!("Error listing post URLs for {}: {}", lang, e),
            }
        }

        urls.into_iter().collect()
    }

    /// Render sitemap.xml
    pub fn sitemap(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');
        for url in self.urls() {
            xml.push_str(&format!(
                "  <url>\n    <loc>{}</loc>\n  </url>\n",
                escape_xml(&url)
            ));
        }
        xml.push_str("</urlset>\n");
        xml
    }

    /// Render robots.txt
    pub fn robots(&self) -> String {
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
            self.carnet.config.base_url()
        )
    }

    /// Write sitemap.xml and robots.txt into `out_dir`
    pub fn write(&self, out_dir: &Path) -> Result<()> {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create {:?}", out_dir))?;

        fs::write(out_dir.join("sitemap.xml"), self.sitemap())?;
        tracing::info!("Generated sitemap.xml");

        fs::write(out_dir.join("robots.txt"), self.robots())?;
        tracing::info!("Generated robots.txt");

        Ok(())
    }
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
