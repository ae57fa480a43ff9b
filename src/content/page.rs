//! Everything a post page needs, computed in one pass

use serde::Serialize;

use super::error::Result;
use super::{extract_headings, Heading, MarkdownRenderer, Post, PostNavigation, PostRepository};
use crate::helpers::format_date;
use crate::i18n::Locale;

/// A post with its rendered body, table of contents and navigation
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub post: Post,
    /// Localized display date, or "Invalid Date"
    pub display_date: String,
    pub html: String,
    pub headings: Vec<Heading>,
    pub navigation: PostNavigation,
}

impl PostPage {
    /// Load, render and link the post `slug` of `lang`.
    ///
    /// Returns `Ok(None)` when the post does not exist.
    pub fn build(
        repo: &PostRepository,
        renderer: &MarkdownRenderer,
        lang: Locale,
        slug: &str,
    ) -> Result<Option<Self>> {
        let Some(source) = repo.read_post(slug, lang)? else {
            return Ok(None);
        };

        let posts = repo.get_all_posts(lang)?;
        let navigation = PostNavigation::resolve(&posts, slug);
        let html = renderer.render(&source.body);
        let headings = extract_headings(&source.body);

        tracing::debug!(
            "Built page {}/{} ({} headings, {} bytes of html)",
            lang,
            slug,
            headings.len(),
            html.len()
        );

        Ok(Some(Self {
            display_date: format_date(&source.post.date, lang),
            post: source.post,
            html,
            headings,
            navigation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_build_page() {
        let dir = TempDir::new().unwrap();
        let en = dir.path().join("en");
        fs::create_dir_all(&en).unwrap();
        fs::write(
            en.join("first.md"),
            "---\ntitle: First\ndate: 2024-01-05\n---\n## Setup\n\ntext\n\n## Setup\n",
        )
        .unwrap();
        fs::write(
            en.join("second.md"),
            "---\ntitle: Second\ndate: 2024-02-01\n---\nLater.\n",
        )
        .unwrap();

        let repo = PostRepository::new(dir.path(), "/og-default.png");
        let renderer = MarkdownRenderer::new().unwrap();

        let page = PostPage::build(&repo, &renderer, Locale::En, "first")
            .unwrap()
            .unwrap();
        assert_eq!(page.post.title, "First");
        assert_eq!(page.display_date, "Jan. 05, 2024");
        assert_eq!(page.headings.len(), 2);
        assert!(page.html.contains(r#"id="setup-1""#));
        assert_eq!(
            page.navigation.next.as_ref().map(|p| p.slug.as_str()),
            Some("second")
        );
        assert!(page.navigation.previous.is_none());
        assert_eq!(
            page.navigation.related.as_ref().map(|p| p.slug.as_str()),
            Some("second")
        );

        assert!(PostPage::build(&repo, &renderer, Locale::Fr, "first")
            .unwrap()
            .is_none());
    }
}
