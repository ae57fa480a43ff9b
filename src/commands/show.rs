//! Show a single post: rendered page, table of contents or navigation

use anyhow::{anyhow, Result};

use super::print_json;
use crate::content::{extract_headings, Heading, Post, PostNavigation, PostPage, PostRepository};
use crate::i18n::Locale;
use crate::Carnet;

/// What to print about a post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Everything: post, html, headings and navigation, as JSON
    Page,
    /// Rendered HTML body only
    Html,
    /// Table of contents
    Toc,
    /// Previous, next and related posts
    Nav,
}

pub fn run(carnet: &Carnet, lang: Locale, slug: &str, view: View) -> Result<()> {
    let repo = carnet.repository();
    let not_found = || anyhow!("No post '{}' for locale {}", slug, lang);

    match view {
        View::Page => {
            let renderer = carnet.renderer()?;
            let page = PostPage::build(&repo, &renderer, lang, slug)?.ok_or_else(not_found)?;
            print_json(&page)?;
        }
        View::Html => {
            let source = repo.read_post(slug, lang)?.ok_or_else(not_found)?;
            let renderer = carnet.renderer()?;
            println!("{}", renderer.render(&source.body));
        }
        View::Toc => {
            let source = repo.read_post(slug, lang)?.ok_or_else(not_found)?;
            print!("{}", format_toc(&extract_headings(&source.body)));
        }
        View::Nav => {
            let nav = navigation(&repo, lang, slug)?.ok_or_else(not_found)?;
            print!("{}", format_navigation(&nav));
        }
    }

    Ok(())
}

/// Navigation of an existing post; `None` when the post does not exist
fn navigation(repo: &PostRepository, lang: Locale, slug: &str) -> Result<Option<PostNavigation>> {
    if repo.get_post_by_slug(slug, lang)?.is_none() {
        return Ok(None);
    }
    let posts = repo.get_all_posts(lang)?;
    Ok(Some(PostNavigation::resolve(&posts, slug)))
}

/// Indent each heading by its depth below `##`
fn format_toc(headings: &[Heading]) -> String {
    headings
        .iter()
        .map(|h| {
            format!(
                "{}- {} (#{})\n",
                "  ".repeat(h.level.saturating_sub(2)),
                h.text,
                h.id
            )
        })
        .collect()
}

fn format_navigation(nav: &PostNavigation) -> String {
    let describe = |post: &Option<Post>| {
        post.as_ref()
            .map_or_else(|| "-".to_string(), |p| format!("{} [{}]", p.title, p.slug))
    };

    format!(
        "previous: {}\nnext:     {}\nrelated:  {}\n",
        describe(&nav.previous),
        describe(&nav.next),
        describe(&nav.related)
    )
}
