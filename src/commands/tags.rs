//! List tags, or the posts carrying one

use anyhow::Result;
use std::fmt::Write;

use super::print_json;
use crate::content::{group_by_year, Post, TagCount};
use crate::helpers::{short_date, tag_url};
use crate::i18n::Locale;
use crate::Carnet;

pub fn run(carnet: &Carnet, lang: Locale, tag: Option<&str>, json: bool) -> Result<()> {
    let repo = carnet.repository();

    match tag {
        Some(tag) => {
            let posts = repo.get_posts_by_tag(lang, tag)?;
            if json {
                return print_json(&group_by_year(posts));
            }
            let url = tag_url(carnet.config.base_url(), lang, tag);
            print!("{}", format_tag(tag, &url, posts));
        }
        None => {
            let tags = repo.tags(lang)?;
            if json {
                return print_json(&tags);
            }
            print!("{}", format_tags(lang, &tags));
        }
    }

    Ok(())
}

/// Posts of one tag under year headers, most recent year first
fn format_tag(tag: &str, url: &str, posts: Vec<Post>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} ({}) {}", tag, posts.len(), url);

    for (year, posts) in group_by_year(posts) {
        let _ = writeln!(out, "  {}", year);
        for post in posts {
            let _ = writeln!(out, "    {} - {} [{}]", short_date(&post.date), post.title, post.slug);
        }
    }

    out
}

fn format_tags(lang: Locale, tags: &[TagCount]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tags [{}] ({}):", lang, tags.len());
    for tag in tags {
        let _ = writeln!(out, "  {} ({})", tag.name, tag.count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDate;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            date: PostDate::parse(date),
            description: String::new(),
            tags: vec!["rust".to_string()],
            lang: Locale::En,
            image: String::new(),
        }
    }

    #[test]
    fn test_format_tag_groups_by_year() {
        let posts = vec![
            post("c", "2024-05-01"),
            post("b", "2024-01-01"),
            post("a", "2022-03-03"),
        ];

        assert_eq!(
            format_tag("rust", "https://example.com/en/tags/rust", posts),
            "#rust (3) https://example.com/en/tags/rust\n  2024\n    2024-05-01 - C [c]\n    2024-01-01 - B [b]\n  2022\n    2022-03-03 - A [a]\n"
        );
    }

    #[test]
    fn test_format_tags() {
        let tags = vec![
            TagCount { name: "rust".to_string(), count: 2 },
            TagCount { name: "web".to_string(), count: 1 },
        ];
        assert_eq!(format_tags(Locale::Fr, &tags), "Tags [fr] (2):\n  rust (2)\n  web (1)\n");
    }
}
