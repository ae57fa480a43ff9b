//! List posts, grouped by year

use anyhow::Result;
use std::fmt::Write;

use super::{print_json, selected_locales};
use crate::content::{group_by_year, Post};
use crate::helpers::short_date;
use crate::i18n::Locale;
use crate::Carnet;

/// List the posts of one locale, or of every locale
pub fn run(carnet: &Carnet, lang: Option<Locale>, json: bool) -> Result<()> {
    let repo = carnet.repository();

    for lang in selected_locales(lang) {
        let posts = repo.get_all_posts(lang)?;
        if json {
            print_json(&posts)?;
        } else {
            print!("{}", format_listing(lang, posts));
        }
    }

    Ok(())
}

fn format_listing(lang: Locale, posts: Vec<Post>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Posts [{}] ({}):", lang, posts.len());

    for (year, posts) in group_by_year(posts) {
        let _ = writeln!(out, "  {}", year);
        for post in posts {
            let _ = write!(out, "    {} - {} [{}]", short_date(&post.date), post.title, post.slug);
            if !post.tags.is_empty() {
                let _ = write!(out, " #{}", post.tags.join(" #"));
            }
            out.push('\n');
        }
    }

    out
}
