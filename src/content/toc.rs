//! Table of contents extraction from raw Markdown

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::markdown::heading_text;
use super::Slugger;

lazy_static! {
    /// An ATX heading line: 1-6 `#`, then whitespace or end of line
    static ref ATX_HEADING: Regex = Regex::new(r"^ {0,3}(#{1,6})(?:[ \t]+(.*?))?[ \t]*$").unwrap();
    /// Optional closing run of `#` preceded by whitespace
    static ref CLOSING_HASHES: Regex = Regex::new(r"(?:^|[ \t]+)#+$").unwrap();
    static ref FENCE: Regex = Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap();
    /// A Setext underline, `=` for level 1 or `-` for level 2
    static ref SETEXT_UNDERLINE: Regex = Regex::new(r"^ {0,3}(?:=+|-+)[ \t]*$").unwrap();
}

/// Lowest heading level listed in the table of contents
pub const MIN_LEVEL: usize = 2;
/// Highest heading level listed in the table of contents
pub const MAX_LEVEL: usize = 5;

/// A table of contents entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: usize,
    pub text: String,
    pub id: String,
}

/// Extract `##` to `#####` ATX headings from a Markdown document.
///
/// Ids come from a fresh [`Slugger`] fed every heading outside fenced code,
/// in document order, with the same plain text the renderer slugs, so they
/// match the ids on the rendered heading elements. Levels 1 and 6 and
/// Setext headings take part in deduplication but are not listed.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let mut slugger = Slugger::new();
    let mut headings = Vec::new();
    let mut fence: Option<String> = None;
    // Lines of the current paragraph, which a Setext underline turns into a heading
    let mut paragraph: Vec<&str> = Vec::new();

    for line in markdown.lines() {
        if let Some(caps) = FENCE.captures(line) {
            let marker = &caps[1];
            if fence.is_none() {
                fence = Some(marker.to_string());
                paragraph.clear();
                continue;
            }
            if fence.as_deref().is_some_and(|open| closes(open, marker, line)) {
                fence = None;
                continue;
            }
        }
        if fence.is_some() {
            continue;
        }

        if line.trim().is_empty() {
            paragraph.clear();
            continue;
        }

        if let Some(caps) = ATX_HEADING.captures(line) {
            paragraph.clear();

            let level = caps[1].len();
            let raw = caps.get(2).map_or("", |m| m.as_str());
            let text = CLOSING_HASHES.replace(raw, "").trim().to_string();
            let id = slugger.slug(&heading_text(line).unwrap_or_else(|| text.clone()));

            if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
                headings.push(Heading { level, text, id });
            }
            continue;
        }

        if !paragraph.is_empty() && SETEXT_UNDERLINE.is_match(line) {
            let block = format!("{}\n{}", paragraph.join("\n"), line);
            paragraph.clear();
            if let Some(text) = heading_text(&block) {
                slugger.slug(&text);
            }
            continue;
        }

        paragraph.push(line);
    }

    headings
}

/// A fence closes with the same character, at least as long, and nothing after it
fn closes(open: &str, marker: &str, line: &str) -> bool {
    marker.starts_with(&open[..1])
        && marker.len() >= open.len()
        && line.trim_start().trim_start_matches(&open[..1]).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_headings() {
        let headings = extract_headings("## Setup\n\ncontent\n\n## Setup\n");
        assert_eq!(
            headings,
            vec![
                Heading { level: 2, text: "Setup".to_string(), id: "setup".to_string() },
                Heading { level: 2, text: "Setup".to_string(), id: "setup-1".to_string() },
            ]
        );
    }

    #[test]
    fn test_levels() {
        let markdown = "# Title\n## Two\n### Three\n#### Four\n##### Five\n###### Six\n";
        let headings = extract_headings(markdown);
        let levels: Vec<_> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_idempotent() {
        let markdown = "## A\n### B\n## A\n";
        let first: Vec<_> = extract_headings(markdown).into_iter().map(|h| h.id).collect();
        let second: Vec<_> = extract_headings(markdown).into_iter().map(|h| h.id).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["a", "b", "a-1"]);
    }

    #[test]
    fn test_not_headings() {
        let markdown = "##NoSpace\n#hashtag\nText with ## inside\n";
        assert!(extract_headings(markdown).is_empty());
    }

    #[test]
    fn test_closing_hashes_are_stripped() {
        let headings = extract_headings("## Closed ##\n## C# tips\n");
        assert_eq!(headings[0].text, "Closed");
        assert_eq!(headings[1].text, "C# tips");
        assert_eq!(headings[1].id, "c-tips");
    }

    #[test]
    fn test_fenced_code_is_skipped() {
        let markdown = "## Install\n\n```bash\n## not a heading\n```\n\n~~~\n### also not\n~~~\n\n## Usage\n";
        let ids: Vec<_> = extract_headings(markdown).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["install", "usage"]);
    }

    #[test]
    fn test_link_syntax_is_not_slugged() {
        let headings = extract_headings("## See [the docs](https://docs.rs)\n");
        assert_eq!(headings[0].text, "See [the docs](https://docs.rs)");
        assert_eq!(headings[0].id, "see-the-docs");
    }

    #[test]
    fn test_inline_markup_is_slugged_as_rendered() {
        let headings = extract_headings("## Using _snake_ case\n## Tom &amp; Jerry\n");
        assert_eq!(headings[0].text, "Using _snake_ case");
        assert_eq!(headings[0].id, "using-snake-case");
        assert_eq!(headings[1].id, "tom--jerry");
    }

    #[test]
    fn test_setext_headings_consume_slugs() {
        let headings = extract_headings("Setup\n-----\n\ntext\n\n## Setup\n");
        assert_eq!(
            headings,
            vec![Heading { level: 2, text: "Setup".to_string(), id: "setup-1".to_string() }]
        );

        let headings = extract_headings("Guide\nin two lines\n===\n\n## Guide\n");
        assert_eq!(headings[0].id, "guide");
    }

    #[test]
    fn test_thematic_breaks_and_lists_are_not_setext() {
        let markdown = "Intro\n\n---\n\n- Intro\n---\n\n## Intro\n";
        let ids: Vec<_> = extract_headings(markdown).into_iter().map(|h| h.id).collect();
        assert_eq!(ids, vec!["intro"]);
    }

    #[test]
    fn test_h1_takes_part_in_deduplication() {
        let headings = extract_headings("# Intro\n## Intro\n");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].id, "intro-1");
    }
}
