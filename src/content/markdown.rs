//! Markdown rendering with heading anchors and syntax highlighting
//!
//! Rendering runs as a fixed sequence of passes over the pulldown-cmark
//! event stream:
//!
//! 1. parse with GFM extensions (tables, strikethrough, task lists, footnotes)
//! 2. turn bare URLs in text into links
//! 3. give every heading an `id` from a fresh [`Slugger`]
//! 4. replace fenced code blocks with highlighted HTML, one `<pre>` per theme
//! 5. serialize; raw HTML blocks and inline HTML pass through untouched
//!
//! Input is trusted, site-authored Markdown: nothing is sanitized.

use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};
use regex::Regex;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::error::{ContentError, Result};
use super::Slugger;
use crate::config::HighlightConfig;

lazy_static! {
    static ref BARE_URL: Regex = Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<>]+").unwrap();
}

/// Characters dropped from the end of a bare URL
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', '"', '\'', '*', '_', '~'];

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    /// (`data-theme` value, theme), rendered in this order
    themes: Vec<(&'static str, Theme)>,
    keep_background: bool,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a renderer with the default highlight settings
    pub fn new() -> Result<Self> {
        Self::with_config(&HighlightConfig::default())
    }

    /// Create a renderer, failing if a configured theme does not exist
    pub fn with_config(config: &HighlightConfig) -> Result<Self> {
        let theme_set = ThemeSet::load_defaults();
        let theme = |name: &str| {
            theme_set
                .themes
                .get(name)
                .cloned()
                .ok_or_else(|| ContentError::UnknownTheme(name.to_string()))
        };

        let themes = vec![
            ("light", theme(&config.light_theme)?),
            ("dark", theme(&config.dark_theme)?),
        ];

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            themes,
            keep_background: config.keep_background,
            line_numbers: config.line_numbers,
        })
    }

    /// Render a Markdown body to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        let parser = TextMergeStream::new(Parser::new_ext(markdown, parser_options()));

        let events = autolink_urls(parser);
        let events = assign_heading_ids(events);
        let events = self.highlight_code_blocks(events);

        let mut html_output = String::with_capacity(markdown.len() * 2);
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Swap each code block for its highlighted HTML
    fn highlight_code_blocks<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut block: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = block.take() {
                        let highlighted = self.highlight_code(&code, lang.as_deref());
                        out.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if block.is_some() => {
                    if let Some((_, code)) = block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => {
                    if block.is_none() {
                        out.push(other);
                    }
                }
            }
        }

        out
    }

    /// Highlight a code block once per theme, inside a single `<figure>`
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let syntax = lang
            .and_then(|l| {
                self.syntax_set
                    .find_syntax_by_token(l)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(l))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let lang_attr = html_escape(lang.unwrap_or("plaintext"));

        let mut html = String::from(r#"<figure data-code-figure="">"#);
        for (variant, theme) in &self.themes {
            let lines = match highlight_lines(code, syntax, theme, &self.syntax_set) {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!("Failed to highlight {} code block: {}", lang_attr, e);
                    LinesWithEndings::from(code)
                        .map(|line| html_escape(line.trim_end_matches(['\n', '\r'])))
                        .collect()
                }
            };
            html.push_str(&self.wrap_lines(&lines, &lang_attr, variant, theme));
        }
        html.push_str("</figure>\n");
        html
    }

    /// Wrap highlighted lines into `<pre><code>`, one `<span data-line>` each
    fn wrap_lines(&self, lines: &[String], lang: &str, variant: &str, theme: &Theme) -> String {
        let pre_style = if self.keep_background {
            theme_style(theme)
        } else {
            String::new()
        };

        let line_numbers = if self.line_numbers {
            format!(
                r#" data-line-numbers="" data-line-numbers-max-digits="{}""#,
                lines.len().max(1).to_string().len()
            )
        } else {
            String::new()
        };

        let body = lines
            .iter()
            .map(|line| format!(r#"<span data-line="">{}</span>"#, line))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<pre data-language="{lang}" data-theme="{variant}"{pre_style} tabindex="0"><code data-language="{lang}" data-theme="{variant}"{line_numbers} style="display: grid;">{body}</code></pre>"#
        )
    }
}

/// Highlight `code` line by line; the returned lines carry no newline
fn highlight_lines(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
    syntax_set: &SyntaxSet,
) -> std::result::Result<Vec<String>, syntect::Error> {
    let mut highlighter = HighlightLines::new(syntax, theme);
    LinesWithEndings::from(code)
        .map(|line| {
            let regions = highlighter.highlight_line(line, syntax_set)?;
            let regions: Vec<(Style, &str)> = regions
                .into_iter()
                .map(|(style, text)| (style, text.trim_end_matches(['\n', '\r'])))
                .collect();
            styled_line_to_highlighted_html(&regions, IncludeBackground::No)
        })
        .collect()
}

/// Inline style carrying the theme's own colors
fn theme_style(theme: &Theme) -> String {
    let mut style = String::new();
    if let Some(bg) = theme.settings.background {
        style.push_str(&format!("background-color:#{:02x}{:02x}{:02x};", bg.r, bg.g, bg.b));
    }
    if let Some(fg) = theme.settings.foreground {
        style.push_str(&format!("color:#{:02x}{:02x}{:02x};", fg.r, fg.g, fg.b));
    }

    if style.is_empty() {
        style
    } else {
        format!(r#" style="{}""#, style)
    }
}

/// Language of a fence info string such as `rust title="main.rs"`
fn info_language(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == '{' || c == ',')
        .next()
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
}

/// Turn bare `http(s)://` and `www.` URLs in plain text into links.
///
/// Text inside code, Markdown links, images and raw `<a>` elements is left
/// alone.
fn autolink_urls<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut link_depth = 0usize;
    let mut raw_anchor_depth = 0usize;
    let mut in_code = false;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => link_depth += 1,
            Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                link_depth = link_depth.saturating_sub(1)
            }
            Event::Start(Tag::CodeBlock(_)) => in_code = true,
            Event::End(TagEnd::CodeBlock) => in_code = false,
            Event::InlineHtml(raw) => {
                let tag = raw.trim_start().to_ascii_lowercase();
                if tag.starts_with("<a ") || tag.starts_with("<a>") {
                    raw_anchor_depth += 1;
                } else if tag.starts_with("</a") {
                    raw_anchor_depth = raw_anchor_depth.saturating_sub(1);
                }
            }
            Event::Text(text) if link_depth == 0 && raw_anchor_depth == 0 && !in_code => {
                if let Some(linked) = link_text(text) {
                    out.extend(linked);
                    continue;
                }
            }
            _ => {}
        }
        out.push(event);
    }

    out
}

/// Split `text` around the bare URLs it contains; `None` when there are none
fn link_text<'a>(text: &str) -> Option<Vec<Event<'a>>> {
    let mut events = Vec::new();
    let mut last = 0;

    for m in BARE_URL.find_iter(text) {
        let url = trim_url(m.as_str());
        let prefix_len = if url.to_ascii_lowercase().starts_with("www.") {
            4
        } else {
            url.find("://").map_or(0, |i| i + 3)
        };
        if url.len() <= prefix_len {
            continue;
        }

        if m.start() > last {
            events.push(Event::Text(CowStr::from(text[last..m.start()].to_string())));
        }

        let href = if prefix_len == 4 {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::from(""),
            id: CowStr::from(""),
        }));
        events.push(Event::Text(CowStr::from(url.to_string())));
        events.push(Event::End(TagEnd::Link));

        last = m.start() + url.len();
    }

    if events.is_empty() {
        return None;
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
    Some(events)
}

/// Drop trailing punctuation and unbalanced closing parentheses
fn trim_url(url: &str) -> &str {
    let mut url = url;
    loop {
        let trimmed = url.trim_end_matches(URL_TRAILING_PUNCTUATION);
        let trimmed = if trimmed.ends_with(')')
            && trimmed.matches(')').count() > trimmed.matches('(').count()
        {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };
        if trimmed.len() == url.len() {
            return url;
        }
        url = trimmed;
    }
}

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Plain text of the first heading in a Markdown block, as it is slugged.
///
/// `block` is the heading's source: an ATX line, or a paragraph followed by
/// its Setext underline. Returns `None` when the block parses to no heading.
pub(crate) fn heading_text(block: &str) -> Option<String> {
    let mut text: Option<String> = None;

    for event in Parser::new_ext(block, parser_options()) {
        match &event {
            Event::Start(Tag::Heading { .. }) => text = Some(String::new()),
            Event::End(TagEnd::Heading(_)) => return text,
            _ => {
                if let Some(text) = text.as_mut() {
                    push_plain_text(text, &event);
                }
            }
        }
    }

    None
}

/// Append what `event` contributes to the text a heading slug is built from
fn push_plain_text(buf: &mut String, event: &Event<'_>) {
    if let Event::Text(text) | Event::Code(text) = event {
        buf.push_str(text);
    }
}

/// Set `id` on every heading from a slugger local to this document
fn assign_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut slugger = Slugger::new();
    let mut out = Vec::with_capacity(events.len());
    // Index of the open heading's Start event, and its text so far
    let mut open: Option<(usize, String)> = None;

    for event in events {
        match &event {
            Event::Start(Tag::Heading { .. }) => open = Some((out.len(), String::new())),
            Event::End(TagEnd::Heading(_)) => {
                if let Some((index, text)) = open.take() {
                    let slug = slugger.slug(&text);
                    if let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(index) {
                        *id = Some(CowStr::from(slug));
                    }
                }
            }
            _ => {
                if let Some((_, text)) = open.as_mut() {
                    push_plain_text(text, &event);
                }
            }
        }
        out.push(event);
    }

    out
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
