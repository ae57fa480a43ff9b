//! Post model

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::i18n::Locale;

/// A blog post, as described by its front-matter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// File name without the `.md` extension
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: PostDate,

    /// Short description shown in listings
    pub description: String,

    /// Post tags, in front-matter order
    pub tags: Vec<String>,

    /// Locale directory the post was loaded from
    pub lang: Locale,

    /// Cover image URL
    pub image: String,
}

impl Post {
    /// Whether the post carries `tag`, ignoring case
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// A post together with its Markdown body
#[derive(Debug, Clone)]
pub struct PostSource {
    pub post: Post,
    pub body: String,
}

/// Publication date of a post.
///
/// Front-matter dates that cannot be understood are kept as
/// [`PostDate::Invalid`] instead of failing the whole post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostDate {
    Valid(DateTime<Utc>),
    /// Raw front-matter value that failed to parse
    Invalid(String),
}

impl PostDate {
    /// Parse a date string in the formats authors actually write
    pub fn parse(s: &str) -> Self {
        match parse_date_string(s) {
            Some(dt) => PostDate::Valid(dt),
            None => PostDate::Invalid(s.to_string()),
        }
    }

    /// Interpret a number as milliseconds since the Unix epoch
    pub fn from_millis(ms: i64) -> Self {
        match Utc.timestamp_millis_opt(ms).single() {
            Some(dt) => PostDate::Valid(dt),
            None => PostDate::Invalid(ms.to_string()),
        }
    }

    /// The timestamp, or `None` for invalid dates
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            PostDate::Valid(dt) => Some(*dt),
            PostDate::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, PostDate::Valid(_))
    }

    pub fn year(&self) -> Option<i32> {
        self.timestamp().map(|dt| dt.year())
    }
}

impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostDate::Valid(dt) => write!(f, "{}", dt.to_rfc3339()),
            PostDate::Invalid(_) => f.write_str("Invalid Date"),
        }
    }
}

/// Valid dates serialize as RFC 3339, invalid ones as `null`
impl Serialize for PostDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PostDate::Valid(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            PostDate::Invalid(_) => serializer.serialize_none(),
        }
    }
}

/// Parse a date string in various formats. Dates without an offset are
/// taken as UTC.
fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&d.and_hms_opt(0, 0, 0)?));
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    None
}
