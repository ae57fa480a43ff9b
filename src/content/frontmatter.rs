//! Front-matter parsing

use serde::{Deserialize, Deserializer};

use super::post::PostDate;

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// A front-matter date as written: YAML gives either text or a number
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawDate {
    /// Milliseconds since the Unix epoch
    Millis(i64),
    Text(String),
}

impl RawDate {
    /// Normalize to a [`PostDate`]; never fails
    pub fn to_post_date(&self) -> PostDate {
        match self {
            RawDate::Millis(ms) => PostDate::from_millis(*ms),
            RawDate::Text(s) => PostDate::parse(s),
        }
    }
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<RawDate>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Vec<String>,
    pub image: Option<String>,
}

impl FrontMatter {
    /// Split a document into its front-matter and body.
    ///
    /// A document without a `---` block, or whose opening `---` is never
    /// closed, has default front-matter and is all body.
    pub fn parse(content: &str) -> Result<(Self, &str), serde_yaml::Error> {
        let Some((yaml, body)) = split(content) else {
            return Ok((FrontMatter::default(), content));
        };

        if yaml.trim().is_empty() {
            return Ok((FrontMatter::default(), body));
        }

        let fm = serde_yaml::from_str::<FrontMatter>(yaml)?;
        Ok((fm, body))
    }

    /// Normalized publication date; a missing date is invalid
    pub fn post_date(&self) -> PostDate {
        match &self.date {
            Some(raw) => raw.to_post_date(),
            None => PostDate::Invalid(String::new()),
        }
    }
}

/// Find the `---` fenced block at the very top of `content`
fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let first_line_end = content.find('\n')?;
    if content[..first_line_end].trim_end() != "---" {
        return None;
    }

    let yaml_start = first_line_end + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == "---" {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    None
}
