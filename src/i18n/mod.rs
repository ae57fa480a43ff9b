//! Locale handling
//!
//! The site is published in a closed set of locales. Every locale owns a
//! content directory (`content/posts/<code>/`) and a URL prefix (`/<code>/`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supported site locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Fr,
    En,
}

/// Error returned when a string names no supported locale
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct UnknownLocale(pub String);

impl Locale {
    /// Locale used when nothing better can be negotiated
    pub const DEFAULT: Locale = Locale::Fr;

    /// All locales, in the order they are listed in sitemaps and alternates
    pub fn all() -> &'static [Locale] {
        &[Locale::En, Locale::Fr]
    }

    /// Short code, also the content directory and URL prefix
    pub fn code(self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    /// Abbreviated month names, capitalized and without trailing dots
    pub fn short_months(self) -> &'static [&'static str; 12] {
        match self {
            Locale::Fr => &[
                "Janv", "Févr", "Mars", "Avr", "Mai", "Juin", "Juil", "Août", "Sept", "Oct",
                "Nov", "Déc",
            ],
            Locale::En => &[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ],
        }
    }

    /// Returns the locale prefixing a URL path, if any.
    ///
    /// Matches `/fr` and `/fr/...` but not `/france`.
    pub fn from_path(path: &str) -> Option<Locale> {
        let first = path.trim_start_matches('/').split('/').next()?;
        first.parse().ok()
    }

    /// Pick the best supported locale for an `Accept-Language` header.
    ///
    /// Language ranges are tried by descending quality; a range matches a
    /// locale when its primary subtag equals the locale code (`en-GB` picks
    /// `en`). Ranges with `q=0` are ignored. Falls back to
    /// [`Locale::DEFAULT`].
    pub fn negotiate(accept_language: Option<&str>) -> Locale {
        let Some(header) = accept_language else {
            return Locale::DEFAULT;
        };

        let mut ranges: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let quality = pieces
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, quality))
            })
            .filter(|(_, q)| *q > 0.0)
            .collect();

        // Stable: equal qualities keep header order
        ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        ranges
            .into_iter()
            .find_map(|(tag, _)| {
                let primary = tag.split('-').next().unwrap_or(tag);
                primary.parse::<Locale>().ok()
            })
            .unwrap_or(Locale::DEFAULT)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::DEFAULT
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fr" => Ok(Locale::Fr),
            "en" => Ok(Locale::En),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}
