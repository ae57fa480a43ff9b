//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::i18n::Locale;

/// Characters `encodeURIComponent` escapes: everything but `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generate a localized URL
///
/// # Examples
/// ```ignore
/// localized_url("https://example.com", Locale::Fr, "blog") // -> "https://example.com/fr/blog"
/// localized_url("https://example.com", Locale::Fr, "")     // -> "https://example.com/fr"
/// ```
pub fn localized_url(base_url: &str, lang: Locale, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_matches('/');

    if path.is_empty() {
        format!("{}/{}", base, lang)
    } else {
        format!("{}/{}/{}", base, lang, path)
    }
}

/// URL of a post page
pub fn post_url(base_url: &str, lang: Locale, slug: &str) -> String {
    localized_url(base_url, lang, &format!("post/{}", encode_component(slug)))
}

/// URL of a tag page
pub fn tag_url(base_url: &str, lang: Locale, tag: &str) -> String {
    localized_url(base_url, lang, &format!("tags/{}", encode_component(tag)))
}

/// Encode a single path segment
pub fn encode_component(segment: &str) -> String {
    utf8_percent_encode(segment, COMPONENT).to_string()
}
