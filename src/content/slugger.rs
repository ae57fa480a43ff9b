//! Heading slugs compatible with GitHub's anchor ids
//!
//! One `Slugger` is created per document. Both the rendered heading ids and
//! the table of contents go through this type, so their anchors agree.

use std::collections::HashMap;

/// Generates document-unique slugs, suffixing repeats with `-1`, `-2`, ...
#[derive(Debug, Default, Clone)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slug `text`, unique among the slugs this instance returned so far
    pub fn slug(&mut self, text: &str) -> String {
        let original = slugify(text);
        let mut result = original.clone();

        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.clone()).or_insert(0);
            *count += 1;
            result = format!("{}-{}", original, count);
        }

        self.occurrences.insert(result.clone(), 0);
        result
    }
}

/// Stateless slug: lowercase, punctuation dropped, spaces turned into `-`
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}
