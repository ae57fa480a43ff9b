//! Navigation between posts

use serde::Serialize;

use super::Post;

/// Neighbors of a post in a newest-first list, plus a related pick
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostNavigation {
    /// Older post (the one after it in the list)
    pub previous: Option<Post>,
    /// More recent post (the one before it in the list)
    pub next: Option<Post>,
    /// Another post of the list, stable for a given slug and list
    pub related: Option<Post>,
}

impl PostNavigation {
    /// Resolve navigation for `slug` in `posts`, sorted newest first.
    ///
    /// A slug missing from the list has neither neighbor but can still be
    /// given a related post.
    pub fn resolve(posts: &[Post], slug: &str) -> Self {
        let (previous, next) = match posts.iter().position(|p| p.slug == slug) {
            Some(index) => (
                posts.get(index + 1).cloned(),
                index.checked_sub(1).and_then(|i| posts.get(i)).cloned(),
            ),
            None => (None, None),
        };

        Self {
            previous,
            next,
            related: related_post(posts, slug).cloned(),
        }
    }
}

/// Pick a post other than `slug` from `posts`.
///
/// The index is the sum of the slug's UTF-16 code units modulo the number of
/// other posts, so the same slug and list always give the same post.
pub fn related_post<'a>(posts: &'a [Post], slug: &str) -> Option<&'a Post> {
    let others: Vec<&Post> = posts.iter().filter(|p| p.slug != slug).collect();
    if others.is_empty() {
        return None;
    }

    let index = slug_seed(slug) % others.len() as u64;
    others.get(index as usize).copied()
}

fn slug_seed(slug: &str) -> u64 {
    slug.encode_utf16().map(u64::from).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDate;
    use crate::i18n::Locale;

    fn post(slug: &str, date: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            date: PostDate::parse(date),
            description: String::new(),
            tags: Vec::new(),
            lang: Locale::En,
            image: "/og-default.png".to_string(),
        }
    }

    fn five_posts() -> Vec<Post> {
        vec![
            post("p5", "2024-05-01"),
            post("p4", "2024-04-01"),
            post("p3", "2024-03-01"),
            post("p2", "2024-02-01"),
            post("p1", "2024-01-01"),
        ]
    }

    fn slug_of(post: &Option<Post>) -> Option<&str> {
        post.as_ref().map(|p| p.slug.as_str())
    }

    #[test]
    fn test_middle_post() {
        let nav = PostNavigation::resolve(&five_posts(), "p3");
        assert_eq!(slug_of(&nav.next), Some("p4"));
        assert_eq!(slug_of(&nav.previous), Some("p2"));
    }

    #[test]
    fn test_boundaries() {
        let posts = five_posts();
        let newest = PostNavigation::resolve(&posts, "p5");
        assert_eq!(slug_of(&newest.next), None);
        assert_eq!(slug_of(&newest.previous), Some("p4"));

        let oldest = PostNavigation::resolve(&posts, "p1");
        assert_eq!(slug_of(&oldest.previous), None);
        assert_eq!(slug_of(&oldest.next), Some("p2"));
    }

    #[test]
    fn test_related_is_deterministic() {
        let posts = five_posts();
        let first = related_post(&posts, "p3").map(|p| p.slug.clone());
        let second = related_post(&posts, "p3").map(|p| p.slug.clone());
        assert_eq!(first, second);

        // 'p' (112) + '3' (51) = 163; others = [p5, p4, p2, p1]; 163 % 4 = 3
        assert_eq!(first.as_deref(), Some("p1"));
    }

    #[test]
    fn test_related_never_self() {
        let posts = five_posts();
        for p in &posts {
            let related = related_post(&posts, &p.slug).unwrap();
            assert_ne!(related.slug, p.slug);
        }
    }

    #[test]
    fn test_single_post_has_no_related() {
        let posts = vec![post("only", "2024-01-01")];
        let nav = PostNavigation::resolve(&posts, "only");
        assert_eq!(nav, PostNavigation::default());
    }

    #[test]
    fn test_unknown_slug() {
        let posts = five_posts();
        let nav = PostNavigation::resolve(&posts, "missing");
        assert!(nav.previous.is_none());
        assert!(nav.next.is_none());
        assert!(nav.related.is_some());
    }

    #[test]
    fn test_seed_uses_utf16_units() {
        assert_eq!(slug_seed("ab"), 97 + 98);
        assert_eq!(slug_seed("é"), 0xe9);
        // Astral characters count as a surrogate pair
        assert_eq!(slug_seed("😀"), 0xd83d + 0xde00);
    }
}
