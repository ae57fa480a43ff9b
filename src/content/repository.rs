//! Post repository - reads posts from `<posts_dir>/<locale>/<slug>.md`
//!
//! Nothing is cached: every call goes back to the filesystem, so results
//! always reflect the files as they are at call time.

use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ContentError, Result};
use super::{FrontMatter, Post, PostSource};
use crate::i18n::Locale;

/// Group key for posts whose date is invalid
pub const UNKNOWN_YEAR: &str = "unknown";

/// A tag and the number of posts carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: usize,
}

/// Reads posts for a locale from the content directory
#[derive(Debug, Clone)]
pub struct PostRepository {
    posts_dir: PathBuf,
    default_image: String,
}

impl PostRepository {
    /// Create a repository over `posts_dir`, using `default_image` for posts
    /// without an `image` field
    pub fn new<P: Into<PathBuf>>(posts_dir: P, default_image: &str) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            default_image: default_image.to_string(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Directory holding the posts of `lang`
    pub fn locale_dir(&self, lang: Locale) -> PathBuf {
        self.posts_dir.join(lang.code())
    }

    /// Load a single post. Returns `Ok(None)` if no such post exists.
    pub fn get_post_by_slug(&self, slug: &str, lang: Locale) -> Result<Option<Post>> {
        Ok(self.read_post(slug, lang)?.map(|source| source.post))
    }

    /// Load a single post along with its Markdown body
    pub fn read_post(&self, slug: &str, lang: Locale) -> Result<Option<PostSource>> {
        if !is_valid_slug(slug) {
            tracing::debug!("Rejecting slug {:?}", slug);
            return Ok(None);
        }

        let path = self.locale_dir(lang).join(format!("{}.md", slug));
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ContentError::io(path, e)),
        };

        let (fm, body) = FrontMatter::parse(&content).map_err(|source| {
            ContentError::FrontMatter {
                path: path.clone(),
                source,
            }
        })?;

        let date = fm.post_date();
        if !date.is_valid() {
            tracing::warn!("Post {:?} has an invalid date", path);
        }

        let title = fm.title.unwrap_or_else(|| {
            tracing::warn!("Post {:?} has no title", path);
            String::new()
        });

        let post = Post {
            slug: slug.to_string(),
            title,
            date,
            description: fm.description.unwrap_or_default(),
            tags: fm.tags,
            lang,
            image: fm.image.unwrap_or_else(|| self.default_image.clone()),
        };

        Ok(Some(PostSource {
            post,
            body: body.to_string(),
        }))
    }

    /// Load every post of a locale, newest first.
    ///
    /// A missing locale directory yields no posts. Posts that fail to load
    /// are logged and skipped. Posts with equal dates keep file name order,
    /// and posts with invalid dates come last.
    pub fn get_all_posts(&self, lang: Locale) -> Result<Vec<Post>> {
        let mut posts = Vec::new();

        for slug in self.slugs(lang)? {
            match self.get_post_by_slug(&slug, lang) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => tracing::debug!("Post {} disappeared while listing", slug),
                Err(e) => tracing::warn!("Failed to load post {}: {}", slug, e),
            }
        }

        // Stable sort, newest first; None (invalid) orders below every date
        posts.sort_by(|a, b| b.date.timestamp().cmp(&a.date.timestamp()));

        tracing::debug!("Loaded {} posts for {}", posts.len(), lang);
        Ok(posts)
    }

    /// Slugs of the Markdown files of a locale, in file name order.
    ///
    /// Unlike [`get_all_posts`](Self::get_all_posts) this never opens a file.
    pub fn slugs(&self, lang: Locale) -> Result<Vec<String>> {
        let dir = self.locale_dir(lang);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
                    match e.into_io_error() {
                        Some(io) => return Err(ContentError::io(path, io)),
                        None => continue,
                    }
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(slug) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.strip_suffix(".md"))
            {
                slugs.push(slug.to_string());
            }
        }

        Ok(slugs)
    }

    /// Posts of a locale carrying `tag` (case-insensitive), newest first
    pub fn get_posts_by_tag(&self, lang: Locale, tag: &str) -> Result<Vec<Post>> {
        Ok(self
            .get_all_posts(lang)?
            .into_iter()
            .filter(|post| post.has_tag(tag))
            .collect())
    }

    /// Distinct tags of a locale with their post counts, most used first.
    ///
    /// Tags differing only by case are counted together under their first
    /// spelling.
    pub fn tags(&self, lang: Locale) -> Result<Vec<TagCount>> {
        let mut counts: IndexMap<String, TagCount> = IndexMap::new();
        for post in self.get_all_posts(lang)? {
            for tag in &post.tags {
                counts
                    .entry(tag.to_lowercase())
                    .or_insert_with(|| TagCount {
                        name: tag.clone(),
                        count: 0,
                    })
                    .count += 1;
            }
        }

        let mut tags: Vec<TagCount> = counts.into_values().collect();
        tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(tags)
    }
}

/// Group posts by publication year, most recent year first.
///
/// Post order inside a year is preserved. Posts with invalid dates are
/// grouped last under [`UNKNOWN_YEAR`].
pub fn group_by_year(posts: Vec<Post>) -> IndexMap<String, Vec<Post>> {
    let mut groups: IndexMap<Option<i32>, Vec<Post>> = IndexMap::new();
    for post in posts {
        groups.entry(post.date.year()).or_default().push(post);
    }

    groups.sort_by(|a, _, b, _| b.cmp(a));

    groups
        .into_iter()
        .map(|(year, posts)| {
            let key = year.map_or_else(|| UNKNOWN_YEAR.to_string(), |y| y.to_string());
            (key, posts)
        })
        .collect()
}

/// A slug must name a file directly inside the locale directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostDate;
    use tempfile::TempDir;

    fn write_post(root: &Path, lang: &str, slug: &str, content: &str) {
        let dir = root.join(lang);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.md", slug)), content).unwrap();
    }

    fn post_file(title: &str, date: &str, tags: &[&str]) -> String {
        format!(
            "---\ntitle: {}\ndate: {}\ndescription: About {}\ntags: [{}]\n---\n\nBody of {}.\n",
            title,
            date,
            title,
            tags.join(", "),
            title
        )
    }

    fn repo(dir: &TempDir) -> PostRepository {
        PostRepository::new(dir.path(), "/og-default.png")
    }

    #[test]
    fn test_get_post_by_slug() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "hello", &post_file("Hello", "2024-01-15", &["rust"]));

        let post = repo(&dir).get_post_by_slug("hello", Locale::En).unwrap().unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.lang, Locale::En);
        assert_eq!(post.title, "Hello");
        assert_eq!(post.description, "About Hello");
        assert_eq!(post.tags, vec!["rust"]);
        assert_eq!(post.image, "/og-default.png");
        assert_eq!(post.date.year(), Some(2024));
    }

    #[test]
    fn test_missing_post_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(repo(&dir).get_post_by_slug("nope", Locale::Fr).unwrap().is_none());
    }

    #[test]
    fn test_slug_cannot_escape_locale_dir() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "secret", &post_file("Secret", "2024-01-01", &[]));

        let repo = repo(&dir);
        assert!(repo.get_post_by_slug("../en/secret", Locale::Fr).unwrap().is_none());
        assert!(repo.get_post_by_slug("", Locale::En).unwrap().is_none());
        assert!(repo.get_post_by_slug("..", Locale::En).unwrap().is_none());
    }

    #[test]
    fn test_read_post_returns_body() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "fr", "bonjour", &post_file("Bonjour", "2024-03-01", &[]));

        let source = repo(&dir).read_post("bonjour", Locale::Fr).unwrap().unwrap();
        assert_eq!(source.post.lang, Locale::Fr);
        assert_eq!(source.body.trim(), "Body of Bonjour.");
    }

    #[test]
    fn test_custom_image_and_invalid_date() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "en",
            "broken",
            "---\ntitle: Broken\ndate: \"not-a-date\"\nimage: /cover.png\n---\nBody\n",
        );

        let post = repo(&dir).get_post_by_slug("broken", Locale::En).unwrap().unwrap();
        assert_eq!(post.image, "/cover.png");
        assert_eq!(post.date, PostDate::Invalid("not-a-date".to_string()));
        assert_eq!(post.description, "");
    }

    #[test]
    fn test_invalid_frontmatter_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "bad", "---\ntitle: [oops\n---\nBody\n");

        let err = repo(&dir).get_post_by_slug("bad", Locale::En).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn test_get_all_posts_missing_locale_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(repo(&dir).get_all_posts(Locale::En).unwrap().is_empty());

        fs::create_dir_all(dir.path().join("fr")).unwrap();
        assert!(repo(&dir).get_all_posts(Locale::Fr).unwrap().is_empty());
    }

    #[test]
    fn test_get_all_posts_sorted_newest_first() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "b-middle", &post_file("Middle", "2023-06-01", &[]));
        write_post(dir.path(), "en", "a-old", &post_file("Old", "2022-01-01", &[]));
        write_post(dir.path(), "en", "c-new", &post_file("New", "2024-02-01", &[]));
        write_post(dir.path(), "en", "d-invalid", &post_file("Invalid", "\"someday\"", &[]));
        fs::write(dir.path().join("en").join("notes.txt"), "not a post").unwrap();

        let posts = repo(&dir).get_all_posts(Locale::En).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["c-new", "b-middle", "a-old", "d-invalid"]);

        for pair in posts.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].date.timestamp(), pair[1].date.timestamp()) {
                assert!(a >= b);
            }
        }
    }

    #[test]
    fn test_equal_dates_keep_file_name_order() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "zeta", &post_file("Zeta", "2024-01-01", &[]));
        write_post(dir.path(), "en", "alpha", &post_file("Alpha", "2024-01-01", &[]));

        let posts = repo(&dir).get_all_posts(Locale::En).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_broken_post_is_skipped_in_listing() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "good", &post_file("Good", "2024-01-01", &[]));
        write_post(dir.path(), "en", "bad", "---\ntitle: [oops\n---\n");

        let posts = repo(&dir).get_all_posts(Locale::En).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
    }

    #[test]
    fn test_posts_by_tag_and_tag_counts() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "one", &post_file("One", "2024-01-01", &["Rust", "web"]));
        write_post(dir.path(), "en", "two", &post_file("Two", "2023-01-01", &["rust"]));
        write_post(dir.path(), "en", "three", &post_file("Three", "2022-01-01", &["life"]));

        let repo = repo(&dir);
        let tagged = repo.get_posts_by_tag(Locale::En, "RUST").unwrap();
        let slugs: Vec<_> = tagged.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["one", "two"]);

        let tags = repo.tags(Locale::En).unwrap();
        assert_eq!(
            tags,
            vec![
                TagCount { name: "Rust".to_string(), count: 2 },
                TagCount { name: "life".to_string(), count: 1 },
                TagCount { name: "web".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_group_by_year() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "en", "a", &post_file("A", "2022-05-01", &[]));
        write_post(dir.path(), "en", "b", &post_file("B", "2024-05-01", &[]));
        write_post(dir.path(), "en", "c", &post_file("C", "2024-01-01", &[]));
        write_post(dir.path(), "en", "d", &post_file("D", "\"never\"", &[]));

        let posts = repo(&dir).get_all_posts(Locale::En).unwrap();
        let groups = group_by_year(posts);
        let years: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(years, vec!["2024", "2022", UNKNOWN_YEAR]);

        let in_2024: Vec<_> = groups["2024"].iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(in_2024, vec!["b", "c"]);
    }
}
