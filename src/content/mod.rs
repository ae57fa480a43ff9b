//! Content module - posts, Markdown rendering, table of contents and navigation

mod error;
mod frontmatter;
mod markdown;
mod navigation;
mod page;
mod post;
pub mod repository;
mod slugger;
mod toc;

pub use error::ContentError;
pub use frontmatter::{FrontMatter, RawDate};
pub use markdown::MarkdownRenderer;
pub use navigation::{related_post, PostNavigation};
pub use page::PostPage;
pub use post::{Post, PostDate, PostSource};
pub use repository::{group_by_year, PostRepository, TagCount};
pub use slugger::{slugify, Slugger};
pub use toc::{extract_headings, Heading};
