//! Helper functions shared by the CLI, the server and the sitemap
//!
//! Date formatting and URL building for localized pages.

mod date;
mod url;

pub use date::*;
pub use url::*;
