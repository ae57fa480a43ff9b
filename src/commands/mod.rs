//! CLI subcommands

pub mod list;
pub mod show;
pub mod sitemap;
pub mod tags;

use anyhow::Result;

use crate::i18n::Locale;

/// Locales selected by an optional `--lang` flag: one, or all of them
pub(crate) fn selected_locales(lang: Option<Locale>) -> Vec<Locale> {
    match lang {
        Some(lang) => vec![lang],
        None => Locale::all().to_vec(),
    }
}

/// Print `value` as pretty JSON
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
