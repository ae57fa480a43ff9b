//! Date helper functions

use chrono::Datelike;

use crate::content::PostDate;
use crate::i18n::Locale;

/// Text rendered in place of a date that could not be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Format a post date as `MMM. DD, YYYY` with the locale's month names
///
/// # Examples
/// ```ignore
/// format_date(&date, Locale::En) // -> "Jan. 05, 2024"
/// format_date(&date, Locale::Fr) // -> "Janv. 05, 2024"
/// ```
pub fn format_date(date: &PostDate, lang: Locale) -> String {
    let Some(dt) = date.timestamp() else {
        return INVALID_DATE.to_string();
    };

    let month = lang.short_months()[dt.month0() as usize];
    format!("{}. {:02}, {}", month, dt.day(), dt.year())
}

/// Format a post date as `YYYY-MM-DD`, or [`INVALID_DATE`]
pub fn short_date(date: &PostDate) -> String {
    match date.timestamp() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        let date = PostDate::parse("2024-01-05");
        assert_eq!(format_date(&date, Locale::En), "Jan. 05, 2024");
        assert_eq!(format_date(&date, Locale::Fr), "Janv. 05, 2024");

        let august = PostDate::parse("2023-08-15 10:00:00");
        assert_eq!(format_date(&august, Locale::Fr), "Août. 15, 2023");
    }

    #[test]
    fn test_invalid_date() {
        let date = PostDate::parse("not-a-date");
        assert_eq!(format_date(&date, Locale::En), INVALID_DATE);
        assert_eq!(short_date(&date), INVALID_DATE);
    }

    #[test]
    fn test_short_date() {
        assert_eq!(short_date(&PostDate::parse("2024/03/09")), "2024-03-09");
    }
}
