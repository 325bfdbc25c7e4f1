use chrono::NaiveDate;

/// Render a catalog `YYYY-MM-DD` date as `"March 7, 2024"`.
///
/// Unreleased titles come back with an empty string, which yields `None`.
pub fn format_release_date(raw: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    Some(date.format("%B %-d, %Y").to_string())
}
