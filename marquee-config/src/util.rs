use std::time::Duration;

/// Parse a boolean value from a raw string, accepting common env-style forms.
///
/// Accepted truthy values (case-insensitive): `"1"`, `"true"`, `"yes"`, `"on"`.
/// Accepted falsy values: `"0"`, `"false"`, `"no"`, `"off"`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a human duration such as `"15s"` or `"1m 30s"`. A bare number is
/// taken as seconds.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let trimmed = raw.trim();
    if let Ok(secs) = trimmed.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    humantime::parse_duration(trimmed).ok()
}

/// Parse an optional cap: a positive number enables it, `0` or a falsy word
/// disables it.
pub fn parse_cap(raw: &str) -> Option<Option<usize>> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<usize>() {
        return Some((value > 0).then_some(value));
    }
    match parse_bool(trimmed) {
        Some(false) => Some(None),
        _ => None,
    }
}

/// Treat blank strings as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_accept_seconds_and_humantime() {
        assert_eq!(parse_duration("15"), Some(Duration::from_secs(15)));
        assert_eq!(parse_duration("15s"), Some(Duration::from_secs(15)));
        assert_eq!(parse_duration("1m 30s"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn caps_can_be_disabled() {
        assert_eq!(parse_cap("20"), Some(Some(20)));
        assert_eq!(parse_cap("0"), Some(None));
        assert_eq!(parse_cap("off"), Some(None));
        assert_eq!(parse_cap("lots"), None);
    }
}
