//! Shared utility functions with zero-cost abstractions.

use chrono::{DateTime, Utc};

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Upper-cases the first letter of every whitespace, dash or underscore separated word.
///
/// Separators are normalized to single spaces, so `"system-tools"` becomes `"System Tools"`.
pub fn title_case(input: &str) -> String {
    input
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a camel or pascal case identifier into words joined by `separator`.
///
/// `"KickMembers"` with `" "` becomes `"Kick Members"`.
pub fn split_camel_case(input: &str, separator: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower = false;
    for c in input.chars() {
        if c.is_uppercase() && prev_lower {
            out.push_str(separator);
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        out.push(c);
    }
    out
}

/// Converts a pascal case capability name to its screaming snake form.
///
/// `"ManageGuild"` becomes `"MANAGE_GUILD"`; names that are already upper case pass through.
pub fn to_screaming_snake(input: &str) -> String {
    if input.chars().all(|c| c.is_uppercase() || c == '_' || c.is_ascii_digit()) {
        return input.to_string();
    }
    split_camel_case(input, "_").to_uppercase()
}

/// Truncates a string to a maximum length with ellipsis, respecting char boundaries.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Renders a duration in whole seconds as `"1d 2h 3m 4s"`, dropping leading zero units.
pub fn format_duration_secs(total: u64) -> String {
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 || !parts.is_empty() {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 || !parts.is_empty() {
        parts.push(format!("{minutes}m"));
    }
    parts.push(format!("{seconds}s"));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let formatted = format_timestamp(timestamp);
        assert_eq!(formatted, "2024-01-01 12:00:00 UTC");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("system"), "System");
        assert_eq!(title_case("developer-tools"), "Developer Tools");
        assert_eq!(title_case("PING"), "Ping");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("KickMembers", " "), "Kick Members");
        assert_eq!(split_camel_case("Administrator", " "), "Administrator");
    }

    #[test]
    fn test_to_screaming_snake() {
        assert_eq!(to_screaming_snake("KickMembers"), "KICK_MEMBERS");
        assert_eq!(to_screaming_snake("KICK_MEMBERS"), "KICK_MEMBERS");
        assert_eq!(to_screaming_snake("Administrator"), "ADMINISTRATOR");
    }

    #[test]
    fn test_truncate_string() {
        let input = "This is a very long string that should be truncated";
        assert_eq!(truncate_string(input, 20), "This is a very lo...");
        assert_eq!(truncate_string("Short", 20), "Short");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration_secs(5), "5s");
        assert_eq!(format_duration_secs(65), "1m 5s");
        assert_eq!(format_duration_secs(90_061), "1d 1h 1m 1s");
    }
}
