//! Integration tests for herald-common crate.

use chrono::{TimeZone, Utc};
use herald_common::{
    format_duration_secs, format_timestamp, title_case, truncate_string, ChannelId, GuildId, UserId,
};

#[test]
fn test_channel_id_display() {
    let channel_id = ChannelId(123456789);
    assert_eq!(format!("{}", channel_id), "123456789");
}

#[test]
fn test_user_id_display() {
    let user_id = UserId(987654321);
    assert_eq!(format!("{}", user_id), "987654321");
}

#[test]
fn test_guild_id_display() {
    let guild_id = GuildId(555);
    assert_eq!(format!("{}", guild_id), "555");
}

#[test]
fn test_format_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    assert_eq!(format_timestamp(timestamp), "2024-01-01 12:00:00 UTC");
}

#[test]
fn test_title_case_categories() {
    assert_eq!(title_case("developer"), "Developer");
    assert_eq!(title_case("context_menus"), "Context Menus");
}

#[test]
fn test_truncate_string() {
    let truncated = truncate_string("This is a very long string that should be truncated", 20);
    assert_eq!(truncated, "This is a very lo...");
    assert_eq!(truncate_string("Short", 20), "Short");
}

#[test]
fn test_format_duration() {
    assert_eq!(format_duration_secs(3_600), "1h 0m 0s");
}
