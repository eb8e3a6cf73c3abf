//! Tests for the snowflake newtypes in herald-common.

use std::collections::HashMap;
use herald_common::types::*;

#[test]
fn test_channel_id_implements_expected_traits() {
    let channel_id = ChannelId(123456789);

    assert_eq!(format!("{:?}", channel_id), "ChannelId(123456789)");
    assert_eq!(format!("{}", channel_id), "123456789");

    let copied_id = channel_id;
    assert_eq!(channel_id, copied_id);
    assert_ne!(channel_id, ChannelId(987654321));

    let mut map = HashMap::new();
    map.insert(channel_id, "test_channel");
    assert_eq!(map.get(&channel_id), Some(&"test_channel"));
}

#[test]
fn test_user_id_serializes_as_number() {
    let user_id = UserId(987654321);
    let serialized = serde_json::to_string(&user_id).unwrap();
    assert_eq!(serialized, "987654321");

    let deserialized: UserId = serde_json::from_str(&serialized).unwrap();
    assert_eq!(deserialized, user_id);
}

#[test]
fn test_snowflake_accepts_quoted_string() {
    let guild: GuildId = serde_json::from_str("\"290182686365188096\"").unwrap();
    assert_eq!(guild.get(), 290182686365188096);
}

#[test]
fn test_snowflake_rejects_garbage() {
    assert!(serde_json::from_str::<UserId>("\"not-a-number\"").is_err());
    assert!(serde_json::from_str::<UserId>("-5").is_err());
}

#[test]
fn test_error_display() {
    let err = HeraldError::Config("missing token".to_string());
    assert_eq!(err.to_string(), "Configuration error: missing token");

    let io = HeraldError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    assert!(io.to_string().starts_with("I/O error"));
}
