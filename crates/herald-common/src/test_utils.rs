//! Test utilities and shared test helpers for Herald.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use std::sync::Once;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Create a tokio runtime for testing async functions.
/// This is useful for tests that need to run async code in a synchronous test context.
pub fn create_test_runtime() -> Runtime {
    Runtime::new().expect("Failed to create test runtime")
}

/// Create a temporary directory for tests that automatically cleans up.
#[cfg(feature = "tempfile")]
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Write `contents` to `relative` under `root`, creating parent directories.
#[cfg(feature = "tempfile")]
pub fn write_file(root: &std::path::Path, relative: &str, contents: &str) -> std::path::PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}

/// Discord-related test utilities.
pub mod discord_fixtures {
    use crate::{ChannelId, GuildId, UserId};

    /// Create a test channel ID.
    pub const fn test_channel_id() -> ChannelId {
        ChannelId(123_456_789_012_345_678)
    }

    /// Create a test guild ID.
    pub const fn test_guild_id() -> GuildId {
        GuildId(555_555_555_555_555_555)
    }

    /// Create a test user ID.
    pub const fn test_user_id() -> UserId {
        UserId(987_654_321_098_765_432)
    }

    /// The bot's own user ID in fixtures.
    pub const fn test_client_id() -> UserId {
        UserId(111_111_111_111_111_111)
    }

    /// Create multiple test user IDs.
    pub fn test_user_ids(count: usize) -> Vec<UserId> {
        (0..count as u64)
            .map(|i| UserId(100_000_000_000_000_000 + i))
            .collect()
    }
}

/// Configuration-related test utilities.
pub mod config_fixtures {
    /// Create a minimal valid test configuration as YAML string.
    pub const fn minimal_config_yaml() -> &'static str {
        r#"
discord:
  token: "test_token"
  client_id: "111111111111111111"

permissions:
  owner_id: "290182686365188096"
"#
    }

    /// Create a full test configuration as YAML string.
    pub const fn full_config_yaml() -> &'static str {
        concat!(
            "discord:\n",
            "  token: \"test_token_full\"\n",
            "  client_id: \"111111111111111111\"\n",
            "  test_guild_id: \"555555555555555555\"\n",
            "\n",
            "permissions:\n",
            "  owner_id: \"290182686365188096\"\n",
            "  developers:\n",
            "    - \"290182686365188096\"\n",
            "    - \"123123123123123123\"\n",
            "\n",
            "commands:\n",
            "  directory: \"commands\"\n",
            "  refresh_on_startup: true\n",
            "  debug_registration_data: false\n",
            "  debug_throttling: true\n",
            "\n",
            "dispatch:\n",
            "  throttle_bypass_level: 4\n",
            "  allow_direct_messages: false\n",
            "  prompt_timeout_seconds: 60\n",
            "  locale: \"en-US\"\n",
            "\n",
            "throttle:\n",
            "  sweep_interval_seconds: 120\n",
            "\n",
            "api:\n",
            "  enabled: true\n",
            "  bind: \"127.0.0.1\"\n",
            "  port: 3030\n",
            "\n",
            "logging:\n",
            "  level: \"debug\"\n",
            "  format: \"compact\"\n",
            "\n",
            "links:\n",
            "  support_server: \"https://discord.gg/example\"\n",
            "  invite: \"https://discord.com/oauth2/authorize?client_id=111111111111111111\"\n"
        )
    }
}

/// Property-based testing utilities using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::{ChannelId, GuildId, UserId};
    use proptest::prelude::*;

    /// Strategy for generating valid Discord channel IDs.
    pub fn channel_id_strategy() -> impl Strategy<Value = ChannelId> {
        (100_000_000_000_000_000u64..=999_999_999_999_999_999u64).prop_map(ChannelId)
    }

    /// Strategy for generating valid Discord guild IDs.
    pub fn guild_id_strategy() -> impl Strategy<Value = GuildId> {
        (100_000_000_000_000_000u64..=999_999_999_999_999_999u64).prop_map(GuildId)
    }

    /// Strategy for generating valid Discord user IDs.
    pub fn user_id_strategy() -> impl Strategy<Value = UserId> {
        (100_000_000_000_000_000u64..=999_999_999_999_999_999u64).prop_map(UserId)
    }

    /// Strategy for generating command identifiers.
    pub fn command_name_strategy() -> impl Strategy<Value = String> {
        r"[a-z][a-z0-9_-]{0,31}".prop_map(|s| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_multiple_calls() {
        // Should not panic when called multiple times
        init_test_logging();
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_create_test_runtime() {
        let runtime = create_test_runtime();
        let result = runtime.block_on(async { 42 });
        assert_eq!(result, 42);
    }

    #[test]
    fn test_user_ids_are_distinct() {
        let ids = discord_fixtures::test_user_ids(3);
        assert_eq!(ids.len(), 3);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
    }

    #[cfg(feature = "proptest")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_property_channel_id_display(id in property_testing::channel_id_strategy()) {
                let displayed = format!("{}", id);
                let parsed: u64 = displayed.parse().unwrap();
                prop_assert_eq!(id.0, parsed);
            }

            #[test]
            fn test_property_command_name_valid(name in property_testing::command_name_strategy()) {
                prop_assert!(!name.is_empty());
                prop_assert!(name.len() <= 32);
            }
        }
    }
}
