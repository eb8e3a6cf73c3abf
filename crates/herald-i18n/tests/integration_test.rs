//! Integration tests for herald-i18n crate.

use herald_common::test_utils::init_test_logging;
use herald_i18n::{keys, FluentLoader, Messages, FALLBACK_LOCALE};

const ALL_KEYS: &[&str] = &[
    keys::COMMAND_UNAVAILABLE,
    keys::COMMAND_DISABLED,
    keys::INSUFFICIENT_PERMISSION,
    keys::MISSING_CLIENT_CAPABILITIES,
    keys::MISSING_CALLER_CAPABILITIES,
    keys::NSFW_MISMATCH,
    keys::THROTTLED,
    keys::DIRECT_MESSAGES_UNSUPPORTED,
    keys::COMPONENT_NOT_YOURS,
    keys::PING,
    keys::STATS,
    keys::LATENCY_UNKNOWN,
    keys::MEMORY_UNAVAILABLE,
    keys::PERMLEVEL,
    keys::RELOAD_NOT_FOUND,
    keys::RELOAD_FAILED,
    keys::RELOAD_SUCCESS,
    keys::DEPLOY_CONFIRM,
    keys::DEPLOY_SUCCESS,
    keys::DEPLOY_FAILED,
    keys::DEPLOY_CANCELLED,
    keys::PROMPT_EXPIRED,
    keys::PROMPT_ANSWERED,
    keys::LINK_MISSING,
];

#[test]
fn test_every_key_is_translated() {
    init_test_logging();
    for locale in FluentLoader::available_locales() {
        let messages = Messages::new(locale).unwrap();
        for key in ALL_KEYS {
            assert!(messages.has(key), "{locale} is missing {key}");
        }
    }
}

#[test]
fn test_fallback_language() {
    let messages = Messages::new("fr-FR").unwrap();
    assert_eq!(messages.locale(), FALLBACK_LOCALE);
}

#[test]
fn test_multiline_capability_list() {
    let messages = Messages::new(FALLBACK_LOCALE).unwrap();
    let text = messages.get_with_args(
        keys::MISSING_CLIENT_CAPABILITIES,
        &[
            ("user", "<@1>"),
            ("channel", "<#2>"),
            ("capabilities", "Send Messages, Embed Links"),
        ],
    );
    assert!(text.contains("I lack"));
    assert!(text.ends_with("• Send Messages, Embed Links"));
    assert!(!text.contains('\u{2068}'));
}

#[test]
fn test_custom_bundle() {
    let bundle = FluentLoader::bundle_from_source("en-GB", "greeting = Hello, { $name }").unwrap();
    let messages = Messages::from_bundle("en-GB", bundle);
    assert_eq!(messages.get_with_args("greeting", &[("name", "herald")]), "Hello, herald");
}

mod interpolation_properties {
    use herald_i18n::{keys, Messages};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn arguments_are_inserted_verbatim(command in "[a-z][a-z0-9-]{0,31}", seconds in 0u32..10_000) {
            let messages = Messages::new("en-US").unwrap();
            let seconds = seconds.to_string();
            let text = messages.get_with_args(
                keys::THROTTLED,
                &[("user", "<@1>"), ("command", command.as_str()), ("seconds", seconds.as_str())],
            );
            let expected = format!("/{command}");
            prop_assert!(text.contains(&expected));
            prop_assert!(text.contains(&seconds));
            let isolated = text.contains('\u{2068}');
            prop_assert!(!isolated);
        }
    }
}
