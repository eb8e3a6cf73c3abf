//! Fluent bundle loading from the resources embedded at compile time.

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::FluentResource;
use herald_common::{HeraldError, Result};
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Locale used when the configured one has no resources.
pub const FALLBACK_LOCALE: &str = "en-US";

/// Thread-safe bundle shared by every dispatch task.
pub type Bundle = FluentBundle<FluentResource>;

const EMBEDDED: &[(&str, &str)] = &[("en-US", include_str!("../locales/en-US/herald.ftl"))];

/// Fluent bundle loader.
pub struct FluentLoader;

impl FluentLoader {
    /// Locales with embedded resources.
    pub fn available_locales() -> impl Iterator<Item = &'static str> {
        EMBEDDED.iter().map(|(locale, _)| *locale)
    }

    /// Loads the embedded bundle for `locale`.
    pub fn load_bundle(locale: &str) -> Result<Bundle> {
        let (_, source) = EMBEDDED
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(locale))
            .ok_or_else(|| HeraldError::Localization(format!("no resources for locale {locale}")))?;
        Self::bundle_from_source(locale, source)
    }

    /// Loads `locale`, falling back to [`FALLBACK_LOCALE`] when it is unavailable.
    pub fn load_with_fallback(locale: &str) -> Result<Bundle> {
        match Self::load_bundle(locale) {
            Ok(bundle) => Ok(bundle),
            Err(e) if !locale.eq_ignore_ascii_case(FALLBACK_LOCALE) => {
                warn!("{e}, falling back to {FALLBACK_LOCALE}");
                Self::load_bundle(FALLBACK_LOCALE)
            }
            Err(e) => Err(e),
        }
    }

    /// Builds a bundle from raw FTL source.
    pub fn bundle_from_source(locale: &str, source: &str) -> Result<Bundle> {
        let langid: LanguageIdentifier = locale
            .parse()
            .map_err(|e| HeraldError::Localization(format!("invalid locale {locale}: {e}")))?;

        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            HeraldError::Localization(format!(
                "failed to parse {locale} resource: {}",
                errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        let mut bundle = FluentBundle::new_concurrent(vec![langid]);
        // Discord renders the bidi isolation marks literally.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            HeraldError::Localization(format!(
                "duplicate messages in {locale} resource: {}",
                errors.len()
            ))
        })?;

        debug!(locale, "Loaded message bundle");
        Ok(bundle)
    }
}
