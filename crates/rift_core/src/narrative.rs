//! Match narrative localization.
//!
//! Event descriptions are Fluent messages. The bundled locales are compiled into the crate,
//! so a `Narrator` never touches the filesystem.

use std::collections::HashMap;

use fluent::{FluentArgs, FluentBundle, FluentResource};
use fluent_langneg::{negotiate_languages, NegotiationStrategy};
use tracing::{error, warn};
use unic_langid::LanguageIdentifier;

use crate::error::ConfigError;

pub const FALLBACK_LOCALE: &str = "en-US";

const BUNDLED: &[(&str, &str)] = &[
    ("en-US", include_str!("../locales/en-US.ftl")),
    ("ko-KR", include_str!("../locales/ko-KR.ftl")),
];

/// Renders narrative messages in one negotiated locale, falling back to `en-US` per key.
pub struct Narrator {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
    locale: String,
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator").field("locale", &self.locale).finish()
    }
}

impl Default for Narrator {
    fn default() -> Self {
        Self::new(FALLBACK_LOCALE)
    }
}

impl Narrator {
    /// Load the bundled locales and select the best match for `requested`.
    pub fn new(requested: &str) -> Self {
        let mut narrator = Self { bundles: HashMap::new(), locale: FALLBACK_LOCALE.to_string() };
        for (locale, source) in BUNDLED {
            if let Err(err) = narrator.load_locale(locale, source) {
                error!(locale, %err, "bundled locale failed to load");
            }
        }
        narrator.locale = narrator.negotiate(requested);
        narrator
    }

    /// Add or replace a locale from FTL source.
    pub fn load_locale(&mut self, locale: &str, source: &str) -> Result<(), ConfigError> {
        let resource = FluentResource::try_new(source.to_string())
            .map_err(|_| ConfigError::Invalid(format!("failed to parse FTL for {locale}")))?;
        let lang_id: LanguageIdentifier = locale
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid locale: {locale}")))?;

        let mut bundle = FluentBundle::new(vec![lang_id]);
        bundle.set_use_isolating(false);
        bundle
            .add_resource(resource)
            .map_err(|_| ConfigError::Invalid(format!("duplicate messages in {locale}")))?;
        self.bundles.insert(locale.to_string(), bundle);
        Ok(())
    }

    fn negotiate(&self, requested: &str) -> String {
        let available: Vec<LanguageIdentifier> =
            self.bundles.keys().filter_map(|k| k.parse().ok()).collect();
        let requested: Vec<LanguageIdentifier> =
            requested.parse::<LanguageIdentifier>().into_iter().collect();
        let default: Option<LanguageIdentifier> = FALLBACK_LOCALE.parse().ok();

        let negotiated = negotiate_languages(
            &requested,
            &available,
            default.as_ref(),
            NegotiationStrategy::Filtering,
        );
        negotiated
            .first()
            .map(|l| l.to_string())
            .unwrap_or_else(|| FALLBACK_LOCALE.to_string())
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn has_message(&self, locale: &str, key: &str) -> bool {
        self.bundles.get(locale).map_or(false, |b| b.has_message(key))
    }

    /// Format `key`, falling back to `en-US` and finally to `[key]`.
    pub fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        for locale in [self.locale.as_str(), FALLBACK_LOCALE] {
            let Some(bundle) = self.bundles.get(locale) else {
                continue;
            };
            let Some(pattern) = bundle.get_message(key).and_then(|m| m.value()) else {
                continue;
            };
            let mut errors = vec![];
            let text = bundle.format_pattern(pattern, args, &mut errors);
            if !errors.is_empty() {
                warn!(key, locale, ?errors, "narrative formatting errors");
            }
            return text.into_owned();
        }
        format!("[{key}]")
    }
}
