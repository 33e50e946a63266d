//! Localized announcements.
//!
//! Navigation failures are reported as message keys (`no_next_heading_2`, `no_cell_below`, ...).
//! This module turns them into text with Fluent, from resources embedded in the binary.

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use tracing::warn;
use unic_langid::LanguageIdentifier;

/// Embedded resources by locale. The first entry is the fallback.
const RESOURCES: &[(&str, &str)] = &[
    ("en-US", include_str!("../assets/i18n/en-US.ftl")),
    ("fr", include_str!("../assets/i18n/fr.ftl")),
];

/// Resource for `requested`: an exact match, else one for the same language.
fn resolve(requested: &str) -> Option<(&'static str, &'static str)> {
    let wanted = requested.parse::<LanguageIdentifier>().ok()?;
    let parsed = RESOURCES
        .iter()
        .filter_map(|entry| Some((entry.0.parse::<LanguageIdentifier>().ok()?, *entry)));
    let mut same_language = None;
    for (locale, entry) in parsed {
        if locale == wanted {
            return Some(entry);
        }
        if locale.language == wanted.language && same_language.is_none() {
            same_language = Some(entry);
        }
    }
    same_language
}

/// Message lookup for one locale.
pub struct Messages {
    bundle: FluentBundle<FluentResource>,
    locale: LanguageIdentifier,
}

impl Messages {
    #[must_use]
    /// Messages for `requested`, or for the fallback locale when it is unavailable.
    pub fn new(requested: &str) -> Self {
        let (tag, source) = resolve(requested).unwrap_or_else(|| {
            warn!(requested, "no messages for locale, using fallback");
            RESOURCES[0]
        });
        let locale: LanguageIdentifier = tag.parse().unwrap_or_default();

        let resource = FluentResource::try_new(source.to_string()).unwrap_or_else(|(partial, errors)| {
            warn!(?errors, "message resource has errors");
            partial
        });
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        bundle.set_use_isolating(false);
        if let Err(errors) = bundle.add_resource(resource) {
            warn!(?errors, "duplicate messages");
        }
        Self { bundle, locale }
    }

    #[must_use]
    /// Locales with embedded messages.
    pub fn available() -> Vec<LanguageIdentifier> {
        RESOURCES
            .iter()
            .filter_map(|(tag, _)| tag.parse().ok())
            .collect()
    }

    #[must_use]
    /// Locale actually in use.
    pub fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    #[must_use]
    /// Whether a message exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.bundle.has_message(key)
    }

    #[must_use]
    /// Text for `key`; unknown keys render as the key itself.
    pub fn get(&self, key: &str) -> String {
        self.format(key, None)
    }

    #[must_use]
    /// Text for `key` with a `name` argument.
    pub fn get_named(&self, key: &str, name: &str) -> String {
        let mut args = FluentArgs::new();
        args.set("name", name.to_string());
        self.format(key, Some(&args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs<'_>>) -> String {
        let Some(pattern) = self.bundle.get_message(key).and_then(|m| m.value()) else {
            return key.to_string();
        };
        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(key, ?errors, "message formatting failed");
        }
        value.into_owned()
    }
}

#[cfg(test)]
#[path = "tests/messages.rs"]
mod tests;
