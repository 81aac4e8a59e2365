//! Supported UI languages and the backend's numeric language ids.

use serde::{Deserialize, Serialize};

/// Sentinel default language meaning "follow the runtime UI language".
pub const AUTO: &str = "auto";

/// Languages the backend ships localization bundles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
    Es,
    Fr,
    It,
    Ro,
    Pt,
}

impl Language {
    pub const ALL: [Self; 7] = [
        Self::De,
        Self::En,
        Self::Es,
        Self::Fr,
        Self::It,
        Self::Ro,
        Self::Pt,
    ];

    /// Used when a code is missing or unknown.
    pub const FALLBACK: Self = Self::De;

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::It => "it",
            Self::Ro => "ro",
            Self::Pt => "pt",
        }
    }

    /// Id used by `localization/{id}`.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::De => 1,
            Self::En => 2,
            Self::Es => 3,
            Self::Fr => 4,
            Self::It => 5,
            Self::Ro => 6,
            Self::Pt => 7,
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

/// Map a two-letter code to its backend id, falling back to German.
#[must_use]
pub fn language_id(code: &str) -> u8 {
    Language::from_code(code).unwrap_or(Language::FALLBACK).id()
}

/// Reports the language of the environment the client runs in.
pub trait LocaleSource: Send + Sync + std::fmt::Debug {
    fn ui_language(&self) -> Option<String>;
}

/// Reads the POSIX locale variables, most specific first.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLocale;

impl LocaleSource for SystemLocale {
    fn ui_language(&self) -> Option<String> {
        ["LANGUAGE", "LC_ALL", "LC_MESSAGES", "LANG"]
            .into_iter()
            .filter_map(|var| std::env::var(var).ok())
            .filter_map(|value| value.split(':').next().map(str::to_string))
            .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
    }
}

/// Always reports the same language.
#[derive(Debug, Clone)]
pub struct FixedLocale(pub String);

impl LocaleSource for FixedLocale {
    fn ui_language(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Pick the language code for the localization bundle.
///
/// Order: the profile's culture code, then the configured default, then the
/// runtime UI language when the default is missing or [`AUTO`].
pub fn resolve_language_code(
    culture_code: Option<&str>,
    default_language: Option<&str>,
    locale: &dyn LocaleSource,
) -> String {
    if let Some(code) = culture_code.filter(|c| !c.is_empty()) {
        return code.to_string();
    }

    match default_language.filter(|d| !d.is_empty()) {
        Some(lang) if lang != AUTO => lang.to_string(),
        _ => locale
            .ui_language()
            .map(|l| l.chars().take(2).collect())
            .unwrap_or_default(),
    }
}

/// [`resolve_language_code`] followed by [`language_id`].
pub fn resolve_language_id(
    culture_code: Option<&str>,
    default_language: Option<&str>,
    locale: &dyn LocaleSource,
) -> u8 {
    language_id(&resolve_language_code(culture_code, default_language, locale))
}
