//! Language metadata for the translation UI surfaces
//!
//! The gateway itself forwards any `targetLang` string verbatim; this table
//! only backs the CLI listing and the `/api/status` response.

/// A language offered by the picker surfaces
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Language {
    /// ISO 639-1 code
    pub code: &'static str,
    /// Human-readable label
    pub label: &'static str,
}

/// Languages offered out of the box
pub const LANGUAGES: [Language; 6] = [
    Language { code: "en", label: "English" },
    Language { code: "es", label: "Spanish" },
    Language { code: "fr", label: "French" },
    Language { code: "de", label: "German" },
    Language { code: "zh", label: "Chinese" },
    Language { code: "tl", label: "Tagalog" },
];

/// Whether a code is in the built-in picker list
#[must_use]
pub fn is_listed(code: &str) -> bool {
    LANGUAGES.iter().any(|l| l.code == code)
}

/// Human-readable label for a language code
///
/// Falls back to the ISO 639-1 registry for codes outside the built-in list.
#[must_use]
pub fn label_for(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|l| l.code == code)
        .map(|l| l.label)
        .or_else(|| isolang::Language::from_639_1(code).map(|l| l.to_name()))
}
