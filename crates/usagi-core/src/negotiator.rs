//! Language negotiation.
//!
//! Two steps per request:
//!
//! 1. [`extract_override`] pulls at most one in-band language override out of
//!    the command text. Recognized forms, checked in this order:
//!    - trailing `" -<tag>"` (`g today -ja`)
//!    - leading `"in:<tag> "` (`in:ja g today`)
//!    - leading `".<tag> "` (`.ja g today`)
//!
//!    A trailing `" \-word"` is an escaped literal hyphen: it is not an
//!    override, and the backslash is removed.
//! 2. [`select_language`] walks the preference list and returns the first
//!    entry the module supports, or `None` ("unspecified").

use crate::locale::{Locale, Preferences};
use regex::Regex;
use std::sync::OnceLock;

const TAG: &str = r"[A-Za-z]{2,8}(?:[-_][A-Za-z0-9]{1,8})*";

static TRAILING: OnceLock<Regex> = OnceLock::new();
static LEADING_IN: OnceLock<Regex> = OnceLock::new();
static LEADING_DOT: OnceLock<Regex> = OnceLock::new();
static ESCAPED_HYPHEN: OnceLock<Regex> = OnceLock::new();

fn compile(pattern: &str) -> Regex {
    // Patterns are built from constants above; failure is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

fn trailing() -> &'static Regex {
    TRAILING.get_or_init(|| compile(&format!(r"(?s)^(?P<rest>.*\S)\s+-(?P<tag>{TAG})$")))
}

fn leading_in() -> &'static Regex {
    LEADING_IN.get_or_init(|| compile(&format!(r"(?s)^(?i:in):(?P<tag>{TAG})\s+(?P<rest>\S.*)$")))
}

fn leading_dot() -> &'static Regex {
    LEADING_DOT.get_or_init(|| compile(&format!(r"(?s)^\.(?P<tag>{TAG})\s+(?P<rest>\S.*)$")))
}

fn escaped_hyphen() -> &'static Regex {
    ESCAPED_HYPHEN.get_or_init(|| compile(r"(^|\s)\\-"))
}

/// Extract an in-band language override.
///
/// Returns the override (if any) and the command the resolver should see.
/// The command is trimmed; inner whitespace is preserved.
pub fn extract_override(command: &str) -> (Option<Locale>, String) {
    let command = command.trim();

    for pattern in [trailing(), leading_in(), leading_dot()] {
        let Some(caps) = pattern.captures(command) else {
            continue;
        };
        let Ok(locale) = Locale::parse(&caps["tag"]) else {
            continue;
        };
        return (Some(locale), unescape(caps["rest"].trim()));
    }

    (None, unescape(command))
}

fn unescape(command: &str) -> String {
    escaped_hyphen().replace_all(command, "${1}-").into_owned()
}

/// Pick the language to hand to a module.
///
/// First-match over `preferences`: the first entry contained in `supported`
/// wins. An empty `supported` set means the module is language-insensitive
/// and always gets `None`.
pub fn select_language(preferences: &Preferences, supported: &[Locale]) -> Option<Locale> {
    if supported.is_empty() {
        return None;
    }
    preferences
        .iter()
        .find(|preferred| supported.contains(preferred))
        .cloned()
}

/// Run [`extract_override`] and put the override ahead of `preferences`.
pub fn negotiate(command: &str, mut preferences: Preferences) -> (String, Preferences) {
    let (locale, stripped) = extract_override(command);
    if let Some(locale) = locale {
        preferences.prepend(locale);
    }
    (stripped, preferences)
}
