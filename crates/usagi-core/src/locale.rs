//! Locale tags and ordered language preferences.
//!
//! A [`Locale`] is a normalized BCP-47-ish tag such as `en`, `ja` or `en-US`.
//! Normalization makes `EN_us`, `en-us` and `en-US` compare equal:
//! the primary subtag is lower-cased, a two-letter region upper-cased,
//! a four-letter script title-cased and `_` separators become `-`.

use crate::error::LocaleError;
use std::fmt;
use std::str::FromStr;

/// A validated, normalized locale tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(String);

impl Locale {
    /// Parse and normalize a tag.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let tag = tag.trim();
        let mut parts = tag.split(['-', '_']);

        let primary = parts.next().unwrap_or_default();
        if !(2..=8).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(LocaleError(tag.to_string()));
        }

        let mut normalized = primary.to_ascii_lowercase();
        for part in parts {
            if part.is_empty() || part.len() > 8 || !part.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(LocaleError(tag.to_string()));
            }
            normalized.push('-');
            match part.len() {
                2 if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    normalized.push_str(&part.to_ascii_uppercase());
                }
                4 if part.chars().all(|c| c.is_ascii_alphabetic()) => {
                    let (head, tail) = part.split_at(1);
                    normalized.push_str(&head.to_ascii_uppercase());
                    normalized.push_str(&tail.to_ascii_lowercase());
                }
                _ => normalized.push_str(&part.to_ascii_lowercase()),
            }
        }

        Ok(Self(normalized))
    }

    /// The normalized tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The primary language subtag (`ja` for `ja-JP`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered language preferences, highest priority first.
///
/// Built by the caller from request data, then an in-band override from the
/// command text is pushed to the front with [`Preferences::prepend`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences(Vec<Locale>);

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build preferences from an `Accept-Language` header value.
    ///
    /// Entries are ordered by descending quality; ties keep header order.
    /// Wildcards, `q=0` entries and unparsable tags are dropped.
    pub fn from_accept_language(header: &str) -> Self {
        let mut weighted: Vec<(u16, Locale)> = header
            .split(',')
            .filter_map(|entry| {
                let mut fields = entry.split(';');
                let tag = fields.next()?.trim();
                if tag.is_empty() || tag == "*" {
                    return None;
                }
                let quality = fields
                    .filter_map(|field| field.trim().strip_prefix("q="))
                    .next()
                    .map_or(Some(1000), parse_quality)?;
                if quality == 0 {
                    return None;
                }
                Locale::parse(tag).ok().map(|locale| (quality, locale))
            })
            .collect();

        // sort_by is stable, so equal weights keep their header order
        weighted.sort_by(|a, b| b.0.cmp(&a.0));

        let mut prefs = Self::new();
        prefs.extend(weighted.into_iter().map(|(_, locale)| locale));
        prefs
    }

    /// Put a locale at the front, removing any later duplicate of it.
    pub fn prepend(&mut self, locale: Locale) {
        self.0.retain(|existing| existing != &locale);
        self.0.insert(0, locale);
    }

    /// Append locales at the back, skipping ones already present.
    pub fn extend<I: IntoIterator<Item = Locale>>(&mut self, locales: I) {
        for locale in locales {
            if !self.0.contains(&locale) {
                self.0.push(locale);
            }
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Locale> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Locale> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Locale> for Preferences {
    fn from_iter<I: IntoIterator<Item = Locale>>(iter: I) -> Self {
        let mut prefs = Self::new();
        prefs.extend(iter);
        prefs
    }
}

impl<'a> IntoIterator for &'a Preferences {
    type Item = &'a Locale;
    type IntoIter = std::slice::Iter<'a, Locale>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Parse a `q=` value into thousandths. Malformed values drop the entry.
fn parse_quality(raw: &str) -> Option<u16> {
    let value: f32 = raw.trim().parse().ok()?;
    if !(0.0..=1.0).contains(&value) {
        return None;
    }
    Some((value * 1000.0).round() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    #[test]
    fn parse_normalizes_case_and_separators() {
        assert_eq!(loc("EN_us").as_str(), "en-US");
        assert_eq!(loc("ja").as_str(), "ja");
        assert_eq!(loc("zh-hant-tw").as_str(), "zh-Hant-TW");
        assert_eq!(loc(" de ").as_str(), "de");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("e").is_err());
        assert!(Locale::parse("12").is_err());
        assert!(Locale::parse("en-").is_err());
        assert!(Locale::parse("en us").is_err());
        assert!(Locale::parse("*").is_err());
    }

    #[test]
    fn language_returns_primary_subtag() {
        assert_eq!(loc("ja-JP").language(), "ja");
        assert_eq!(loc("en").language(), "en");
    }

    #[test]
    fn accept_language_orders_by_quality() {
        let prefs = Preferences::from_accept_language("en;q=0.5, ja-JP, ja;q=0.9, *;q=0.1");
        let tags: Vec<&str> = prefs.iter().map(Locale::as_str).collect();
        assert_eq!(tags, vec!["ja-JP", "ja", "en"]);
    }

    #[test]
    fn accept_language_keeps_header_order_for_ties() {
        let prefs = Preferences::from_accept_language("fr, de, en");
        let tags: Vec<&str> = prefs.iter().map(Locale::as_str).collect();
        assert_eq!(tags, vec!["fr", "de", "en"]);
    }

    #[test]
    fn accept_language_drops_zero_quality_and_bad_tags() {
        let prefs = Preferences::from_accept_language("en;q=0, !!, ja;q=abc, de");
        let tags: Vec<&str> = prefs.iter().map(Locale::as_str).collect();
        assert_eq!(tags, vec!["de"]);
    }

    #[test]
    fn accept_language_empty_header() {
        assert!(Preferences::from_accept_language("").is_empty());
    }

    #[test]
    fn prepend_moves_existing_entry_to_front() {
        let mut prefs: Preferences = [loc("en"), loc("ja")].into_iter().collect();
        prefs.prepend(loc("ja"));
        let tags: Vec<&str> = prefs.iter().map(Locale::as_str).collect();
        assert_eq!(tags, vec!["ja", "en"]);
    }

    #[test]
    fn extend_skips_duplicates() {
        let mut prefs = Preferences::new();
        prefs.extend([loc("en"), loc("EN"), loc("ja")]);
        assert_eq!(prefs.len(), 2);
        assert_eq!(prefs.first(), Some(&loc("en")));
    }
}
