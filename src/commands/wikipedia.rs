//! Wikipedia search. The negotiated language picks the subdomain, so
//! `w tokyo -ja` searches ja.wikipedia.org. Also reachable as `w/<query>`.

use super::quote;
use usagi_core::{ArgsModule, CommandModule, Locale, RedirectResult};

const FALLBACK_LANGUAGE: &str = "en";

pub struct Wikipedia;

impl CommandModule for Wikipedia {
    fn name(&self) -> &str {
        "wikipedia"
    }

    fn description(&self) -> &str {
        "Search Wikipedia in your language"
    }

    fn triggers(&self) -> &[&str] {
        &["w", "wiki"]
    }

    fn slashes(&self) -> &[&str] {
        &["w", "wiki"]
    }

    fn languages(&self) -> &[&str] {
        &["en", "ja", "de", "fr", "es"]
    }
}

impl ArgsModule for Wikipedia {
    fn redirect(&self, args: &[String], language: Option<&Locale>) -> RedirectResult {
        let subdomain = language.map_or(FALLBACK_LANGUAGE, Locale::language);
        let base = format!("https://{subdomain}.wikipedia.org/");

        match args {
            [_, terms @ ..] if !terms.is_empty() => Ok(format!(
                "{base}wiki/Special:Search?search={}",
                quote(&terms.join(" "))
            )),
            _ => Ok(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(command: &str) -> Vec<String> {
        command.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn unspecified_language_is_english() {
        assert_eq!(
            Wikipedia.redirect(&args("w Tokyo Tower"), None).unwrap(),
            "https://en.wikipedia.org/wiki/Special:Search?search=Tokyo%20Tower"
        );
    }

    #[test]
    fn language_selects_subdomain() {
        let de = Locale::parse("de").unwrap();
        assert_eq!(
            Wikipedia.redirect(&args("wiki Berlin"), Some(&de)).unwrap(),
            "https://de.wikipedia.org/wiki/Special:Search?search=Berlin"
        );
        assert_eq!(
            Wikipedia.redirect(&args("w"), Some(&de)).unwrap(),
            "https://de.wikipedia.org/"
        );
    }
}
