//! Google search; also the catch-all for anything no other module claims.

use super::quote;
use usagi_core::{ArgsModule, Binding, CommandModule, Locale, RedirectResult};

const BASE: &str = "https://www.google.com/";
const BASE_JA: &str = "https://www.google.co.jp/";

pub struct Google;

impl Google {
    fn base(language: Option<&Locale>) -> &'static str {
        match language.map(Locale::language) {
            Some("ja") | Some("jp") => BASE_JA,
            _ => BASE,
        }
    }
}

impl CommandModule for Google {
    fn name(&self) -> &str {
        "google"
    }

    fn description(&self) -> &str {
        "Search Google; any command nothing else matches ends up here"
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::ignore_case(r"(?:g|google)(?: .+)?$")]
    }

    fn languages(&self) -> &[&str] {
        &["en", "ja", "jp"]
    }
}

impl ArgsModule for Google {
    fn redirect(&self, args: &[String], language: Option<&Locale>) -> RedirectResult {
        let base = Self::base(language);

        // Reached through the catch-all the whole command is the query.
        let terms = match args.split_first() {
            None => return Ok(base.to_string()),
            Some((first, rest))
                if first.eq_ignore_ascii_case("g") || first.eq_ignore_ascii_case("google") =>
            {
                rest
            }
            Some(_) => args,
        };

        if terms.is_empty() {
            return Ok(base.to_string());
        }
        Ok(format!("{base}search?q={}", quote(&terms.join(" "))))
    }
}
