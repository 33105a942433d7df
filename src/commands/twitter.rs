//! Twitter: `t@ <user>` opens a profile, `t <query>` searches.

use super::quote;
use usagi_core::{ArgsModule, Binding, CommandModule, Locale, RedirectError, RedirectResult};

const BASE: &str = "https://twitter.com/";

pub struct Twitter;

impl CommandModule for Twitter {
    fn name(&self) -> &str {
        "twitter"
    }

    fn description(&self) -> &str {
        "Search Twitter (t <query>) or open a profile (t@ <user>)"
    }

    fn triggers(&self) -> &[&str] {
        &["t", "twitter"]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![Binding::ignore_case(r"t@(?: .+)?$")]
    }
}

impl ArgsModule for Twitter {
    fn redirect(&self, args: &[String], _language: Option<&Locale>) -> RedirectResult {
        let Some((keyword, rest)) = args.split_first() else {
            return Ok(BASE.to_string());
        };

        if keyword.eq_ignore_ascii_case("t@") {
            let user = rest
                .first()
                .map(|u| u.trim_start_matches('@'))
                .filter(|u| !u.is_empty())
                .ok_or(RedirectError::MissingArgument("user"))?;
            return Ok(format!("{BASE}{}", quote(user)));
        }

        if rest.is_empty() {
            return Ok(BASE.to_string());
        }
        Ok(format!("{BASE}search?q={}", quote(&rest.join(" "))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go(command: &str) -> String {
        let args: Vec<String> = command.split_whitespace().map(String::from).collect();
        Twitter.redirect(&args, None).unwrap()
    }

    #[test]
    fn profile() {
        assert_eq!(go("t@ rustlang"), "https://twitter.com/rustlang");
        assert_eq!(go("t@ @rustlang"), "https://twitter.com/rustlang");
        assert_eq!(go("T@ rustlang"), "https://twitter.com/rustlang");
    }

    #[test]
    fn profile_without_user_is_missing_argument() {
        let args = vec!["t@".to_string()];
        assert_eq!(
            Twitter.redirect(&args, None),
            Err(RedirectError::MissingArgument("user"))
        );
        let args = vec!["t@".to_string(), "@".to_string()];
        assert!(Twitter.redirect(&args, None).is_err());
    }

    #[test]
    fn search() {
        assert_eq!(go("t rust 2024"), "https://twitter.com/search?q=rust%202024");
        assert_eq!(go("twitter"), BASE);
    }
}
