//! Reddit: subreddits by `r/<name>`, searches by `r <query>`.
//!
//! NSFW results are included when the keyword carries `18`/`nsfw`
//! (`r18 cats`, `rensfw cats`) or when the first search word is one of them
//! (`r nsfw cats`).

use super::quote;
use usagi_core::{ArgsModule, Binding, CommandModule, Locale, RedirectResult};

const BASE: &str = "https://www.reddit.com/";
const NSFW_FLAG: &str = "&include_over_18=on";

pub struct Reddit;

fn is_nsfw_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("nsfw") || word == "18"
}

impl CommandModule for Reddit {
    fn name(&self) -> &str {
        "reddit"
    }

    fn description(&self) -> &str {
        "Open a subreddit (r/aww) or search Reddit (r [nsfw] <query>)"
    }

    fn triggers(&self) -> &[&str] {
        &["reddit"]
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![
            Binding::ignore_case(r"r/\w+"),
            Binding::ignore_case(r"re?(?:18|nsfw)? .+$"),
        ]
    }
}

impl ArgsModule for Reddit {
    fn redirect(&self, args: &[String], _language: Option<&Locale>) -> RedirectResult {
        let Some((keyword, rest)) = args.split_first() else {
            return Ok(BASE.to_string());
        };

        if let Some(prefix) = keyword.get(..2).filter(|p| p.eq_ignore_ascii_case("r/")) {
            let sub = &keyword[prefix.len()..];
            if !sub.is_empty() {
                return Ok(format!("{BASE}r/{}", quote(sub)));
            }
        }

        let lowered = keyword.to_ascii_lowercase();
        let mut nsfw = lowered.contains("18") || lowered.contains("nsfw");
        let mut terms = rest;
        if let [flag, tail @ ..] = rest
            && is_nsfw_word(flag)
            && !tail.is_empty()
        {
            nsfw = true;
            terms = tail;
        }

        if terms.is_empty() {
            return Ok(BASE.to_string());
        }

        let mut url = format!("{BASE}search?q={}", quote(&terms.join(" ")));
        if nsfw {
            url.push_str(NSFW_FLAG);
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn go(command: &str) -> String {
        let args: Vec<String> = command.split_whitespace().map(String::from).collect();
        Reddit.redirect(&args, None).unwrap()
    }

    #[test]
    fn subreddit() {
        assert_eq!(go("r/aww"), "https://www.reddit.com/r/aww");
        assert_eq!(go("R/rust"), "https://www.reddit.com/r/rust");
    }

    #[test]
    fn search() {
        assert_eq!(go("r cute cats"), "https://www.reddit.com/search?q=cute%20cats");
    }

    #[test]
    fn nsfw_word_sets_flag() {
        assert_eq!(
            go("r nsfw cats"),
            "https://www.reddit.com/search?q=cats&include_over_18=on"
        );
    }

    #[test]
    fn nsfw_keyword_sets_flag() {
        assert_eq!(
            go("r18 cats"),
            "https://www.reddit.com/search?q=cats&include_over_18=on"
        );
        assert_eq!(
            go("rensfw cats"),
            "https://www.reddit.com/search?q=cats&include_over_18=on"
        );
    }

    #[test]
    fn lone_nsfw_word_is_a_query() {
        assert_eq!(go("r nsfw"), "https://www.reddit.com/search?q=nsfw");
    }

    #[test]
    fn bare_keyword_opens_front_page() {
        assert_eq!(go("reddit"), BASE);
        assert_eq!(go(""), BASE);
    }
}
