use super::quote;
use usagi_core::{ArgsModule, CommandModule, Locale, RedirectResult};

const BASE: &str = "https://www.youtube.com/";

/// YouTube search, `yt <query>`.
pub struct Youtube;

impl CommandModule for Youtube {
    fn name(&self) -> &str {
        "youtube"
    }

    fn description(&self) -> &str {
        "Search YouTube videos"
    }

    fn triggers(&self) -> &[&str] {
        &["yt", "youtube"]
    }
}

impl ArgsModule for Youtube {
    fn redirect(&self, args: &[String], _language: Option<&Locale>) -> RedirectResult {
        match args {
            [_, terms @ ..] if !terms.is_empty() => Ok(format!(
                "{BASE}results?search_query={}",
                quote(&terms.join(" "))
            )),
            _ => Ok(BASE.to_string()),
        }
    }
}
