//! Jisho Japanese dictionary.
//!
//! `j <word>` is a plain search. The second letter narrows it: `jw` words,
//! `jk` kanji, `jn` names, `js` example sentences.

use super::quote;
use usagi_core::{ArgsModule, Binding, CommandModule, Locale, RedirectResult};

const BASE: &str = "https://jisho.org/";

pub struct Jisho;

fn category(keyword: &str) -> Option<&'static str> {
    match keyword.to_ascii_lowercase().as_str() {
        "jw" => Some("#words"),
        "jk" => Some("#kanji"),
        "jn" => Some("#names"),
        "js" => Some("#sentences"),
        _ => None,
    }
}

impl CommandModule for Jisho {
    fn name(&self) -> &str {
        "jisho"
    }

    fn description(&self) -> &str {
        "Look up Japanese words, kanji, names or sentences on Jisho"
    }

    fn bindings(&self) -> Vec<Binding> {
        vec![
            Binding::ignore_case(r"j[wksn]?(?: .+)?$"),
            Binding::ignore_case(r"jisho(?: .+)?$"),
        ]
    }
}

impl ArgsModule for Jisho {
    fn redirect(&self, args: &[String], _language: Option<&Locale>) -> RedirectResult {
        let Some((keyword, terms)) = args.split_first().filter(|(_, terms)| !terms.is_empty())
        else {
            return Ok(BASE.to_string());
        };

        let mut query = terms.join(" ");
        if let Some(suffix) = category(keyword) {
            query.push(' ');
            query.push_str(suffix);
        }
        Ok(format!("{BASE}search/{}", quote(&query)))
    }
}
