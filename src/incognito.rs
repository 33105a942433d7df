//! Incognito requests.
//!
//! A command prefixed with one of the configured keywords (`!`, `incognito`,
//! `incog`, `nolog` by default) is resolved without the prefix and is never
//! logged with its text. Word keywords must be followed by whitespace or the
//! end of the command, so `nologin` is not `nolog` + `in`; symbol keywords
//! like `!` may be glued to the command (`!g secret`).

use regex::Regex;

#[derive(Debug, Clone)]
pub struct Incognito {
    prefix: Option<Regex>,
}

impl Incognito {
    /// Build the prefix matcher. An empty keyword list disables detection.
    pub fn new(keywords: &[String]) -> Result<Self, regex::Error> {
        let mut keywords: Vec<&String> = keywords.iter().filter(|k| !k.is_empty()).collect();
        if keywords.is_empty() {
            return Ok(Self { prefix: None });
        }
        // Longest first so `incognito` wins over `incog`.
        keywords.sort_by_key(|k| std::cmp::Reverse(k.len()));

        let alternatives: Vec<String> = keywords
            .iter()
            .map(|k| {
                let escaped = regex::escape(k);
                if k.chars().all(|c| c.is_alphanumeric()) {
                    format!(r"{escaped}(?:\s+|$)")
                } else {
                    format!(r"{escaped}\s*")
                }
            })
            .collect();

        let prefix = Regex::new(&format!(r"^(?i:{})", alternatives.join("|")))?;
        Ok(Self {
            prefix: Some(prefix),
        })
    }

    /// Split off an incognito prefix.
    ///
    /// Returns whether one was present and the remaining command.
    pub fn strip<'a>(&self, command: &'a str) -> (bool, &'a str) {
        let command = command.trim_start();
        match self.prefix.as_ref().and_then(|p| p.find(command)) {
            Some(m) => (true, &command[m.end()..]),
            None => (false, command),
        }
    }
}

/// Interpret the `incognito` query parameter.
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes")
    })
}
