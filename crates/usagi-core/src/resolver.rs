//! Command resolution and dispatch.
//!
//! Per request the resolver walks a fixed, linear state machine:
//!
//! ```text
//! START -> MATCHED(mode) -> LANGUAGE_RESOLVED -> REDIRECTED
//!    \__________\_______________\________-> FALLBACK -> REDIRECTED
//! ```
//!
//! Matching tries, in order, and stops at the first hit:
//!
//! 1. the trigger table, keyed on the first token;
//! 2. the slash table, keyed on the text before the first `/` of that token;
//! 3. the regex list against the whole command (the catch-all makes this total).
//!
//! A slash match re-tokenizes the command with `/` replaced by a space, so
//! `w/Tokyo` and `w Tokyo` reach a module as the same `["w", "Tokyo"]`.

use crate::locale::{Locale, Preferences};
use crate::negotiator::{negotiate, select_language};
use crate::registry::{ModuleHandle, Registry};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Returned when even the default module cannot produce a URL.
pub const LAST_RESORT_URL: &str = "about:blank";

/// Which table produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchMode {
    Trigger,
    Slash,
    Regex,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Slash => "slash",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A module selected for one command, ready to invoke.
#[derive(Debug, Clone)]
pub struct MatchResult<'r> {
    pub handle: &'r ModuleHandle,
    pub tokens: Vec<String>,
    pub language: Option<Locale>,
    pub mode: MatchMode,
}

/// How a resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The matched module produced the URL.
    Redirected(MatchMode),
    /// The matched module failed with arguments and succeeded without.
    BareForm(MatchMode),
    /// The default module produced the URL with no tokens and no language.
    Fallback,
    /// Nothing could produce a URL; [`LAST_RESORT_URL`] was returned.
    LastResort,
}

impl Outcome {
    /// Label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Redirected(mode) | Self::BareForm(mode) => mode.as_str(),
            Self::Fallback => "fallback",
            Self::LastResort => "last_resort",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback | Self::LastResort)
    }
}

/// The result of [`Resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub url: String,
    pub module: String,
    pub language: Option<Locale>,
    pub outcome: Outcome,
}

/// Resolves commands against a frozen [`Registry`].
///
/// Cloning is cheap; all clones share the same registry.
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<Registry>,
}

impl Resolver {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Find the module for an already override-stripped command.
    ///
    /// Only `None` if the registry has no catch-all, which [`Registry`]
    /// construction rules out.
    pub fn lookup(&self, command: &str, preferences: &Preferences) -> Option<MatchResult<'_>> {
        let (handle, tokens, mode) = self.find(command)?;
        let language = select_language(preferences, handle.languages());
        Some(MatchResult {
            handle,
            tokens,
            language,
            mode,
        })
    }

    fn find(&self, command: &str) -> Option<(&ModuleHandle, Vec<String>, MatchMode)> {
        let registry = &*self.registry;
        let tokens = tokenize(command);

        if let Some(first) = tokens.first() {
            if let Some(handle) = registry.trigger(first) {
                debug!(trigger = %first, module = %handle.name(), "Found in trigger lookup");
                return Some((handle, tokens, MatchMode::Trigger));
            }

            if let Some((prefix, _)) = first.split_once('/') {
                if let Some(handle) = registry.slash(prefix) {
                    debug!(slash = %prefix, module = %handle.name(), "Found in slash lookup");
                    let tokens = tokenize(&command.replace('/', " "));
                    return Some((handle, tokens, MatchMode::Slash));
                }
            }
        }

        let entry = registry.regexes().iter().find(|entry| entry.is_match(command))?;
        debug!(pattern = %entry.pattern(), module = %entry.handle().name(), "Matched in regex lookup");
        Some((entry.handle(), tokens, MatchMode::Regex))
    }

    /// Resolve a command to a URL. Never fails.
    ///
    /// `command` must already have had any in-band override removed; see
    /// [`Resolver::resolve_raw`] for the combined path.
    pub fn resolve(&self, command: &str, preferences: &Preferences) -> Resolution {
        let Some(matched) = self.lookup(command, preferences) else {
            warn!("No module matched, using default");
            return self.fallback();
        };

        let MatchResult {
            handle,
            tokens,
            language,
            mode,
        } = matched;
        debug!(
            module = %handle.name(),
            mode = %mode,
            language = language.as_ref().map(Locale::as_str),
            "Resolved module language"
        );

        match handle.invoke(&tokens, language.as_ref()) {
            Ok(url) => {
                return Resolution {
                    url,
                    module: handle.name().to_string(),
                    language,
                    outcome: Outcome::Redirected(mode),
                };
            }
            Err(e) => {
                warn!(module = %handle.name(), error = %e, "Module redirect failed");
            }
        }

        if handle.takes_args() {
            match handle.invoke(&[], language.as_ref()) {
                Ok(url) => {
                    return Resolution {
                        url,
                        module: handle.name().to_string(),
                        language,
                        outcome: Outcome::BareForm(mode),
                    };
                }
                Err(e) => {
                    warn!(module = %handle.name(), error = %e, "Module bare redirect failed");
                }
            }
        }

        self.fallback()
    }

    /// Extract an in-band override from `command`, then [`resolve`](Self::resolve).
    pub fn resolve_raw(&self, command: &str, preferences: Preferences) -> Resolution {
        let (stripped, preferences) = negotiate(command, preferences);
        self.resolve(&stripped, &preferences)
    }

    /// Convenience wrapper returning only the URL.
    pub fn resolve_url(&self, command: &str, preferences: &Preferences) -> String {
        self.resolve(command, preferences).url
    }

    /// Default module, no tokens, unspecified language.
    pub fn fallback(&self) -> Resolution {
        let handle = self.registry.default_handle();
        match handle.invoke(&[], None) {
            Ok(url) => Resolution {
                url,
                module: handle.name().to_string(),
                language: None,
                outcome: Outcome::Fallback,
            },
            Err(e) => {
                error!(module = %handle.name(), error = %e, "Default module failed");
                Resolution {
                    url: LAST_RESORT_URL.to_string(),
                    module: handle.name().to_string(),
                    language: None,
                    outcome: Outcome::LastResort,
                }
            }
        }
    }
}

fn tokenize(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}
