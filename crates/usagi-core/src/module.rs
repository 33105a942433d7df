//! The command module contract.
//!
//! A module describes how it is reached (triggers, slashes, regex bindings),
//! which locales it supports, and how it builds a destination URL.
//!
//! ## Module Shapes
//!
//! - [`ArgsModule`]: receives the command tokens and the resolved language
//! - [`NoArgsModule`]: receives only the resolved language
//!
//! Both are wrapped in the tagged [`Module`] enum so the resolver branches on
//! the declared shape instead of guessing at call time.

use crate::error::RedirectResult;
use crate::locale::Locale;
use std::fmt;
use std::sync::Arc;

/// A regex binding as declared by a module.
///
/// Patterns are matched against the whole command from its first character
/// (the registry compiles them as `^(?:pattern)`), but need not consume it all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub pattern: String,
    pub case_insensitive: bool,
}

impl Binding {
    /// A case-sensitive binding.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_insensitive: false,
        }
    }

    /// A case-insensitive binding, the usual choice for commands.
    pub fn ignore_case(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_insensitive: true,
        }
    }

    /// Flag summary for diagnostics.
    pub fn flags(&self) -> &'static str {
        if self.case_insensitive { "i" } else { "none" }
    }
}

/// Metadata every command module exposes.
pub trait CommandModule: Send + Sync {
    /// Stable module name, used in logs, diagnostics and configuration.
    fn name(&self) -> &str;

    /// Human-readable description. Not used for dispatch.
    fn description(&self) -> &str;

    /// Literal first words that select this module. Case-insensitive.
    fn triggers(&self) -> &[&str] {
        &[]
    }

    /// Literal prefixes before a `/` that select this module. Case-insensitive.
    fn slashes(&self) -> &[&str] {
        &[]
    }

    /// Regex bindings, tried in order against the whole command.
    fn bindings(&self) -> Vec<Binding> {
        Vec::new()
    }

    /// Supported locale tags. Empty means the module ignores language.
    fn languages(&self) -> &[&str] {
        &[]
    }
}

/// A module that takes the command tokens.
///
/// `args[0]` is the word that reached the module (trigger, slash prefix, or
/// the first word of a regex match) with its original case.
pub trait ArgsModule: CommandModule {
    fn redirect(&self, args: &[String], language: Option<&Locale>) -> RedirectResult;
}

/// A module that always goes to the same place, modulo language.
pub trait NoArgsModule: CommandModule {
    fn redirect(&self, language: Option<&Locale>) -> RedirectResult;
}

/// A command module tagged with its redirect shape.
#[derive(Clone)]
pub enum Module {
    Args(Arc<dyn ArgsModule>),
    NoArgs(Arc<dyn NoArgsModule>),
}

impl Module {
    pub fn args<M: ArgsModule + 'static>(module: M) -> Self {
        Self::Args(Arc::new(module))
    }

    pub fn no_args<M: NoArgsModule + 'static>(module: M) -> Self {
        Self::NoArgs(Arc::new(module))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Args(m) => m.name(),
            Self::NoArgs(m) => m.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Args(m) => m.description(),
            Self::NoArgs(m) => m.description(),
        }
    }

    pub fn triggers(&self) -> &[&str] {
        match self {
            Self::Args(m) => m.triggers(),
            Self::NoArgs(m) => m.triggers(),
        }
    }

    pub fn slashes(&self) -> &[&str] {
        match self {
            Self::Args(m) => m.slashes(),
            Self::NoArgs(m) => m.slashes(),
        }
    }

    pub fn bindings(&self) -> Vec<Binding> {
        match self {
            Self::Args(m) => m.bindings(),
            Self::NoArgs(m) => m.bindings(),
        }
    }

    pub fn languages(&self) -> &[&str] {
        match self {
            Self::Args(m) => m.languages(),
            Self::NoArgs(m) => m.languages(),
        }
    }

    pub fn takes_args(&self) -> bool {
        matches!(self, Self::Args(_))
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = if self.takes_args() { "Args" } else { "NoArgs" };
        f.debug_struct("Module")
            .field("name", &self.name())
            .field("shape", &shape)
            .finish()
    }
}
