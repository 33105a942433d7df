//! # usagi-core
//!
//! The resolution engine behind the usagi redirect service: it turns a short
//! typed command such as `g hello world`, `t@ someone` or `w/Tokyo -ja` into a
//! destination URL.
//!
//! ## Components
//!
//! - [`module`]: the command module contract ([`ArgsModule`], [`NoArgsModule`])
//! - [`registry`]: trigger, slash and regex lookup tables built once at startup
//! - [`negotiator`]: in-band language overrides and per-module language choice
//! - [`resolver`]: ordered matching and dispatch with a guaranteed fallback
//!
//! ## Quick Start
//!
//! ```rust
//! use usagi_core::{
//!     ArgsModule, Binding, CommandModule, Locale, Module, Preferences, RedirectResult,
//!     Registry, Resolver,
//! };
//! use std::sync::Arc;
//!
//! struct Search;
//!
//! impl CommandModule for Search {
//!     fn name(&self) -> &str { "search" }
//!     fn description(&self) -> &str { "Web search" }
//!     fn bindings(&self) -> Vec<Binding> { vec![Binding::ignore_case(r"s(?: .+)?$")] }
//! }
//!
//! impl ArgsModule for Search {
//!     fn redirect(&self, args: &[String], _language: Option<&Locale>) -> RedirectResult {
//!         Ok(format!("https://search.example/?q={}", args.len()))
//!     }
//! }
//!
//! let registry = Registry::builder(Module::args(Search)).build();
//! let resolver = Resolver::new(Arc::new(registry));
//! let url = resolver.resolve_url("s two words", &Preferences::new());
//! assert_eq!(url, "https://search.example/?q=3");
//! ```

#![warn(clippy::all)]
#![warn(missing_debug_implementations)]

pub mod error;
pub mod locale;
pub mod module;
pub mod negotiator;
pub mod registry;
pub mod resolver;

pub use error::{LocaleError, RedirectError, RedirectResult, RegistryError};
pub use locale::{Locale, Preferences};
pub use module::{ArgsModule, Binding, CommandModule, Module, NoArgsModule};
pub use negotiator::{extract_override, negotiate, select_language};
pub use registry::{
    CATCH_ALL, ModuleHandle, ModuleSummary, RegexEntry, Registry, RegistryBuilder, RegistryStats,
};
pub use resolver::{LAST_RESORT_URL, MatchMode, MatchResult, Outcome, Resolution, Resolver};
