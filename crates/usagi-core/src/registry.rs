//! Module registry.
//!
//! The [`Registry`] indexes modules into three lookup structures:
//!
//! - trigger table: lower-cased first word → handle
//! - slash table: lower-cased prefix before `/` → handle
//! - regex list: ordered `(pattern, handle)` pairs, ending with the catch-all
//!
//! It is assembled once with a [`RegistryBuilder`] and is read-only afterwards,
//! so it can be shared across request handlers behind an `Arc` without locks.
//!
//! ## Registration Rules
//!
//! - The first module to claim a trigger or slash keeps it; later claims are
//!   dropped and recorded as [`RegistryError`] diagnostics.
//! - Regex bindings are appended in registration order and never deduplicated.
//! - A malformed module is skipped entirely; nothing it declared is indexed.
//! - The default module's catch-all `.*` is appended in [`RegistryBuilder::build`],
//!   after every other binding.

use crate::error::{RedirectError, RedirectResult, RegistryError};
use crate::locale::Locale;
use crate::module::{Binding, Module};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Pattern of the catch-all binding appended for the default module.
pub const CATCH_ALL: &str = ".*";

// ============================================================================
// Module Handles
// ============================================================================

/// What the lookup tables store: a module's redirect capability plus its
/// parsed languages.
#[derive(Clone, Debug)]
pub struct ModuleHandle {
    module: Module,
    languages: Arc<[Locale]>,
}

impl ModuleHandle {
    fn new(module: Module, languages: Vec<Locale>) -> Self {
        Self {
            module,
            languages: languages.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.module.name()
    }

    /// Declared languages. Empty for language-insensitive modules.
    pub fn languages(&self) -> &[Locale] {
        &self.languages
    }

    pub fn takes_args(&self) -> bool {
        self.module.takes_args()
    }

    /// Invoke the redirect in the module's declared shape.
    ///
    /// No-args modules ignore `tokens`. The returned string must parse as an
    /// absolute URL, otherwise [`RedirectError::InvalidUrl`] is returned. The
    /// result is the parsed URL's serialization, so it is always ASCII.
    pub fn invoke(&self, tokens: &[String], language: Option<&Locale>) -> RedirectResult {
        let url = match &self.module {
            Module::Args(m) => m.redirect(tokens, language)?,
            Module::NoArgs(m) => m.redirect(language)?,
        };
        match url::Url::parse(&url) {
            Ok(parsed) => Ok(parsed.into()),
            Err(_) => Err(RedirectError::InvalidUrl { url }),
        }
    }

    /// True when both handles wrap the same module instance.
    pub fn same_module(&self, other: &ModuleHandle) -> bool {
        match (&self.module, &other.module) {
            (Module::Args(a), Module::Args(b)) => Arc::ptr_eq(a, b),
            (Module::NoArgs(a), Module::NoArgs(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// One compiled regex binding.
#[derive(Debug)]
pub struct RegexEntry {
    regex: Regex,
    pattern: String,
    flags: &'static str,
    handle: ModuleHandle,
}

impl RegexEntry {
    /// Whether the binding matches `command` from its first character.
    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
    }

    /// The pattern as declared by the module.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> &'static str {
        self.flags
    }

    pub fn handle(&self) -> &ModuleHandle {
        &self.handle
    }
}

/// Listing entry for a registered module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    pub name: String,
    pub description: String,
    pub triggers: Vec<String>,
    pub slashes: Vec<String>,
    pub bindings: Vec<String>,
    pub languages: Vec<String>,
    pub takes_args: bool,
    pub is_default: bool,
}

/// Counts reported after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistryStats {
    pub modules: usize,
    pub triggers: usize,
    pub slashes: usize,
    /// Regex bindings, including the catch-all.
    pub bindings: usize,
    pub diagnostics: usize,
}

// ============================================================================
// Builder
// ============================================================================

/// Collects modules in scan order and produces a frozen [`Registry`].
#[derive(Debug)]
pub struct RegistryBuilder {
    default: Module,
    triggers: HashMap<String, ModuleHandle>,
    slashes: HashMap<String, ModuleHandle>,
    regexes: Vec<RegexEntry>,
    diagnostics: Vec<RegistryError>,
    summaries: Vec<ModuleSummary>,
}

/// Everything a module declared, validated and normalized.
struct Prepared {
    triggers: Vec<String>,
    slashes: Vec<String>,
    bindings: Vec<(Regex, Binding)>,
    languages: Vec<Locale>,
}

impl RegistryBuilder {
    /// Start a registry whose fallback and catch-all is `default`.
    pub fn new(default: Module) -> Self {
        Self {
            default,
            triggers: HashMap::new(),
            slashes: HashMap::new(),
            regexes: Vec::new(),
            diagnostics: Vec::new(),
            summaries: Vec::new(),
        }
    }

    /// Register every module from an iterator, in order.
    pub fn register_all<I: IntoIterator<Item = Module>>(&mut self, modules: I) -> &mut Self {
        for module in modules {
            self.register(module);
        }
        self
    }

    /// Index one module into the trigger, slash and regex tables.
    pub fn register(&mut self, module: Module) -> &mut Self {
        let name = module.name().to_string();
        debug!(module = %name, "Loading module");

        let prepared = match prepare(&module) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(module = %name, error = %e, "Skipping malformed module");
                self.diagnostics.push(e);
                return self;
            }
        };

        let handle = ModuleHandle::new(module.clone(), prepared.languages.clone());

        for key in &prepared.triggers {
            match self.triggers.entry(key.clone()) {
                Entry::Occupied(existing) => {
                    let e = RegistryError::DuplicateTrigger {
                        key: key.clone(),
                        module: name.clone(),
                        existing: existing.get().name().to_string(),
                    };
                    warn!(trigger = %key, module = %name, error = %e, "Duplicate trigger found");
                    self.diagnostics.push(e);
                }
                Entry::Vacant(slot) => {
                    debug!(trigger = %key, module = %name, "Adding trigger");
                    slot.insert(handle.clone());
                }
            }
        }

        for key in &prepared.slashes {
            match self.slashes.entry(key.clone()) {
                Entry::Occupied(existing) => {
                    let e = RegistryError::DuplicateSlash {
                        key: key.clone(),
                        module: name.clone(),
                        existing: existing.get().name().to_string(),
                    };
                    warn!(slash = %key, module = %name, error = %e, "Duplicate slash found");
                    self.diagnostics.push(e);
                }
                Entry::Vacant(slot) => {
                    debug!(slash = %key, module = %name, "Adding slash");
                    slot.insert(handle.clone());
                }
            }
        }

        for (regex, binding) in prepared.bindings.iter() {
            debug!(
                pattern = %binding.pattern,
                flags = binding.flags(),
                module = %name,
                "Adding binding"
            );
            self.regexes.push(RegexEntry {
                regex: regex.clone(),
                pattern: binding.pattern.clone(),
                flags: binding.flags(),
                handle: handle.clone(),
            });
        }

        self.summaries.push(summarize(&module, &prepared));
        self
    }

    /// Append the catch-all and freeze the registry.
    pub fn build(self) -> Registry {
        let Self {
            default,
            triggers,
            slashes,
            mut regexes,
            diagnostics,
            mut summaries,
        } = self;

        let languages = default
            .languages()
            .iter()
            .filter_map(|tag| match Locale::parse(tag) {
                Ok(locale) => Some(locale),
                Err(e) => {
                    warn!(module = %default.name(), error = %e, "Ignoring default module language");
                    None
                }
            })
            .collect::<Vec<_>>();

        let default_handle = ModuleHandle::new(default.clone(), languages);

        debug!(module = %default.name(), "Adding default catch-all binding");
        regexes.push(RegexEntry {
            regex: catch_all(),
            pattern: CATCH_ALL.to_string(),
            flags: "none",
            handle: default_handle.clone(),
        });

        if let Some(existing) = summaries.iter_mut().find(|s| s.name == default.name()) {
            existing.is_default = true;
        } else {
            summaries.push(ModuleSummary {
                name: default.name().to_string(),
                description: default.description().to_string(),
                triggers: Vec::new(),
                slashes: Vec::new(),
                bindings: vec![CATCH_ALL.to_string()],
                languages: default_handle.languages().iter().map(Locale::to_string).collect(),
                takes_args: default.takes_args(),
                is_default: true,
            });
        }

        let registry = Registry {
            triggers,
            slashes,
            regexes,
            default: default_handle,
            diagnostics,
            summaries,
        };

        let stats = registry.stats();
        info!(
            modules = stats.modules,
            triggers = stats.triggers,
            slashes = stats.slashes,
            bindings = stats.bindings,
            diagnostics = stats.diagnostics,
            "Module registry loaded"
        );
        registry
    }
}

fn catch_all() -> Regex {
    // `(?s)` so the catch-all also covers commands containing newlines.
    #[allow(clippy::expect_used)]
    Regex::new("(?s)^.*").expect("catch-all pattern is valid")
}

/// Validate a module's declarations without touching any table.
fn prepare(module: &Module) -> Result<Prepared, RegistryError> {
    let name = module.name();
    if name.trim().is_empty() {
        return Err(RegistryError::malformed("<unnamed>", "module name is empty"));
    }
    if module.description().trim().is_empty() {
        return Err(RegistryError::malformed(name, "description is empty"));
    }

    let mut triggers = Vec::new();
    for trigger in module.triggers() {
        if trigger.is_empty() || trigger.chars().any(char::is_whitespace) {
            return Err(RegistryError::malformed(
                name,
                format!("trigger '{trigger}' must be a single non-empty word"),
            ));
        }
        triggers.push(trigger.to_lowercase());
    }

    let mut slashes = Vec::new();
    for &slash in module.slashes() {
        let key = slash.strip_suffix('/').unwrap_or(slash);
        if key.is_empty() || key.contains('/') || key.chars().any(char::is_whitespace) {
            return Err(RegistryError::malformed(
                name,
                format!("slash '{slash}' must be a single word with at most one trailing '/'"),
            ));
        }
        slashes.push(key.to_lowercase());
    }

    let mut bindings = Vec::new();
    for binding in module.bindings() {
        let regex = RegexBuilder::new(&format!("^(?:{})", binding.pattern))
            .case_insensitive(binding.case_insensitive)
            .build()
            .map_err(|e| {
                RegistryError::malformed(name, format!("binding '{}' is invalid: {e}", binding.pattern))
            })?;
        bindings.push((regex, binding));
    }

    let mut languages = Vec::new();
    for tag in module.languages() {
        let locale = Locale::parse(tag).map_err(|e| RegistryError::malformed(name, e.to_string()))?;
        if !languages.contains(&locale) {
            languages.push(locale);
        }
    }

    if triggers.is_empty() && slashes.is_empty() && bindings.is_empty() {
        return Err(RegistryError::malformed(
            name,
            "declares no triggers, slashes or bindings",
        ));
    }

    Ok(Prepared {
        triggers,
        slashes,
        bindings,
        languages,
    })
}

fn summarize(module: &Module, prepared: &Prepared) -> ModuleSummary {
    ModuleSummary {
        name: module.name().to_string(),
        description: module.description().to_string(),
        triggers: prepared.triggers.clone(),
        slashes: prepared.slashes.clone(),
        bindings: prepared
            .bindings
            .iter()
            .map(|(_, binding)| binding.pattern.clone())
            .collect(),
        languages: prepared.languages.iter().map(Locale::to_string).collect(),
        takes_args: module.takes_args(),
        is_default: false,
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Frozen lookup tables.
#[derive(Debug)]
pub struct Registry {
    triggers: HashMap<String, ModuleHandle>,
    slashes: HashMap<String, ModuleHandle>,
    regexes: Vec<RegexEntry>,
    default: ModuleHandle,
    diagnostics: Vec<RegistryError>,
    summaries: Vec<ModuleSummary>,
}

impl Registry {
    /// Shorthand for [`RegistryBuilder::new`].
    pub fn builder(default: Module) -> RegistryBuilder {
        RegistryBuilder::new(default)
    }

    /// Exact trigger lookup. `word` is case-folded here.
    pub fn trigger(&self, word: &str) -> Option<&ModuleHandle> {
        self.triggers.get(&word.to_lowercase())
    }

    /// Exact slash lookup. `prefix` is case-folded here.
    pub fn slash(&self, prefix: &str) -> Option<&ModuleHandle> {
        self.slashes.get(&prefix.to_lowercase())
    }

    /// Regex bindings in match order; the last entry is always the catch-all.
    pub fn regexes(&self) -> &[RegexEntry] {
        &self.regexes
    }

    /// The engine-wide fallback module.
    pub fn default_handle(&self) -> &ModuleHandle {
        &self.default
    }

    /// Conflicts and malformed modules seen during registration.
    pub fn diagnostics(&self) -> &[RegistryError] {
        &self.diagnostics
    }

    /// Registered modules in scan order; the default module is flagged.
    pub fn modules(&self) -> &[ModuleSummary] {
        &self.summaries
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            modules: self.summaries.len(),
            triggers: self.triggers.len(),
            slashes: self.slashes.len(),
            bindings: self.regexes.len(),
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Plain-text module listing, one block per module.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for summary in &self.summaries {
            out.push_str(&summary.name);
            if summary.is_default {
                out.push_str(" (default)");
            }
            out.push_str(" - ");
            out.push_str(&summary.description);
            out.push('\n');
            if !summary.triggers.is_empty() {
                out.push_str(&format!("  triggers: {}\n", summary.triggers.join(", ")));
            }
            if !summary.slashes.is_empty() {
                let slashes: Vec<String> = summary.slashes.iter().map(|s| format!("{s}/")).collect();
                out.push_str(&format!("  slashes: {}\n", slashes.join(", ")));
            }
            if !summary.bindings.is_empty() {
                out.push_str(&format!("  patterns: {}\n", summary.bindings.join("  ")));
            }
            if !summary.languages.is_empty() {
                out.push_str(&format!("  languages: {}\n", summary.languages.join(", ")));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ArgsModule, CommandModule, NoArgsModule};

    struct Stub {
        name: &'static str,
        triggers: &'static [&'static str],
        slashes: &'static [&'static str],
        bindings: &'static [&'static str],
        languages: &'static [&'static str],
    }

    impl Stub {
        fn named(name: &'static str) -> Self {
            Self {
                name,
                triggers: &[],
                slashes: &[],
                bindings: &[],
                languages: &[],
            }
        }
    }

    impl CommandModule for Stub {
        fn name(&self) -> &str {
            self.name
        }
        fn description(&self) -> &str {
            "stub"
        }
        fn triggers(&self) -> &[&str] {
            self.triggers
        }
        fn slashes(&self) -> &[&str] {
            self.slashes
        }
        fn bindings(&self) -> Vec<Binding> {
            self.bindings.iter().map(|p| Binding::ignore_case(*p)).collect()
        }
        fn languages(&self) -> &[&str] {
            self.languages
        }
    }

    impl ArgsModule for Stub {
        fn redirect(&self, _args: &[String], _language: Option<&Locale>) -> RedirectResult {
            Ok(format!("https://{}.example/", self.name))
        }
    }

    struct Fallback;

    impl CommandModule for Fallback {
        fn name(&self) -> &str {
            "fallback"
        }
        fn description(&self) -> &str {
            "default"
        }
    }

    impl NoArgsModule for Fallback {
        fn redirect(&self, _language: Option<&Locale>) -> RedirectResult {
            Ok("https://fallback.example/".to_string())
        }
    }

    fn builder() -> RegistryBuilder {
        RegistryBuilder::new(Module::no_args(Fallback))
    }

    #[test]
    fn first_trigger_registration_wins() {
        let mut b = builder();
        b.register(Module::args(Stub { triggers: &["g"], ..Stub::named("first") }));
        b.register(Module::args(Stub { triggers: &["G"], ..Stub::named("second") }));
        let registry = b.build();

        assert_eq!(registry.trigger("g").map(ModuleHandle::name), Some("first"));
        assert_eq!(registry.diagnostics().len(), 1);
        assert_eq!(registry.diagnostics()[0].error_code(), "duplicate_trigger");
        assert_eq!(registry.diagnostics()[0].module(), "second");
    }

    #[test]
    fn slashes_are_a_separate_namespace() {
        let mut b = builder();
        b.register(Module::args(Stub { triggers: &["w"], ..Stub::named("trig") }));
        b.register(Module::args(Stub { slashes: &["w/"], ..Stub::named("slash") }));
        let registry = b.build();

        assert_eq!(registry.trigger("w").map(ModuleHandle::name), Some("trig"));
        assert_eq!(registry.slash("W").map(ModuleHandle::name), Some("slash"));
        assert!(registry.diagnostics().is_empty());
    }

    #[test]
    fn duplicate_slash_is_reported() {
        let mut b = builder();
        b.register(Module::args(Stub { slashes: &["r"], ..Stub::named("one") }));
        b.register(Module::args(Stub { slashes: &["r/"], ..Stub::named("two") }));
        let registry = b.build();

        assert_eq!(registry.slash("r").map(ModuleHandle::name), Some("one"));
        assert_eq!(registry.diagnostics()[0].error_code(), "duplicate_slash");
    }

    #[test]
    fn bindings_keep_scan_order_and_end_with_catch_all() {
        let mut b = builder();
        b.register(Module::args(Stub { bindings: &["a.*"], ..Stub::named("a") }));
        b.register(Module::args(Stub { bindings: &["a.*", "b"], ..Stub::named("b") }));
        let registry = b.build();

        let order: Vec<(&str, &str)> = registry
            .regexes()
            .iter()
            .map(|e| (e.pattern(), e.handle().name()))
            .collect();
        assert_eq!(
            order,
            vec![("a.*", "a"), ("a.*", "b"), ("b", "b"), (CATCH_ALL, "fallback")]
        );
    }

    #[test]
    fn bindings_are_prefix_anchored() {
        let mut b = builder();
        b.register(Module::args(Stub { bindings: &["g(?: .+)?$"], ..Stub::named("g") }));
        let registry = b.build();
        let entry = &registry.regexes()[0];

        assert!(entry.is_match("g hello"));
        assert!(entry.is_match("G"));
        assert!(!entry.is_match("big hello"));
    }

    #[test]
    fn malformed_modules_are_skipped() {
        let mut b = builder();
        b.register(Module::args(Stub { bindings: &["(unclosed"], ..Stub::named("bad-regex") }));
        b.register(Module::args(Stub { triggers: &["two words"], ..Stub::named("bad-trigger") }));
        b.register(Module::args(Stub { triggers: &["x"], languages: &["!!"], ..Stub::named("bad-lang") }));
        b.register(Module::args(Stub::named("unreachable")));
        b.register(Module::args(Stub { triggers: &["ok"], ..Stub::named("good") }));
        let registry = b.build();

        assert_eq!(registry.diagnostics().len(), 4);
        assert!(registry
            .diagnostics()
            .iter()
            .all(|d| d.error_code() == "malformed_module"));
        assert!(registry.trigger("x").is_none());
        assert_eq!(registry.trigger("ok").map(ModuleHandle::name), Some("good"));
        // bad-regex contributed nothing; only the catch-all remains
        assert_eq!(registry.regexes().len(), 1);
    }

    #[test]
    fn module_in_several_tables_shares_one_handle() {
        let mut b = builder();
        b.register(Module::args(Stub {
            triggers: &["t"],
            bindings: &["t@ .+"],
            ..Stub::named("twitter")
        }));
        let registry = b.build();

        let by_trigger = registry.trigger("t").unwrap();
        let by_regex = registry.regexes()[0].handle();
        assert!(by_trigger.same_module(by_regex));
    }

    #[test]
    fn languages_are_parsed_and_deduplicated() {
        let mut b = builder();
        b.register(Module::args(Stub {
            triggers: &["w"],
            languages: &["en", "EN", "ja_jp"],
            ..Stub::named("wiki")
        }));
        let registry = b.build();
        let tags: Vec<&str> = registry
            .trigger("w")
            .unwrap()
            .languages()
            .iter()
            .map(Locale::as_str)
            .collect();
        assert_eq!(tags, vec!["en", "ja-JP"]);
    }

    #[test]
    fn stats_and_listing() {
        let mut b = builder();
        b.register(Module::args(Stub {
            triggers: &["yt", "youtube"],
            slashes: &["yt"],
            ..Stub::named("youtube")
        }));
        let registry = b.build();

        let stats = registry.stats();
        assert_eq!(stats.modules, 2);
        assert_eq!(stats.triggers, 2);
        assert_eq!(stats.slashes, 1);
        assert_eq!(stats.bindings, 1);

        let listing = registry.describe();
        assert!(listing.contains("youtube - stub"));
        assert!(listing.contains("triggers: yt, youtube"));
        assert!(listing.contains("slashes: yt/"));
        assert!(listing.contains("fallback (default) - default"));
    }

    #[test]
    fn invoke_rejects_non_url_output() {
        struct Broken;
        impl CommandModule for Broken {
            fn name(&self) -> &str {
                "broken"
            }
            fn description(&self) -> &str {
                "returns garbage"
            }
            fn triggers(&self) -> &[&str] {
                &["broken"]
            }
        }
        impl NoArgsModule for Broken {
            fn redirect(&self, _language: Option<&Locale>) -> RedirectResult {
                Ok("not a url".to_string())
            }
        }

        let mut b = builder();
        b.register(Module::no_args(Broken));
        let registry = b.build();
        let err = registry.trigger("broken").unwrap().invoke(&[], None).unwrap_err();
        assert_eq!(err.error_code(), "invalid_url");
    }

    #[test]
    fn invoke_percent_encodes_non_ascii_output() {
        struct Tokyo;
        impl CommandModule for Tokyo {
            fn name(&self) -> &str {
                "tokyo"
            }
            fn description(&self) -> &str {
                "unescaped path"
            }
            fn triggers(&self) -> &[&str] {
                &["tokyo"]
            }
        }
        impl NoArgsModule for Tokyo {
            fn redirect(&self, _language: Option<&Locale>) -> RedirectResult {
                Ok("https://ja.wikipedia.org/wiki/東京 タワー".to_string())
            }
        }

        let mut b = builder();
        b.register(Module::no_args(Tokyo));
        let registry = b.build();
        let url = registry.trigger("tokyo").unwrap().invoke(&[], None).unwrap();
        assert_eq!(url, "https://ja.wikipedia.org/wiki/%E6%9D%B1%E4%BA%AC%20%E3%82%BF%E3%83%AF%E3%83%BC");
        assert!(url.is_ascii());
    }

    #[test]
    fn summaries_flag_only_the_default() {
        let mut b = RegistryBuilder::new(Module::args(Stub { triggers: &["d"], ..Stub::named("dflt") }));
        b.register(Module::args(Stub { triggers: &["a"], ..Stub::named("a") }));
        b.register(Module::args(Stub { triggers: &["d"], ..Stub::named("dflt") }));
        let registry = b.build();

        let flags: Vec<(&str, bool)> = registry
            .modules()
            .iter()
            .map(|m| (m.name.as_str(), m.is_default))
            .collect();
        assert_eq!(flags, vec![("a", false), ("dflt", true)]);
    }
}
