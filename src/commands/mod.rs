//! Built-in command modules.
//!
//! Registration is an explicit list: [`catalog`] returns every built-in module
//! in scan order, and [`build_registry`] feeds it to the engine with
//! [`Google`] as the default (catch-all) module.
//!
//! | Module | Keys |
//! |---|---|
//! | `google` | `g <query>`, `google <query>`, anything unmatched |
//! | `reddit` | `r/<sub>`, `r <query>`, `r nsfw <query>`, `reddit` |
//! | `youtube` | `yt <query>`, `youtube <query>` |
//! | `twitter` | `t <query>`, `t@ <user>`, `twitter <query>` |
//! | `jisho` | `j <word>`, `jw`/`jk`/`jn`/`js <word>`, `jisho <word>` |
//! | `wikipedia` | `w <query>`, `wiki <query>`, `w/<query>` |
//! | `gmail` | `gmail`, `mail` |

mod gmail;
mod google;
mod jisho;
mod reddit;
mod twitter;
mod wikipedia;
mod youtube;

pub use gmail::Gmail;
pub use google::Google;
pub use jisho::Jisho;
pub use reddit::Reddit;
pub use twitter::Twitter;
pub use wikipedia::Wikipedia;
pub use youtube::Youtube;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::info;
use usagi_core::{Module, Registry};

/// Characters left as-is in query values and path segments.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode `value` for use in a URL; spaces become `%20`.
pub(crate) fn quote(value: &str) -> String {
    utf8_percent_encode(value, QUERY_SAFE).to_string()
}

/// The module every unmatched command falls through to.
pub fn default_module() -> Module {
    Module::args(Google)
}

/// Every built-in module, in registration order.
pub fn catalog() -> Vec<Module> {
    vec![
        default_module(),
        Module::args(Reddit),
        Module::args(Youtube),
        Module::args(Twitter),
        Module::args(Jisho),
        Module::args(Wikipedia),
        Module::no_args(Gmail),
    ]
}

/// Names of the built-in modules, for config validation.
pub fn names() -> Vec<String> {
    catalog().iter().map(|m| m.name().to_string()).collect()
}

/// Build the registry from the catalog, skipping `disabled` module names.
///
/// The default module stays the catch-all even when disabled; disabling it
/// only removes its own bindings.
pub fn build_registry(disabled: &[String]) -> Registry {
    let mut builder = Registry::builder(default_module());
    for module in catalog() {
        if disabled.iter().any(|name| name.eq_ignore_ascii_case(module.name())) {
            info!(module = %module.name(), "Module disabled by configuration");
            continue;
        }
        builder.register(module);
    }
    builder.build()
}
