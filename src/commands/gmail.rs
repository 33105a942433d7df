use usagi_core::{CommandModule, Locale, NoArgsModule, RedirectResult};

/// Opens the Gmail inbox. Takes no arguments.
pub struct Gmail;

impl CommandModule for Gmail {
    fn name(&self) -> &str {
        "gmail"
    }

    fn description(&self) -> &str {
        "Open Gmail"
    }

    fn triggers(&self) -> &[&str] {
        &["gmail", "mail"]
    }
}

impl NoArgsModule for Gmail {
    fn redirect(&self, _language: Option<&Locale>) -> RedirectResult {
        Ok("https://mail.google.com/".to_string())
    }
}
