//! ANSI styling for CLI output.
//!
//! Colors are dropped when `NO_COLOR` is set or stdout is not a terminal.

/// ANSI reset sequence
const ANSI_RESET: &str = "\x1b[0m";

/// Color escape codes used by the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub accent: &'static str,
    pub error: &'static str,
    pub success: &'static str,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text_primary: "\x1b[37m",
            text_secondary: "\x1b[90m",
            accent: "\x1b[32m",
            error: "\x1b[31m",
            success: "\x1b[32m",
        }
    }
}

impl Theme {
    /// Theme that emits no escape codes.
    pub fn plain() -> Self {
        Self {
            text_primary: "",
            text_secondary: "",
            accent: "",
            error: "",
            success: "",
        }
    }

    fn paint(code: &str, text: &str) -> String {
        if code.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", code, text, ANSI_RESET)
        }
    }

    pub fn accent_text(&self, text: &str) -> String {
        Self::paint(self.accent, text)
    }

    pub fn primary_text(&self, text: &str) -> String {
        Self::paint(self.text_primary, text)
    }

    pub fn secondary_text(&self, text: &str) -> String {
        Self::paint(self.text_secondary, text)
    }

    pub fn error_text(&self, text: &str) -> String {
        Self::paint(self.error, text)
    }

    pub fn success_text(&self, text: &str) -> String {
        Self::paint(self.success, text)
    }
}

/// Theme for the current process.
pub fn current_theme() -> Theme {
    if std::env::var_os("NO_COLOR").is_some() || !atty::is(atty::Stream::Stdout) {
        Theme::plain()
    } else {
        Theme::default()
    }
}
