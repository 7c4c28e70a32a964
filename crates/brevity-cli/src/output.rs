//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Auto falls back to the configured format, then to TTY detection.
        let resolved_format = match (args.output_format, config.output.format.as_str()) {
            (OutputFormat::Auto, "json") => OutputFormat::Json,
            (OutputFormat::Auto, "plain") => OutputFormat::Plain,
            (OutputFormat::Auto, _) if io::stdout().is_terminal() => OutputFormat::Human,
            (OutputFormat::Auto, _) => OutputFormat::Plain,
            (explicit, _) => explicit,
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }
    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Pretty JSON document on stdout.  Printed even in quiet mode, since
    /// a caller asking for JSON is parsing the output.
    pub fn json<T: Serialize>(&self, value: &T) -> io::Result<()> {
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    /// Unstyled block of text (brief documents, completions); never colored.
    pub fn raw(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_str(text)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, format: OutputFormat, config: &AppConfig) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            debug: false,
            quiet,
            no_color: false,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, config)
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, OutputFormat::Plain, &AppConfig::default());
        assert!(out.print("hello").is_ok());
        assert!(out.raw("brevity\n").is_ok());
    }

    #[test]
    fn only_human_output_is_colored() {
        let config = AppConfig::default();
        assert!(!make_manager(false, OutputFormat::Human, &config).no_color);
        assert!(make_manager(false, OutputFormat::Plain, &config).no_color);
        assert!(make_manager(false, OutputFormat::Json, &config).no_color);
    }

    #[test]
    fn auto_uses_configured_format() {
        let mut config = AppConfig::default();
        config.output.format = "json".into();
        let out = make_manager(false, OutputFormat::Auto, &config);
        assert_eq!(out.format(), OutputFormat::Json);

        let explicit = make_manager(false, OutputFormat::Plain, &config);
        assert_eq!(explicit.format(), OutputFormat::Plain);
    }
}
