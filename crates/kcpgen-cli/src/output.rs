//! Output management and formatting.

use std::io::{self, IsTerminal};

use console::Term;
use owo_colors::OwoColorize;
use serde_json::json;

use kcpgen_core::application::{FileStatus, ScaffoldReport};

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
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
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

    /// Generic message; suppressed in quiet and JSON modes.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
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
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// Per-file outcomes of a scaffold run.
    ///
    /// Failures are always listed; in JSON mode the whole report is emitted
    /// as one document regardless of `--quiet`.
    pub fn report(&self, report: &ScaffoldReport) -> io::Result<()> {
        if self.resolved_format == OutputFormat::Json {
            return self.term.write_line(&report_json(report).to_string());
        }

        for outcome in report.outcomes() {
            if self.quiet && !outcome.status.is_failure() {
                continue;
            }
            let label = format!("{:<12}", outcome.status.to_string());
            let label = if self.no_color {
                label
            } else {
                match outcome.status {
                    FileStatus::Created | FileStatus::Overwritten => label.green().to_string(),
                    FileStatus::Updated { .. } => label.blue().to_string(),
                    FileStatus::Skipped | FileStatus::Unchanged => label.dimmed().to_string(),
                    FileStatus::Failed(_) => label.red().bold().to_string(),
                }
            };
            let line = match &outcome.status {
                FileStatus::Failed(err) => format!("  {label} {} ({err})", outcome.path),
                _ => format!("  {label} {}", outcome.path),
            };
            self.term.write_line(&line)?;
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn silent(&self) -> bool {
        self.quiet || self.resolved_format == OutputFormat::Json
    }
}

/// Machine-readable form of a report.
pub fn report_json(report: &ScaffoldReport) -> serde_json::Value {
    let files: Vec<_> = report
        .outcomes()
        .iter()
        .map(|o| {
            let error = match &o.status {
                FileStatus::Failed(err) => Some(err.to_string()),
                _ => None,
            };
            json!({
                "path": o.path.to_string(),
                "template": o.template,
                "status": o.status.to_string(),
                "error": error,
            })
        })
        .collect();

    json!({
        "files": files,
        "summary": report.summary(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::AppConfig;

    fn make_manager(quiet: bool, no_color: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            verbose: 0,
            quiet,
            no_color,
            config: None,
            output_format: format,
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, true, OutputFormat::Plain);
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn plain_format_disables_color() {
        assert!(!make_manager(false, false, OutputFormat::Plain).supports_color());
        assert!(make_manager(false, false, OutputFormat::Human).supports_color());
        assert!(!make_manager(false, true, OutputFormat::Human).supports_color());
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, false, OutputFormat::Json);
        assert_eq!(out.format(), OutputFormat::Json);
    }

    #[test]
    fn empty_report_renders() {
        let out = make_manager(false, true, OutputFormat::Plain);
        assert!(out.report(&ScaffoldReport::default()).is_ok());
    }

    #[test]
    fn json_report_has_summary() {
        let value = report_json(&ScaffoldReport::default());
        assert_eq!(value["files"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["summary"]["created"], 0);
    }
}
