//! Output management and formatting.

use std::io;

use console::Term;
use owo_colors::OwoColorize;

use crate::cli::global::GlobalArgs;
use crate::config::OutputConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &OutputConfig) -> Self {
        Self {
            quiet: args.quiet,
            no_color: args.no_color || config.no_color || !Term::stdout().is_term(),
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Command result (rendered markup). Written even in quiet mode.
    pub fn emit(&self, content: &str) -> io::Result<()> {
        self.term.write_line(content)
    }

    /// File creation notice: `create  <path>`.
    pub fn created(&self, path: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(&self.created_line(path))
    }

    fn created_line(&self, path: &str) -> String {
        if self.no_color {
            format!("create  {path}")
        } else {
            format!("{}  {}", "create".green().bold(), path)
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
