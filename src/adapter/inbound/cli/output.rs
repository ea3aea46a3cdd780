//! Terminal output for command handlers.
//!
//! Every helper has two renderings: a colored human line on stdout, or one
//! JSON object per line (`{"type": ..., "payload": ...}`) when `--json` is
//! set. `--quiet` drops informational lines but keeps warnings, errors and
//! JSON.

use std::fmt::Display;
use std::sync::RwLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use serde_json::{json, Value};

/// Output flags taken from the global CLI options.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
    /// Number of `-v` flags.
    pub verbose: u8,
}

impl OutputConfig {
    #[must_use]
    pub const fn new(json: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            json,
            quiet,
            verbose,
        }
    }
}

static CONFIG: RwLock<OutputConfig> = RwLock::new(OutputConfig::new(false, false, 0));

fn current() -> OutputConfig {
    *CONFIG.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Install the flags for the rest of the process.
pub fn configure(config: OutputConfig) {
    *CONFIG.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = config;
}

#[must_use]
pub fn is_json() -> bool {
    current().json
}

#[must_use]
pub fn verbosity() -> u8 {
    current().verbose
}

/// How a line behaves under `--quiet`.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Level {
    Info,
    Important,
}

fn suppressed(config: OutputConfig, level: Level) -> bool {
    !config.json && config.quiet && level == Level::Info
}

/// Print one item in whichever mode is active.
fn emit(kind: &str, level: Level, payload: Value, render: impl FnOnce() -> String) {
    let config = current();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": payload }));
    } else if !suppressed(config, level) {
        println!("{}", render());
    }
}

/// Application name and version.
pub fn header(version: &str) {
    emit(
        "header",
        Level::Info,
        json!({ "app": "nodefleet", "version": version }),
        || format!("{} {}\n", "nodefleet".bold(), version.dimmed()),
    );
}

/// Bold title preceded by a blank line.
pub fn section(title: &str) {
    emit("section", Level::Info, json!({ "title": title }), || {
        format!("\n{}", title.bold())
    });
}

/// Aligned `label value` pair.
pub fn field(label: &str, value: impl Display) {
    let value = value.to_string();
    emit(
        "field",
        Level::Info,
        json!({ "label": label, "value": value }),
        || format!("  {:<12} {value}", label.dimmed()),
    );
}

pub fn success(message: &str) {
    emit("success", Level::Info, json!({ "message": message }), || {
        format!("  {} {message}", "✓".green())
    });
}

pub fn warning(message: &str) {
    emit(
        "warning",
        Level::Important,
        json!({ "message": message }),
        || format!("  {} {message}", "⚠".yellow()),
    );
}

/// Errors always go to stderr.
pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
    } else {
        eprintln!("  {} {message}", "×".red());
    }
}

pub fn note(message: &str) {
    emit("note", Level::Info, json!({ "message": message }), || {
        format!("  {}", message.dimmed())
    });
}

/// Suggested next command.
pub fn hint(message: &str) {
    emit("hint", Level::Info, json!({ "message": message }), || {
        format!("  {}: {}", "hint".cyan().dimmed(), message.dimmed())
    });
}

/// Work starting on `target`, e.g. "Starting node_group_ab...".
pub fn action(verb: &str, target: &str) {
    emit(
        "action",
        Level::Info,
        json!({ "verb": verb, "target": target, "status": "in_progress" }),
        || format!("  {} {target}...", verb.bold().cyan()),
    );
}

/// Work finished on `target`.
pub fn action_done(verb: &str, target: &str) {
    emit(
        "action",
        Level::Info,
        json!({ "verb": verb, "target": target, "status": "done" }),
        || format!("  {} {} {target}", "✓".green(), verb.bold().green()),
    );
}

/// Raw multi-line text such as a response body, indented.
pub fn lines(content: &str) {
    emit("lines", Level::Info, json!({ "content": content }), || {
        indent(content)
    });
}

/// Pre-rendered table. Nothing is printed in JSON mode; callers emit their
/// own JSON document instead.
pub fn table(rendered: impl Display) {
    let config = current();
    if !config.json && !suppressed(config, Level::Info) {
        println!("{}", indent(&rendered.to_string()));
    }
}

/// Print a complete JSON document on one line.
pub fn json_output(value: Value) {
    println!("{value}");
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("  {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner for long steps; hidden in JSON or quiet mode.
pub fn spinner(message: &str) -> ProgressBar {
    let config = current();
    let pb = if config.json || config.quiet {
        ProgressBar::hidden()
    } else {
        let style = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let pb = ProgressBar::new_spinner().with_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };
    pb.set_message(message.to_string());
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_success", Level::Info, format!("{} {message}", "✓".green()), message);
}

pub fn spinner_fail(pb: &ProgressBar, message: &str) {
    finish(pb, "spinner_fail", Level::Important, format!("{} {message}", "×".red()), message);
}

fn finish(pb: &ProgressBar, kind: &str, level: Level, rendered: String, message: &str) {
    let config = current();
    if config.json {
        println!("{}", json!({ "type": kind, "payload": { "message": message } }));
        pb.finish_and_clear();
    } else if suppressed(config, level) {
        pb.finish_and_clear();
    } else {
        pb.finish_with_message(rendered);
    }
}

/// Cyan value, plain in JSON mode.
pub fn highlight(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.cyan().to_string()
    }
}

/// Dimmed value, plain in JSON mode.
pub fn muted(value: impl Display) -> String {
    if is_json() {
        value.to_string()
    } else {
        value.dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_keeps_warnings_and_json() {
        let quiet = OutputConfig::new(false, true, 0);
        assert!(suppressed(quiet, Level::Info));
        assert!(!suppressed(quiet, Level::Important));
        assert!(!suppressed(OutputConfig::new(true, true, 0), Level::Info));
        assert!(!suppressed(OutputConfig::new(false, false, 2), Level::Info));
    }

    #[test]
    fn indent_prefixes_every_line() {
        assert_eq!(indent("a\nb"), "  a\n  b");
    }
}
