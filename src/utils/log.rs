// src/utils/log.rs

//! Console output with server-style formatting.
//!
//! Diagnostics go through the `log` macros; these helpers print the
//! human-facing report of a CLI run.

use std::sync::OnceLock;

use chrono::Local;

/// Suppresses everything except results and errors.
static QUIET: OnceLock<bool> = OnceLock::new();

/// Output level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Set quiet mode once at startup.
pub fn init(quiet: bool) {
    let _ = QUIET.set(quiet);
}

fn is_quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}

/// Format a line with timestamp and level
fn format_line(level: Level, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, level.as_str(), message)
}

pub fn info(message: &str) {
    if !is_quiet() {
        println!("{}", format_line(Level::Info, message));
    }
}

pub fn warn(message: &str) {
    if !is_quiet() {
        eprintln!("{}", format_line(Level::Warn, message));
    }
}

pub fn error(message: &str) {
    eprintln!("{}", format_line(Level::Error, message));
}

/// Print a result line (shown even in quiet mode)
pub fn result(message: &str) {
    println!("{message}");
}

/// Print a header
pub fn header(title: &str) {
    if !is_quiet() {
        let border = "═".repeat(60);
        println!("{}", format_line(Level::Info, &border));
        println!("{}", format_line(Level::Info, &format!("  {}", title)));
        println!("{}", format_line(Level::Info, &border));
    }
}

/// Print an indented sub-item
pub fn sub_item(message: &str) {
    if !is_quiet() {
        let msg = format!("    {}", message);
        println!("{}", format_line(Level::Info, &msg));
    }
}

/// Print a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    if !is_quiet() {
        println!("{}", format_line(Level::Info, &format!("[SUMMARY] {}", title)));
        for (key, value) in items {
            let item_msg = format!("    {}: {}", key, value);
            println!("{}", format_line(Level::Info, &item_msg));
        }
    }
}
