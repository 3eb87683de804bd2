//! Tagged console logging for CryptoLizard
//!
//! Colored output with per-subsystem tags. Debug messages are only shown
//! when `--debug` is passed or `LIZARD_DEBUG` is set.

use chrono::Utc;
use colored::*;
use once_cell::sync::Lazy;
use std::env;
use std::io::{self, Write};

static DEBUG_ENABLED: Lazy<bool> =
    Lazy::new(|| env::args().any(|a| a == "--debug") || env::var("LIZARD_DEBUG").is_ok());

/// Subsystem tag attached to every log line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    System,
    Api,
    Cache,
    Bootstrap,
    Refresh,
    Webserver,
}

impl LogTag {
    fn label(&self) -> ColoredString {
        match self {
            LogTag::System => "SYSTEM".green().bold(),
            LogTag::Api => "API".cyan().bold(),
            LogTag::Cache => "CACHE".blue().bold(),
            LogTag::Bootstrap => "BOOTSTRAP".magenta().bold(),
            LogTag::Refresh => "REFRESH".yellow().bold(),
            LogTag::Webserver => "WEBSERVER".bright_green().bold(),
        }
    }
}

/// Initialize the logger system
///
/// Call once at startup before any logging occurs.
pub fn init() {
    Lazy::force(&DEBUG_ENABLED);
}

pub fn info(tag: LogTag, message: &str) {
    emit(tag, message.normal());
}

pub fn warning(tag: LogTag, message: &str) {
    emit(tag, message.yellow());
}

pub fn error(tag: LogTag, message: &str) {
    emit(tag, message.red());
}

/// Only shown with --debug / LIZARD_DEBUG
pub fn debug(tag: LogTag, message: &str) {
    if *DEBUG_ENABLED {
        emit(tag, message.dimmed());
    }
}

fn emit(tag: LogTag, message: ColoredString) {
    let timestamp = Utc::now().format("%H:%M:%S");
    println!(
        "{} {} {}",
        tag.label(),
        format!("[{}]", timestamp).dimmed(),
        message
    );
    let _ = io::stdout().flush();
}
