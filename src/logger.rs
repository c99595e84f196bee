//! Structured terminal logging with box-drawing decoration.
//!
//! Level-prefixed messages plus a few layout helpers used to draw the prayer
//! board. Output can be switched off globally (tests, scripted use), and debug
//! lines only appear once `--debug` has enabled them.

use std::sync::atomic::{AtomicBool, Ordering};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);
static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log level enumeration for categorizing message importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Log,  // Debug/diagnostic output
    Warn, // Degraded but continuing (fallback times, nearest-day lookups)
    Err,  // Recoverable failures
    Info, // Status updates
}

impl LogLevel {
    pub fn prefix(&self) -> &'static str {
        match self {
            LogLevel::Log => "[LOG] ",
            LogLevel::Warn => "[WARN] ",
            LogLevel::Err => "[ERR] ",
            LogLevel::Info => "[INFO] ",
        }
    }
}

pub struct Log;

impl Log {
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_debug() -> bool {
        DEBUG_ENABLED.load(Ordering::SeqCst)
    }

    /// Print `message` with the prefix for `level`.
    pub fn log(level: LogLevel, message: &str) {
        if !Self::is_enabled() {
            return;
        }
        if level == LogLevel::Log && !Self::is_debug() {
            return;
        }
        println!("{}{}", level.prefix(), message);
    }

    pub fn log_error(message: &str) {
        Self::log(LogLevel::Err, message);
    }

    pub fn log_warning(message: &str) {
        Self::log(LogLevel::Warn, message);
    }

    pub fn log_info(message: &str) {
        Self::log(LogLevel::Info, message);
    }

    pub fn log_debug(message: &str) {
        Self::log(LogLevel::Log, message);
    }

    // ═══ Visual Formatting Functions ═══

    /// Main status line.
    pub fn log_decorated(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┣ {}", message);
    }

    /// Detail line under a status line.
    pub fn log_indented(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃   {}", message);
    }

    pub fn log_pipe() {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
    }

    /// Spacer followed by a status line.
    pub fn log_block_start(message: &str) {
        if !Self::is_enabled() {
            return;
        }
        println!("┃");
        println!("┣ {}", message);
    }

    pub fn log_version() {
        if !Self::is_enabled() {
            return;
        }
        println!("┏ abadaat v{} ━━╸", env!("CARGO_PKG_VERSION"));
        println!("┃");
    }

    pub fn log_end() {
        if !Self::is_enabled() {
            return;
        }
        println!("╹");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_prefixes() {
        assert_eq!(LogLevel::Log.prefix(), "[LOG] ");
        assert_eq!(LogLevel::Warn.prefix(), "[WARN] ");
        assert_eq!(LogLevel::Err.prefix(), "[ERR] ");
        assert_eq!(LogLevel::Info.prefix(), "[INFO] ");
    }

    #[test]
    fn test_debug_flag_round_trip() {
        let before = Log::is_debug();
        Log::set_debug(true);
        assert!(Log::is_debug());
        Log::set_debug(false);
        assert!(!Log::is_debug());
        Log::set_debug(before);
    }
}
