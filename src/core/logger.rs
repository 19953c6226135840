// ASN Lookup - Stderr Logger
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Systemd-style stderr logger
//!
//! Diagnostics go to stderr so stdout carries nothing but the lookup report:
//! - Log levels follow syslog priorities (err, warning, info, debug)
//! - Colored level tags when stderr is a terminal
//! - Optional timestamps

use std::sync::Mutex;

/// Log levels following syslog priority numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    /// Error conditions (3)
    Error = 3,
    /// Warning conditions (4)
    Warning = 4,
    /// Informational message (6)
    Info = 6,
    /// Debug-level message (7)
    Debug = 7,
}

impl LogLevel {
    pub fn priority(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn color_code(self) -> &'static str {
        match self {
            LogLevel::Error => "\x1b[31m",   // Red
            LogLevel::Warning => "\x1b[33m", // Yellow
            LogLevel::Info => "\x1b[32m",    // Green
            LogLevel::Debug => "\x1b[37m",   // White/gray
        }
    }
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Least severe level still printed
    pub min_level: LogLevel,
    pub use_colors: bool,
    pub include_timestamp: bool,
    /// Prefix messages with the emitting module path
    pub include_target: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Warning,
            use_colors: atty::is(atty::Stream::Stderr),
            include_timestamp: true,
            include_target: false,
        }
    }
}

static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
}

impl Logger {
    pub fn new(config: LoggerConfig) -> Self {
        Self { config }
    }

    /// Install the process-wide logger
    pub fn init(config: LoggerConfig) -> Result<(), LoggerError> {
        let mut global_logger = LOGGER.lock().map_err(|_| LoggerError::InitError)?;
        if global_logger.is_some() {
            return Err(LoggerError::AlreadyInitialized);
        }
        *global_logger = Some(Self::new(config));
        Ok(())
    }

    pub fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.min_level
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) {
        if self.should_log(level) {
            eprintln!("{}", self.format_line(level, target, message));
        }
    }

    fn format_line(&self, level: LogLevel, target: &str, message: &str) -> String {
        let mut output = String::new();

        if self.config.include_timestamp {
            let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
            output.push_str(&format!("{} ", now));
        }

        if self.config.use_colors {
            output.push_str(&format!("{}[{}]\x1b[0m ", level.color_code(), level.as_str()));
        } else {
            output.push_str(&format!("[{}] ", level.as_str()));
        }

        if self.config.include_target && !target.is_empty() {
            output.push_str(&format!("{}: ", target));
        }

        output.push_str(message);
        output
    }
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Error, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Warning, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Info, module_path!(), &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::core::logger::log_with_level($crate::core::logger::LogLevel::Debug, module_path!(), &format!($($arg)*))
    };
}

/// Log through the global logger; a no-op until [`Logger::init`] ran
pub fn log_with_level(level: LogLevel, target: &str, message: &str) {
    if let Ok(logger_guard) = LOGGER.lock() {
        if let Some(ref logger) = *logger_guard {
            logger.log(level, target, message);
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("Logger already initialized")]
    AlreadyInitialized,
    #[error("Failed to initialize logger")]
    InitError,
}

/// Initialize logger from CLI arguments
pub fn init_from_args(debug: bool) -> Result<(), LoggerError> {
    let config = LoggerConfig {
        min_level: if debug { LogLevel::Debug } else { LogLevel::Warning },
        include_target: debug,
        ..LoggerConfig::default()
    };

    Logger::init(config)
}
