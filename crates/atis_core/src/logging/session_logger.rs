//! Per-session logger with optional file and callback output.
//!
//! Each editing session can carry its own logger that:
//! - Writes to a dedicated log file (when a log directory is given)
//! - Sends formatted lines to a presentation callback (if provided)
//! - Skips derived-phrase chatter in compact mode
//! - Keeps a tail of recent rejected edits for inline review

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::Mutex;

use super::types::{LogCallback, LogConfig, LogLevel, MessagePrefix};

/// Session logger with dual output (file + callback).
pub struct SessionLogger {
    session_name: String,
    log_path: Option<PathBuf>,
    file_writer: Mutex<Option<BufWriter<File>>>,
    callback: Mutex<Option<LogCallback>>,
    config: LogConfig,
    /// Recent rejected edits, oldest first.
    rejections: Mutex<VecDeque<String>>,
}

impl SessionLogger {
    /// Create a logger writing to `<log_dir>/<session_name>.log`.
    pub fn new(
        session_name: impl Into<String>,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> std::io::Result<Self> {
        let session_name = session_name.into();
        let log_dir = log_dir.as_ref();

        fs::create_dir_all(log_dir)?;
        let log_path = log_dir.join(format!("{}.log", sanitize_filename(&session_name)));
        let file = File::create(&log_path)?;

        Ok(Self {
            session_name,
            log_path: Some(log_path),
            file_writer: Mutex::new(Some(BufWriter::new(file))),
            callback: Mutex::new(callback),
            rejections: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
        })
    }

    /// Create a logger with no file output.
    pub fn in_memory(
        session_name: impl Into<String>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> Self {
        Self {
            session_name: session_name.into(),
            log_path: None,
            file_writer: Mutex::new(None),
            callback: Mutex::new(callback),
            rejections: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    /// Path of the log file, if writing to one.
    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Log a message at the specified level.
    pub fn log(&self, level: LogLevel, message: &str) {
        if level < self.config.level {
            return;
        }
        let formatted = self.format_message(message);
        self.output(&formatted);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, &MessagePrefix::Warning.format(message));
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, &MessagePrefix::Error.format(message));
    }

    pub fn section(&self, name: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Section.format(name));
    }

    /// Record an accepted edit and its canonical text.
    pub fn accepted(&self, field: &str, text: &str) {
        let msg = MessagePrefix::Accepted.format(&format!("{} = {}", field, text));
        self.log(LogLevel::Info, &msg);
    }

    /// Record a rejected edit. Always kept in the tail buffer.
    pub fn rejected(&self, field: &str, reason: &str) {
        let msg = MessagePrefix::Rejected.format(&format!("{}: {}", field, reason));
        {
            let mut tail = self.rejections.lock();
            if self.config.error_tail > 0 {
                if tail.len() >= self.config.error_tail {
                    tail.pop_front();
                }
                tail.push_back(msg.clone());
            }
        }
        self.log(LogLevel::Warn, &msg);
    }

    /// Record a derived phrase recomputation (suppressed in compact mode).
    pub fn derived(&self, name: &str, text: &str) {
        if self.config.compact {
            return;
        }
        let msg = MessagePrefix::Derived.format(&format!("{} = {}", name, text));
        self.log(LogLevel::Debug, &msg);
    }

    /// Record an export.
    pub fn export(&self, destination: &str) {
        self.log(LogLevel::Info, &MessagePrefix::Export.format(destination));
    }

    /// Recent rejections, oldest first.
    pub fn get_tail(&self) -> Vec<String> {
        self.rejections.lock().iter().cloned().collect()
    }

    /// Write the rejection tail to the outputs.
    pub fn show_tail(&self, header: &str) {
        let tail = self.rejections.lock();
        if tail.is_empty() {
            return;
        }
        self.output(&self.format_message(&format!("[{}/tail]", header)));
        for line in tail.iter() {
            self.output(&self.format_message(line));
        }
    }

    pub fn clear_tail(&self) {
        self.rejections.lock().clear();
    }

    pub fn flush(&self) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writer.flush();
        }
    }

    /// Flush and release the log file.
    pub fn close(&self) {
        self.flush();
        *self.file_writer.lock() = None;
    }

    fn format_message(&self, message: &str) -> String {
        if self.config.show_timestamps {
            let timestamp = Utc::now().format("%H:%M:%SZ");
            format!("[{}] {}", timestamp, message)
        } else {
            message.to_string()
        }
    }

    fn output(&self, formatted: &str) {
        if let Some(ref mut writer) = *self.file_writer.lock() {
            let _ = writeln!(writer, "{}", formatted);
        }

        if let Some(ref callback) = *self.callback.lock() {
            callback(formatted);
        }
    }
}

impl Drop for SessionLogger {
    fn drop(&mut self) {
        self.close();
    }
}

/// Sanitize a string to be safe for use as a filename.
pub(crate) fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | ' ' => '_',
            _ => c,
        })
        .collect()
}
