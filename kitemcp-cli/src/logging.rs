//! Log subscriber setup
//!
//! In MCP mode stdout carries the protocol, so logs go to a file under
//! `~/.kitemcp/` instead of the terminal.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Directory under the home directory that holds the MCP log
pub const LOG_DIR_NAME: &str = ".kitemcp";

/// Default log file name in MCP mode
pub const DEFAULT_LOG_FILE: &str = "mcp.log";

/// Environment variable overriding the log file name
pub const LOG_FILE_ENV: &str = "KITEMCP_LOG_FILE";

/// A thread-safe writer that flushes and syncs every write.
///
/// MCP clients usually swallow the server's stderr, so the log file is the only
/// way to see what happened. Every write is flushed and synced to disk before
/// the lock is released, so the file is complete even if the host kills the
/// server.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use std::fs::File;
/// use kitemcp_cli::logging::FileWriterGuard;
///
/// let file = File::create("log.txt").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
#[derive(Clone)]
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file.
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::other("log file mutex poisoned"))
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock()?;
        let result = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
}

/// Pick the log level from the global flags; `quiet` wins over the others
pub fn log_level(quiet: bool, debug: bool, verbose: bool) -> Level {
    if quiet {
        Level::ERROR
    } else if debug {
        Level::DEBUG
    } else if verbose {
        Level::TRACE
    } else {
        Level::INFO
    }
}

/// Path of the MCP-mode log file
pub fn mcp_log_path() -> PathBuf {
    let log_dir = match dirs::home_dir() {
        Some(home) => home.join(LOG_DIR_NAME),
        None => PathBuf::from(LOG_DIR_NAME),
    };

    let file_name = kitemcp::common::load_env_nonempty(LOG_FILE_ENV)
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());
    log_dir.join(file_name)
}

/// Open `path` for appending, creating its directory if needed
pub fn open_log_file(path: &std::path::Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber
///
/// In MCP mode logs are appended to [`mcp_log_path`]; if that file cannot be
/// opened, or outside MCP mode, they go to stderr.
pub fn init_logging(level: Level, mcp_mode: bool) {
    if !mcp_mode {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_max_level(level)
            .init();
        return;
    }

    let path = mcp_log_path();
    match open_log_file(&path) {
        Ok(file) => {
            let guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
            tracing_subscriber::fmt()
                .with_writer(move || guard.clone())
                .with_max_level(level)
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_writer(io::stderr)
                .with_max_level(level)
                .init();
            tracing::warn!(
                "Failed to open log file {}, using stderr: {}",
                path.display(),
                e
            );
        }
    }
}
