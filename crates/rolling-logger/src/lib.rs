//! Rolling Logger
//!
//! File logger for the panel client.
//! - Size based rotation: `app.log`, `app.log.1`, ... `app.log.N`
//! - Circular buffer of the most recent lines for in-app diagnostics
//! - Installs a `tracing` subscriber and bridges the `log` facade into it

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_MAX_BYTES: u64 = 2 * 1024 * 1024;
const DEFAULT_MAX_FILES: usize = 3;
const DEFAULT_BUFFER_LINES: usize = 500;

static WRITER: OnceLock<RollingFileWriter> = OnceLock::new();

/// Logger settings
#[derive(Debug, Clone)]
pub struct LoggerOptions {
    pub log_dir: PathBuf,
    pub app_name: String,
    /// Rotate once the active file would grow past this size
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one
    pub max_files: usize,
    /// Lines kept in the in-memory ring
    pub buffer_lines: usize,
    pub level: tracing::Level,
}

impl LoggerOptions {
    pub fn new(log_dir: impl Into<PathBuf>, app_name: &str) -> Self {
        Self {
            log_dir: log_dir.into(),
            app_name: app_name.to_string(),
            max_bytes: DEFAULT_MAX_BYTES,
            max_files: DEFAULT_MAX_FILES,
            buffer_lines: DEFAULT_BUFFER_LINES,
            level: tracing::Level::INFO,
        }
    }
}

struct RollingState {
    dir: PathBuf,
    base_name: String,
    file: Option<File>,
    written: u64,
    max_bytes: u64,
    max_files: usize,
    recent: VecDeque<String>,
    capacity: usize,
    partial: String,
}

impl RollingState {
    fn current_path(&self) -> PathBuf {
        self.dir.join(format!("{}.log", self.base_name))
    }

    fn rotated_path(&self, n: usize) -> PathBuf {
        self.dir.join(format!("{}.log.{}", self.base_name, n))
    }

    fn open(&mut self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.current_path())?;
        self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
        self.file = Some(file);
        Ok(())
    }

    fn rotate(&mut self) -> io::Result<()> {
        // Close before renaming (Windows refuses to rename open files)
        self.file = None;

        let oldest = self.rotated_path(self.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.max_files).rev() {
            let from = self.rotated_path(n);
            if from.exists() {
                fs::rename(&from, self.rotated_path(n + 1))?;
            }
        }
        let current = self.current_path();
        if current.exists() {
            fs::rename(&current, self.rotated_path(1))?;
        }

        self.open()
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.file.is_none() {
            self.open()?;
        }
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("log file not open"))?;
        file.write_all(buf)?;
        self.written += buf.len() as u64;

        self.remember(buf);
        Ok(buf.len())
    }

    /// Split the written bytes into lines for the ring buffer.
    /// A write may carry a partial line; it is completed by a later write.
    fn remember(&mut self, buf: &[u8]) {
        self.partial.push_str(&String::from_utf8_lossy(buf));
        while let Some(pos) = self.partial.find('\n') {
            let line: String = self.partial.drain(..=pos).collect();
            if self.capacity == 0 {
                continue;
            }
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(line.trim_end().to_string());
        }
    }
}

/// Shared handle to the rotating log file.
///
/// Cheap to clone; every clone writes to the same file and ring buffer.
#[derive(Clone)]
pub struct RollingFileWriter {
    state: Arc<Mutex<RollingState>>,
}

impl RollingFileWriter {
    pub fn new(options: &LoggerOptions) -> io::Result<Self> {
        let mut state = RollingState {
            dir: options.log_dir.clone(),
            base_name: options.app_name.clone(),
            file: None,
            written: 0,
            max_bytes: options.max_bytes.max(1),
            max_files: options.max_files.max(1),
            recent: VecDeque::with_capacity(options.buffer_lines),
            capacity: options.buffer_lines,
            partial: String::new(),
        };
        state.open()?;
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Most recent complete lines, oldest first
    pub fn recent_lines(&self) -> Vec<String> {
        match self.state.lock() {
            Ok(state) => state.recent.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Path of the file currently written to
    pub fn current_path(&self) -> Option<PathBuf> {
        self.state.lock().ok().map(|state| state.current_path())
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("rolling logger lock poisoned"))?;
        state.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("rolling logger lock poisoned"))?;
        match state.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for RollingFileWriter {
    type Writer = RollingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Local wall clock timestamps, millisecond precision
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

fn to_log_filter(level: tracing::Level) -> log::LevelFilter {
    if level == tracing::Level::ERROR {
        log::LevelFilter::Error
    } else if level == tracing::Level::WARN {
        log::LevelFilter::Warn
    } else if level == tracing::Level::INFO {
        log::LevelFilter::Info
    } else if level == tracing::Level::DEBUG {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Trace
    }
}

/// Initialize the global logger with default rotation settings
pub fn init_logger(log_dir: PathBuf, app_name: &str) -> Result<(), String> {
    init_with(LoggerOptions::new(log_dir, app_name))
}

/// Initialize the global logger.
///
/// Fails if a logger (or any other global `tracing` subscriber) is already installed.
pub fn init_with(options: LoggerOptions) -> Result<(), String> {
    if WRITER.get().is_some() {
        return Err("Logger already initialized".to_string());
    }

    let writer = RollingFileWriter::new(&options)
        .map_err(|e| format!("Failed to open log file: {}", e))?;

    tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_ansi(false)
        .with_timer(LocalTimer)
        .with_max_level(options.level)
        .try_init()
        .map_err(|e| format!("Failed to install subscriber: {}", e))?;

    // LogTracer lets everything through; narrow it to the configured level
    log::set_max_level(to_log_filter(options.level));

    let _ = WRITER.set(writer);
    Ok(())
}

fn ensure_init() -> Result<(), String> {
    if WRITER.get().is_none() {
        return Err("Logger not initialized".to_string());
    }
    Ok(())
}

pub fn info(msg: &str) -> Result<(), String> {
    ensure_init()?;
    tracing::info!("{}", msg);
    Ok(())
}

pub fn warn(msg: &str) -> Result<(), String> {
    ensure_init()?;
    tracing::warn!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), String> {
    ensure_init()?;
    tracing::error!("{}", msg);
    Ok(())
}

/// Recent lines of the global logger (empty before `init_logger`)
pub fn recent_lines() -> Vec<String> {
    WRITER.get().map(|w| w.recent_lines()).unwrap_or_default()
}
