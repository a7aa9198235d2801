//! Tracing integration for structured logging
//!
//! The coordinators emit `tracing` events on every state transition. This
//! module wires those events to a `tracing-subscriber` fmt layer for hosts
//! and tools that do not install their own subscriber, and fixes the span
//! and field names used across the crate.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static INSTALLED: AtomicBool = AtomicBool::new(false);

static ACTIVE_CONFIG: OnceLock<TracingConfig> = OnceLock::new();

/// Crates covered by the default filter
const LISTKIT_TARGETS: &[&str] = &["listkit_core", "listkit_cli"];

/// Why the subscriber could not be installed
#[derive(Debug, Error)]
pub enum TracingError {
    /// Another global subscriber won the race
    #[error("Cannot install log subscriber: {0}")]
    InitializationFailed(String),

    /// A custom filter did not parse
    #[error("Invalid log filter directive: {0}")]
    InvalidFilter(String),

    /// [`init_tracing`] was already called successfully
    #[error("Logging has already been initialized")]
    AlreadyInitialized,

    /// The log file could not be opened for writing
    #[error("Cannot open log file {0}")]
    FileCreationFailed(String),
}

/// Result alias for [`init_tracing`]
pub type TracingResult<T> = Result<T, TracingError>;

/// Verbosity of the installed subscriber, from quietest to loudest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum TracingLevel {
    /// Errors only
    Error,
    /// Ignored payloads and other surprises
    #[default]
    Warn,
    /// Replay and settings milestones
    Info,
    /// State transitions of every coordinator
    Debug,
    /// Also no-op taps, drags and drops
    Trace,
}

impl TracingLevel {
    /// Lower-case name, as used in filter directives
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }

    /// Level for a `-v` count and `-q` flag, starting from [`TracingLevel::Warn`]
    #[must_use]
    pub const fn from_verbosity(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Error,
            (false, 0) => Self::Warn,
            (false, 1) => Self::Info,
            (false, 2) => Self::Debug,
            (false, _) => Self::Trace,
        }
    }
}

impl From<TracingLevel> for Level {
    fn from(level: TracingLevel) -> Self {
        match level {
            TracingLevel::Error => Self::ERROR,
            TracingLevel::Warn => Self::WARN,
            TracingLevel::Info => Self::INFO,
            TracingLevel::Debug => Self::DEBUG,
            TracingLevel::Trace => Self::TRACE,
        }
    }
}

impl FromStr for TracingLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        if lowered == "warning" {
            return Ok(Self::Warn);
        }
        [Self::Error, Self::Warn, Self::Info, Self::Debug, Self::Trace]
            .into_iter()
            .find(|level| level.as_str() == lowered)
            .ok_or_else(|| format!("unknown log level '{s}'"))
    }
}

impl fmt::Display for TracingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where formatted events go
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TracingOutput {
    /// Standard output
    Stdout,
    /// Standard error, keeping stdout for command results
    #[default]
    Stderr,
    /// A file, truncated when the subscriber is installed
    File {
        /// Log file path
        path: PathBuf,
    },
}

/// Settings for [`init_tracing`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TracingConfig {
    /// Level applied to every listkit crate
    pub level: TracingLevel,
    /// Destination of formatted events
    pub output: TracingOutput,
    /// Prefix each event with its module path
    pub include_targets: bool,
    /// Raw `EnvFilter` directives; replaces `level` when set
    pub filter: Option<String>,
}

impl TracingConfig {
    /// Warn level on stderr, no targets
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the level
    #[must_use]
    pub const fn with_level(mut self, level: TracingLevel) -> Self {
        self.level = level;
        self
    }

    /// Sets the destination
    #[must_use]
    pub fn with_output(mut self, output: TracingOutput) -> Self {
        self.output = output;
        self
    }

    /// Prints module paths when `include` is true
    #[must_use]
    pub const fn with_targets(mut self, include: bool) -> Self {
        self.include_targets = include;
        self
    }

    /// Uses raw filter directives instead of the level
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Builds the filter: the custom directives, or `<crate>=<level>` for
    /// each listkit crate.
    ///
    /// # Errors
    ///
    /// Returns [`TracingError::InvalidFilter`] if the directives do not parse.
    pub fn env_filter(&self) -> TracingResult<EnvFilter> {
        let directives = match &self.filter {
            Some(custom) => custom.clone(),
            None => LISTKIT_TARGETS
                .iter()
                .map(|target| format!("{target}={}", self.level))
                .collect::<Vec<_>>()
                .join(","),
        };
        EnvFilter::try_new(&directives)
            .map_err(|e| TracingError::InvalidFilter(format!("{directives}: {e}")))
    }

    fn make_writer(&self) -> TracingResult<(BoxMakeWriter, bool)> {
        Ok(match &self.output {
            TracingOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
            TracingOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
            TracingOutput::File { path } => {
                let file = std::fs::File::create(path).map_err(|e| {
                    TracingError::FileCreationFailed(format!("{}: {e}", path.display()))
                })?;
                (BoxMakeWriter::new(Mutex::new(file)), false)
            }
        })
    }
}

/// Installs the global fmt subscriber described by `config`.
///
/// Only the first successful call installs anything; a failed call can be
/// retried with a corrected configuration.
///
/// # Errors
///
/// - [`TracingError::AlreadyInitialized`] after a successful call
/// - [`TracingError::InvalidFilter`] for unparsable custom directives
/// - [`TracingError::FileCreationFailed`] if the log file cannot be created
/// - [`TracingError::InitializationFailed`] if the host installed its own
///   global subscriber first
pub fn init_tracing(config: &TracingConfig) -> TracingResult<()> {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        return Err(TracingError::AlreadyInitialized);
    }
    install(config).inspect_err(|_| INSTALLED.store(false, Ordering::SeqCst))?;

    let _ = ACTIVE_CONFIG.set(config.clone());
    tracing::debug!(level = %config.level, output = ?config.output, "Logging initialized");
    Ok(())
}

fn install(config: &TracingConfig) -> TracingResult<()> {
    let filter = config.env_filter()?;
    let (writer, ansi) = config.make_writer()?;
    let layer = tracing_subscriber::fmt::layer()
        .with_target(config.include_targets)
        .with_ansi(ansi)
        .with_writer(writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|e| TracingError::InitializationFailed(e.to_string()))
}

/// Returns true once [`init_tracing`] has succeeded
#[must_use]
pub fn is_tracing_initialized() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// Configuration passed to the successful [`init_tracing`] call
#[must_use]
pub fn get_tracing_config() -> Option<&'static TracingConfig> {
    ACTIVE_CONFIG.get()
}

/// Opens an info-level span named with one of [`span_names`].
///
/// ```ignore
/// let _span = listkit_core::trace_operation!(
///     span_names::SCRIPT_REPLAY,
///     list_kind = %kind,
///     item_count = items.len()
/// )
/// .entered();
/// ```
#[macro_export]
macro_rules! trace_operation {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}

/// Debug-level twin of `trace_operation!`, for per-gesture spans
#[macro_export]
macro_rules! trace_operation_debug {
    ($name:expr) => {
        tracing::debug_span!($name)
    };
    ($name:expr, $($field:tt)*) => {
        tracing::debug_span!($name, $($field)*)
    };
}

/// Span names, `<area>.<operation>`
pub mod span_names {
    /// Tap resolution
    pub const SELECTION_TAP: &str = "selection.tap";
    /// Arrow-key navigation
    pub const SELECTION_NAVIGATE: &str = "selection.navigate";
    /// Keyboard command dispatch
    pub const COMMAND_HANDLE: &str = "command.handle";
    /// Continuous drag
    pub const REORDER_DRAG: &str = "reorder.drag";
    /// Payload drop
    pub const REORDER_DROP: &str = "reorder.drop";
    /// Settings file load
    pub const CONFIG_LOAD: &str = "config.load";
    /// CLI script replay
    pub const SCRIPT_REPLAY: &str = "script.replay";
}
