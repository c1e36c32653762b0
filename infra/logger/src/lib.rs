//! # Logger
//!
//! Installs the global `tracing` subscriber for the Folio binaries.
//!
//! * A compact console layer for operators.
//! * An optional rolling file layer (plain or JSON) written through a non-blocking worker.
//! * Filtering through `RUST_LOG`, or through an explicit directive set with
//!   [`LoggerBuilder::env_filter`] such as `"folio_settings=debug,tower_http=info"`.
//!
//! The file-only knobs (`rotation`, `max_files`, `json`) exist only after `.path(..)`
//! has been called, so a console-only logger cannot be misconfigured with them.
//!
//! ```rust
//! use folio_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder().name("folio-doc").level(LevelFilter::WARN).init().unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
struct Settings {
    console: bool,
    level: LevelFilter,
    directives: Option<String>,
    path: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            level: LevelFilter::INFO,
            directives: None,
            path: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Builder has no name yet.
#[derive(Debug)]
pub struct Unnamed;
/// Builder carries the application name.
#[derive(Debug)]
pub struct Named(String);
/// Console only.
#[derive(Debug)]
pub struct NoFile;
/// Rolling file output configured.
#[derive(Debug)]
pub struct WithFile;

impl sealed::Sealed for Unnamed {}
impl sealed::Sealed for Named {}
impl sealed::Sealed for NoFile {}
impl sealed::Sealed for WithFile {}

/// Typestate builder for [`Logger`].
#[derive(Debug)]
#[must_use = "call .init() to install the subscriber"]
pub struct LoggerBuilder<N: sealed::Sealed = Unnamed, F: sealed::Sealed = NoFile> {
    settings: Settings,
    name: N,
    file: PhantomData<F>,
}

impl<F: sealed::Sealed> LoggerBuilder<Unnamed, F> {
    /// Names the application; also used as the log file prefix.
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), file: PhantomData }
    }
}

impl<F: sealed::Sealed> LoggerBuilder<Named, F> {
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Programmatic filter directives. `RUST_LOG` is ignored when this is set.
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.settings.directives = Some(directives.into());
        self
    }

    /// Writes logs to `<dir>/<name>.<date>.log` in addition to the console.
    pub fn path(self, dir: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut settings = self.settings;
        settings.path = Some(dir.into());
        LoggerBuilder { settings, name: self.name, file: PhantomData }
    }

    /// Installs the global subscriber.
    ///
    /// The returned [`Logger`] owns the file writer guard and must outlive the program's
    /// logging; dropping it flushes pending lines.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        validate(&settings, &name)?;

        let filter = env_filter(&settings)?;
        let mut layers: Vec<BoxedLayer> = Vec::new();

        #[cfg(all(feature = "profiling", tokio_unstable))]
        if settings.console {
            layers.push(console_subscriber::spawn().boxed());
        }

        if settings.console {
            layers.push(fmt::layer().compact().with_target(true).boxed());
        }

        let guard = match &settings.path {
            Some(dir) => {
                let (layer, guard) = file_layer(&settings, &name, dir)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "neither console nor file output is enabled".into(),
                context: Some(name.into()),
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;

        Ok(Logger { guard })
    }
}

impl LoggerBuilder<Named, WithFile> {
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Number of rotated files kept on disk.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// One JSON object per line in the file output; the console stays human readable.
    pub const fn json(mut self) -> Self {
        self.settings.json = true;
        self
    }
}

/// Guard for the installed subscriber.
#[derive(Debug)]
#[must_use = "dropping the logger stops the file writer"]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, file: PhantomData }
    }

    /// `true` when a rolling file writer is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!("Flushing log files");
        }
    }
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "logger name is empty".into(),
            context: None,
        });
    }
    if name.contains(['/', '\\']) {
        return Err(LoggerError::InvalidConfiguration {
            message: format!("logger name `{name}` must not contain path separators").into(),
            context: None,
        });
    }
    if settings.path.is_some() && settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be at least 1".into(),
            context: Some(name.to_owned().into()),
        });
    }
    Ok(())
}

fn env_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    match &settings.directives {
        None => Ok(builder.from_env_lossy()),
        Some(directives) => builder.parse(directives).map_err(|e| {
            LoggerError::InvalidConfiguration {
                message: format!("bad filter `{directives}`: {e}").into(),
                context: None,
            }
        }),
    }
}

fn file_layer(
    settings: &Settings,
    name: &str,
    dir: &std::path::Path,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(dir).context(format!("creating {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(settings.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(settings.max_files)
        .build(dir)
        .context(format!("opening log files in {}", dir.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if settings.json { layer.json().boxed() } else { layer.boxed() };

    Ok((layer, guard))
}
