//! Diagnostics for the aiclone client.
//!
//! Views and command output own stdout, so every log line goes to stderr
//! and, when `logging.file` is set, to a daily-rotated file. `RUST_LOG`
//! narrows or widens individual targets on top of the chosen level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use crate::config::LoggingSettings;
use crate::error::{Error, Result};

const DEFAULT_LOG_NAME: &str = "aiclone.log";

/// Dependencies whose request plumbing is capped at `warn`.
const QUIET_TARGETS: [&str; 3] = ["hyper", "reqwest", "rustls"];

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Keeps the background file writer alive; drop it last.
pub struct LogGuards {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber for this process.
pub fn init_logging(settings: &LoggingSettings, verbose: u8, quiet: bool) -> Result<LogGuards> {
    let level = effective_level(&settings.level, verbose, quiet);

    let file = settings
        .file
        .as_deref()
        .map(|path| file_layer(Path::new(path), settings.max_files, settings.json_format))
        .transpose()?;
    let (file_output, file_guard) = match file {
        Some((layer, guard)) => (Some(layer), Some(guard)),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(output_layer(BoxMakeWriter::new(io::stderr), settings.json_format, true))
        .with(file_output)
        .init();

    tracing::debug!(%level, file = ?settings.file, json = settings.json_format, "Logging ready");

    Ok(LogGuards { _file: file_guard })
}

/// `--quiet` wins, then each `-v` steps up from the configured level.
fn effective_level(configured: &str, verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::from_str(configured).unwrap_or(Level::WARN),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn env_filter(level: Level) -> Result<EnvFilter> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()))
        .add_directive(directive(&format!("aiclone_client={}", level))?)
        .add_directive(directive(&format!("aiclone={}", level))?);
    let quiet = dependency_level(level).to_string().to_lowercase();
    for target in QUIET_TARGETS {
        filter = filter.add_directive(directive(&format!("{}={}", target, quiet))?);
    }
    Ok(filter)
}

/// The stricter of `level` and `warn`, so `--quiet` silences dependencies too.
fn dependency_level(level: Level) -> Level {
    // tracing orders levels by verbosity: ERROR < WARN < TRACE.
    std::cmp::min(level, Level::WARN)
}

fn directive(text: &str) -> Result<Directive> {
    text.parse()
        .map_err(|e| Error::Config(format!("Invalid log directive '{}': {}", text, e)))
}

/// One formatting layer; terminals get compact colored lines, files and
/// JSON get source locations.
fn output_layer<S>(writer: BoxMakeWriter, json: bool, terminal: bool) -> BoxedLayer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    if json {
        return Box::new(
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false),
        );
    }
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_file(!terminal)
        .with_line_number(!terminal)
        .with_ansi(terminal);
    if terminal {
        Box::new(layer.compact())
    } else {
        Box::new(layer)
    }
}

/// Split a configured log path into rotation directory and file prefix.
fn rotation_target(path: &Path) -> (PathBuf, String) {
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let prefix = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(DEFAULT_LOG_NAME)
        .to_string();
    (directory, prefix)
}

fn file_layer<S>(path: &Path, max_files: u32, json: bool) -> Result<(BoxedLayer<S>, WorkerGuard)>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    let (directory, prefix) = rotation_target(path);
    fs::create_dir_all(&directory).map_err(|source| Error::IoWrite {
        path: directory.clone(),
        source,
    })?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix("log")
        .max_log_files(max_files.max(1) as usize)
        .build(&directory)
        .map_err(|e| Error::Config(format!("Cannot open log file in '{}': {}", directory.display(), e)))?;

    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((output_layer(BoxMakeWriter::new(writer), json, false), guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_effective_level() {
        assert_eq!(effective_level("warn", 0, false), Level::WARN);
        assert_eq!(effective_level("INFO", 0, false), Level::INFO);
        assert_eq!(effective_level("nonsense", 0, false), Level::WARN);
        assert_eq!(effective_level("error", 1, false), Level::DEBUG);
        assert_eq!(effective_level("error", 3, false), Level::TRACE);
        assert_eq!(effective_level("trace", 2, true), Level::ERROR);
    }

    #[test]
    fn test_env_filter_builds() {
        assert!(env_filter(Level::DEBUG).is_ok());
        assert!(env_filter(Level::ERROR).is_ok());
    }

    #[test]
    fn test_dependency_level_follows_quiet() {
        assert_eq!(dependency_level(Level::ERROR), Level::ERROR);
        assert_eq!(dependency_level(Level::WARN), Level::WARN);
        assert_eq!(dependency_level(Level::INFO), Level::WARN);
        assert_eq!(dependency_level(Level::TRACE), Level::WARN);
    }

    #[test]
    fn test_rotation_target() {
        let (dir, prefix) = rotation_target(Path::new("/var/log/aiclone/client.log"));
        assert_eq!(dir, PathBuf::from("/var/log/aiclone"));
        assert_eq!(prefix, "client.log");

        let (dir, _) = rotation_target(Path::new("client.log"));
        assert_eq!(dir, PathBuf::from("."));
    }

    #[test]
    fn test_file_layer_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("session.log");

        let result = file_layer::<tracing_subscriber::Registry>(&log_path, 5, false);

        assert!(result.is_ok());
        assert!(temp_dir.path().join("logs").is_dir());
    }
}
