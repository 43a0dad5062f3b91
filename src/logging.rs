use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing_appender::non_blocking::{self, WorkerGuard};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

const DEFAULT_LOG_FILTER: &str = "warn,plx=info";
const DEFAULT_LOG_FILE_PATH: &str = "logs/plx.log";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type InitResult = Result<(), Box<dyn std::error::Error + Send + Sync + 'static>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogOutput {
    Stderr,
    File,
    Both,
}

fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw.unwrap_or("pretty").trim().to_ascii_lowercase().as_str() {
        "json" => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn parse_log_output(raw: Option<&str>) -> LogOutput {
    match raw.unwrap_or("stderr").trim().to_ascii_lowercase().as_str() {
        "file" => LogOutput::File,
        "both" => LogOutput::Both,
        _ => LogOutput::Stderr,
    }
}

fn parse_log_file_path(raw: Option<&str>) -> PathBuf {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE_PATH))
}

fn env_filter_from_env() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn build_file_writer(path: &Path) -> std::io::Result<(non_blocking::NonBlocking, WorkerGuard)> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| std::ffi::OsStr::new("plx.log"));

    fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::daily(dir, file_name);
    Ok(tracing_appender::non_blocking(appender))
}

fn init_with_writer(format: LogFormat, writer: BoxMakeWriter) -> InitResult {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter_from_env())
        .with_writer(writer);
    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

fn init_file_output(format: LogFormat, file_path: &Path, include_stderr: bool) -> InitResult {
    match build_file_writer(file_path) {
        Ok((file_writer, guard)) => {
            let writer = if include_stderr {
                BoxMakeWriter::new(std::io::stderr.and(file_writer))
            } else {
                BoxMakeWriter::new(file_writer)
            };

            let init_result = init_with_writer(format, writer);
            if init_result.is_ok() {
                let _ = LOG_GUARD.set(guard);
            }
            init_result
        }
        Err(err) => {
            let (mode, fallback) = if include_stderr {
                ("both", "using stderr only")
            } else {
                ("file", "using stderr instead")
            };
            eprintln!(
                "plx: failed to initialize LOG_OUTPUT={mode} at '{}': {err}; {fallback}",
                file_path.display()
            );
            init_with_writer(format, BoxMakeWriter::new(std::io::stderr))
        }
    }
}

/// Installs the global subscriber from `RUST_LOG`, `LOG_FORMAT`, `LOG_OUTPUT`,
/// and `LOG_FILE_PATH`. Initialization problems never abort the command.
pub fn init() {
    let format = parse_log_format(env::var("LOG_FORMAT").ok().as_deref());
    let output = parse_log_output(env::var("LOG_OUTPUT").ok().as_deref());
    let file_path = parse_log_file_path(env::var("LOG_FILE_PATH").ok().as_deref());

    let _ = match output {
        LogOutput::Stderr => init_with_writer(format, BoxMakeWriter::new(std::io::stderr)),
        LogOutput::File => init_file_output(format, &file_path, false),
        LogOutput::Both => init_file_output(format, &file_path, true),
    };
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{
        DEFAULT_LOG_FILE_PATH, LogFormat, LogOutput, parse_log_file_path, parse_log_format,
        parse_log_output,
    };

    #[test]
    fn parse_log_format_defaults_to_pretty_and_accepts_json() {
        assert_eq!(parse_log_format(None), LogFormat::Pretty);
        assert_eq!(parse_log_format(Some("unknown")), LogFormat::Pretty);
        assert_eq!(parse_log_format(Some(" JSON ")), LogFormat::Json);
    }

    #[test]
    fn parse_log_output_defaults_to_stderr_and_accepts_known_values() {
        assert_eq!(parse_log_output(None), LogOutput::Stderr);
        assert_eq!(parse_log_output(Some("unknown")), LogOutput::Stderr);
        assert_eq!(parse_log_output(Some("file")), LogOutput::File);
        assert_eq!(parse_log_output(Some(" BOTH ")), LogOutput::Both);
    }

    #[test]
    fn parse_log_file_path_falls_back_for_missing_or_empty_values() {
        assert_eq!(
            parse_log_file_path(None),
            PathBuf::from(DEFAULT_LOG_FILE_PATH)
        );
        assert_eq!(
            parse_log_file_path(Some("  ")),
            PathBuf::from(DEFAULT_LOG_FILE_PATH)
        );
        assert_eq!(
            parse_log_file_path(Some("custom/plx.log")),
            PathBuf::from("custom/plx.log")
        );
    }
}
