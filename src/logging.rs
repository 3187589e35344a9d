//! Logger setup.
//!
//! Uses `env_logger` with `RUST_LOG` (default `warn`). While the terminal UI
//! owns the screen, output is redirected to a file or dropped.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Logger, Target};
use log::LevelFilter;

/// Where log records go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Standard error, for one-shot commands.
    Stderr,
    /// Appends to the given file, or discards output when `None`.
    Session(Option<&'a Path>),
}

/// Installs the global logger. Calling it more than once is harmless.
pub fn init(target: LogTarget<'_>) {
    let logger = build(target);
    let max_level = logger.filter();
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(max_level);
    }
}

fn build(target: LogTarget<'_>) -> Logger {
    match target {
        LogTarget::Stderr => from_env().target(Target::Stderr).build(),
        LogTarget::Session(Some(path)) => {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => from_env().target(Target::Pipe(Box::new(file))).build(),
                Err(e) => {
                    eprintln!("Warning: cannot open log file {}: {e}", path.display());
                    discard()
                }
            }
        }
        LogTarget::Session(None) => discard(),
    }
}

fn from_env() -> Builder {
    Builder::from_env(Env::default().default_filter_or("warn"))
}

// RUST_LOG is ignored here; a module directive would otherwise still reach the screen.
fn discard() -> Logger {
    Builder::new()
        .filter_level(LevelFilter::Off)
        .target(Target::Pipe(Box::new(io::sink())))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};
    use serial_test::serial;
    use tempfile::tempdir;

    fn store_debug() -> Metadata<'static> {
        Metadata::builder()
            .level(Level::Debug)
            .target("notes::store")
            .build()
    }

    fn with_rust_log<T>(value: &str, f: impl FnOnce() -> T) -> T {
        unsafe { std::env::set_var("RUST_LOG", value) };
        let result = f();
        unsafe { std::env::remove_var("RUST_LOG") };
        result
    }

    #[test]
    #[serial]
    fn session_without_file_drops_module_directives() {
        let logger = with_rust_log("notes=debug", || build(LogTarget::Session(None)));

        assert_eq!(logger.filter(), LevelFilter::Off);
        assert!(!logger.enabled(&store_debug()));
        assert!(!logger.enabled(
            &Metadata::builder().level(Level::Error).target("notes").build()
        ));
    }

    #[test]
    #[serial]
    fn unopenable_session_file_drops_records() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened for appending
        let logger = with_rust_log("notes=debug", || build(LogTarget::Session(Some(dir.path()))));

        assert_eq!(logger.filter(), LevelFilter::Off);
        assert!(!logger.enabled(&store_debug()));
    }

    #[test]
    #[serial]
    fn session_file_and_stderr_follow_rust_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.log");

        let (session, stderr) = with_rust_log("notes=debug", || {
            (
                build(LogTarget::Session(Some(&path))),
                build(LogTarget::Stderr),
            )
        });

        assert!(session.enabled(&store_debug()));
        assert!(stderr.enabled(&store_debug()));
        assert!(path.exists());
    }

    #[test]
    #[serial]
    fn default_level_is_warn() {
        unsafe { std::env::remove_var("RUST_LOG") };
        let logger = build(LogTarget::Stderr);

        assert_eq!(logger.filter(), LevelFilter::Warn);
        assert!(!logger.enabled(&store_debug()));
    }
}
