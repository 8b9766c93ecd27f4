//! File-based logging bootstrap.
//!
//! The TUI owns the terminal while it runs, so log output goes to a rotating
//! file under the configured log directory instead of stderr.
//!
//! # Invariants
//! - Initialization is idempotent for the same directory and level.
//! - Initialization never panics; failures come back as `Err`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "contact-book";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: PathBuf,
    logger: LoggerHandle,
}

/// Start the file logger. Calling again with the same arguments is a no-op;
/// calling with a different directory or level is rejected.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    if let Some(state) = LOGGING_STATE.get() {
        return check_matches(state, level, log_dir);
    }

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

        let logger = Logger::try_with_str(level)
            .map_err(|err| anyhow!("invalid log level `{level}`: {err}"))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| anyhow!("failed to start logger: {err}"))?;

        info!(
            "event=app_start module=logging status=ok version={} level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            level: level.to_string(),
            log_dir: log_dir.to_path_buf(),
            logger,
        })
    })?;

    check_matches(state, level, log_dir)
}

/// Push buffered log lines to disk. The logger lives in a static that is
/// never dropped, so call this before the process exits.
pub fn flush_logging() {
    if let Some(state) = LOGGING_STATE.get() {
        state.logger.flush();
    }
}

fn check_matches(state: &LoggingState, level: &str, log_dir: &Path) -> Result<()> {
    if state.log_dir != log_dir {
        bail!(
            "logging already initialized at `{}`; refusing to switch to `{}`",
            state.log_dir.display(),
            log_dir.display()
        );
    }
    if state.level != level {
        bail!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level,
            level
        );
    }
    Ok(())
}
