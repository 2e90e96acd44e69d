//! tracing-subscriber setup. The filter comes from `FOCUSBEAM_LOG`
//! (e.g. `FOCUSBEAM_LOG=focusbeam_core=debug`), defaulting to `warn`.

use std::fs::OpenOptions;
use std::sync::Mutex;

use focusbeam_core::storage::data_dir;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FOCUSBEAM_LOG";
const LOG_FILE: &str = "focusbeam.log";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Log to `<data dir>/focusbeam.log` so the alternate screen stays clean.
/// Logging is skipped if the file cannot be opened.
pub fn init_file() {
    let file = data_dir().map(|dir| dir.join(LOG_FILE)).and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| focusbeam_core::ConfigError::SaveFailed {
                path,
                message: e.to_string(),
            })
    });

    match file {
        Ok(file) => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .try_init();
        }
        Err(e) => eprintln!("warning: logging disabled: {e}"),
    }
}
