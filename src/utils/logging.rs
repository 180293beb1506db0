use std::fs::OpenOptions;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for internal diagnostics.
///
/// The TUI owns stdout and stderr, so diagnostics only go to a file, named
/// by the `ASKEMALL_LOG` environment variable. When the variable is unset
/// this is a no-op. Filtering follows `RUST_LOG` with a `debug` default.
pub fn init() {
    let Ok(path) = std::env::var("ASKEMALL_LOG") else {
        return;
    };

    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {path}: {e}");
            return;
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(file)
        .with_ansi(false)
        .init();
}
