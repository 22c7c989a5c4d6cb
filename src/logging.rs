use crate::app_dirs::AppDirs;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Once;

static INIT: Once = Once::new();

/// Routes `log` output to the debug log file when `RUST_LOG` is set.
///
/// The terminal belongs to the UI, so nothing is ever written to stderr.
/// Returns the log path when logging was enabled.
pub fn init() -> Option<PathBuf> {
    std::env::var_os("RUST_LOG")?;
    let path = AppDirs::debug_log_path()?;
    init_at(&path).then_some(path)
}

/// Installs the file logger at `path`. Only the first call in a process
/// takes effect.
pub fn init_at(path: &Path) -> bool {
    let mut installed = false;
    INIT.call_once(|| {
        if let Some(dir) = path.parent() {
            if fs::create_dir_all(dir).is_err() {
                return;
            }
        }
        let Ok(file) = OpenOptions::new().append(true).create(true).open(path) else {
            return;
        };
        installed = Builder::from_env(Env::default().default_filter_or("info"))
            .target(Target::Pipe(Box::new(file)))
            .format_timestamp_millis()
            .try_init()
            .is_ok();
    });
    installed
}
