//! Environment helpers: centralized dotenv loading and ergonomic getters.
//! Call `init_env()` once early in the binary (or rely on lazy Once).
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

/// Load .env exactly once. Safe to call many times.
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenv::dotenv();
    });
}

/// Optional env var, trimmed; empty strings count as unset.
pub fn env_opt(key: &str) -> Option<String> {
    init_env();
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The working directory for catalog exports: `DATA_DIR` when set,
/// otherwise the current directory.
pub fn data_dir() -> PathBuf {
    env_opt("DATA_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from)
}
