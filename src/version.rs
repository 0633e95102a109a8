//! Build metadata baked in by Cargo.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// `name version`, as printed in the startup log line.
pub fn release() -> String {
    format!("{APP_NAME} {VERSION}")
}
