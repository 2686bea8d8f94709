use std::path::PathBuf;

/// Runtime configuration, resolved once at startup and passed by value into
/// backend construction. Nothing reads the environment after this point.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Base URL of a remote rolodex peer. Set: every operation goes over
    /// HTTP. Unset: operations run against the local database.
    pub remote_url: Option<String>,
    /// Override for the local database path.
    pub db_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            remote_url: std::env::var("ROLODEX_REMOTE_URL")
                .ok()
                .filter(|url| !url.is_empty()),
            db_path: std::env::var_os("ROLODEX_DB").map(PathBuf::from),
        }
    }
}
