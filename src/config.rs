use std::path::PathBuf;

use crate::error::{Result, TestbedError};

/// Environment variable overriding the scratch root
pub const ROOT_ENV: &str = "SQLITE_TESTBED_ROOT";

/// Environment variable overriding the pool size
pub const MAX_CONNECTIONS_ENV: &str = "SQLITE_TESTBED_MAX_CONNECTIONS";

/// Settings shared by every provisioned test database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureConfig {
    /// Directory under which per-invocation scratch directories are created
    pub root: PathBuf,
    pub max_connections: u32,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            root: std::env::temp_dir(),
            max_connections: 1,
        }
    }
}

impl FixtureConfig {
    /// Build a config from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup(ROOT_ENV).filter(|v| !v.trim().is_empty()) {
            config.root = PathBuf::from(root);
        }

        if let Some(raw) = lookup(MAX_CONNECTIONS_ENV) {
            let max_connections: u32 = raw.trim().parse().map_err(|_| {
                TestbedError::InvalidConfig(format!("{MAX_CONNECTIONS_ENV} must be a number, got {raw:?}"))
            })?;
            if max_connections == 0 {
                return Err(TestbedError::InvalidConfig(format!(
                    "{MAX_CONNECTIONS_ENV} must be at least 1"
                )));
            }
            config.max_connections = max_connections;
        }

        Ok(config)
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }
}
