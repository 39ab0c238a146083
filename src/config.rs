use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub security: SecurityConfig,

    pub session: SessionConfig,

    pub timer: TimerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/tillgate.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub enabled: bool,

    pub bind_address: String,

    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1".to_string(),
            port: 6710,
            cors_allowed_origins: vec![
                "http://localhost:6710".to_string(),
                "http://127.0.0.1:6710".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    /// Lower values reduce memory usage but decrease GPU resistance.
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,

    /// Failed-login counting and lockout policy.
    pub lockout: LockoutConfig,

    /// Minimum accepted password length.
    pub min_password_length: usize,

    /// Accepted username length range.
    pub min_username_length: usize,
    pub max_username_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
            lockout: LockoutConfig::default(),
            min_password_length: 8,
            min_username_length: 2,
            max_username_length: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockoutConfig {
    /// Failed attempts before the username is locked out.
    pub max_attempts: u32,

    /// Lockout duration once max attempts is reached.
    pub lockout_minutes: u64,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_minutes: 5,
        }
    }
}

impl LockoutConfig {
    #[must_use]
    pub const fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.lockout_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Minutes of inactivity before the session expires.
    pub inactivity_timeout_minutes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_minutes: 10,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub const fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Whether the block timer participates at all. When disabled the
    /// terminal never reports a cooldown.
    pub enabled: bool,

    /// Cooldown armed after a qualifying drawer open.
    pub default_block_minutes: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_block_minutes: 5,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            session: SessionConfig::default(),
            timer: TimerConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("TILLGATE_CONFIG") {
            return Self::load_from_path(Path::new(&path));
        }

        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tillgate").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tillgate").join("config.toml"));
        }

        paths
    }

    pub fn validate(&self) -> Result<()> {
        if self.security.lockout.max_attempts == 0 {
            anyhow::bail!("security.lockout.max_attempts must be > 0");
        }

        if self.security.lockout.lockout_minutes == 0 {
            anyhow::bail!("security.lockout.lockout_minutes must be > 0");
        }

        if self.session.inactivity_timeout_minutes == 0 {
            anyhow::bail!("session.inactivity_timeout_minutes must be > 0");
        }

        if self.timer.default_block_minutes == 0 {
            anyhow::bail!("timer.default_block_minutes must be > 0");
        }

        if self.security.min_username_length < 1
            || self.security.min_username_length > self.security.max_username_length
        {
            anyhow::bail!("Invalid username length bounds");
        }

        if self.general.max_db_connections < self.general.min_db_connections {
            anyhow::bail!("max_db_connections must be >= min_db_connections");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.security.lockout.max_attempts, 3);
        assert_eq!(config.security.lockout.lockout_minutes, 5);
        assert_eq!(config.session.inactivity_timeout_minutes, 10);
        assert_eq!(config.timer.default_block_minutes, 5);
        assert!(config.timer.enabled);
        config.validate().unwrap();
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(toml_str.contains("[timer]"));
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let mut config = Config::default();
        config.security.lockout.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duration_helpers() {
        let config = Config::default();
        assert_eq!(
            config.security.lockout.lockout_duration(),
            Duration::from_secs(300)
        );
        assert_eq!(
            config.session.inactivity_timeout(),
            Duration::from_secs(600)
        );
    }
}
