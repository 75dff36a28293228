use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use tokio::fs::File;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::infra::ResetZone;

// ── Top-level config ──────────────────────────────────────────────

/// Top-level menubot configuration, loaded from `config.toml`.
///
/// Resolution order: `MENUBOT_CONFIG_DIR` env (or `--config-dir`) → `~/.menubot/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Liveness endpoint configuration (`[gateway]`).
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Daily session reset (`[reset]`).
    #[serde(default)]
    pub reset: ResetConfig,

    /// Message transport configuration (`[channels_config]`).
    #[serde(default)]
    pub channels_config: ChannelsConfig,
}

// ── Gateway ──────────────────────────────────────────────────────

/// Liveness endpoint configuration (`[gateway]` section).
///
/// Serves a single `GET /healthz` route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Serve the liveness endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Gateway port (default: 3000)
    #[serde(default = "default_gateway_port")]
    pub port: u16,
    /// Gateway host (default: 127.0.0.1)
    #[serde(default = "default_gateway_host")]
    pub host: String,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_host() -> String {
    "127.0.0.1".into()
}

fn default_true() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: default_gateway_port(),
            host: default_gateway_host(),
        }
    }
}

// ── Reset ────────────────────────────────────────────────────────

/// Daily session reset configuration (`[reset]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Wipe all sessions at midnight every day (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// IANA time zone whose midnight triggers the reset (e.g. `"Asia/Jakarta"`).
    /// Unset means the host's local zone.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: None,
        }
    }
}

// ── Channels ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsConfig {
    /// Enable the CLI console channel. Default: `true`.
    #[serde(default = "default_true")]
    pub cli: bool,
    /// Sender id used for console input that does not start with `@<sender>`.
    #[serde(default = "default_cli_sender")]
    pub cli_sender: String,
    /// Capacity of the inbound message queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

fn default_cli_sender() -> String {
    "cli-user".into()
}

fn default_queue_capacity() -> usize {
    64
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            cli: true,
            cli_sender: default_cli_sender(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let home =
            UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());

        Self {
            config_path: home.join(".menubot").join("config.toml"),
            gateway: GatewayConfig::default(),
            reset: ResetConfig::default(),
            channels_config: ChannelsConfig::default(),
        }
    }
}

fn default_config_dir() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".menubot"))
}

fn resolve_config_dir() -> Result<(PathBuf, &'static str)> {
    if let Ok(custom_config_dir) = std::env::var("MENUBOT_CONFIG_DIR") {
        let custom_config_dir = custom_config_dir.trim();
        if !custom_config_dir.is_empty() {
            return Ok((PathBuf::from(custom_config_dir), "MENUBOT_CONFIG_DIR"));
        }
    }
    Ok((default_config_dir()?, "default"))
}

impl Config {
    pub async fn load_or_init() -> Result<Self> {
        let (config_dir, resolution_source) = resolve_config_dir()?;
        Self::load_or_init_in(&config_dir, resolution_source).await
    }

    async fn load_or_init_in(config_dir: &Path, resolution_source: &str) -> Result<Self> {
        let config_path = config_dir.join("config.toml");

        fs::create_dir_all(config_dir).await.with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let initialized = if config_path.exists() {
            false
        } else {
            let mut config = Config::default();
            config.config_path = config_path.clone();
            config.save().await?;
            true
        };

        let contents = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;
        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        // Set computed paths that are skipped during serialization
        config.config_path = config_path;

        config.apply_env_overrides();
        config.validate()?;
        tracing::info!(
            path = %config.config_path.display(),
            source = resolution_source,
            initialized,
            "Config loaded"
        );
        Ok(config)
    }

    /// Validate configuration values that would cause runtime failures.
    ///
    /// Called after TOML deserialization and env-override application to catch
    /// obviously invalid values early instead of failing at arbitrary runtime points.
    pub fn validate(&self) -> Result<()> {
        // Gateway
        if self.gateway.host.trim().is_empty() {
            anyhow::bail!("gateway.host must not be empty");
        }

        // Reset
        ResetZone::parse(self.reset.timezone.as_deref()).context("reset.timezone is invalid")?;

        // Channels
        if self.channels_config.cli_sender.trim().is_empty() {
            anyhow::bail!("channels_config.cli_sender must not be empty");
        }
        if self.channels_config.queue_capacity == 0 {
            anyhow::bail!("channels_config.queue_capacity must be greater than 0");
        }

        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // Gateway port: MENUBOT_GATEWAY_PORT or PORT
        if let Ok(port_str) =
            std::env::var("MENUBOT_GATEWAY_PORT").or_else(|_| std::env::var("PORT"))
        {
            if let Ok(port) = port_str.parse::<u16>() {
                self.gateway.port = port;
            }
        }

        // Gateway host: MENUBOT_GATEWAY_HOST or HOST. A platform-assigned PORT
        // with no host set anywhere binds every interface, as a bare
        // listen(PORT) does.
        let platform_port = std::env::var("PORT").is_ok_and(|p| p.parse::<u16>().is_ok());
        match std::env::var("MENUBOT_GATEWAY_HOST").or_else(|_| std::env::var("HOST")) {
            Ok(host) if !host.is_empty() => self.gateway.host = host,
            _ if platform_port && self.gateway.host == default_gateway_host() => {
                self.gateway.host = "0.0.0.0".into();
            }
            _ => {}
        }

        // Reset time zone: MENUBOT_RESET_TIMEZONE
        if let Ok(tz) = std::env::var("MENUBOT_RESET_TIMEZONE") {
            if !tz.trim().is_empty() {
                self.reset.timezone = Some(tz.trim().to_string());
            }
        }

        // Console sender id: MENUBOT_CHANNEL_SENDER
        if let Ok(sender) = std::env::var("MENUBOT_CHANNEL_SENDER") {
            if !sender.trim().is_empty() {
                self.channels_config.cli_sender = sender.trim().to_string();
            }
        }
    }

    pub async fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let parent_dir = self
            .config_path
            .parent()
            .context("Config path must have a parent directory")?;

        fs::create_dir_all(parent_dir).await.with_context(|| {
            format!(
                "Failed to create config directory: {}",
                parent_dir.display()
            )
        })?;

        let file_name = self
            .config_path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("config.toml");
        let temp_path = parent_dir.join(format!(".{file_name}.tmp-{}", uuid::Uuid::new_v4()));

        let mut temp_file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create temporary config file: {}",
                    temp_path.display()
                )
            })?;
        temp_file
            .write_all(toml_str.as_bytes())
            .await
            .context("Failed to write temporary config contents")?;
        temp_file
            .sync_all()
            .await
            .context("Failed to fsync temporary config file")?;
        drop(temp_file);

        if let Err(e) = fs::rename(&temp_path, &self.config_path).await {
            let _ = fs::remove_file(&temp_path).await;
            anyhow::bail!("Failed to atomically replace config file: {e}");
        }

        sync_directory(parent_dir).await
    }
}

async fn sync_directory(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let dir = File::open(path)
            .await
            .with_context(|| format!("Failed to open directory for fsync: {}", path.display()))?;
        dir.sync_all()
            .await
            .with_context(|| format!("Failed to fsync directory metadata: {}", path.display()))?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}
