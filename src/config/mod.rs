use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
mod types;

pub use types::*;

const CONFIG_FILE_NAME: &str = "config.toml";

pub fn load_user_config() -> Result<Config> {
    let config_dir = get_config_directory()?;
    load_config_from(&config_dir)
}

/// Loads `config.toml` from `config_dir`, writing the defaults first when the
/// file does not exist yet.
pub fn load_config_from(config_dir: &Path) -> Result<Config> {
    let config_file_path = config_dir.join(CONFIG_FILE_NAME);

    // 确保配置目录存在
    fs::create_dir_all(config_dir)
        .with_context(|| format!("Failed to create config directory: {:?}", config_dir))?;

    if !config_file_path.exists() {
        create_default_config(&config_file_path)?;
    }

    let config_content = fs::read_to_string(&config_file_path)
        .with_context(|| format!("Failed to read config file: {:?}", config_file_path))?;

    let config = match toml::from_str::<Config>(&config_content) {
        Ok(cfg) => cfg,
        Err(e) => {
            // 解析失败，自动备份原配置并重建
            let bak_path = config_file_path.with_extension("bak");
            fs::rename(&config_file_path, &bak_path)
                .with_context(|| format!("Failed to backup old config to {:?}", bak_path))?;
            create_default_config(&config_file_path)?;
            let config_content = fs::read_to_string(&config_file_path).with_context(|| {
                format!("Failed to read new config file: {:?}", config_file_path)
            })?;
            let config: Config = toml::from_str(&config_content)
                .with_context(|| "Failed to parse new config file")?;
            log::warn!(
                "Config parse error: {}. Old config has been backed up to {:?}, new config created.",
                e,
                bak_path
            );
            config
        }
    };

    log::info!("Loaded config from {:?}", config_file_path);
    Ok(sanitize(config))
}

fn sanitize(mut config: Config) -> Config {
    if config.poll_interval_ms == 0 {
        log::warn!(
            "pollIntervalMs must be positive, falling back to {} ms",
            DEFAULT_POLL_INTERVAL_MS
        );
        config.poll_interval_ms = DEFAULT_POLL_INTERVAL_MS;
    }
    config
}

fn get_config_directory() -> Result<PathBuf> {
    // Windows: %LOCALAPPDATA%\FocusWatch
    dirs::data_local_dir()
        .map(|dir| dir.join("FocusWatch"))
        .context("Local data directory not found")
}

fn create_default_config(config_path: &Path) -> Result<()> {
    let default_content = toml::to_string_pretty(&Config::default())
        .map_err(|e| anyhow::anyhow!("Failed to serialize default config: {}", e))?;
    fs::write(config_path, default_content)
        .with_context(|| format!("Failed to write default config to {:?}", config_path))?;
    log::info!("Created default config file at: {:?}", config_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn creates_default_config_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("FocusWatch");

        let cfg = load_config_from(&config_dir).unwrap();

        assert_eq!(cfg.poll_interval(), Duration::from_secs(2));
        assert_eq!(cfg.log_level, LogLevel::Info);
        let written = fs::read_to_string(config_dir.join(CONFIG_FILE_NAME)).unwrap();
        assert!(written.contains("pollIntervalMs = 2000"));
        assert!(written.contains("logLevel = \"info\""));
    }

    #[test]
    fn reads_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "pollIntervalMs = 500\nlogLevel = \"debug\"\n",
        )
        .unwrap();

        let cfg = load_config_from(dir.path()).unwrap();

        assert_eq!(cfg.poll_interval_ms, 500);
        assert_eq!(cfg.log_level, LogLevel::Debug);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "logLevel = \"warn\"\n").unwrap();

        let cfg = load_config_from(dir.path()).unwrap();

        assert_eq!(cfg.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        assert_eq!(cfg.log_level, LogLevel::Warn);
    }

    #[test]
    fn broken_config_is_backed_up_and_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "pollIntervalMs = \"soon\"\n").unwrap();

        let cfg = load_config_from(dir.path()).unwrap();

        assert_eq!(cfg.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        let backup = fs::read_to_string(dir.path().join("config.bak")).unwrap();
        assert_eq!(backup, "pollIntervalMs = \"soon\"\n");
        assert!(fs::read_to_string(&path).unwrap().contains("pollIntervalMs = 2000"));
    }

    #[test]
    fn zero_interval_is_replaced_by_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "pollIntervalMs = 0\n").unwrap();

        let cfg = load_config_from(dir.path()).unwrap();

        assert_eq!(cfg.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn log_level_names() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("loud").is_err());
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert_eq!(log::LevelFilter::from(LogLevel::Off), log::LevelFilter::Off);
    }
}
