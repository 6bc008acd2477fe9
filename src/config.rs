use crate::utils::AppError;
use serde::Deserialize;
use std::env;
use std::path::Path;

const DEFAULT_MONGO_URI: &str = "mongodb://127.0.0.1:27017/LibreChat";
const DEFAULT_CONFIG_PATH: &str = "librechat.yaml";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub balance: BalanceSettings,
}

/// Effective `balance` section. Only the feature gate is consumed here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceSettings {
    pub enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    balance: Option<BalanceSection>,
}

#[derive(Debug, Default, Deserialize)]
struct BalanceSection {
    enabled: Option<bool>,
}

impl AppConfig {
    /// Reads `MONGO_URI`, `CONFIG_PATH` and `CHECK_BALANCE` from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        let mongo_uri = env::var("MONGO_URI").unwrap_or_else(|_| DEFAULT_MONGO_URI.to_string());
        let config_path =
            env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let check_balance = env::var("CHECK_BALANCE").ok();

        let balance = load_balance_settings(Path::new(&config_path), check_balance.as_deref())?;

        Ok(Self { mongo_uri, balance })
    }
}

/// A missing file means defaults; a file that does not parse is fatal.
pub fn load_balance_settings(
    path: &Path,
    check_balance: Option<&str>,
) -> Result<BalanceSettings, AppError> {
    let file = match std::fs::read_to_string(path) {
        Ok(text) => Some(parse_config(&text)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("Config file {} not found, using defaults", path.display());
            None
        }
        Err(e) => {
            return Err(AppError::Configuration(format!(
                "failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    Ok(resolve_balance(file, check_balance))
}

fn parse_config(text: &str) -> Result<ConfigFile, AppError> {
    // An empty YAML document deserializes as unit, not as a map
    if text.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    serde_yaml::from_str(text).map_err(|e| AppError::Configuration(e.to_string()))
}

fn resolve_balance(file: Option<ConfigFile>, check_balance: Option<&str>) -> BalanceSettings {
    let section = file.and_then(|f| f.balance).unwrap_or_default();
    let legacy_enabled = check_balance.map(is_enabled).unwrap_or(false);

    BalanceSettings {
        enabled: section.enabled.unwrap_or(legacy_enabled),
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
