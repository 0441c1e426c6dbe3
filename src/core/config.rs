/*
 * Manages application configuration: the registry of named backend sites,
 * gateway timeouts, and the last-used site and root path (restored on the
 * next start). Settings live in one JSON file under the platform's local
 * configuration directory.
 *
 * It uses a trait-based approach (`ConfigManagerOperations`) to allow for
 * different storage backends or mock implementations for testing. The
 * concrete implementation (`CoreConfigManager`) handles the file system
 * interactions.
 */
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "courier_config.json";

const DEFAULT_LISTING_TIMEOUT_SECS: u64 = 30;
// Server-side zipping of a large selection is slow; the bound only exists so
// a hung backend cannot hold the in-flight lock forever.
const DEFAULT_SUBMISSION_TIMEOUT_SECS: u64 = 600;

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Serde(serde_json::Error),
    NoConfigDirectory,
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Configuration I/O error: {e}"),
            ConfigError::Serde(e) => write!(f, "Configuration parse error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine a configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::NoConfigDirectory => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// A named backend target. Switching sites only changes which endpoint the
// gateways address; the protocol shape is identical everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sites: Vec<SiteConfig>,
    pub default_site: String,
    #[serde(default = "default_listing_timeout_secs")]
    pub listing_timeout_secs: u64,
    #[serde(default = "default_submission_timeout_secs")]
    pub submission_timeout_secs: u64,
    #[serde(default)]
    pub last_site: Option<String>,
    #[serde(default)]
    pub last_root_path: Option<String>,
}

fn default_listing_timeout_secs() -> u64 {
    DEFAULT_LISTING_TIMEOUT_SECS
}

fn default_submission_timeout_secs() -> u64 {
    DEFAULT_SUBMISSION_TIMEOUT_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sites: vec![
                SiteConfig {
                    name: "primary".to_string(),
                    endpoint: "http://localhost:7000".to_string(),
                },
                SiteConfig {
                    name: "secondary".to_string(),
                    endpoint: "http://localhost:7001".to_string(),
                },
            ],
            default_site: "primary".to_string(),
            listing_timeout_secs: DEFAULT_LISTING_TIMEOUT_SECS,
            submission_timeout_secs: DEFAULT_SUBMISSION_TIMEOUT_SECS,
            last_site: None,
            last_root_path: None,
        }
    }
}

impl AppConfig {
    pub fn site_endpoint(&self, name: &str) -> Option<&str> {
        self.sites
            .iter()
            .find(|site| site.name == name)
            .map(|site| site.endpoint.as_str())
    }

    pub fn site_names(&self) -> Vec<&str> {
        self.sites.iter().map(|site| site.name.as_str()).collect()
    }
}

pub trait ConfigManagerOperations: Send + Sync {
    fn load_config(&self, app_name: &str) -> Result<AppConfig>;
    fn save_last_session(
        &self,
        app_name: &str,
        site: Option<&str>,
        root_path: Option<&str>,
    ) -> Result<()>;
}

pub struct CoreConfigManager {}

impl CoreConfigManager {
    pub fn new() -> Self {
        CoreConfigManager {}
    }

    fn config_file_path(app_name: &str) -> Result<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("", "", app_name).ok_or(ConfigError::NoConfigDirectory)?;
        let config_dir = proj_dirs.config_local_dir();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            log::debug!("ConfigManager: Created config directory {config_dir:?}.");
        }
        Ok(config_dir.join(CONFIG_FILENAME))
    }
}

impl Default for CoreConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/*
 * Reads the config file at `path`, falling back to defaults when it does
 * not exist yet. Shared between the production manager and test doubles.
 */
pub(crate) fn read_config_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        log::debug!("ConfigManager: No config file at {path:?}; using defaults.");
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&contents)?;
    log::debug!(
        "ConfigManager: Loaded {} sites from {path:?}.",
        config.sites.len()
    );
    Ok(config)
}

pub(crate) fn write_config_file(path: &Path, config: &AppConfig) -> Result<()> {
    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

impl ConfigManagerOperations for CoreConfigManager {
    fn load_config(&self, app_name: &str) -> Result<AppConfig> {
        log::trace!("ConfigManager: Loading config for app '{app_name}'.");
        let path = Self::config_file_path(app_name)?;
        read_config_file(&path)
    }

    /*
     * Persists the last-used site and root path so the next start can
     * restore them. The rest of the file is re-read first so concurrent
     * edits to the site registry are not clobbered.
     */
    fn save_last_session(
        &self,
        app_name: &str,
        site: Option<&str>,
        root_path: Option<&str>,
    ) -> Result<()> {
        let path = Self::config_file_path(app_name)?;
        let mut config = read_config_file(&path)?;
        config.last_site = site.map(str::to_string);
        config.last_root_path = root_path.map(str::to_string);
        write_config_file(&path, &config)?;
        log::debug!(
            "ConfigManager: Saved last session (site {site:?}, root {root_path:?}) to {path:?}."
        );
        Ok(())
    }
}
