//! Configuration handling for the harvester.
//!
//! Values come from environment variables (the binary loads a `.env` file
//! first) and fall back to defaults pointing at the live site.
//! `Config::from_env` validates everything that has to parse.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use url::Url;

/// Environment variable names.
pub const ENV_START_PAGE: &str = "START_PAGE";
pub const ENV_OUTPUT_FILE: &str = "OUTPUT_FILE";
pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_LOG_FILE: &str = "LOG_FILE";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_FETCH_MAX_RETRIES: &str = "FETCH_MAX_RETRIES";

const DEFAULT_START_PAGE: &str = "https://pokemythology.net/conteudo/pokemon/lista01.htm";
const DEFAULT_OUTPUT_FILE: &str = "output/pokemons.csv";
const DEFAULT_BASE_URL: &str = "https://pokemythology.net";
const DEFAULT_LOG_FILE: &str = "logs/errors.txt";
const DEFAULT_FETCH_MAX_RETRIES: u32 = 2;

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Harvester runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    start_page: Url,
    output_file: PathBuf,
    base_url: Url,
    log_file: Option<PathBuf>,
    log_format: LogFormat,
    fetch_max_retries: u32,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let start_page = parse_url(
            ENV_START_PAGE,
            &env::var(ENV_START_PAGE).unwrap_or_else(|_| DEFAULT_START_PAGE.to_string()),
        )?;
        let base_url = parse_url(
            ENV_BASE_URL,
            &env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        )?;
        let output_file = env::var(ENV_OUTPUT_FILE)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_FILE));
        // An empty LOG_FILE sends logs to stderr.
        let log_file = match env::var(ENV_LOG_FILE) {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_LOG_FILE)),
        };
        let log_format = match env::var(ENV_LOG_FORMAT) {
            Err(_) => LogFormat::Text,
            Ok(value) => match value.to_ascii_lowercase().as_str() {
                "" | "text" => LogFormat::Text,
                "json" => LogFormat::Json,
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: ENV_LOG_FORMAT,
                        reason: format!("expected 'text' or 'json', got '{other}'"),
                    });
                }
            },
        };
        let fetch_max_retries = match env::var(ENV_FETCH_MAX_RETRIES) {
            Err(_) => DEFAULT_FETCH_MAX_RETRIES,
            Ok(value) => value.trim().parse().map_err(|e| ConfigError::InvalidValue {
                field: ENV_FETCH_MAX_RETRIES,
                reason: format!("'{value}': {e}"),
            })?,
        };

        Ok(Self {
            start_page,
            output_file,
            base_url,
            log_file,
            log_format,
            fetch_max_retries,
        })
    }

    /// First list page; discovery starts here.
    pub fn start_page(&self) -> &Url {
        &self.start_page
    }
    /// Export destination. A `.json` extension selects JSON output.
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }
    /// Origin that relative image and page links resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }
    pub fn fetch_max_retries(&self) -> u32 {
        self.fetch_max_retries
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_page: Url::parse(DEFAULT_START_PAGE).unwrap(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap(),
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            log_format: LogFormat::Text,
            fetch_max_retries: DEFAULT_FETCH_MAX_RETRIES,
        }
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: format!("'{value}': {e}"),
    })
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Ensure environment-variable manipulating tests run serially.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 6] = [
        ENV_START_PAGE,
        ENV_OUTPUT_FILE,
        ENV_BASE_URL,
        ENV_LOG_FILE,
        ENV_LOG_FORMAT,
        ENV_FETCH_MAX_RETRIES,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_defaults_when_env_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let cfg = Config::from_env().unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.start_page().as_str(), DEFAULT_START_PAGE);
        assert_eq!(cfg.output_file(), Path::new(DEFAULT_OUTPUT_FILE));
        assert_eq!(cfg.log_file(), Some(Path::new(DEFAULT_LOG_FILE)));
        assert_eq!(cfg.fetch_max_retries(), 2);
    }

    #[test]
    fn test_overrides_when_env_present() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        unsafe {
            env::set_var(ENV_START_PAGE, "http://localhost:8000/conteudo/pokemon/lista05.htm");
            env::set_var(ENV_OUTPUT_FILE, "out/dex.json");
            env::set_var(ENV_BASE_URL, "http://localhost:8000");
            env::set_var(ENV_LOG_FILE, "");
            env::set_var(ENV_LOG_FORMAT, "JSON");
            env::set_var(ENV_FETCH_MAX_RETRIES, "0");
        }
        let cfg = Config::from_env().unwrap();
        clear_env();

        assert_eq!(
            cfg.start_page().as_str(),
            "http://localhost:8000/conteudo/pokemon/lista05.htm"
        );
        assert_eq!(cfg.output_file(), Path::new("out/dex.json"));
        assert_eq!(cfg.base_url().as_str(), "http://localhost:8000/");
        assert_eq!(cfg.log_file(), None);
        assert_eq!(cfg.log_format(), LogFormat::Json);
        assert_eq!(cfg.fetch_max_retries(), 0);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let _guard = ENV_MUTEX.lock().unwrap();

        clear_env();
        unsafe {
            env::set_var(ENV_BASE_URL, "not a url");
        }
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidValue { field: ENV_BASE_URL, .. })
        ));

        clear_env();
        unsafe {
            env::set_var(ENV_FETCH_MAX_RETRIES, "-1");
        }
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().starts_with("invalid value for 'FETCH_MAX_RETRIES'"));

        clear_env();
        unsafe {
            env::set_var(ENV_LOG_FORMAT, "xml");
        }
        assert!(Config::from_env().is_err());
        clear_env();
    }
}
