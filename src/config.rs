use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

const DEFAULT_SUMMARIZATION_MODEL: &str = "llama3.1:8b";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the PDF Digest server.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
    /// Backend used for abstractive summaries.
    pub summarization_provider: SummarizationProvider,
    /// Model identifier passed to the summarization provider.
    pub summarization_model: String,
    /// Optional Ollama base URL (defaults to the local runtime).
    pub ollama_url: Option<String>,
    /// Upper bound on the accepted request body size, in bytes.
    pub max_upload_bytes: usize,
    /// Optional log file path; `logs/pdf-digest.log` when unset.
    pub log_file: Option<PathBuf>,
}

/// Supported abstractive summarization backends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizationProvider {
    /// No model; every summary is produced by the extractive fallback.
    None,
    /// Local Ollama runtime.
    #[default]
    Ollama,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: None,
            summarization_provider: SummarizationProvider::Ollama,
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            ollama_url: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            summarization_provider: load_env_optional("SUMMARIZATION_PROVIDER")
                .map(|value| {
                    value.parse().map_err(|()| {
                        ConfigError::InvalidValue("SUMMARIZATION_PROVIDER".to_string())
                    })
                })
                .transpose()?
                .unwrap_or_default(),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or_else(|| DEFAULT_SUMMARIZATION_MODEL.to_string()),
            ollama_url: load_env_optional("OLLAMA_URL"),
            max_upload_bytes: load_env_optional("MAX_UPLOAD_BYTES")
                .map(|value| match value.parse::<usize>() {
                    Ok(bytes) if bytes > 0 => Ok(bytes),
                    _ => Err(ConfigError::InvalidValue("MAX_UPLOAD_BYTES".to_string())),
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            log_file: load_env_optional("PDF_DIGEST_LOG_FILE").map(PathBuf::from),
        })
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl std::str::FromStr for SummarizationProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" => Ok(Self::None),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    CONFIG.set(config).expect("Failed to set config");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!(
            "Ollama".parse::<SummarizationProvider>(),
            Ok(SummarizationProvider::Ollama)
        );
        assert_eq!(
            " none ".parse::<SummarizationProvider>(),
            Ok(SummarizationProvider::None)
        );
        assert!("openai".parse::<SummarizationProvider>().is_err());
    }

    #[test]
    fn defaults_use_the_local_model() {
        let config = Config::default();
        assert_eq!(config.summarization_provider, SummarizationProvider::Ollama);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
        assert!(config.server_port.is_none());
        assert!(config.log_file.is_none());
    }

    const VARS: [&str; 6] = [
        "SERVER_PORT",
        "SUMMARIZATION_PROVIDER",
        "SUMMARIZATION_MODEL",
        "OLLAMA_URL",
        "MAX_UPLOAD_BYTES",
        "PDF_DIGEST_LOG_FILE",
    ];

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn with_env<T>(vars: &[(&str, &str)], check: impl FnOnce() -> T) -> T {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // SAFETY: env mutation is serialized by ENV_LOCK and only these tests touch these keys.
        unsafe {
            for key in VARS {
                env::remove_var(key);
            }
            for (key, value) in vars {
                env::set_var(key, value);
            }
        }
        let result = check();
        unsafe {
            for key in VARS {
                env::remove_var(key);
            }
        }
        result
    }

    #[test]
    fn from_env_reads_overrides() {
        let config = with_env(
            &[
                ("SERVER_PORT", "8123"),
                ("SUMMARIZATION_PROVIDER", "none"),
                ("SUMMARIZATION_MODEL", "bart"),
                ("OLLAMA_URL", "http://ollama:11434"),
                ("MAX_UPLOAD_BYTES", "4096"),
                ("PDF_DIGEST_LOG_FILE", "/tmp/digest.log"),
            ],
            Config::from_env,
        )
        .expect("valid config");

        assert_eq!(config.server_port, Some(8123));
        assert_eq!(config.summarization_provider, SummarizationProvider::None);
        assert_eq!(config.summarization_model, "bart");
        assert_eq!(config.ollama_url.as_deref(), Some("http://ollama:11434"));
        assert_eq!(config.max_upload_bytes, 4096);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/digest.log")));
    }

    #[test]
    fn from_env_defaults_to_ollama_when_unset() {
        let config = with_env(&[], Config::from_env).expect("valid config");
        assert_eq!(config.summarization_provider, SummarizationProvider::Ollama);
        assert_eq!(config.max_upload_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn from_env_rejects_invalid_values() {
        for (key, value) in [
            ("MAX_UPLOAD_BYTES", "0"),
            ("MAX_UPLOAD_BYTES", "lots"),
            ("SUMMARIZATION_PROVIDER", "openai"),
            ("SERVER_PORT", "70000"),
        ] {
            let error = with_env(&[(key, value)], Config::from_env).expect_err("invalid value");
            let ConfigError::InvalidValue(name) = error;
            assert_eq!(name, key);
        }
    }
}
