use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mnemonic::MAX_MNEMONICS;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings_path: PathBuf,
    #[serde(skip)]
    pub config_path: PathBuf,
    pub match_class: String,
    pub selected_class: String,
    pub label_class: String,
    pub label_height: i32,
    pub max_mnemonics: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let base = stable_app_data_dir();
        Self {
            settings_path: base.join("settings.json"),
            config_path: base.join("config.toml"),
            match_class: "typeahead-match".to_string(),
            selected_class: "typeahead-selected".to_string(),
            label_class: "typeahead-mnemonic".to_string(),
            label_height: 16,
            max_mnemonics: MAX_MNEMONICS,
            log_filter: "info".to_string(),
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "typeahead")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| std::env::temp_dir().join("typeahead"))
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    for (name, class) in [
        ("match_class", &cfg.match_class),
        ("selected_class", &cfg.selected_class),
        ("label_class", &cfg.label_class),
    ] {
        if class.trim().is_empty() || class.contains(char::is_whitespace) {
            return Err(ConfigError::Invalid(format!(
                "{name} must be a single non-empty class name"
            )));
        }
    }

    if cfg.match_class == cfg.selected_class {
        return Err(ConfigError::Invalid(
            "match_class and selected_class must differ".into(),
        ));
    }

    if !(1..=MAX_MNEMONICS).contains(&cfg.max_mnemonics) {
        return Err(ConfigError::Invalid(format!(
            "max_mnemonics must be between 1 and {MAX_MNEMONICS}"
        )));
    }

    if !(0..=200).contains(&cfg.label_height) {
        return Err(ConfigError::Invalid(
            "label_height must be between 0 and 200".into(),
        ));
    }

    if cfg.settings_path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("settings_path is required".into()));
    }

    Ok(())
}

/// Loads `path` (or the default location). A missing file yields defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Config::default().config_path);

    let raw = match fs::read_to_string(&config_path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Config {
                config_path,
                ..Config::default()
            });
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: config_path,
                source,
            })
        }
    };

    let mut cfg = parse(&raw, &config_path)?;
    cfg.config_path = config_path;
    validate(&cfg)?;
    Ok(cfg)
}

fn parse(raw: &str, path: &Path) -> Result<Config, ConfigError> {
    let is_json5 = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json5") || ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let parsed = if is_json5 {
        json5::from_str::<Config>(raw).map_err(|e| e.to_string())
    } else {
        toml::from_str::<Config>(raw).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    validate(cfg)?;
    if let Some(parent) = cfg.config_path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let encoded = toml::to_string_pretty(cfg)?;
    fs::write(&cfg.config_path, encoded).map_err(|source| ConfigError::Io {
        path: cfg.config_path.clone(),
        source,
    })
}
