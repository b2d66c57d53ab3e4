use std::fs;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write settings {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persisted flag read by the page controller and written by the popup.
pub trait SettingsStore {
    fn get(&self) -> Result<bool, SettingsError>;
    fn set(&mut self, mnemonics_enabled: bool) -> Result<(), SettingsError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct StoredSettings {
    #[serde(default)]
    mnemonics_enabled: bool,
}

#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<StoredSettings, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredSettings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(StoredSettings::default());
        }
        serde_json::from_str(&raw).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self) -> Result<bool, SettingsError> {
        Ok(self.read()?.mnemonics_enabled)
    }

    fn set(&mut self, mnemonics_enabled: bool) -> Result<(), SettingsError> {
        let write_error = |source| SettingsError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        let encoded = serde_json::to_string_pretty(&StoredSettings { mnemonics_enabled })
            .map_err(|source| SettingsError::Parse {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, encoded).map_err(write_error)
    }
}

/// Single-resolution settings read. Mnemonics stay disabled until it resolves.
#[derive(Debug)]
pub enum SettingsLoad {
    Pending(Receiver<bool>),
    Resolved(bool),
}

impl SettingsLoad {
    /// Reads the store on a worker thread.
    pub fn spawn<S>(store: S) -> Self
    where
        S: SettingsStore + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let enabled = read_or_default(&store);
            let _ = sender.send(enabled);
        });
        Self::Pending(receiver)
    }

    pub fn resolved(enabled: bool) -> Self {
        Self::Resolved(enabled)
    }

    /// Returns the value the first time the load is observed complete.
    pub fn poll(&mut self) -> Option<bool> {
        let Self::Pending(receiver) = self else {
            return None;
        };
        let enabled = match receiver.try_recv() {
            Ok(enabled) => enabled,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => false,
        };
        *self = Self::Resolved(enabled);
        Some(enabled)
    }

    /// Blocks until the load completes.
    pub fn wait(&mut self) -> bool {
        if let Self::Pending(receiver) = self {
            let enabled = receiver.recv().unwrap_or(false);
            *self = Self::Resolved(enabled);
        }
        self.current()
    }

    pub fn current(&self) -> bool {
        matches!(self, Self::Resolved(true))
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

pub fn read_or_default<S: SettingsStore + ?Sized>(store: &S) -> bool {
    match store.get() {
        Ok(enabled) => {
            tracing::info!(mnemonics_enabled = enabled, "settings loaded");
            enabled
        }
        Err(error) => {
            tracing::warn!(%error, "settings unavailable; mnemonics disabled");
            false
        }
    }
}
