use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use rusty_relay_core::{PortError, SettingsPort};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    testnet: bool,
}

/// Settings persisted as a small JSON document. A missing file reads as defaults.
#[derive(Debug, Clone)]
pub struct FileSettingsAdapter {
    path: PathBuf,
}

impl FileSettingsAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredSettings, PortError> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PortError::Validation(format!(
                    "settings file {} is not valid json: {e}",
                    self.path.display()
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(StoredSettings::default()),
            Err(e) => Err(PortError::Transport(format!(
                "settings read failed for {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn write(&self, settings: &StoredSettings) -> Result<(), PortError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| PortError::Transport(format!("settings dir create failed: {e}")))?;
        }
        let bytes = serde_json::to_vec_pretty(settings)
            .map_err(|e| PortError::Validation(format!("settings encode failed: {e}")))?;
        fs::write(&self.path, bytes).map_err(|e| {
            PortError::Transport(format!(
                "settings write failed for {}: {e}",
                self.path.display()
            ))
        })
    }
}

impl SettingsPort for FileSettingsAdapter {
    fn load_testnet(&self) -> Result<bool, PortError> {
        Ok(self.read()?.testnet)
    }

    fn save_testnet(&self, testnet: bool) -> Result<(), PortError> {
        let mut settings = self.read()?;
        settings.testnet = testnet;
        self.write(&settings)
    }
}

#[derive(Debug, Default)]
pub struct InMemorySettingsAdapter {
    testnet: Mutex<bool>,
}

impl InMemorySettingsAdapter {
    pub fn new(testnet: bool) -> Self {
        Self {
            testnet: Mutex::new(testnet),
        }
    }
}

impl SettingsPort for InMemorySettingsAdapter {
    fn load_testnet(&self) -> Result<bool, PortError> {
        self.testnet
            .lock()
            .map(|g| *g)
            .map_err(|e| PortError::Transport(format!("settings lock poisoned: {e}")))
    }

    fn save_testnet(&self, testnet: bool) -> Result<(), PortError> {
        let mut g = self
            .testnet
            .lock()
            .map_err(|e| PortError::Transport(format!("settings lock poisoned: {e}")))?;
        *g = testnet;
        Ok(())
    }
}
