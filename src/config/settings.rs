use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub mention: String,
    pub devices: BTreeMap<String, String>,
    pub interface: InterfaceSpec,
    #[serde(default)]
    pub device_auth: DeviceAuth,
    #[serde(default)]
    pub chat: ChatSettings,
    pub playbooks: PlaybookSettings,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterfaceSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub ipv4_address: String,
    pub netmask: String,
}

impl InterfaceSpec {
    pub fn display_name(&self) -> String {
        self.name.to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceAuth {
    #[serde(default = "default_device_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Default for DeviceAuth {
    fn default() -> Self {
        Self {
            username: default_device_username(),
            password: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChatSettings {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybookSettings {
    pub showrun: PathBuf,
    pub motd: PathBuf,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_backend_timeout_secs() -> u64 {
    60
}

fn default_device_username() -> String {
    "admin".to_string()
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mention = self.mention.trim();
        if mention.is_empty() {
            return Err(ConfigError::Settings("mention must be non-empty".to_string()));
        }
        if mention.split_whitespace().count() != 1 {
            return Err(ConfigError::Settings(
                "mention must be a single token".to_string(),
            ));
        }
        if self.devices.is_empty() {
            return Err(ConfigError::Settings(
                "at least one device must be configured".to_string(),
            ));
        }
        for (address, name) in &self.devices {
            if address.trim().is_empty() || address.split_whitespace().count() != 1 {
                return Err(ConfigError::Settings(format!(
                    "device address `{address}` must be a single non-empty token"
                )));
            }
            if name.trim().is_empty() {
                return Err(ConfigError::Settings(format!(
                    "device `{address}` needs a non-empty display name"
                )));
            }
        }
        if self.interface.name.trim().is_empty() {
            return Err(ConfigError::Settings(
                "interface.name must be non-empty".to_string(),
            ));
        }
        if self.interface.ipv4_address.trim().is_empty()
            || self.interface.netmask.trim().is_empty()
        {
            return Err(ConfigError::Settings(
                "interface.ipv4_address and interface.netmask must be non-empty".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Settings(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.backend_timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "backend_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn device_name(&self, address: &str) -> Option<&str> {
        self.devices.get(address).map(String::as_str)
    }

    pub fn is_known_device(&self, address: &str) -> bool {
        self.devices.contains_key(address)
    }
}
