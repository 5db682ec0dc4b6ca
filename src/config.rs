// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration module.
//!
//! Handles loading and saving application settings.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::permissions::{Permission, LEGACY_PERMISSIONS};

/// Application directory name under the XDG config dir.
const APP_DIR: &str = "bonded-list";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bluetooth settings.
    pub bluetooth: BluetoothConfig,

    /// Permission settings.
    pub permissions: PermissionConfig,

    /// Window settings.
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BluetoothConfig {
    /// Adapter to use, e.g. "hci1". The default adapter when unset.
    pub adapter: Option<String>,

    /// Label shown for bonded devices that have no name.
    pub unknown_device_label: String,
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            adapter: None,
            unknown_device_label: "Unknown Device".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionConfig {
    /// Permissions that gate the bonded-device list.
    pub required: Vec<Permission>,

    /// Seconds before an unanswered prompt counts as a denial.
    pub prompt_timeout_secs: u32,
}

impl Default for PermissionConfig {
    fn default() -> Self {
        Self {
            required: LEGACY_PERMISSIONS.to_vec(),
            prompt_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Main window title.
    pub title: String,

    pub default_width: i32,
    pub default_height: i32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Bonded Devices".to_string(),
            default_width: 420,
            default_height: 640,
        }
    }
}

impl Config {
    /// Path of the config file.
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load configuration from `path`, writing defaults there if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
