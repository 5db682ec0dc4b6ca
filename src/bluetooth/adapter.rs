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

//! Local Bluetooth adapter access.

use anyhow::Result;
use async_trait::async_trait;
use bluer::Address;
use std::fmt::Display;
use tracing::{debug, info};

use super::device::{sort_devices, BondedDevice};

/// The host's Bluetooth controller.
#[async_trait]
pub trait BluetoothAdapter: Send + Sync {
    /// Adapter name, e.g. "hci0".
    fn name(&self) -> &str;

    /// Whether the adapter is powered on.
    async fn is_enabled(&self) -> Result<bool>;

    /// Power the adapter on.
    async fn enable(&self) -> Result<()>;

    /// Devices currently paired with the adapter, sorted for display.
    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>>;
}

/// Whether a device counts as bonded; a failed read skips it.
fn paired_or_skip<E: Display>(addr: Address, paired: Result<bool, E>) -> bool {
    match paired {
        Ok(paired) => paired,
        Err(e) => {
            debug!("Skipping device {}, paired state unreadable: {}", addr, e);
            false
        }
    }
}

/// Remote name of a device; a failed read counts as no name.
fn name_or_none<E: Display>(addr: Address, name: Result<Option<String>, E>) -> Option<String> {
    name.unwrap_or_else(|e| {
        debug!("Name of {} unreadable: {}", addr, e);
        None
    })
}

/// BlueZ adapter reached over D-Bus.
pub struct BluezAdapter {
    adapter: bluer::Adapter,
}

impl BluezAdapter {
    /// Open the named adapter, or the default adapter when `name` is `None`.
    pub async fn open(name: Option<&str>) -> Result<Self> {
        // Create BlueZ session
        let session = bluer::Session::new().await?;
        debug!("BlueZ session created");

        let adapter = match name {
            Some(name) => session.adapter(name)?,
            None => session.default_adapter().await?,
        };
        info!("Using Bluetooth adapter: {}", adapter.name());

        Ok(Self { adapter })
    }
}

#[async_trait]
impl BluetoothAdapter for BluezAdapter {
    fn name(&self) -> &str {
        self.adapter.name()
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.adapter.is_powered().await?)
    }

    async fn enable(&self) -> Result<()> {
        info!("Powering on Bluetooth adapter {}...", self.adapter.name());
        self.adapter.set_powered(true).await?;
        Ok(())
    }

    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>> {
        let mut devices = Vec::new();

        for addr in self.adapter.device_addresses().await? {
            // BlueZ may drop temporary devices while we walk the list
            let device = match self.adapter.device(addr) {
                Ok(device) => device,
                Err(e) => {
                    debug!("Skipping device {}: {}", addr, e);
                    continue;
                }
            };
            if !paired_or_skip(addr, device.is_paired().await) {
                continue;
            }
            let name = name_or_none(addr, device.name().await);
            debug!("Bonded device: {:?} ({})", name, addr);
            devices.push(BondedDevice::new(addr, name));
        }

        sort_devices(&mut devices);
        info!("Found {} bonded devices", devices.len());
        Ok(devices)
    }
}
