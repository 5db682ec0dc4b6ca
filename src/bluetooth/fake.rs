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

//! In-memory adapter for unit tests.

use anyhow::{bail, Result};
use async_trait::async_trait;
use bluer::Address;
use parking_lot::RwLock;

use super::{sort_devices, BluetoothAdapter, BondedDevice};

pub(crate) struct FakeAdapter {
    pub powered: RwLock<bool>,
    pub fail_enable: bool,
    pub devices: Vec<BondedDevice>,
}

impl FakeAdapter {
    pub fn new(powered: bool, names: &[Option<&str>]) -> Self {
        let devices = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                BondedDevice::new(
                    Address::new([0xAA, 0xBB, 0xCC, 0xDD, 0xEE, i as u8]),
                    name.map(str::to_string),
                )
            })
            .collect();
        Self {
            powered: RwLock::new(powered),
            fail_enable: false,
            devices,
        }
    }

    pub fn is_powered(&self) -> bool {
        *self.powered.read()
    }
}

#[async_trait]
impl BluetoothAdapter for FakeAdapter {
    fn name(&self) -> &str {
        "hci0"
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.is_powered())
    }

    async fn enable(&self) -> Result<()> {
        if self.fail_enable {
            bail!("org.bluez.Error.Blocked");
        }
        *self.powered.write() = true;
        Ok(())
    }

    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>> {
        let mut devices = self.devices.clone();
        sort_devices(&mut devices);
        Ok(devices)
    }
}
