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

//! Bonded device records.

use bluer::Address;

/// A device paired with the local adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondedDevice {
    pub address: Address,
    /// Remote name reported by the device, if BlueZ knows it.
    pub name: Option<String>,
}

impl BondedDevice {
    pub fn new(address: Address, name: Option<String>) -> Self {
        Self { address, name }
    }

    /// Name to show in the list, `unknown_label` when the device has none.
    pub fn display_name<'a>(&'a self, unknown_label: &'a str) -> &'a str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => unknown_label,
        }
    }
}

/// Sort by case-insensitive name, then address. Unnamed devices sort last.
pub fn sort_devices(devices: &mut [BondedDevice]) {
    devices.sort_by(|a, b| {
        let key_a = a.name.as_ref().map(|n| n.to_lowercase());
        let key_b = b.name.as_ref().map(|n| n.to_lowercase());
        match (key_a, key_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.address.cmp(&b.address))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        Address::new([0x00, 0x11, 0x22, 0x33, 0x44, last])
    }

    #[test]
    fn test_display_name_fallback() {
        let named = BondedDevice::new(addr(1), Some("Headphones".to_string()));
        let unnamed = BondedDevice::new(addr(2), None);
        let blank = BondedDevice::new(addr(3), Some("  ".to_string()));

        assert_eq!(named.display_name("Unknown Device"), "Headphones");
        assert_eq!(unnamed.display_name("Unknown Device"), "Unknown Device");
        assert_eq!(blank.display_name("Unknown Device"), "Unknown Device");
    }

    #[test]
    fn test_sort_devices() {
        let mut devices = vec![
            BondedDevice::new(addr(4), None),
            BondedDevice::new(addr(3), Some("speaker".to_string())),
            BondedDevice::new(addr(2), Some("Keyboard".to_string())),
            BondedDevice::new(addr(1), Some("Speaker".to_string())),
        ];
        sort_devices(&mut devices);

        let order: Vec<Address> = devices.iter().map(|d| d.address).collect();
        assert_eq!(order, vec![addr(2), addr(1), addr(3), addr(4)]);
    }
}
