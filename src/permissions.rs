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

//! Runtime Bluetooth permissions.
//!
//! Grants live in memory for the lifetime of the process and are never
//! written to disk.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A Bluetooth permission the user can grant or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    /// Read adapter state and bonded devices.
    Bluetooth,
    /// Change adapter state, e.g. power it on.
    BluetoothAdmin,
    /// Talk to paired devices. Gates the list only when configured as required.
    BluetoothConnect,
}

/// The two legacy permissions requested by default.
pub const LEGACY_PERMISSIONS: [Permission; 2] = [Permission::Bluetooth, Permission::BluetoothAdmin];

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Bluetooth => "BLUETOOTH",
            Permission::BluetoothAdmin => "BLUETOOTH_ADMIN",
            Permission::BluetoothConnect => "BLUETOOTH_CONNECT",
        }
    }

    /// Text shown to the user when asking for this permission.
    pub fn description(&self) -> &'static str {
        match self {
            Permission::Bluetooth => "Access Bluetooth settings and paired devices",
            Permission::BluetoothAdmin => "Turn Bluetooth on",
            Permission::BluetoothConnect => "Communicate with paired devices",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Whether a permission request result counts as granted.
///
/// An empty result means the request was cancelled.
pub fn request_outcome(statuses: &[PermissionStatus]) -> bool {
    !statuses.is_empty() && statuses.iter().all(|s| *s == PermissionStatus::Granted)
}

/// In-memory grant table.
#[derive(Debug, Default, Clone)]
pub struct PermissionGrants {
    grants: HashMap<Permission, PermissionStatus>,
}

impl PermissionGrants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of `permission`; permissions never asked for are denied.
    pub fn check(&self, permission: Permission) -> PermissionStatus {
        self.grants
            .get(&permission)
            .copied()
            .unwrap_or(PermissionStatus::Denied)
    }

    pub fn all_granted(&self, permissions: &[Permission]) -> bool {
        permissions
            .iter()
            .all(|p| self.check(*p) == PermissionStatus::Granted)
    }

    /// Apply a request result. Entries are paired by position; extra
    /// permissions without a status are left untouched.
    pub fn record(&mut self, permissions: &[Permission], statuses: &[PermissionStatus]) {
        for (permission, status) in permissions.iter().zip(statuses) {
            self.grants.insert(*permission, *status);
        }
    }
}
