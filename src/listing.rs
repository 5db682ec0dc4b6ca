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

//! Permission-gated retrieval of bonded devices.
//!
//! With every required permission granted and the adapter powered on, the
//! list is the adapter's current bonded-device set. Otherwise the list is
//! empty and a permission or enable request is queued for the front end.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::bluetooth::{BluetoothAdapter, BondedDevice};
use crate::config::Config;
use crate::events::AppRequest;
use crate::permissions::{request_outcome, Permission, PermissionStatus};
use crate::state::AppState;

/// Shown in place of the list until permissions are granted.
pub const PERMISSIONS_NOT_GRANTED: &str = "Bluetooth permissions not granted";

/// Shown when no Bluetooth adapter could be opened.
pub const BLUETOOTH_UNAVAILABLE: &str = "Bluetooth is not available on this computer";

/// Result of one retrieval attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// Adapter enabled and permissions granted.
    Devices(Vec<BondedDevice>),
    /// A permission request was queued.
    PermissionsRequired,
    /// The adapter is off; an enable request was queued.
    EnableRequested,
    /// No adapter.
    Unavailable,
}

impl ListOutcome {
    pub fn devices(&self) -> &[BondedDevice] {
        match self {
            ListOutcome::Devices(devices) => devices,
            _ => &[],
        }
    }
}

/// One row of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    pub name: String,
    pub address: String,
}

/// What the main screen shows below the button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenContent {
    Message(String),
    List(Vec<DeviceRow>),
}

/// The bonded-device list and the requests that gate it.
pub struct BondedDeviceList<A> {
    adapter: Option<Arc<A>>,
    state: Arc<AppState>,
    required: Vec<Permission>,
    unknown_label: String,
    request_tx: mpsc::UnboundedSender<AppRequest>,
}

impl<A: BluetoothAdapter> BondedDeviceList<A> {
    pub fn new(
        adapter: Option<A>,
        state: Arc<AppState>,
        config: &Config,
        request_tx: mpsc::UnboundedSender<AppRequest>,
    ) -> Self {
        Self {
            adapter: adapter.map(Arc::new),
            state,
            required: config.permissions.required.clone(),
            unknown_label: config.bluetooth.unknown_device_label.clone(),
            request_tx,
        }
    }

    pub fn adapter(&self) -> Option<&Arc<A>> {
        self.adapter.as_ref()
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Queue a permission request unless every required permission is granted.
    ///
    /// Returns true if a request is outstanding after the call.
    pub fn request_permissions(&self) -> bool {
        if self.check_permissions() {
            return false;
        }
        self.send_permission_request(self.required.clone());
        true
    }

    pub fn check_permissions(&self) -> bool {
        self.state.all_granted(&self.required)
    }

    /// Record the user's answer to a permission request.
    ///
    /// Returns true if every requested permission was granted.
    pub fn on_permissions_result(
        &self,
        permissions: &[Permission],
        statuses: &[PermissionStatus],
    ) -> bool {
        self.state.record_permissions(permissions, statuses);
        self.state.end_permission_request();

        // A short result leaves some permissions unrecorded
        let granted = request_outcome(statuses) && self.state.all_granted(permissions);
        if granted {
            info!("Bluetooth permissions granted");
        } else {
            info!("Bluetooth permissions denied");
        }
        granted
    }

    /// Ask the user to turn the adapter on.
    ///
    /// Needs `BLUETOOTH_ADMIN`; without it that permission is requested instead.
    pub fn request_enable(&self) {
        if self.state.check_permission(Permission::BluetoothAdmin) != PermissionStatus::Granted {
            debug!("Enable request needs {}", Permission::BluetoothAdmin);
            self.send_permission_request(vec![Permission::BluetoothAdmin]);
            return;
        }

        if self.state.begin_enable_request() {
            info!("Requesting user to enable Bluetooth");
            if !self.send(AppRequest::EnableBluetooth) {
                self.state.end_enable_request();
            }
        }
    }

    /// Check permissions and adapter state, then read the bonded devices.
    pub async fn enable_and_get_bonded_devices(&self) -> Result<ListOutcome> {
        if !self.check_permissions() {
            self.request_permissions();
            return Ok(ListOutcome::PermissionsRequired);
        }

        let Some(adapter) = self.adapter.as_ref() else {
            return Ok(ListOutcome::Unavailable);
        };

        if !adapter.is_enabled().await? {
            debug!("Adapter {} is powered off", adapter.name());
            self.request_enable();
            // Filled in once the adapter is powered on
            return Ok(ListOutcome::EnableRequested);
        }

        Ok(ListOutcome::Devices(adapter.bonded_devices().await?))
    }

    /// The "Request Permissions and Show List" action.
    pub fn press_show_list(&self) {
        self.state.set_button_pressed(true);
        self.request_permissions();
    }

    /// Content for the area below the button.
    pub async fn screen(&self) -> Result<ScreenContent> {
        if !self.state.is_button_pressed() || !self.check_permissions() {
            return Ok(ScreenContent::Message(PERMISSIONS_NOT_GRANTED.to_string()));
        }

        let outcome = self.enable_and_get_bonded_devices().await?;
        if outcome == ListOutcome::Unavailable {
            return Ok(ScreenContent::Message(BLUETOOTH_UNAVAILABLE.to_string()));
        }

        let rows = outcome
            .devices()
            .iter()
            .map(|device| DeviceRow {
                name: device.display_name(&self.unknown_label).to_string(),
                address: device.address.to_string(),
            })
            .collect();
        Ok(ScreenContent::List(rows))
    }

    fn send_permission_request(&self, permissions: Vec<Permission>) {
        if self.state.begin_permission_request() {
            info!(
                "Requesting Bluetooth permissions: {}",
                permissions
                    .iter()
                    .map(Permission::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            if !self.send(AppRequest::Permissions(permissions)) {
                self.state.end_permission_request();
            }
        }
    }

    /// Returns false if nobody is listening for requests.
    fn send(&self, request: AppRequest) -> bool {
        match self.request_tx.send(request) {
            Ok(()) => true,
            Err(e) => {
                warn!("Request dropped, no front end listening: {:?}", e.0);
                false
            }
        }
    }
}
