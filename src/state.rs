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

//! Application state management.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::permissions::{Permission, PermissionGrants, PermissionStatus};

/// Shared application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Whether "show list" has been pressed.
    pub button_pressed: RwLock<bool>,

    /// Permission grants for this session.
    pub grants: RwLock<PermissionGrants>,

    /// A permission prompt is queued or on screen.
    pub permissions_pending: RwLock<bool>,

    /// An enable-Bluetooth prompt is queued or on screen.
    pub enable_pending: RwLock<bool>,
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_button_pressed(&self, pressed: bool) {
        *self.button_pressed.write() = pressed;
    }

    pub fn is_button_pressed(&self) -> bool {
        *self.button_pressed.read()
    }

    pub fn check_permission(&self, permission: Permission) -> PermissionStatus {
        self.grants.read().check(permission)
    }

    pub fn all_granted(&self, permissions: &[Permission]) -> bool {
        self.grants.read().all_granted(permissions)
    }

    pub fn record_permissions(&self, permissions: &[Permission], statuses: &[PermissionStatus]) {
        self.grants.write().record(permissions, statuses);
    }

    /// Mark a permission prompt as pending. Returns false if one already was.
    pub fn begin_permission_request(&self) -> bool {
        !std::mem::replace(&mut *self.permissions_pending.write(), true)
    }

    pub fn end_permission_request(&self) {
        *self.permissions_pending.write() = false;
    }

    /// Mark an enable prompt as pending. Returns false if one already was.
    pub fn begin_enable_request(&self) -> bool {
        !std::mem::replace(&mut *self.enable_pending.write(), true)
    }

    pub fn end_enable_request(&self) {
        *self.enable_pending.write() = false;
    }
}
