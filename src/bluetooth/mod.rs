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

//! Bluetooth module.
//!
//! Reads adapter state and the bonded-device set from BlueZ.

mod adapter;
mod device;

pub use adapter::{BluetoothAdapter, BluezAdapter};
pub use device::{sort_devices, BondedDevice};

#[cfg(test)]
pub(crate) mod fake;
