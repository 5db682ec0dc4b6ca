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

//! GTK prompts for permission and enable requests.

use async_trait::async_trait;
use gtk4::Application;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info};

use super::confirmation_dialog::{show_confirmation_dialog, Confirmation, ConfirmationResult};
use super::main_window::{refresh, MainWindow};
use crate::bluetooth::BluetoothAdapter;
use crate::events::{AppRequest, RequestProcessor, RequestPrompt};
use crate::listing::BondedDeviceList;
use crate::permissions::{Permission, PermissionStatus};

/// Answers requests with modal dialogs over the main window.
pub struct DialogPrompt {
    app: Application,
    parent: MainWindow,
    timeout_secs: u32,
}

impl DialogPrompt {
    pub fn new(app: Application, parent: MainWindow, timeout_secs: u32) -> Self {
        Self {
            app,
            parent,
            timeout_secs,
        }
    }

    async fn confirm(&self, confirmation: &Confirmation) -> ConfirmationResult {
        let rx = show_confirmation_dialog(
            &self.app,
            &self.parent.window,
            confirmation,
            self.timeout_secs,
        );
        rx.await.unwrap_or(ConfirmationResult::Rejected)
    }
}

#[async_trait(?Send)]
impl RequestPrompt for DialogPrompt {
    async fn confirm_permissions(&mut self, permissions: &[Permission]) -> Vec<PermissionStatus> {
        let confirmation = Confirmation {
            title: "Bluetooth Permissions".to_string(),
            heading: "Allow Bluetooth access?".to_string(),
            lines: permissions
                .iter()
                .map(|p| format!("• {}", p.description()))
                .collect(),
            note: Some("Needed to show the devices paired with this computer.".to_string()),
            approve_label: "Allow".to_string(),
            reject_label: "Deny".to_string(),
        };

        let status = match self.confirm(&confirmation).await {
            ConfirmationResult::Approved => PermissionStatus::Granted,
            ConfirmationResult::Rejected => PermissionStatus::Denied,
        };
        vec![status; permissions.len()]
    }

    async fn confirm_enable(&mut self) -> bool {
        let confirmation = Confirmation {
            title: "Turn On Bluetooth".to_string(),
            heading: "Turn on Bluetooth?".to_string(),
            lines: vec!["Bluetooth is off. Paired devices are listed once it is on.".to_string()],
            note: None,
            approve_label: "Allow".to_string(),
            reject_label: "Deny".to_string(),
        };

        self.confirm(&confirmation).await == ConfirmationResult::Approved
    }
}

/// Answer queued requests on the GTK main context for the lifetime of the app.
pub fn spawn_request_loop<A: BluetoothAdapter + 'static>(
    list: Arc<BondedDeviceList<A>>,
    mut rx: mpsc::UnboundedReceiver<AppRequest>,
    mut prompt: DialogPrompt,
) {
    let processor = RequestProcessor::new(list.clone());
    glib::MainContext::default().spawn_local(async move {
        while let Some(request) = rx.recv().await {
            info!("Handling request: {:?}", request);
            match processor.process(request, &mut prompt).await {
                Ok(true) => refresh(&prompt.parent, list.clone()),
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to handle request: {}", e);
                    prompt
                        .parent
                        .show_message(&format!("Could not turn on Bluetooth: {}", e));
                }
            }
        }
    });
}
