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

//! Request dispatch between the listing flow and the front end.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::bluetooth::BluetoothAdapter;
use crate::listing::{BondedDeviceList, ScreenContent};
use crate::permissions::{Permission, PermissionStatus};

/// Something the user has to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRequest {
    /// Grant or deny these permissions.
    Permissions(Vec<Permission>),
    /// Turn the adapter on.
    EnableBluetooth,
}

/// Asks the user about a request.
///
/// Front ends run prompts on their own thread, so the futures need not be `Send`.
#[async_trait(?Send)]
pub trait RequestPrompt {
    /// One status per permission; an empty result means the prompt was dismissed.
    async fn confirm_permissions(&mut self, permissions: &[Permission]) -> Vec<PermissionStatus>;

    /// Whether the user agreed to turn Bluetooth on.
    async fn confirm_enable(&mut self) -> bool;
}

/// Prompt rounds `settle_screen` runs before giving up on the queue.
///
/// Permissions, then `BLUETOOTH_ADMIN`, then enable, then a final read.
pub const MAX_PROMPT_ROUNDS: usize = 4;

/// Applies user decisions to the listing flow.
pub struct RequestProcessor<A> {
    list: Arc<BondedDeviceList<A>>,
}

impl<A> Clone for RequestProcessor<A> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
        }
    }
}

impl<A: BluetoothAdapter + 'static> RequestProcessor<A> {
    pub fn new(list: Arc<BondedDeviceList<A>>) -> Self {
        Self { list }
    }

    /// Record a permission answer. Returns true if the screen should refresh.
    pub fn apply_permissions(&self, permissions: &[Permission], statuses: &[PermissionStatus]) -> bool {
        self.list.on_permissions_result(permissions, statuses);
        true
    }

    /// Act on the enable prompt answer. Returns true if the screen should refresh.
    ///
    /// A refusal does not refresh, otherwise the refresh would prompt again.
    pub async fn apply_enable(&self, approved: bool) -> Result<bool> {
        let result = self.enable_adapter(approved).await;
        self.list.state().end_enable_request();
        result
    }

    async fn enable_adapter(&self, approved: bool) -> Result<bool> {
        if !approved {
            info!("User declined to enable Bluetooth");
            return Ok(false);
        }

        let Some(adapter) = self.list.adapter().cloned() else {
            return Ok(false);
        };

        // BlueZ calls must run on the tokio runtime
        tokio::spawn(async move { adapter.enable().await }).await??;
        info!("Bluetooth enabled");
        Ok(true)
    }

    /// Prompt for a single request and apply the answer.
    pub async fn process<P: RequestPrompt>(&self, request: AppRequest, prompt: &mut P) -> Result<bool> {
        match request {
            AppRequest::Permissions(permissions) => {
                let statuses = prompt.confirm_permissions(&permissions).await;
                Ok(self.apply_permissions(&permissions, &statuses))
            }
            AppRequest::EnableBluetooth => {
                let approved = prompt.confirm_enable().await;
                self.apply_enable(approved).await
            }
        }
    }

    /// Resolve every queued request. Returns true if any answer needs a refresh.
    pub async fn drain<P: RequestPrompt>(
        &self,
        rx: &mut mpsc::UnboundedReceiver<AppRequest>,
        prompt: &mut P,
    ) -> Result<bool> {
        let mut refresh = false;
        while let Ok(request) = rx.try_recv() {
            match self.process(request, prompt).await {
                Ok(changed) => refresh |= changed,
                Err(e) => {
                    error!("Failed to handle request: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(refresh)
    }

    /// Answer queued requests and re-read the screen until nothing new is asked.
    ///
    /// One answer can queue the next request, e.g. a granted
    /// `BLUETOOTH_ADMIN` leads to the enable prompt.
    pub async fn settle_screen<P: RequestPrompt>(
        &self,
        rx: &mut mpsc::UnboundedReceiver<AppRequest>,
        prompt: &mut P,
    ) -> Result<ScreenContent> {
        self.drain(rx, prompt).await?;
        let mut content = self.list.screen().await?;

        for _ in 0..MAX_PROMPT_ROUNDS {
            if !self.drain(rx, prompt).await? {
                return Ok(content);
            }
            content = self.list.screen().await?;
        }

        if !rx.is_empty() {
            warn!("Requests still queued after {} prompt rounds", MAX_PROMPT_ROUNDS);
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluetooth::fake::FakeAdapter;
    use crate::config::Config;
    use crate::listing::ListOutcome;
    use crate::permissions::LEGACY_PERMISSIONS;
    use crate::state::AppState;

    /// Answers every prompt the same way and counts them.
    struct ScriptedPrompt {
        grant: bool,
        enable: bool,
        asked: usize,
    }

    #[async_trait(?Send)]
    impl RequestPrompt for ScriptedPrompt {
        async fn confirm_permissions(&mut self, permissions: &[Permission]) -> Vec<PermissionStatus> {
            self.asked += 1;
            let status = if self.grant {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            };
            vec![status; permissions.len()]
        }

        async fn confirm_enable(&mut self) -> bool {
            self.asked += 1;
            self.enable
        }
    }

    fn setup(
        adapter: FakeAdapter,
    ) -> (
        RequestProcessor<FakeAdapter>,
        Arc<BondedDeviceList<FakeAdapter>>,
        mpsc::UnboundedReceiver<AppRequest>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let list = Arc::new(BondedDeviceList::new(
            Some(adapter),
            AppState::new(),
            &Config::default(),
            tx,
        ));
        (RequestProcessor::new(list.clone()), list, rx)
    }

    #[tokio::test]
    async fn test_grant_then_enable_then_list() {
        let (processor, list, mut rx) = setup(FakeAdapter::new(false, &[Some("Speaker")]));
        let mut prompt = ScriptedPrompt {
            grant: true,
            enable: true,
            asked: 0,
        };

        list.press_show_list();
        assert!(processor.drain(&mut rx, &mut prompt).await.unwrap());
        assert!(list.check_permissions());

        let outcome = list.enable_and_get_bonded_devices().await.unwrap();
        assert_eq!(outcome, ListOutcome::EnableRequested);
        assert!(processor.drain(&mut rx, &mut prompt).await.unwrap());
        assert!(list.adapter().unwrap().is_powered());

        let outcome = list.enable_and_get_bonded_devices().await.unwrap();
        assert_eq!(outcome.devices().len(), 1);
        assert_eq!(prompt.asked, 2);
    }

    #[tokio::test]
    async fn test_settle_screen_follows_chained_requests() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut config = Config::default();
        config.permissions.required = vec![Permission::Bluetooth];
        let list = Arc::new(BondedDeviceList::new(
            Some(FakeAdapter::new(false, &[Some("Speaker")])),
            AppState::new(),
            &config,
            tx,
        ));
        let processor = RequestProcessor::new(list.clone());
        let mut prompt = ScriptedPrompt {
            grant: true,
            enable: true,
            asked: 0,
        };

        list.press_show_list();
        let content = processor.settle_screen(&mut rx, &mut prompt).await.unwrap();

        // BLUETOOTH, then BLUETOOTH_ADMIN, then enable
        assert_eq!(prompt.asked, 3);
        assert!(rx.try_recv().is_err());
        let ScreenContent::List(rows) = content else {
            panic!("expected a device list");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Speaker");
    }

    #[tokio::test]
    async fn test_settle_screen_stops_on_denial() {
        let (processor, list, mut rx) = setup(FakeAdapter::new(true, &[Some("Speaker")]));
        let mut prompt = ScriptedPrompt {
            grant: false,
            enable: true,
            asked: 0,
        };

        list.press_show_list();
        let content = processor.settle_screen(&mut rx, &mut prompt).await.unwrap();

        assert_eq!(prompt.asked, 1);
        assert_eq!(
            content,
            ScreenContent::Message(crate::listing::PERMISSIONS_NOT_GRANTED.to_string())
        );
    }

    #[tokio::test]
    async fn test_declined_enable_does_not_refresh() {
        let (processor, list, mut rx) = setup(FakeAdapter::new(false, &[]));
        list.state()
            .record_permissions(&LEGACY_PERMISSIONS, &[PermissionStatus::Granted; 2]);
        let mut prompt = ScriptedPrompt {
            grant: true,
            enable: false,
            asked: 0,
        };

        list.enable_and_get_bonded_devices().await.unwrap();
        assert!(!processor.drain(&mut rx, &mut prompt).await.unwrap());
        assert!(!list.adapter().unwrap().is_powered());

        // The prompt was resolved, so a later attempt may ask again
        list.enable_and_get_bonded_devices().await.unwrap();
        assert_eq!(rx.try_recv().unwrap(), AppRequest::EnableBluetooth);
    }

    #[tokio::test]
    async fn test_denied_permissions_are_recorded() {
        let (processor, list, mut rx) = setup(FakeAdapter::new(true, &[]));
        let mut prompt = ScriptedPrompt {
            grant: false,
            enable: true,
            asked: 0,
        };

        list.request_permissions();
        processor.drain(&mut rx, &mut prompt).await.unwrap();
        assert!(!list.check_permissions());
        assert_eq!(
            list.state().check_permission(Permission::Bluetooth),
            PermissionStatus::Denied
        );
    }

    #[tokio::test]
    async fn test_enable_failure_is_reported() {
        let mut adapter = FakeAdapter::new(false, &[]);
        adapter.fail_enable = true;
        let (processor, list, mut rx) = setup(adapter);
        list.state()
            .record_permissions(&LEGACY_PERMISSIONS, &[PermissionStatus::Granted; 2]);
        let mut prompt = ScriptedPrompt {
            grant: true,
            enable: true,
            asked: 0,
        };

        list.enable_and_get_bonded_devices().await.unwrap();
        assert!(processor.drain(&mut rx, &mut prompt).await.is_err());
        // Pending flag is cleared even on failure
        assert!(list.state().begin_enable_request());
    }
}
