//! Integration tests for the permission-gated listing flow.

use anyhow::Result;
use async_trait::async_trait;
use bluer::Address;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

use bonded_list::bluetooth::{sort_devices, BluetoothAdapter, BondedDevice};
use bonded_list::config::Config;
use bonded_list::events::{AppRequest, RequestProcessor, RequestPrompt};
use bonded_list::listing::{BondedDeviceList, ScreenContent, PERMISSIONS_NOT_GRANTED};
use bonded_list::permissions::{Permission, PermissionStatus};
use bonded_list::state::AppState;

struct MemoryAdapter {
    powered: RwLock<bool>,
    devices: Vec<BondedDevice>,
}

#[async_trait]
impl BluetoothAdapter for MemoryAdapter {
    fn name(&self) -> &str {
        "hci0"
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(*self.powered.read())
    }

    async fn enable(&self) -> Result<()> {
        *self.powered.write() = true;
        Ok(())
    }

    async fn bonded_devices(&self) -> Result<Vec<BondedDevice>> {
        let mut devices = self.devices.clone();
        sort_devices(&mut devices);
        Ok(devices)
    }
}

/// Records what was asked and answers from a script.
struct Answers {
    grant: Vec<PermissionStatus>,
    enable: bool,
    permission_prompts: Vec<Vec<Permission>>,
    enable_prompts: usize,
}

impl Answers {
    fn new(grant: Vec<PermissionStatus>, enable: bool) -> Self {
        Self {
            grant,
            enable,
            permission_prompts: Vec::new(),
            enable_prompts: 0,
        }
    }
}

#[async_trait(?Send)]
impl RequestPrompt for Answers {
    async fn confirm_permissions(&mut self, permissions: &[Permission]) -> Vec<PermissionStatus> {
        self.permission_prompts.push(permissions.to_vec());
        self.grant.clone()
    }

    async fn confirm_enable(&mut self) -> bool {
        self.enable_prompts += 1;
        self.enable
    }
}

fn app(
    powered: bool,
) -> (
    Arc<BondedDeviceList<MemoryAdapter>>,
    RequestProcessor<MemoryAdapter>,
    mpsc::UnboundedReceiver<AppRequest>,
) {
    let adapter = MemoryAdapter {
        powered: RwLock::new(powered),
        devices: vec![
            BondedDevice::new(Address::new([1, 2, 3, 4, 5, 6]), Some("Car Audio".to_string())),
            BondedDevice::new(Address::new([6, 5, 4, 3, 2, 1]), None),
            BondedDevice::new(Address::new([9, 9, 9, 9, 9, 9]), Some("Band".to_string())),
        ],
    };
    let (tx, rx) = mpsc::unbounded_channel();
    let list = Arc::new(BondedDeviceList::new(
        Some(adapter),
        AppState::new(),
        &Config::default(),
        tx,
    ));
    let processor = RequestProcessor::new(list.clone());
    (list, processor, rx)
}

fn names(content: &ScreenContent) -> Vec<String> {
    match content {
        ScreenContent::List(rows) => rows.iter().map(|r| r.name.clone()).collect(),
        ScreenContent::Message(text) => panic!("expected a list, got message {:?}", text),
    }
}

#[tokio::test]
async fn test_full_flow_with_adapter_off() {
    let (list, processor, mut rx) = app(false);
    let mut answers = Answers::new(vec![PermissionStatus::Granted; 2], true);

    // Launch
    list.request_permissions();
    processor.drain(&mut rx, &mut answers).await.unwrap();
    assert_eq!(
        answers.permission_prompts,
        vec![vec![Permission::Bluetooth, Permission::BluetoothAdmin]]
    );

    // Button press: already granted, no second permission prompt
    list.press_show_list();
    processor.drain(&mut rx, &mut answers).await.unwrap();
    assert_eq!(answers.permission_prompts.len(), 1);

    // Adapter off: empty list and an enable prompt
    let first = list.screen().await.unwrap();
    assert_eq!(first, ScreenContent::List(Vec::new()));
    assert!(processor.drain(&mut rx, &mut answers).await.unwrap());
    assert_eq!(answers.enable_prompts, 1);

    let second = list.screen().await.unwrap();
    assert_eq!(names(&second), vec!["Band", "Car Audio", "Unknown Device"]);
}

#[tokio::test]
async fn test_denied_permissions_keep_message() {
    let (list, processor, mut rx) = app(true);
    let mut answers = Answers::new(
        vec![PermissionStatus::Granted, PermissionStatus::Denied],
        true,
    );

    list.press_show_list();
    processor.drain(&mut rx, &mut answers).await.unwrap();

    assert_eq!(
        list.screen().await.unwrap(),
        ScreenContent::Message(PERMISSIONS_NOT_GRANTED.to_string())
    );
    assert_eq!(answers.enable_prompts, 0);

    // Pressing again asks again
    list.press_show_list();
    processor.drain(&mut rx, &mut answers).await.unwrap();
    assert_eq!(answers.permission_prompts.len(), 2);
}

#[tokio::test]
async fn test_dismissed_prompt_counts_as_denied() {
    let (list, processor, mut rx) = app(true);
    let mut answers = Answers::new(Vec::new(), true);

    list.press_show_list();
    processor.drain(&mut rx, &mut answers).await.unwrap();

    assert!(!list.check_permissions());
    assert_eq!(
        list.screen().await.unwrap(),
        ScreenContent::Message(PERMISSIONS_NOT_GRANTED.to_string())
    );
}

#[tokio::test]
async fn test_declined_enable_leaves_list_empty() {
    let (list, processor, mut rx) = app(false);
    let mut answers = Answers::new(vec![PermissionStatus::Granted; 2], false);

    list.press_show_list();
    processor.drain(&mut rx, &mut answers).await.unwrap();

    assert_eq!(list.screen().await.unwrap(), ScreenContent::List(Vec::new()));
    assert!(!processor.drain(&mut rx, &mut answers).await.unwrap());
    assert!(!list.adapter().unwrap().is_enabled().await.unwrap());
    assert_eq!(list.screen().await.unwrap(), ScreenContent::List(Vec::new()));
}
