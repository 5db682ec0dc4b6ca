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

//! Headless bonded device list.
//!
//! Usage: bonded-list-cli [--yes]

use anyhow::Result;
use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;
use tracing::warn;

use bonded_list::bluetooth::BluezAdapter;
use bonded_list::config::Config;
use bonded_list::events::{RequestProcessor, RequestPrompt};
use bonded_list::listing::{BondedDeviceList, ScreenContent};
use bonded_list::permissions::{Permission, PermissionStatus};
use bonded_list::state::AppState;

/// Asks on the terminal, or says yes to everything with `--yes`.
struct TerminalPrompt {
    assume_yes: bool,
    lines: Lines<BufReader<Stdin>>,
}

impl TerminalPrompt {
    fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, question: &str) -> bool {
        if self.assume_yes {
            println!("{} [y/N] y", question);
            return true;
        }

        let mut stdout = tokio::io::stdout();
        if stdout
            .write_all(format!("{} [y/N] ", question).as_bytes())
            .await
            .is_err()
        {
            return false;
        }
        let _ = stdout.flush().await;

        match self.lines.next_line().await {
            Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            // EOF or read error counts as "no"
            _ => false,
        }
    }
}

#[async_trait(?Send)]
impl RequestPrompt for TerminalPrompt {
    async fn confirm_permissions(&mut self, permissions: &[Permission]) -> Vec<PermissionStatus> {
        let mut statuses = Vec::with_capacity(permissions.len());
        for permission in permissions {
            let question = format!("Allow {} ({})?", permission, permission.description());
            statuses.push(if self.ask(&question).await {
                PermissionStatus::Granted
            } else {
                PermissionStatus::Denied
            });
        }
        statuses
    }

    async fn confirm_enable(&mut self) -> bool {
        self.ask("Bluetooth is off. Turn it on?").await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    bonded_list::init_logging()?;

    let assume_yes = env::args().skip(1).any(|arg| arg == "--yes" || arg == "-y");
    let config = Config::load()?;

    let adapter = match BluezAdapter::open(config.bluetooth.adapter.as_deref()).await {
        Ok(adapter) => Some(adapter),
        Err(e) => {
            warn!("No Bluetooth adapter available: {}", e);
            None
        }
    };

    let (request_tx, mut request_rx) = mpsc::unbounded_channel();
    let list = Arc::new(BondedDeviceList::new(
        adapter,
        AppState::new(),
        &config,
        request_tx,
    ));
    let processor = RequestProcessor::new(list.clone());
    let mut prompt = TerminalPrompt::new(assume_yes);

    // Launch request, then the "show list" action
    list.request_permissions();
    processor.drain(&mut request_rx, &mut prompt).await?;
    list.press_show_list();
    let content = processor.settle_screen(&mut request_rx, &mut prompt).await?;

    match content {
        ScreenContent::Message(text) => println!("{}", text),
        ScreenContent::List(rows) if rows.is_empty() => println!("No paired devices"),
        ScreenContent::List(rows) => {
            for row in rows {
                println!("{}  {}", row.name, row.address);
            }
        }
    }

    Ok(())
}
