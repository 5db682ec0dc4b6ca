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

//! Bonded List Desktop Application

use anyhow::Result;
use libadwaita as adw;
use adw::prelude::*;
use std::cell::RefCell;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

use bonded_list::bluetooth::BluezAdapter;
use bonded_list::config::Config;
use bonded_list::events::AppRequest;
use bonded_list::listing::BondedDeviceList;
use bonded_list::state::AppState;
use bonded_list::ui::{self, DialogPrompt, MainWindow};

const APP_ID: &str = "io.github.bondedlist.BondedList";

fn main() -> Result<()> {
    bonded_list::init_logging()?;

    info!("Starting Bonded List v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!("Configuration loaded");

    // BlueZ calls run here; GTK keeps the main thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let adapter = match runtime.block_on(BluezAdapter::open(config.bluetooth.adapter.as_deref())) {
        Ok(adapter) => Some(adapter),
        Err(e) => {
            warn!("No Bluetooth adapter available: {}", e);
            None
        }
    };

    let (request_tx, request_rx) = mpsc::unbounded_channel::<AppRequest>();
    let list = Arc::new(BondedDeviceList::new(
        adapter,
        AppState::new(),
        &config,
        request_tx,
    ));

    // Request Bluetooth permissions on launch
    list.request_permissions();

    let app = adw::Application::builder().application_id(APP_ID).build();
    let request_rx = RefCell::new(Some(request_rx));

    app.connect_activate(move |app| {
        let gtk_app: &gtk4::Application = app.upcast_ref();
        let window = MainWindow::new(gtk_app, &config.ui);

        let list_button = list.clone();
        let window_button = window.clone();
        window.button.connect_clicked(move |_| {
            list_button.press_show_list();
            ui::refresh(&window_button, list_button.clone());
        });

        if let Some(rx) = request_rx.borrow_mut().take() {
            let prompt = DialogPrompt::new(
                gtk_app.clone(),
                window.clone(),
                config.permissions.prompt_timeout_secs,
            );
            ui::spawn_request_loop(list.clone(), rx, prompt);
        }

        ui::refresh(&window, list.clone());
        window.window.present();
    });

    let exit_code = app.run();
    info!("Bonded List stopped ({:?})", exit_code);
    Ok(())
}
