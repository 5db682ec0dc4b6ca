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

//! Main window: header icon, the show-list button and the device list.

use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, Box as GtkBox, Button, Image, Label, ListBox, ListBoxRow,
    Orientation, ScrolledWindow, SelectionMode,
};
use std::sync::Arc;
use tracing::error;

use crate::bluetooth::BluetoothAdapter;
use crate::config::UiConfig;
use crate::listing::{BondedDeviceList, DeviceRow, ScreenContent};

/// Handles to the widgets that change after startup.
#[derive(Clone)]
pub struct MainWindow {
    pub window: ApplicationWindow,
    pub button: Button,
    list_box: ListBox,
    scrolled: ScrolledWindow,
    message: Label,
}

impl MainWindow {
    pub fn new(app: &Application, config: &UiConfig) -> Self {
        let window = ApplicationWindow::builder()
            .application(app)
            .title(config.title.as_str())
            .default_width(config.default_width)
            .default_height(config.default_height)
            .build();

        let main_box = GtkBox::new(Orientation::Vertical, 16);
        main_box.set_margin_top(16);
        main_box.set_margin_bottom(16);
        main_box.set_margin_start(16);
        main_box.set_margin_end(16);

        let header = Image::from_icon_name("bluetooth-active");
        header.set_pixel_size(160);
        header.set_height_request(200);
        main_box.append(&header);

        let button = Button::with_label("Request Permissions and Show List");
        button.set_halign(gtk4::Align::Start);
        button.add_css_class("suggested-action");
        main_box.append(&button);

        let message = Label::new(None);
        message.set_halign(gtk4::Align::Start);
        message.set_wrap(true);
        main_box.append(&message);

        // List box in scrolled window
        let scrolled = ScrolledWindow::builder()
            .hexpand(true)
            .vexpand(true)
            .build();

        let list_box = ListBox::new();
        list_box.set_selection_mode(SelectionMode::None);
        list_box.add_css_class("boxed-list");
        list_box.set_placeholder(Some(&Label::new(Some("No paired devices"))));
        scrolled.set_child(Some(&list_box));
        main_box.append(&scrolled);

        window.set_child(Some(&main_box));

        Self {
            window,
            button,
            list_box,
            scrolled,
            message,
        }
    }

    /// Show `content` below the button.
    pub fn render(&self, content: &ScreenContent) {
        match content {
            ScreenContent::Message(text) => self.show_message(text),
            ScreenContent::List(rows) => {
                self.message.set_visible(false);
                self.scrolled.set_visible(true);
                populate_devices(&self.list_box, rows);
            }
        }
    }

    pub fn show_message(&self, text: &str) {
        self.scrolled.set_visible(false);
        self.message.set_text(text);
        self.message.set_visible(true);
    }
}

/// Re-read the screen content off the GTK thread and render it.
pub fn refresh<A: BluetoothAdapter + 'static>(window: &MainWindow, list: Arc<BondedDeviceList<A>>) {
    let window = window.clone();
    glib::MainContext::default().spawn_local(async move {
        match tokio::spawn(async move { list.screen().await }).await {
            Ok(Ok(content)) => window.render(&content),
            Ok(Err(e)) => {
                error!("Failed to read bonded devices: {}", e);
                window.show_message(&format!("Failed to read bonded devices: {}", e));
            }
            Err(e) => error!("Screen task failed: {}", e),
        }
    });
}

/// Replace the list rows.
fn populate_devices(list_box: &ListBox, rows: &[DeviceRow]) {
    while let Some(child) = list_box.first_child() {
        list_box.remove(&child);
    }

    for row in rows {
        list_box.append(&create_device_row(row));
    }
}

fn create_device_row(device: &DeviceRow) -> ListBoxRow {
    let row = ListBoxRow::new();

    let hbox = GtkBox::new(Orientation::Horizontal, 16);
    hbox.set_margin_top(8);
    hbox.set_margin_bottom(8);
    hbox.set_margin_start(8);
    hbox.set_margin_end(8);

    let icon = Image::from_icon_name("dialog-information-symbolic");
    icon.set_pixel_size(40);
    icon.add_css_class("accent");
    hbox.append(&icon);

    let name_label = Label::new(Some(&device.name));
    name_label.add_css_class("heading");
    name_label.set_hexpand(true);
    name_label.set_halign(gtk4::Align::Start);
    name_label.set_ellipsize(gtk4::pango::EllipsizeMode::End);
    name_label.set_tooltip_text(Some(&device.address));
    hbox.append(&name_label);

    row.set_child(Some(&hbox));
    row
}
