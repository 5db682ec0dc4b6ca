// Copyright 2026 Daniel Pelikan
// SPDX-License-Identifier: Apache-2.0

//! Modal Yes/No dialog used for permission and enable-Bluetooth prompts.

use gtk4::prelude::*;
use gtk4::{Application, ApplicationWindow, Box as GtkBox, Button, Label, Orientation};
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::oneshot;
use tracing::info;

/// Result of confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationResult {
    /// User clicked the approve button.
    Approved,
    /// User clicked the reject button, closed the dialog or let it time out.
    Rejected,
}

/// Text shown in a confirmation dialog.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub title: String,
    pub heading: String,
    /// One label per line.
    pub lines: Vec<String>,
    pub note: Option<String>,
    pub approve_label: String,
    pub reject_label: String,
}

type Reply = Rc<RefCell<Option<oneshot::Sender<ConfirmationResult>>>>;

fn reply(tx: &Reply, result: ConfirmationResult) -> bool {
    match tx.borrow_mut().take() {
        Some(tx) => {
            let _ = tx.send(result);
            true
        }
        None => false,
    }
}

/// Show a confirmation dialog on top of `parent`.
///
/// Resolves to `Rejected` if the window is closed or nobody answers within
/// `timeout_secs`.
pub fn show_confirmation_dialog(
    app: &Application,
    parent: &ApplicationWindow,
    confirmation: &Confirmation,
    timeout_secs: u32,
) -> oneshot::Receiver<ConfirmationResult> {
    let (tx, rx) = oneshot::channel();
    let tx: Reply = Rc::new(RefCell::new(Some(tx)));

    let window = ApplicationWindow::builder()
        .application(app)
        .transient_for(parent)
        .title(confirmation.title.as_str())
        .default_width(350)
        .default_height(180)
        .modal(true)
        .resizable(false)
        .build();

    let main_box = GtkBox::new(Orientation::Vertical, 16);
    main_box.set_margin_top(24);
    main_box.set_margin_bottom(24);
    main_box.set_margin_start(24);
    main_box.set_margin_end(24);

    let heading = Label::new(Some(&confirmation.heading));
    heading.add_css_class("title-2");
    heading.set_wrap(true);
    main_box.append(&heading);

    for line in &confirmation.lines {
        let label = Label::new(Some(line));
        label.set_wrap(true);
        main_box.append(&label);
    }

    if let Some(note) = &confirmation.note {
        let note = Label::new(Some(note));
        note.add_css_class("dim-label");
        note.set_wrap(true);
        main_box.append(&note);
    }

    let button_box = GtkBox::new(Orientation::Horizontal, 12);
    button_box.set_halign(gtk4::Align::Center);
    button_box.set_margin_top(8);

    let reject_button = Button::with_label(&confirmation.reject_label);
    reject_button.set_width_request(80);

    let approve_button = Button::with_label(&confirmation.approve_label);
    approve_button.add_css_class("suggested-action");
    approve_button.set_width_request(80);

    button_box.append(&reject_button);
    button_box.append(&approve_button);
    main_box.append(&button_box);

    window.set_child(Some(&main_box));

    let window_reject = window.clone();
    let tx_reject = tx.clone();
    reject_button.connect_clicked(move |_| {
        reply(&tx_reject, ConfirmationResult::Rejected);
        window_reject.close();
    });

    let window_approve = window.clone();
    let tx_approve = tx.clone();
    approve_button.connect_clicked(move |_| {
        reply(&tx_approve, ConfirmationResult::Approved);
        window_approve.close();
    });

    // X button = reject
    let tx_close = tx.clone();
    window.connect_close_request(move |_| {
        reply(&tx_close, ConfirmationResult::Rejected);
        glib::Propagation::Proceed
    });

    let window_timeout = window.clone();
    let tx_timeout = tx;
    glib::timeout_add_seconds_local_once(timeout_secs, move || {
        if reply(&tx_timeout, ConfirmationResult::Rejected) {
            info!("Dialog timeout ({}s), rejecting", timeout_secs);
            window_timeout.close();
        }
    });

    window.present();
    approve_button.grab_focus();

    rx
}
