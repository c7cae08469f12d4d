use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – product filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔎 Filters");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds.clone(),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    let n_selected = state.selection.len();
    let n_total = dataset.products.len();
    ui.strong(format!("Select food products  ({n_selected}/{n_total})"));
    if n_selected == 0 {
        ui.weak("No selection: showing every product.");
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });
    ui.separator();

    // Collect toggles first so the selection is not borrowed while drawing.
    let mut toggled: Vec<String> = Vec::new();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for product in &dataset.products {
                let mut checked = state.selection.contains(product);
                if ui.checkbox(&mut checked, product.as_str()).changed() {
                    toggled.push(product.clone());
                }
            }
        });

    for product in toggled {
        state.toggle_product(&product);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} products loaded, {} visible",
                ds.len(),
                state.visible_rows()
            ));
        }

        if let Some(path) = &state.source_path {
            ui.separator();
            ui.weak(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open food production data")
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        // Failures are logged and kept as the status message by `load_path`.
        if state.load_path(&path).is_ok() {
            log::info!("Opened {}", path.display());
        }
    }
}
