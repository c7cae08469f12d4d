use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{FoodDataset, PRODUCT_COLUMN, TOTAL_EMISSIONS_CLEAN};
use crate::views::format_value;

const ROW_HEIGHT: f32 = 18.0;

/// Filtered table: label, reconciled total, then the source columns.
pub fn data_table(ui: &mut Ui, table: &FoodDataset) {
    let columns: Vec<&str> = std::iter::once(TOTAL_EMISSIONS_CLEAN)
        .chain(table.column_names.iter().map(String::as_str))
        .collect();

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .column(Column::auto().at_least(160.0))
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong(PRODUCT_COLUMN);
                });
                for name in &columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(*name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.len(), |mut row| {
                    let record = &table.records[row.index()];
                    row.col(|ui: &mut Ui| {
                        ui.label(record.product.as_str());
                    });
                    for name in &columns {
                        row.col(|ui: &mut Ui| {
                            ui.label(format_value(record.value(name)));
                        });
                    }
                });
            });
    });
}
