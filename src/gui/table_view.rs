//! Table View Widget
//! Draws page tables and status regions.

use crate::page::{StatusKind, StatusRegion, TableElement};
use egui::{Color32, RichText};

pub struct TableView;

impl TableView {
    /// Draw a titled table card.
    pub fn show(ui: &mut egui::Ui, id: &str, title: &str, table: &TableElement) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(4.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                if table.is_empty() {
                    ui.label(RichText::new("No Data").color(Color32::GRAY));
                    return;
                }

                egui::ScrollArea::horizontal()
                    .id_salt(format!("scroll_{}", id))
                    .show(ui, |ui| {
                        egui::Grid::new(ui.make_persistent_id(format!("table_{}", id)))
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for header in table.header_rows() {
                                    for cell in header {
                                        ui.label(RichText::new(cell).strong().size(12.0));
                                    }
                                    ui.end_row();
                                }
                                for row in table.rows() {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(12.0));
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });
    }

    /// Draw a status region; nothing is drawn while it is empty.
    pub fn show_status(ui: &mut egui::Ui, status: &StatusRegion) {
        if let Some(message) = status.message() {
            let color = match message.kind {
                StatusKind::Error => Color32::from_rgb(220, 53, 69),
                StatusKind::Info => Color32::from_rgb(40, 167, 69),
            };
            ui.label(RichText::new(&message.text).size(12.0).color(color));
        }
    }
}
