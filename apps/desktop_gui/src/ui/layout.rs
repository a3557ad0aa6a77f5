//! Shell chrome: tab bar or navigation rail, page headers and notices.

use eframe::egui;

use crate::controller::{
    navigation::{Route, Tab},
    notices::NoticeSeverity,
};
use crate::ui::app::DesktopGuiApp;

pub(crate) fn ui_in_rect(ui: &mut egui::Ui, rect: egui::Rect, add: impl FnOnce(&mut egui::Ui)) {
    let mut child = ui.new_child(
        egui::UiBuilder::new()
            .max_rect(rect)
            .layout(egui::Layout::top_down(egui::Align::Min)),
    );
    child.set_clip_rect(rect);
    add(&mut child);
}

impl DesktopGuiApp {
    /// Bottom tab bar on compact screens, a left rail otherwise.
    pub(super) fn show_navigation(&mut self, ctx: &egui::Context) {
        let active = self.route.active_tab();
        let mut clicked = None;

        if self.form_factor.is_compact() {
            egui::TopBottomPanel::bottom("bottom_tab_bar")
                .exact_height(64.0)
                .show(ctx, |ui| {
                    let width = ui.available_width() / Tab::ALL.len() as f32;
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 0.0;
                        for tab in Tab::ALL {
                            let selected = active == Some(tab);
                            let text =
                                egui::RichText::new(format!("{}\n{}", tab.icon(), tab.label()))
                                    .size(12.0);
                            let button = egui::Button::new(text)
                                .selected(selected)
                                .frame(selected)
                                .min_size(egui::vec2(width, 56.0));
                            if ui.add(button).clicked() {
                                clicked = Some(tab);
                            }
                        }
                    });
                });
        } else {
            egui::SidePanel::left("navigation_rail")
                .resizable(false)
                .exact_width(200.0)
                .show(ctx, |ui| {
                    ui.add_space(12.0);
                    ui.heading("Content admin");
                    ui.add_space(12.0);
                    for tab in Tab::ALL {
                        let selected = active == Some(tab);
                        let text = format!("{}  {}", tab.icon(), tab.label());
                        if ui
                            .add_sized(
                                [ui.available_width(), 32.0],
                                egui::Button::new(text).selected(selected).frame(selected),
                            )
                            .clicked()
                        {
                            clicked = Some(tab);
                        }
                    }
                });
        }

        if let Some(tab) = clicked {
            self.navigate(tab.route());
        }
    }

    /// Compact headers show only the title.
    pub(super) fn page_header(&self, ui: &mut egui::Ui, title: &str, subtitle: &str) {
        ui.add_space(8.0);
        ui.heading(title);
        if !self.form_factor.is_compact() && !subtitle.is_empty() {
            ui.weak(subtitle);
        }
        ui.add_space(8.0);
        ui.separator();
    }

    pub(super) fn back_button(&mut self, ui: &mut egui::Ui, to: Route, label: &str) {
        if ui.button(format!("← {label}")).clicked() {
            self.navigate(to);
        }
    }

    pub(super) fn show_notices(&self, ctx: &egui::Context) {
        if self.notices.is_empty() {
            return;
        }
        let anchor_offset = if self.form_factor.is_compact() {
            egui::vec2(0.0, -76.0)
        } else {
            egui::vec2(0.0, -16.0)
        };
        egui::Area::new(egui::Id::new("notices"))
            .order(egui::Order::Tooltip)
            .anchor(egui::Align2::CENTER_BOTTOM, anchor_offset)
            .interactable(false)
            .show(ctx, |ui| {
                for notice in self.notices.iter() {
                    let fill = match notice.severity {
                        NoticeSeverity::Info => egui::Color32::from_rgb(45, 62, 80),
                        NoticeSeverity::Error => egui::Color32::from_rgb(111, 53, 53),
                    };
                    egui::Frame::NONE
                        .fill(fill)
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(12, 8))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(&notice.message).color(egui::Color32::WHITE),
                            );
                        });
                    ui.add_space(4.0);
                }
            });
    }
}
