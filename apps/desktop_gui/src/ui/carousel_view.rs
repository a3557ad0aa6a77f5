//! Full-screen overlay that renders [`CarouselState`] as a horizontally
//! scrolling strip of viewport-wide pages.

use std::collections::HashMap;

use eframe::egui;

use crate::controller::{
    carousel::{CarouselEffect, CarouselInput, CarouselState, NavKey, ScrollBehavior},
    navigation::FormFactor,
};
use crate::ui::{app::PreviewState, layout::ui_in_rect};

const SMOOTH_SCROLL_SECONDS: f64 = 0.25;
const PAGE_MARGIN: egui::Vec2 = egui::vec2(48.0, 72.0);

struct ScrollAnim {
    from: f32,
    to: f32,
    started: f64,
}

/// Per-frame rendering state. The controller decides what to show; this only
/// turns its effects into scroll offsets.
#[derive(Default)]
pub struct CarouselView {
    anim: Option<ScrollAnim>,
    forced_offset: Option<f32>,
    last_offset: Option<f32>,
}

impl CarouselView {
    /// Draws the open carousel. Returns true when it closed this frame.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        state: &mut CarouselState,
        rect: egui::Rect,
        form_factor: FormFactor,
        previews: &HashMap<String, PreviewState>,
    ) -> bool {
        if state.awaiting_first_paint() {
            *self = Self::default();
        }
        let shown_index = state.current();

        let mut inputs = Vec::new();
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Escape) {
                inputs.push(CarouselInput::Key(NavKey::Escape));
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                inputs.push(CarouselInput::Key(NavKey::ArrowLeft));
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                inputs.push(CarouselInput::Key(NavKey::ArrowRight));
            }
        });

        let now = ctx.input(|i| i.time);
        if let Some(anim) = &self.anim {
            let t = ((now - anim.started) / SMOOTH_SCROLL_SECONDS).clamp(0.0, 1.0) as f32;
            let eased = 1.0 - (1.0 - t).powi(3);
            self.forced_offset = Some(anim.from + (anim.to - anim.from) * eased);
            if t >= 1.0 {
                self.anim = None;
            }
            ctx.request_repaint();
        }

        let page_width = rect.width();
        let mut strip_offset = None;
        let mut pointer_released = false;
        let forced_offset = self.forced_offset.take();

        egui::Area::new(egui::Id::new("image_preview_carousel"))
            .order(egui::Order::Foreground)
            .fixed_pos(rect.min)
            .show(ctx, |ui| {
                // The area must cover the viewport to win hit-testing over the page.
                ui.set_min_size(rect.size());
                ui.set_clip_rect(rect);
                ui.painter()
                    .rect_filled(rect, 0.0, egui::Color32::from_black_alpha(235));

                ui_in_rect(ui, rect, |ui| {
                    let mut area = egui::ScrollArea::horizontal()
                        .id_salt("image_preview_strip")
                        .auto_shrink([false, false])
                        .scroll_bar_visibility(
                            egui::scroll_area::ScrollBarVisibility::AlwaysHidden,
                        );
                    if let Some(offset) = forced_offset {
                        area = area.horizontal_scroll_offset(offset);
                    }
                    let output = area.show(ui, |ui| {
                        ui.spacing_mut().item_spacing = egui::Vec2::ZERO;
                        ui.horizontal(|ui| {
                            for url in state.images() {
                                let (page, response) =
                                    ui.allocate_exact_size(rect.size(), egui::Sense::click());
                                paint_page(ui, page, previews.get(url));
                                if response.clicked() {
                                    inputs.push(CarouselInput::ImageClicked);
                                }
                            }
                        });
                    });
                    strip_offset = Some(output.state.offset.x);
                    pointer_released = ui.input(|i| i.pointer.any_released());
                });

                self.show_controls(ui, state, rect, form_factor, &mut inputs);
            });

        let mut closed = false;
        for input in inputs {
            closed |= self.apply(ctx, state.handle(input), page_width, now);
        }
        if closed {
            tracing::debug!(index = ?shown_index, "image preview closed");
            return true;
        }
        if state.is_settling() {
            ctx.request_repaint();
        }

        if let Some(offset) = strip_offset {
            if self.last_offset != Some(offset) {
                self.last_offset = Some(offset);
                state.handle(CarouselInput::Scrolled { offset, page_width });
            }
            if pointer_released && self.anim.is_none() {
                let effect = state.handle(CarouselInput::PointerReleased { offset, page_width });
                self.apply(ctx, effect, page_width, now);
            }
            if state.awaiting_first_paint() {
                let effect = state.handle(CarouselInput::FramePainted);
                self.apply(ctx, effect, page_width, now);
            }
        }
        false
    }

    fn show_controls(
        &self,
        ui: &mut egui::Ui,
        state: &CarouselState,
        rect: egui::Rect,
        form_factor: FormFactor,
        inputs: &mut Vec<CarouselInput>,
    ) {
        let button_size = egui::vec2(40.0, 40.0);
        let close_rect = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 56.0, rect.top() + 16.0),
            button_size,
        );
        if ui
            .put(close_rect, egui::Button::new(egui::RichText::new("✕").size(20.0)))
            .on_hover_text("Close")
            .clicked()
        {
            inputs.push(CarouselInput::Close);
        }

        let mid_y = rect.center().y - button_size.y / 2.0;
        if state.show_prev_arrow(form_factor) {
            let prev =
                egui::Rect::from_min_size(egui::pos2(rect.left() + 16.0, mid_y), button_size);
            if ui
                .put(prev, egui::Button::new(egui::RichText::new("◀").size(20.0)))
                .clicked()
            {
                inputs.push(CarouselInput::PrevArrow);
            }
        }
        if state.show_next_arrow(form_factor) {
            let next = egui::Rect::from_min_size(
                egui::pos2(rect.right() - 16.0 - button_size.x, mid_y),
                button_size,
            );
            if ui
                .put(next, egui::Button::new(egui::RichText::new("▶").size(20.0)))
                .clicked()
            {
                inputs.push(CarouselInput::NextArrow);
            }
        }

        if let Some(indicator) = state.page_indicator() {
            ui.painter().text(
                egui::pos2(rect.center().x, rect.bottom() - 28.0),
                egui::Align2::CENTER_CENTER,
                indicator,
                egui::FontId::proportional(15.0),
                egui::Color32::from_white_alpha(220),
            );
        }
    }

    fn apply(
        &mut self,
        ctx: &egui::Context,
        effect: CarouselEffect,
        page_width: f32,
        now: f64,
    ) -> bool {
        match effect {
            CarouselEffect::None => false,
            CarouselEffect::Closed => {
                self.anim = None;
                self.forced_offset = None;
                self.last_offset = None;
                true
            }
            CarouselEffect::ScrollToPage { index, behavior } => {
                let target = index as f32 * page_width;
                match behavior {
                    ScrollBehavior::Instant => {
                        self.anim = None;
                        self.forced_offset = Some(target);
                    }
                    ScrollBehavior::Smooth => {
                        self.anim = Some(ScrollAnim {
                            from: self.last_offset.unwrap_or(target),
                            to: target,
                            started: now,
                        });
                    }
                }
                ctx.request_repaint();
                false
            }
        }
    }
}

fn paint_page(ui: &egui::Ui, page: egui::Rect, preview: Option<&PreviewState>) {
    let painter = ui.painter_at(page);
    match preview {
        Some(PreviewState::Ready(texture)) => {
            let bounds = (page.size() - PAGE_MARGIN * 2.0).max(egui::vec2(1.0, 1.0));
            let size = texture.size_vec2();
            let scale = (bounds.x / size.x).min(bounds.y / size.y).min(1.0);
            let image_rect = egui::Rect::from_center_size(page.center(), size * scale);
            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        Some(PreviewState::Failed(reason)) => {
            painter.text(
                page.center(),
                egui::Align2::CENTER_CENTER,
                format!("Image unavailable: {reason}"),
                egui::FontId::proportional(14.0),
                egui::Color32::from_white_alpha(200),
            );
        }
        None => {
            painter.text(
                page.center(),
                egui::Align2::CENTER_CENTER,
                "Loading…",
                egui::FontId::proportional(14.0),
                egui::Color32::from_white_alpha(200),
            );
        }
    }
}
