//! Page bodies for each route.

use eframe::egui;
use shared::domain::TemplateId;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::navigation::Route;
use crate::ui::app::{DesktopGuiApp, PendingConfirm, PreviewState};

const THUMBNAIL_EDGE: f32 = 96.0;

/// Deferred detail page actions, applied once the form borrow ends.
enum DetailAction {
    Save,
    Delete(TemplateId),
    Copy(String),
    Preview { images: Vec<String>, index: usize },
}

impl DesktopGuiApp {
    pub(super) fn show_login_screen(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let avail = ui.available_size();
            let card_width = avail.x.clamp(280.0, 480.0);
            ui.add_space((avail.y * 0.12).clamp(12.0, 90.0));

            ui.vertical_centered(|ui| {
                ui.set_width(card_width);
                egui::Frame::NONE
                    .fill(ui.visuals().faint_bg_color)
                    .corner_radius(14.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(20, 18))
                    .show(ui, |ui| {
                        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);
                        ui.heading("Content admin");
                        ui.weak("Sign in with an access token.");
                        ui.add_space(8.0);

                        ui.label("Server URL");
                        let server = ui.add(
                            egui::TextEdit::singleline(&mut self.login.server_url)
                                .hint_text(crate::ui::app::DEFAULT_SERVER_URL)
                                .desired_width(f32::INFINITY),
                        );
                        ui.label("Access token");
                        let token = ui.add(
                            egui::TextEdit::singleline(&mut self.login.token)
                                .password(true)
                                .desired_width(f32::INFINITY),
                        );

                        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
                        let submit_from_field =
                            enter && (server.lost_focus() || token.lost_focus());

                        let button = egui::Button::new(egui::RichText::new("Sign in").strong())
                            .min_size(egui::vec2(ui.available_width(), 36.0));
                        let clicked = ui.add_enabled(!self.login.busy, button).clicked();
                        if (clicked || submit_from_field) && !self.login.busy {
                            self.sign_in();
                        }
                        if self.login.busy {
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.weak("Signing in…");
                            });
                        }
                    });
            });
        });
    }

    pub(super) fn show_page(&mut self, ctx: &egui::Context) {
        let scrolling = !self.scroll_lock.is_locked();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("page_scroll")
                .auto_shrink([false, false])
                .enable_scrolling(scrolling)
                .show(ui, |ui| match self.route.clone() {
                    Route::Login => {}
                    Route::Dashboard => self.show_dashboard(ui),
                    Route::Articles => self.show_placeholder(
                        ui,
                        "Articles",
                        "Drafts and published articles",
                        "No articles yet.",
                    ),
                    Route::Templates => self.show_template_list(ui),
                    Route::TemplateDetail(_) => self.show_template_detail(ui),
                    Route::Calendar => self.show_placeholder(
                        ui,
                        "Calendar",
                        "Scheduled publications",
                        "Nothing scheduled.",
                    ),
                    Route::Settings => self.show_settings(ui),
                });
        });
    }

    fn show_placeholder(&mut self, ui: &mut egui::Ui, title: &str, subtitle: &str, empty: &str) {
        self.page_header(ui, title, subtitle);
        ui.add_space(24.0);
        ui.vertical_centered(|ui| ui.weak(empty));
    }

    fn show_dashboard(&mut self, ui: &mut egui::Ui) {
        self.page_header(ui, "Dashboard", "Overview of your workspace");
        if let Some(session) = &self.session {
            ui.label(format!("Connected to {}", session.server_url));
        }
        ui.label(format!("Templates loaded: {}", self.templates.templates().len()));
        ui.add_space(12.0);

        ui.horizontal(|ui| {
            ui.strong("Agent documentation");
            if ui.button("Refresh").clicked() {
                self.dispatch(BackendCommand::FetchSkill);
            }
        });
        match &self.skill_markdown {
            Some(markdown) => {
                egui::Frame::NONE
                    .fill(ui.visuals().extreme_bg_color)
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::same(10))
                    .show(ui, |ui| {
                        ui.add(egui::Label::new(egui::RichText::new(markdown).monospace()).wrap());
                    });
            }
            None => {
                ui.weak("Not loaded.");
            }
        }
    }

    fn show_template_list(&mut self, ui: &mut egui::Ui) {
        self.page_header(ui, "Templates", "Reusable article content");

        let mut refresh = false;
        ui.horizontal_wrapped(|ui| {
            let search = ui.add(
                egui::TextEdit::singleline(&mut self.templates.search)
                    .hint_text("Search title or description")
                    .desired_width(220.0),
            );
            let category = ui.add(
                egui::TextEdit::singleline(&mut self.templates.category)
                    .hint_text("Category")
                    .desired_width(140.0),
            );
            let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
            refresh |= enter && (search.lost_focus() || category.lost_focus());
            refresh |= ui.button("Search").clicked();
        });
        if refresh {
            self.refresh_templates(false);
        }

        ui.add_space(6.0);
        let mut create = None;
        ui.horizontal_wrapped(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.new_template.title)
                    .hint_text("New template title")
                    .desired_width(220.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.new_template.category)
                    .hint_text("Category (optional)")
                    .desired_width(140.0),
            );
            let request = self.new_template.to_create_request();
            if ui
                .add_enabled(request.is_some(), egui::Button::new("Create"))
                .clicked()
            {
                create = request;
            }
        });
        if let Some(req) = create {
            self.dispatch(BackendCommand::CreateTemplate { req });
        }

        ui.add_space(6.0);
        ui.separator();
        ui.weak(format!(
            "Showing {} of {}",
            self.templates.templates().len(),
            self.templates.total()
        ));

        let mut open = None;
        for template in self.templates.templates() {
            let response = egui::Frame::NONE
                .inner_margin(egui::Margin::symmetric(6, 6))
                .show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.strong(&template.title);
                    if let Some(description) = &template.description {
                        ui.weak(description);
                    }
                    let mut meta = Vec::new();
                    if let Some(category) = &template.category {
                        meta.push(category.clone());
                    }
                    if !template.tags.is_empty() {
                        meta.push(template.tags.join(", "));
                    }
                    meta.push(template.updated_at.format("%Y-%m-%d %H:%M").to_string());
                    ui.small(meta.join("  ·  "));
                })
                .response
                .interact(egui::Sense::click());
            if response.clicked() {
                open = Some(template.id.clone());
            }
            ui.separator();
        }

        if self.templates.is_loading() {
            ui.spinner();
        } else if self.templates.has_more() && ui.button("Load more").clicked() {
            self.refresh_templates(true);
        } else if self.templates.templates().is_empty() {
            ui.weak("No templates found.");
        }

        if let Some(id) = open {
            self.navigate(Route::TemplateDetail(id));
        }
    }

    fn show_template_detail(&mut self, ui: &mut egui::Ui) {
        let compact = self.form_factor.is_compact();
        self.back_button(ui, Route::Templates, "Templates");

        let title = self
            .detail
            .as_ref()
            .and_then(|d| d.saved.as_ref())
            .map(|t| t.title.clone())
            .unwrap_or_else(|| "Template".to_string());
        self.page_header(ui, &title, "Edit template");

        let mut action = None;
        let previews = &self.previews;
        let mut wanted_previews = Vec::new();
        let Some(detail) = self.detail.as_mut() else {
            return;
        };
        let Some(saved) = detail.saved.clone() else {
            ui.spinner();
            return;
        };

        let field_width = if compact { f32::INFINITY } else { 560.0 };
        ui.label("Title");
        ui.add(egui::TextEdit::singleline(&mut detail.form.title).desired_width(field_width));
        ui.label("Description");
        ui.add(egui::TextEdit::singleline(&mut detail.form.description).desired_width(field_width));
        ui.label("Category");
        ui.add(egui::TextEdit::singleline(&mut detail.form.category).desired_width(field_width));
        ui.label("Tags (comma separated)");
        ui.add(egui::TextEdit::singleline(&mut detail.form.tags).desired_width(field_width));
        ui.label("Content");
        ui.add(
            egui::TextEdit::multiline(&mut detail.form.content)
                .code_editor()
                .desired_rows(14)
                .desired_width(field_width),
        );

        let images = detail.image_urls();
        if !images.is_empty() {
            ui.add_space(6.0);
            ui.label("Images");
            ui.horizontal_wrapped(|ui| {
                for (index, url) in images.iter().enumerate() {
                    let clicked = match previews.get(url) {
                        Some(PreviewState::Ready(texture)) => {
                            let size = texture.size_vec2();
                            let scale = (THUMBNAIL_EDGE / size.x.max(size.y)).min(1.0);
                            ui.add(
                                egui::Image::new((texture.id(), size * scale))
                                    .sense(egui::Sense::click()),
                            )
                            .on_hover_text(url)
                            .clicked()
                        }
                        Some(PreviewState::Failed(reason)) => ui
                            .add_sized([THUMBNAIL_EDGE, THUMBNAIL_EDGE], egui::Button::new("⚠"))
                            .on_hover_text(reason)
                            .clicked(),
                        None => {
                            ui.add_sized([THUMBNAIL_EDGE, THUMBNAIL_EDGE], egui::Spinner::new());
                            wanted_previews.push(url.clone());
                            false
                        }
                    };
                    if clicked {
                        action = Some(DetailAction::Preview {
                            images: images.clone(),
                            index,
                        });
                    }
                }
            });
        }

        ui.add_space(10.0);
        ui.horizontal_wrapped(|ui| {
            let dirty = detail.form.is_dirty(&saved);
            let save = egui::Button::new(if detail.saving { "Saving…" } else { "Save" });
            if ui.add_enabled(dirty && !detail.saving, save).clicked() {
                action = Some(DetailAction::Save);
            }
            if ui.button("Copy content").clicked() {
                action = Some(DetailAction::Copy(detail.form.content.clone()));
            }
            if ui
                .button(egui::RichText::new("Delete").color(ui.visuals().error_fg_color))
                .clicked()
            {
                action = Some(DetailAction::Delete(detail.id.clone()));
            }
        });
        ui.add_space(6.0);
        ui.small(format!(
            "Created {} · Updated {}",
            saved.created_at.format("%Y-%m-%d %H:%M"),
            saved.updated_at.format("%Y-%m-%d %H:%M")
        ));

        for url in wanted_previews {
            self.request_preview(&url);
        }
        match action {
            Some(DetailAction::Save) => {
                let Some(detail) = self.detail.as_mut() else {
                    return;
                };
                if detail.form.title.trim().is_empty() {
                    self.notices.error("Title is required");
                    return;
                }
                detail.saving = true;
                let cmd = BackendCommand::SaveTemplate {
                    id: detail.id.clone(),
                    req: detail.form.to_update_request(),
                };
                if !self.dispatch(cmd) {
                    if let Some(detail) = self.detail.as_mut() {
                        detail.saving = false;
                    }
                }
            }
            Some(DetailAction::Delete(id)) => {
                self.pending_confirm = Some(PendingConfirm::DeleteTemplate(id));
            }
            Some(DetailAction::Copy(content)) => self.copy_to_clipboard(&content),
            Some(DetailAction::Preview { images, index }) => self.open_carousel(images, index),
            None => {}
        }
    }

    fn show_settings(&mut self, ui: &mut egui::Ui) {
        self.page_header(ui, "Settings", "Session and server");
        match &self.session {
            Some(session) => {
                ui.label(format!("Server: {}", session.server_url));
            }
            None => {
                ui.weak("Not signed in.");
            }
        }
        match &self.session_file {
            Some(file) => ui.small(format!("Session stored in {}", file.path().display())),
            None => ui.small("Session is not remembered on this device."),
        };
        ui.add_space(12.0);
        if ui
            .button(egui::RichText::new("Sign out").color(ui.visuals().error_fg_color))
            .clicked()
        {
            self.pending_confirm = Some(PendingConfirm::SignOut);
        }
    }
}
