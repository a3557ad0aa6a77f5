use std::{collections::HashMap, time::Instant};

use arboard::Clipboard;
use client_core::images::extract_image_urls;
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use egui::TextureHandle;
use shared::domain::{ArticleTemplate, TemplateId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    carousel::{CarouselProps, CarouselState},
    events::{PreviewImage, UiErrorContext, UiEvent},
    navigation::{FormFactor, Route},
    notices::Notices,
    orchestration::dispatch_backend_command,
    previews::PreviewRequests,
    scroll_lock::PageScrollLock,
    session::{SessionFile, StoredSession},
    template_form::{NewTemplateDraft, TemplateForm},
    template_list::TemplateListState,
};
use crate::ui::carousel_view::CarouselView;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8443";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub token: Option<String>,
    pub session_file: Option<SessionFile>,
    /// First page shown after sign-in.
    pub initial_route: Route,
}

pub(super) enum PreviewState {
    Ready(TextureHandle),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum PendingConfirm {
    DeleteTemplate(TemplateId),
    SignOut,
}

pub(super) struct LoginForm {
    pub(super) server_url: String,
    pub(super) token: String,
    pub(super) busy: bool,
}

pub(super) struct DetailState {
    pub(super) id: TemplateId,
    pub(super) saved: Option<ArticleTemplate>,
    pub(super) form: TemplateForm,
    pub(super) saving: bool,
    image_source: String,
    image_urls: Vec<String>,
}

impl DetailState {
    fn new(id: TemplateId) -> Self {
        Self {
            id,
            saved: None,
            form: TemplateForm::default(),
            saving: false,
            image_source: String::new(),
            image_urls: Vec::new(),
        }
    }

    /// Image urls referenced by the draft content, re-parsed only on edit.
    pub(super) fn image_urls(&mut self) -> Vec<String> {
        if self.image_source != self.form.content {
            self.image_urls = extract_image_urls(&self.form.content);
            self.image_source = self.form.content.clone();
        }
        self.image_urls.clone()
    }
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    pub(super) session_file: Option<SessionFile>,
    touch_seen: bool,
    pub(super) route: Route,
    /// Where to go once sign-in succeeds.
    pub(super) return_to: Route,
    pub(super) form_factor: FormFactor,
    pub(super) login: LoginForm,
    pub(super) session: Option<StoredSession>,
    pub(super) notices: Notices,
    pub(super) templates: TemplateListState,
    pub(super) new_template: NewTemplateDraft,
    pub(super) detail: Option<DetailState>,
    pub(super) skill_markdown: Option<String>,
    pub(super) previews: HashMap<String, PreviewState>,
    preview_requests: PreviewRequests,
    pub(super) pending_confirm: Option<PendingConfirm>,
    pub(super) scroll_lock: PageScrollLock,
    pub(super) carousel: CarouselState,
    pub(super) carousel_props: CarouselProps,
    carousel_view: CarouselView,
}

impl DesktopGuiApp {
    pub fn bootstrap(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let stored = match &startup.session_file {
            Some(file) => match file.load() {
                Ok(stored) => stored,
                Err(err) => {
                    tracing::warn!("ignoring unreadable session file: {err:#}");
                    None
                }
            },
            None => None,
        };
        // An explicit token beats the remembered one.
        let (server_url, token) = match (startup.token, stored) {
            (Some(token), _) => (startup.server_url, token),
            (None, Some(stored)) => (stored.server_url, stored.token),
            (None, None) => (startup.server_url, String::new()),
        };

        let scroll_lock = PageScrollLock::default();
        let mut app = Self {
            cmd_tx,
            ui_rx,
            session_file: startup.session_file,
            touch_seen: false,
            route: Route::Login,
            return_to: startup.initial_route,
            form_factor: FormFactor::Wide,
            login: LoginForm {
                server_url,
                token,
                busy: false,
            },
            session: None,
            notices: Notices::default(),
            templates: TemplateListState::default(),
            new_template: NewTemplateDraft::default(),
            detail: None,
            skill_markdown: None,
            previews: HashMap::new(),
            preview_requests: PreviewRequests::default(),
            pending_confirm: None,
            carousel: CarouselState::new(scroll_lock.clone()),
            scroll_lock,
            carousel_props: CarouselProps::default(),
            carousel_view: CarouselView::default(),
        };
        if !app.login.token.trim().is_empty() {
            app.sign_in();
        }
        app
    }

    pub(super) fn dispatch(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.notices)
    }

    pub(super) fn navigate(&mut self, route: Route) {
        if route.requires_session() && self.session.is_none() {
            self.return_to = route;
            self.route = Route::Login;
            return;
        }
        if route == self.route {
            return;
        }
        tracing::debug!(path = %route.path(), "navigating");
        self.carousel_props.visible = false;
        self.pending_confirm = None;
        match &route {
            Route::Templates => {
                if self.templates.templates().is_empty() && !self.templates.is_loading() {
                    self.refresh_templates(false);
                }
            }
            Route::TemplateDetail(id) => {
                self.detail = Some(DetailState::new(id.clone()));
                self.dispatch(BackendCommand::LoadTemplate { id: id.clone() });
            }
            _ => {}
        }
        if !matches!(route, Route::TemplateDetail(_)) {
            self.detail = None;
        }
        self.route = route;
    }

    pub(super) fn sign_in(&mut self) {
        let server_url = self.login.server_url.trim().to_string();
        let token = self.login.token.trim().to_string();
        if server_url.is_empty() {
            self.notices.error("Please enter a server URL.");
            return;
        }
        if token.is_empty() {
            self.notices.error("Please enter an access token.");
            return;
        }
        self.login.busy = self.dispatch(BackendCommand::SignIn { server_url, token });
    }

    pub(super) fn refresh_templates(&mut self, append: bool) {
        let query = self.templates.query(append);
        if self.dispatch(BackendCommand::ListTemplates { query, append }) {
            self.templates.begin_load();
        }
    }

    pub(super) fn request_preview(&mut self, url: &str) {
        if self.previews.contains_key(url) || !self.preview_requests.start(url, Instant::now()) {
            return;
        }
        self.dispatch(BackendCommand::FetchPreviewImage {
            url: url.to_string(),
        });
    }

    pub(super) fn open_carousel(&mut self, images: Vec<String>, initial_index: usize) {
        self.carousel_props = CarouselProps {
            images,
            visible: true,
            initial_index,
        };
    }

    pub(super) fn copy_to_clipboard(&mut self, text: &str) {
        let result = Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string()));
        match result {
            Ok(()) => self.notices.info("Content copied to clipboard"),
            Err(err) => {
                tracing::warn!("clipboard write failed: {err}");
                self.notices.error("Failed to copy content");
            }
        }
    }

    pub(super) fn confirm(&mut self, action: PendingConfirm) {
        self.pending_confirm = None;
        match action {
            PendingConfirm::DeleteTemplate(id) => {
                self.dispatch(BackendCommand::DeleteTemplate { id });
            }
            PendingConfirm::SignOut => self.sign_out(),
        }
    }

    fn sign_out(&mut self) {
        if let Some(file) = &self.session_file {
            if let Err(err) = file.clear() {
                tracing::warn!("failed to clear session file: {err:#}");
            }
        }
        self.dispatch(BackendCommand::SignOut);
        self.session = None;
        self.login.token.clear();
        self.templates = TemplateListState::default();
        self.detail = None;
        self.skill_markdown = None;
        self.previews.clear();
        self.preview_requests.clear();
        self.carousel_props.visible = false;
        self.return_to = Route::Dashboard;
        self.route = Route::Login;
        tracing::info!("signed out");
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::SignedIn { server_url, token } => {
                    self.login.busy = false;
                    let session = StoredSession { server_url, token };
                    if let Some(file) = &self.session_file {
                        if let Err(err) = file.save(&session) {
                            tracing::warn!("failed to persist session: {err:#}");
                        }
                    }
                    self.session = Some(session);
                    let target = match std::mem::replace(&mut self.return_to, Route::Dashboard) {
                        Route::Login => Route::Dashboard,
                        other => other,
                    };
                    self.navigate(target);
                }
                UiEvent::Info(message) => self.notices.info(message),
                UiEvent::Error(err) => {
                    tracing::warn!(
                        category = ?err.category(),
                        context = ?err.context(),
                        "{}",
                        err.message()
                    );
                    self.notices.error(err.notice_text());
                    match err.context() {
                        UiErrorContext::SignIn => self.login.busy = false,
                        UiErrorContext::LoadTemplates => self.templates.load_failed(),
                        UiErrorContext::SaveTemplate => {
                            if let Some(detail) = &mut self.detail {
                                detail.saving = false;
                            }
                        }
                        _ => {}
                    }
                    if err.requires_reauth() && err.context() != UiErrorContext::SignIn {
                        self.session = None;
                        self.login.busy = false;
                        if self.route != Route::Login {
                            self.return_to = self.route.clone();
                        }
                        self.carousel_props.visible = false;
                        self.route = Route::Login;
                    } else if err.navigates_away() {
                        self.navigate(Route::Templates);
                    }
                }
                UiEvent::TemplatesLoaded { response, append } => {
                    self.templates.apply_page(response, append);
                }
                UiEvent::TemplateLoaded(template) => {
                    if let Some(detail) = &mut self.detail {
                        if detail.id == template.id {
                            detail.form = TemplateForm::from_template(&template);
                            detail.saved = Some(template);
                        }
                    }
                }
                UiEvent::TemplateCreated(template) => {
                    self.notices.info(format!("Created \"{}\"", template.title));
                    self.new_template = NewTemplateDraft::default();
                    self.templates.upsert(template);
                }
                UiEvent::TemplateSaved(template) => {
                    self.notices.info("Template saved");
                    if let Some(detail) = &mut self.detail {
                        if detail.id == template.id {
                            detail.saving = false;
                            detail.form = TemplateForm::from_template(&template);
                            detail.saved = Some(template.clone());
                        }
                    }
                    self.templates.upsert(template);
                }
                UiEvent::TemplateDeleted { id, message } => {
                    self.notices.info(message);
                    self.templates.remove(&id);
                    if matches!(&self.route, Route::TemplateDetail(current) if *current == id) {
                        self.navigate(Route::Templates);
                    }
                }
                UiEvent::SkillLoaded(markdown) => self.skill_markdown = Some(markdown),
                UiEvent::PreviewLoaded { url, image } => {
                    self.preview_requests.finish(&url);
                    let texture = upload_preview(ctx, &url, &image);
                    self.previews.insert(url, PreviewState::Ready(texture));
                }
                UiEvent::PreviewFailed { url, reason } => {
                    self.preview_requests.finish(&url);
                    self.previews.insert(url, PreviewState::Failed(reason));
                }
            }
        }
    }

    fn show_confirm_dialog(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.pending_confirm.clone() else {
            return;
        };
        let (title, prompt, action) = match &pending {
            PendingConfirm::DeleteTemplate(_) => (
                "Delete template",
                "Are you sure you want to delete this template?",
                "Delete",
            ),
            PendingConfirm::SignOut => ("Sign out", "Are you sure you want to sign out?", "Sign out"),
        };

        let mut decision = None;
        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(prompt);
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        decision = Some(false);
                    }
                    if ui
                        .button(egui::RichText::new(action).color(ui.visuals().error_fg_color))
                        .clicked()
                    {
                        decision = Some(true);
                    }
                });
            });

        match decision {
            Some(true) => self.confirm(pending),
            Some(false) => self.pending_confirm = None,
            None => {}
        }
    }
}

fn upload_preview(ctx: &egui::Context, url: &str, image: &PreviewImage) -> TextureHandle {
    let color_image =
        egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
    ctx.load_texture(
        format!("template-image:{url}"),
        color_image,
        egui::TextureOptions::LINEAR,
    )
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let viewport = ctx.available_rect();
        self.touch_seen |= ctx.input(|i| i.any_touches());
        self.form_factor = FormFactor::detect(viewport.width(), self.touch_seen);

        self.process_ui_events(ctx);

        if self.route == Route::Login {
            self.show_login_screen(ctx);
        } else {
            self.show_navigation(ctx);
            self.show_page(ctx);
        }
        self.show_confirm_dialog(ctx);

        self.carousel.sync(&self.carousel_props);
        if self.carousel.is_open() {
            let closed = self.carousel_view.show(
                ctx,
                &mut self.carousel,
                viewport,
                self.form_factor,
                &self.previews,
            );
            if closed {
                self.carousel_props.visible = false;
            }
        }

        self.show_notices(ctx);
        match self.notices.prune(Instant::now()) {
            Some(next_expiry) => ctx.request_repaint_after(next_expiry),
            None => ctx.request_repaint_after(std::time::Duration::from_millis(250)),
        }
    }
}
