//! Backend commands queued from UI to backend worker.

use shared::{
    domain::TemplateId,
    protocol::{CreateTemplateRequest, ListTemplatesQuery, UpdateTemplateRequest},
};

pub enum BackendCommand {
    SignIn {
        server_url: String,
        token: String,
    },
    SignOut,
    ListTemplates {
        query: ListTemplatesQuery,
        append: bool,
    },
    LoadTemplate {
        id: TemplateId,
    },
    CreateTemplate {
        req: CreateTemplateRequest,
    },
    SaveTemplate {
        id: TemplateId,
        req: UpdateTemplateRequest,
    },
    DeleteTemplate {
        id: TemplateId,
    },
    FetchSkill,
    FetchPreviewImage {
        url: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::SignIn { .. } => "sign_in",
            BackendCommand::SignOut => "sign_out",
            BackendCommand::ListTemplates { .. } => "list_templates",
            BackendCommand::LoadTemplate { .. } => "load_template",
            BackendCommand::CreateTemplate { .. } => "create_template",
            BackendCommand::SaveTemplate { .. } => "save_template",
            BackendCommand::DeleteTemplate { .. } => "delete_template",
            BackendCommand::FetchSkill => "fetch_skill",
            BackendCommand::FetchPreviewImage { .. } => "fetch_preview_image",
        }
    }
}
