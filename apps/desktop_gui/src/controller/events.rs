//! Backend-to-UI events and error modeling for the desktop controller.

use client_core::ClientError;
use shared::{
    domain::{ArticleTemplate, TemplateId},
    error::ErrorCode,
    protocol::TemplateListResponse,
};

/// Decoded RGBA pixels ready to be uploaded as a texture.
#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub enum UiEvent {
    SignedIn {
        server_url: String,
        token: String,
    },
    Info(String),
    Error(UiError),
    TemplatesLoaded {
        response: TemplateListResponse,
        append: bool,
    },
    TemplateLoaded(ArticleTemplate),
    TemplateCreated(ArticleTemplate),
    TemplateSaved(ArticleTemplate),
    TemplateDeleted {
        id: TemplateId,
        message: String,
    },
    SkillLoaded(String),
    PreviewLoaded {
        url: String,
        image: PreviewImage,
    },
    PreviewFailed {
        url: String,
        reason: String,
    },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::SignedIn { .. } => "signed_in",
            UiEvent::Info(_) => "info",
            UiEvent::Error(_) => "error",
            UiEvent::TemplatesLoaded { .. } => "templates_loaded",
            UiEvent::TemplateLoaded(_) => "template_loaded",
            UiEvent::TemplateCreated(_) => "template_created",
            UiEvent::TemplateSaved(_) => "template_saved",
            UiEvent::TemplateDeleted { .. } => "template_deleted",
            UiEvent::SkillLoaded(_) => "skill_loaded",
            UiEvent::PreviewLoaded { .. } => "preview_loaded",
            UiEvent::PreviewFailed { .. } => "preview_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    NotFound,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SignIn,
    LoadTemplates,
    LoadTemplate,
    CreateTemplate,
    SaveTemplate,
    DeleteTemplate,
    LoadDocs,
    General,
}

impl UiErrorContext {
    fn action(self) -> &'static str {
        match self {
            UiErrorContext::BackendStartup => "Failed to start backend worker",
            UiErrorContext::SignIn => "Sign-in failed",
            UiErrorContext::LoadTemplates => "Failed to load templates",
            UiErrorContext::LoadTemplate => "Failed to load template",
            UiErrorContext::CreateTemplate => "Failed to create template",
            UiErrorContext::SaveTemplate => "Failed to save template",
            UiErrorContext::DeleteTemplate => "Failed to delete template",
            UiErrorContext::LoadDocs => "Documentation unavailable",
            UiErrorContext::General => "Error",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err {
            ClientError::Api { code, .. } => match code {
                ErrorCode::Unauthorized => UiErrorCategory::Auth,
                ErrorCode::NotFound => UiErrorCategory::NotFound,
                ErrorCode::Validation => UiErrorCategory::Validation,
                ErrorCode::UpstreamUnavailable => UiErrorCategory::Transport,
                ErrorCode::Internal => UiErrorCategory::Unknown,
            },
            ClientError::Transport(_) => UiErrorCategory::Transport,
            ClientError::InvalidUrl(_) | ClientError::OpaqueUrl => UiErrorCategory::Validation,
            ClientError::UnexpectedResponse { .. } => UiErrorCategory::Unknown,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    /// Classifies free-form failures that did not come from the HTTP client.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("unauthorized")
            || message_lower.contains("not signed in")
            || message_lower.contains("invalid token")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("not found") || message_lower.contains("404") {
            UiErrorCategory::NotFound
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("required")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    /// Failed detail loads leave the broken page instead of rendering it.
    pub fn navigates_away(&self) -> bool {
        self.context == UiErrorContext::LoadTemplate
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text for the transient notice.
    pub fn notice_text(&self) -> String {
        format!("{}: {}", self.context.action(), self.message)
    }
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
