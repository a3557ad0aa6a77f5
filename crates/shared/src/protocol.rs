use serde::{Deserialize, Serialize};

use crate::{
    domain::{ArticleTemplate, NewTemplate, TemplateFilter},
    error::ApiError,
    patch::Patch,
};

pub const DEFAULT_LIST_LIMIT: u32 = 100;
pub const MAX_LIST_LIMIT: u32 = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListTemplatesQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ListTemplatesQuery {
    /// Applies paging defaults and drops blank filters.
    pub fn into_filter(self) -> TemplateFilter {
        TemplateFilter {
            category: non_blank(self.category),
            search: non_blank(self.search),
            limit: self
                .limit
                .unwrap_or(DEFAULT_LIST_LIMIT)
                .min(MAX_LIST_LIMIT),
            offset: self.offset.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateListResponse {
    pub templates: Vec<ArticleTemplate>,
    pub total: u64,
    pub limit: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CreateTemplateRequest {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Returns `None` when the title is missing or blank. Empty optional text
    /// collapses to `None` and missing tags become an empty list.
    pub fn into_new_template(self) -> Option<NewTemplate> {
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        Some(NewTemplate {
            title,
            description: self.description.filter(|v| !v.is_empty()),
            content: self.content.filter(|v| !v.is_empty()),
            tags: self.tags.unwrap_or_default(),
            category: self.category.filter(|v| !v.is_empty()),
        })
    }
}

/// Partial update. Keys missing from the body leave the stored column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub title: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub content: Patch<Option<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub tags: Patch<Vec<String>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub category: Patch<Option<String>>,
}

impl UpdateTemplateRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_absent()
            && self.description.is_absent()
            && self.content.is_absent()
            && self.tags.is_absent()
            && self.category.is_absent()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTemplateResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessEnvelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> SuccessEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: crate::error::ErrorCode,
    pub message: String,
    pub status: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorBody,
}

impl From<ApiError> for ErrorEnvelope {
    fn from(value: ApiError) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                status: value.status(),
                code: value.code,
                message: value.message,
            },
        }
    }
}

impl From<ErrorEnvelope> for ApiError {
    fn from(value: ErrorEnvelope) -> Self {
        ApiError::new(value.error.code, value.error.message)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
