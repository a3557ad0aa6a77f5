//! Editable draft of a template and its conversion into an update request.

use shared::{
    domain::ArticleTemplate,
    patch::Patch,
    protocol::{CreateTemplateRequest, UpdateTemplateRequest},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateForm {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Comma separated.
    pub tags: String,
    pub category: String,
}

impl TemplateForm {
    pub fn from_template(template: &ArticleTemplate) -> Self {
        Self {
            title: template.title.clone(),
            description: template.description.clone().unwrap_or_default(),
            content: template.content.clone().unwrap_or_default(),
            tags: template.tags.join(", "),
            category: template.category.clone().unwrap_or_default(),
        }
    }

    /// Full update with every field set. Blank description or category clear
    /// the stored value; content is sent as typed.
    pub fn to_update_request(&self) -> UpdateTemplateRequest {
        UpdateTemplateRequest {
            title: Patch::Set(self.title.clone()),
            description: Patch::Set(non_empty(&self.description)),
            content: Patch::Set(Some(self.content.clone())),
            tags: Patch::Set(parse_tags(&self.tags)),
            category: Patch::Set(non_empty(&self.category)),
        }
    }

    pub fn is_dirty(&self, saved: &ArticleTemplate) -> bool {
        *self != Self::from_template(saved)
    }
}

/// Draft for the create-by-title form on the list page.
#[derive(Debug, Clone, Default)]
pub struct NewTemplateDraft {
    pub title: String,
    pub category: String,
}

impl NewTemplateDraft {
    /// `None` while the title is blank.
    pub fn to_create_request(&self) -> Option<CreateTemplateRequest> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(CreateTemplateRequest {
            category: non_empty(&self.category),
            ..CreateTemplateRequest::titled(title)
        })
    }
}

pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/template_form_tests.rs"]
mod tests;
