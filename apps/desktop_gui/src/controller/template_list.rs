//! Paged template list with search and category filters.

use shared::{
    domain::{ArticleTemplate, TemplateId},
    protocol::{ListTemplatesQuery, TemplateListResponse},
};

pub const PAGE_SIZE: u32 = 20;

#[derive(Debug, Default)]
pub struct TemplateListState {
    pub search: String,
    pub category: String,
    templates: Vec<ArticleTemplate>,
    total: u64,
    loading: bool,
}

impl TemplateListState {
    /// Query for the first page (`append == false`) or the next one.
    pub fn query(&self, append: bool) -> ListTemplatesQuery {
        let offset = if append {
            u32::try_from(self.templates.len()).unwrap_or(u32::MAX)
        } else {
            0
        };
        ListTemplatesQuery {
            category: non_blank(&self.category),
            search: non_blank(&self.search),
            limit: Some(PAGE_SIZE),
            offset: Some(offset),
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
    }

    pub fn apply_page(&mut self, page: TemplateListResponse, append: bool) {
        self.loading = false;
        if !append {
            self.templates.clear();
        }
        for template in page.templates {
            // Pages can shift when rows are added between requests.
            if !self.templates.iter().any(|t| t.id == template.id) {
                self.templates.push(template);
            }
        }
        self.total = page.total;
    }

    pub fn load_failed(&mut self) {
        self.loading = false;
    }

    pub fn upsert(&mut self, template: ArticleTemplate) {
        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => *existing = template,
            None => {
                self.templates.insert(0, template);
                self.total += 1;
            }
        }
    }

    pub fn remove(&mut self, id: &TemplateId) {
        let before = self.templates.len();
        self.templates.retain(|t| &t.id != id);
        if self.templates.len() < before {
            self.total = self.total.saturating_sub(1);
        }
    }

    pub fn templates(&self) -> &[ArticleTemplate] {
        &self.templates
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        (self.templates.len() as u64) < self.total
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/template_list_tests.rs"]
mod tests;
