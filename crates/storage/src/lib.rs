use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    types::Json,
    Pool, QueryBuilder, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{
    domain::{ArticleTemplate, NewTemplate, TemplateFilter, TemplateId, TemplatePage},
    protocol::UpdateTemplateRequest,
};

const TEMPLATE_COLUMNS: &str =
    "id, title, description, content, tags, category, created_at, updated_at";

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // Every in-memory connection is its own database, so the pool must hold on to one.
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn create_template(&self, new: &NewTemplate) -> Result<ArticleTemplate> {
        let id = TemplateId::generate();
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO article_templates
                (id, title, description, content, tags, category, created_at, updated_at,
                 title_search, description_search)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&new.title)
        .bind(new.description.as_deref())
        .bind(new.content.as_deref())
        .bind(Json(&new.tags))
        .bind(new.category.as_deref())
        .bind(now)
        .bind(now)
        .bind(search_fold(&new.title))
        .bind(search_fold(new.description.as_deref().unwrap_or_default()))
        .fetch_one(&self.pool)
        .await
        .context("failed to insert article template")?;
        template_from_row(&row)
    }

    pub async fn get_template(&self, id: &TemplateId) -> Result<Option<ArticleTemplate>> {
        let row = sqlx::query(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM article_templates WHERE id = ?"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to load article template {id}"))?;
        row.as_ref().map(template_from_row).transpose()
    }

    pub async fn template_exists(&self, id: &TemplateId) -> Result<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM article_templates WHERE id = ?")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("failed to look up article template {id}"))?;
        Ok(found.is_some())
    }

    /// Writes only the fields set in `patch`. Returns `None` when no row matched.
    pub async fn update_template(
        &self,
        id: &TemplateId,
        patch: &UpdateTemplateRequest,
    ) -> Result<Option<ArticleTemplate>> {
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE article_templates SET updated_at = ");
        query.push_bind(Utc::now());
        if let Some(title) = patch.title.as_set() {
            query.push(", title = ").push_bind(title.clone());
            query.push(", title_search = ").push_bind(search_fold(title));
        }
        if let Some(description) = patch.description.as_set() {
            query.push(", description = ").push_bind(description.clone());
            query
                .push(", description_search = ")
                .push_bind(search_fold(description.as_deref().unwrap_or_default()));
        }
        if let Some(content) = patch.content.as_set() {
            query.push(", content = ").push_bind(content.clone());
        }
        if let Some(tags) = patch.tags.as_set() {
            query.push(", tags = ").push_bind(Json(tags.clone()));
        }
        if let Some(category) = patch.category.as_set() {
            query.push(", category = ").push_bind(category.clone());
        }
        query
            .push(" WHERE id = ")
            .push_bind(id.as_str().to_string())
            .push(" RETURNING ")
            .push(TEMPLATE_COLUMNS);

        let row = query
            .build()
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to update article template {id}"))?;
        row.as_ref().map(template_from_row).transpose()
    }

    /// Returns the number of rows removed; zero is not an error.
    pub async fn delete_template(&self, id: &TemplateId) -> Result<u64> {
        let removed = sqlx::query("DELETE FROM article_templates WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete article template {id}"))?
            .rows_affected();
        Ok(removed)
    }

    pub async fn list_templates(&self, filter: &TemplateFilter) -> Result<TemplatePage> {
        let mut count_query =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM article_templates WHERE 1 = 1");
        push_filter(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .context("failed to count article templates")?;

        let mut page_query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {TEMPLATE_COLUMNS} FROM article_templates WHERE 1 = 1"
        ));
        push_filter(&mut page_query, filter);
        page_query
            .push(" ORDER BY created_at DESC, rowid DESC LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(filter.offset));
        let rows = page_query
            .build()
            .fetch_all(&self.pool)
            .await
            .context("failed to list article templates")?;

        let templates = rows
            .iter()
            .map(template_from_row)
            .collect::<Result<Vec<_>>>()?;
        Ok(TemplatePage {
            templates,
            total: u64::try_from(total).unwrap_or_default(),
        })
    }
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &TemplateFilter) {
    if let Some(category) = &filter.category {
        query.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(search) = &filter.search {
        let pattern = like_pattern(search);
        query
            .push(" AND (title_search LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description_search LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

/// Case folding shared by the stored search columns and the search term.
fn search_fold(text: &str) -> String {
    text.to_lowercase()
}

/// Folded `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in search_fold(term).chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn template_from_row(row: &SqliteRow) -> Result<ArticleTemplate> {
    let tags: Json<Vec<String>> = row.try_get("tags")?;
    Ok(ArticleTemplate {
        id: TemplateId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        content: row.try_get("content")?,
        tags: tags.0,
        category: row.try_get("category")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
