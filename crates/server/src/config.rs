use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

const DEFAULT_DATABASE_URL: &str = "sqlite://./data/server.db";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub auth_secret: String,
    pub docs_url: String,
    pub docs_timeout_seconds: u64,
    pub max_body_bytes: usize,
}

/// Layers built-in defaults, then `server.toml` in the working directory, then
/// `APP__*` environment variables. A bare `DATABASE_URL` wins over all of them.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = load_settings_from(Path::new("server.toml"))?;
    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    Ok(settings)
}

pub fn load_settings_from(file: &Path) -> anyhow::Result<Settings> {
    Config::builder()
        .set_default("bind_addr", "127.0.0.1:8443")?
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .set_default("auth_secret", "")?
        .set_default("docs_url", "http://localhost:3002/skill")?
        .set_default("docs_timeout_seconds", 10)?
        .set_default("max_body_bytes", 1024 * 1024)?
        .add_source(File::from(file).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to read settings from '{}'", file.display()))?
        .try_deserialize()
        .context("invalid server settings")
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return DEFAULT_DATABASE_URL.to_string();
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
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
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
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
#[path = "tests/config_tests.rs"]
mod tests;
