use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::TemplatesClient;
use serde::Serialize;
use shared::{
    domain::TemplateId,
    patch::Patch,
    protocol::{CreateTemplateRequest, ListTemplatesQuery, UpdateTemplateRequest},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Command-line admin for article templates")]
struct Cli {
    #[arg(long, env = "CONTENT_ADMIN_SERVER_URL", default_value = "http://127.0.0.1:8443")]
    server_url: String,
    #[arg(long, env = "CONTENT_ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List templates, newest first.
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Change only the given fields.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        #[arg(long, conflicts_with = "content")]
        clear_content: bool,
        #[arg(long, conflicts_with = "category")]
        clear_category: bool,
        /// Remove every tag.
        #[arg(long, conflicts_with = "tags")]
        clear_tags: bool,
    },
    Delete {
        id: String,
    },
    /// Print the agent documentation markdown.
    Skill,
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    content: Option<String>,
    /// Comma separated.
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
    #[arg(long)]
    category: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut client = TemplatesClient::new(&cli.server_url)
        .with_context(|| format!("invalid server url '{}'", cli.server_url))?;
    client.set_token(cli.token);

    match cli.command {
        Command::List {
            category,
            search,
            limit,
            offset,
        } => {
            let query = ListTemplatesQuery {
                category,
                search,
                limit,
                offset,
            };
            print_json(&client.list_templates(&query).await?)?;
        }
        Command::Get { id } => {
            print_json(&client.get_template(&TemplateId::from(id)).await?)?;
        }
        Command::Create { title, fields } => {
            let req = create_request(title, fields);
            print_json(&client.create_template(&req).await?)?;
        }
        Command::Update {
            id,
            title,
            fields,
            clear_description,
            clear_content,
            clear_category,
            clear_tags,
        } => {
            let req = update_request(
                title,
                fields,
                Clears {
                    description: clear_description,
                    content: clear_content,
                    category: clear_category,
                    tags: clear_tags,
                },
            );
            if req.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            print_json(&client.update_template(&TemplateId::from(id), &req).await?)?;
        }
        Command::Delete { id } => {
            print_json(&client.delete_template(&TemplateId::from(id)).await?)?;
        }
        Command::Skill => {
            print!("{}", client.fetch_skill().await?);
        }
    }
    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
struct Clears {
    description: bool,
    content: bool,
    category: bool,
    tags: bool,
}

fn create_request(title: String, fields: FieldArgs) -> CreateTemplateRequest {
    CreateTemplateRequest {
        title: Some(title),
        description: fields.description,
        content: fields.content,
        tags: fields.tags.map(clean_tags),
        category: fields.category,
    }
}

fn update_request(title: Option<String>, fields: FieldArgs, clears: Clears) -> UpdateTemplateRequest {
    fn nullable(value: Option<String>, clear: bool) -> Patch<Option<String>> {
        if clear {
            Patch::Set(None)
        } else {
            value.map(Some).into()
        }
    }

    UpdateTemplateRequest {
        title: title.into(),
        description: nullable(fields.description, clears.description),
        content: nullable(fields.content, clears.content),
        tags: if clears.tags {
            Patch::Set(Vec::new())
        } else {
            fields.tags.map(clean_tags).into()
        },
        category: nullable(fields.category, clears.category),
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
