use anyhow::Result;
use clap::{Parser, Subcommand};
use session::{mint_session_token, SessionConfig, DEFAULT_TOKEN_TTL_SECONDS};
use shared::{domain::TemplateFilter, protocol::CreateTemplateRequest};
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/server.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a bearer token signed with the server's auth secret.
    MintToken {
        #[arg(long, env = "APP__AUTH_SECRET", hide_env_values = true)]
        secret: String,
        #[arg(long, default_value = "admin")]
        subject: String,
        #[arg(long, default_value_t = DEFAULT_TOKEN_TTL_SECONDS)]
        ttl_seconds: i64,
    },
    Seed {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,
        #[arg(long)]
        category: Option<String>,
    },
    List {
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::MintToken {
            secret,
            subject,
            ttl_seconds,
        } => {
            let cfg = SessionConfig {
                secret,
                ttl_seconds,
            };
            println!("{}", mint_session_token(&cfg, &subject)?);
        }
        Command::Seed {
            title,
            description,
            content,
            tags,
            category,
        } => {
            let storage = Storage::new(&cli.database_url).await?;
            let req = CreateTemplateRequest {
                title: Some(title),
                description,
                content,
                tags: Some(tags),
                category,
            };
            let Some(new) = req.into_new_template() else {
                anyhow::bail!("title must not be blank");
            };
            let template = storage.create_template(&new).await?;
            println!("created template id={}", template.id);
        }
        Command::List { limit } => {
            let storage = Storage::new(&cli.database_url).await?;
            let page = storage
                .list_templates(&TemplateFilter {
                    limit,
                    ..TemplateFilter::default()
                })
                .await?;
            for template in &page.templates {
                println!(
                    "{}\t{}\t{}",
                    template.id,
                    template.category.as_deref().unwrap_or("-"),
                    template.title
                );
            }
            println!("{} of {} templates", page.templates.len(), page.total);
        }
    }

    Ok(())
}
