use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use formwright::auth::{self, CredentialStore};
use formwright::config::Config;
use formwright::document::FormSubmission;
use formwright::schema::{self, Dialect};

#[derive(Parser)]
#[command(name = "formwright", version, about = "Survey form builder backend")]
struct Cli {
    /// Path to the configuration file
    #[arg(long, short, env = "FORMWRIGHT_CONFIG", default_value = "/etc/formwright/config.toml")]
    config: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve,
    /// Register an account directly in the account database
    AddUser {
        username: String,
        email: String,
        password: String,
        #[arg(long, default_value = "user")]
        role: String,
    },
    /// Print the CREATE TABLE statement for a submitted form (JSON file)
    Compile {
        path: String,
        #[arg(long, default_value = "mysql")]
        dialect: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Serve => {
            let cfg = Config::from_file(&cli.config).map_err(|e| anyhow!(e))?;
            formwright::server::run(cfg).await.map_err(|e| anyhow!(e))?;
        }
        Command::AddUser {
            username,
            email,
            password,
            role,
        } => {
            let cfg = Config::from_file(&cli.config).map_err(|e| anyhow!(e))?;
            let accounts = auth::open(&cfg.auth_db_path)
                .await
                .map_err(|e| anyhow!(e))?;
            let store = CredentialStore::new(accounts.clone(), cfg.argon2.hasher()?);
            let id = store
                .register(&username, &email, &password, role.parse()?)
                .await?;
            accounts.close().await;
            println!("registered {email} as user {id}");
        }
        Command::Compile { path, dialect } => {
            let dialect: Dialect = dialect.parse().map_err(|e: String| anyhow!(e))?;
            let text =
                std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            let submission: FormSubmission =
                serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
            let table = schema::compile_submission(&submission)?;
            println!("{}", table.to_sql(dialect));
        }
    }
    Ok(())
}
