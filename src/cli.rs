// command line interface

use crate::api::{ApiClient, DEFAULT_API_URL};
use crate::config::{self, Config, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS, LlmConfig, Provider};
use crate::output::Output;
use crate::Server;
use clap::{Args, Parser, Subcommand};
use miette::Result;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "twintone",
    about = "Casual and formal AI explanations, with per-user history"
)]
struct Cli {
    /// gateway url used by the tui and client commands
    #[arg(long, env = "API_BASE_URL", default_value = DEFAULT_API_URL, global = true)]
    api: String,

    /// print json instead of text
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// start the http gateway
    Serve {
        /// port number
        #[arg(long, short, default_value = "8000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// database connection url (falls back to POSTGRES_* variables)
        #[arg(long, short, env = "DATABASE_URL")]
        db: Option<String>,

        #[command(flatten)]
        llm: LlmArgs,
    },

    /// ask a question and print both explanations
    Ask {
        query: String,

        /// user id to file the exchange under
        #[arg(long, short, default_value = "abc123")]
        user: String,
    },

    /// show past exchanges for a user
    History {
        user: String,

        #[arg(long, default_value_t = 10)]
        limit: i64,

        #[arg(long, default_value_t = 0)]
        offset: i64,
    },

    /// list every user with history
    Users,
}

#[derive(Args)]
struct LlmArgs {
    /// ai provider (openai, claude)
    #[arg(long, short = 'P', env = "TWINTONE_PROVIDER", default_value = "openai")]
    provider: Provider,

    /// api key for the ai provider
    #[arg(long, short = 'k')]
    api_key: Option<String>,

    /// model name, defaults to the provider's model
    #[arg(long, env = "TWINTONE_MODEL")]
    model: Option<String>,

    /// sampling temperature
    #[arg(long, env = "TWINTONE_TEMPERATURE", default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// seconds before a completion request gives up
    #[arg(long, env = "TWINTONE_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// override the provider's api base url
    #[arg(long, env = "TWINTONE_LLM_BASE_URL")]
    llm_base_url: Option<String>,
}

impl LlmArgs {
    fn resolve(self) -> Result<LlmConfig, crate::Error> {
        Ok(
            LlmConfig::resolve(self.provider, self.api_key, config::env_lookup)?
                .with_model(self.model)
                .with_base_url(self.llm_base_url)
                .with_temperature(self.temperature)
                .with_timeout(Duration::from_secs(self.timeout)),
        )
    }
}

pub async fn run() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve {
            port,
            host,
            db,
            llm,
        }) => {
            init_logging("info");

            // missing credentials stop us before we bind
            let config = Config {
                llm: llm.resolve()?,
                database_url: config::database_url(db, config::env_lookup)?,
            };
            Ok(Server::run(config, &host, port).await?)
        }

        Some(Commands::Ask { query, user }) => {
            init_logging("warn");
            let api = ApiClient::new(&cli.api);

            let validation = crate::core::Validation::check(&user, &query);
            if !validation.is_ok() {
                return Err(crate::Error::Validation(validation.message()).into());
            }

            let response = api.generate(&user, &query).await?;
            if cli.raw {
                Output::raw(&response);
            } else {
                Output::generated(&response);
            }
            Ok(())
        }

        Some(Commands::History {
            user,
            limit,
            offset,
        }) => {
            init_logging("warn");
            let api = ApiClient::new(&cli.api);

            let records = api.history(&user, limit, offset).await?;
            if cli.raw {
                Output::raw(&records);
            } else {
                Output::history(&user, &records);
            }
            Ok(())
        }

        Some(Commands::Users) => {
            init_logging("warn");
            let api = ApiClient::new(&cli.api);

            let user_ids = api.users().await?;
            if cli.raw {
                Output::raw(&user_ids);
            } else {
                Output::users(&user_ids);
            }
            Ok(())
        }

        // no logging in tui mode, it would draw over the screen
        None => Ok(crate::tui::run(ApiClient::new(&cli.api)).await?),
    }
}

// RUST_LOG wins over the per-command default
fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
