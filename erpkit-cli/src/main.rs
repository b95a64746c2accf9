mod commands;
mod config;
mod error;
mod paths;

use std::fs::{self, File};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use erpkit_lib::ErpClient;
use erpkit_ui::toast::{Toast, ToastLevel};
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::commands::TableView;
use crate::config::{Overrides, Settings};
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "erpkit", about = "Lookups, inline creates and tables against the ERP backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Bearer token
    #[arg(long, global = true)]
    token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the options behind a lookup endpoint
    Options {
        endpoint: String,
        /// Filter parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Only options whose label contains this text
        #[arg(long)]
        query: Option<String>,
        /// Commit this text as a strict field would and print the value
        #[arg(long, conflicts_with = "query")]
        pick: Option<String>,
    },
    /// Create a new option unless one with that label exists
    Create {
        /// Endpoint receiving the POST
        endpoint: String,
        /// Field name used as the payload key
        field: String,
        /// Label of the new option
        text: String,
        /// Endpoint listing existing options (defaults to ENDPOINT)
        #[arg(long)]
        list: Option<String>,
    },
    /// Show a list endpoint as a table
    Table {
        endpoint: String,
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
        /// Field identifying each row
        #[arg(long, default_value = "id")]
        key: String,
        /// Comma-separated columns (default: fields of the first row)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
        /// Column to sort on
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// One of 10, 25, 50, 100 (default from config)
        #[arg(long)]
        page_size: Option<usize>,
    },
}

fn init_logger(level: LevelFilter) -> Result<(), CliError> {
    let (Some(cache), Some(path)) = (paths::cache_dir(), paths::log_file()) else {
        return Ok(());
    };
    fs::create_dir_all(&cache)?;
    paths::rotate_logs(&cache);
    let log_file = File::create(path)?;
    WriteLogger::init(level, Config::default(), log_file)?;
    Ok(())
}

fn build_client(settings: &Settings) -> Result<ErpClient, CliError> {
    let base_url = settings.base_url.clone().ok_or(CliError::MissingBaseUrl)?;
    let mut builder = ErpClient::builder().url(base_url).timeout(settings.timeout());
    if let Some(token) = &settings.token {
        builder = builder.token(token);
    }
    Ok(builder.build()?)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = Settings::load(Overrides {
        base_url: cli.base_url,
        token: cli.token,
        timeout_secs: cli.timeout,
        verbose: cli.verbose,
    })?;
    init_logger(settings.level_filter())?;
    log::debug!("Settings: base_url={:?} timeout={}s", settings.base_url, settings.timeout_secs);

    let client = build_client(&settings)?;

    match cli.command {
        Commands::Options {
            endpoint,
            params,
            query,
            pick,
        } => {
            commands::options(&client, &endpoint, &params, query.as_deref(), pick.as_deref())
                .await
        }
        Commands::Create {
            endpoint,
            field,
            text,
            list,
        } => commands::create(&client, &endpoint, list.as_deref(), &field, &text).await,
        Commands::Table {
            endpoint,
            params,
            key,
            columns,
            sort,
            desc,
            page,
            page_size,
        } => {
            let view = TableView {
                key,
                columns,
                sort,
                descending: desc,
                page,
                page_size: page_size.unwrap_or(settings.page_size),
            };
            commands::table(&client, &endpoint, &params, view).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Api(e)) => {
            log::error!("{}", e);
            let toast = Toast::from(&e);
            let prefix = match toast.level {
                ToastLevel::Warning => "Warning",
                _ => "Error",
            };
            eprintln!("{}: {}", prefix, toast.message);
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
