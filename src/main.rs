use anyhow::Result;
use clap::Parser;
use petfriends::cli::{Cli, Commands};
use petfriends::commands;
use petfriends::config;
use petfriends::credentials::Credentials;
use petfriends::exit_codes;
use petfriends::output::print_error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::from(exit_codes::from_error(&e))
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "petfriends=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let mut ctx = config::Context::load()?;
    if let Some(url) = cli.api_url.clone() {
        ctx.override_api_url(url);
    }
    if let Some(format) = cli.format {
        ctx.set_format(format);
    }

    tracing::debug!(api_url = %ctx.api_url(), "starting");

    let creds = Credentials::resolve(&ctx.config, cli.email, cli.password)?;

    match cli.command {
        Commands::Key => commands::auth::key(&ctx, &creds).await,
        Commands::List { mine } => commands::pets::list(&ctx, &creds, mine).await,
        Commands::Add(args) => commands::pets::add(&ctx, &creds, args).await,
        Commands::SetPhoto { pet_id, photo } => {
            commands::pets::set_photo(&ctx, &creds, &pet_id, &photo).await
        }
        Commands::Update { pet_id, fields } => {
            commands::pets::update(&ctx, &creds, &pet_id, fields).await
        }
        Commands::Delete { pet_id } => commands::pets::delete(&ctx, &creds, &pet_id).await,
    }
}
