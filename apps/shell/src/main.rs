#![allow(clippy::print_stdout, clippy::print_stderr)]

pub mod args;
pub mod handlers;

use crate::args::{Cli, Commands, ContentAction, SettingsAction};
use anyhow::Context;
use clap::Parser;
use folio::kernel::client::ApiClient;
use folio_logger::{LevelFilter, Logger};

#[folio_runtime::main(memory_efficient)]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::DEBUG } else { LevelFilter::WARN };
    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level(level)
        .init()
        .context("Failed to install the logger")?;

    let api = ApiClient::new(&cli.api_url);
    tracing::debug!(api_url = %cli.api_url, "Admin shell started");

    match cli.command {
        Commands::Settings { action: SettingsAction::Show {} } => handlers::settings_show(api).await,
        Commands::Settings { action: SettingsAction::Set { section, visibility } } => {
            handlers::settings_set(api, &section, visibility).await
        },
        Commands::Home {} => handlers::home(api).await,
        Commands::Content { action: ContentAction::List { resource } } => {
            handlers::content_list(api, resource).await
        },
        Commands::Content { action: ContentAction::Delete { resource, id } } => {
            handlers::content_delete(api, resource, &id).await
        },
        Commands::Upload { file, image_key, image_host } => {
            handlers::upload(&file, &image_key, &image_host).await
        },
    }
}
