use anyhow::Context;
use folio::domain::config::{ApiConfig, LogConfig};
use folio::kernel::config::load_config;
use folio_logger::{LevelFilter, Logger};
use folio_server::Server;

#[folio_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(None::<&str>).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.log)?;

    Server::builder().config(cfg).build().await?.run().await
}

fn init_logger(cfg: &LogConfig) -> anyhow::Result<Logger> {
    let level = cfg.level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);

    let logger = match &cfg.dir {
        Some(dir) if cfg.json => builder.path(dir).json().init(),
        Some(dir) => builder.path(dir).init(),
        None => builder.init(),
    };

    logger.context("Failed to install the logger")
}
