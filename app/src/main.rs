mod cli;
mod commands;
mod infrastructure;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use artshare_client::{ApiConfig, ReqwestTransport};
use artshare_core::services::{ApiGateway, SessionStore};
use artshare_storage::{FileSessionStorage, StorageConfig};

use crate::cli::Cli;
use crate::infrastructure::navigator::TerminalNavigator;

/// Everything a command needs, wired once per run.
pub struct AppContext {
  pub gateway: Arc<ApiGateway<ReqwestTransport>>,
  pub session: Arc<SessionStore>,
}

impl AppContext {
  fn build() -> anyhow::Result<Self> {
    // 1. Configuration ([api] and [storage] sections)
    let api_cfg = ApiConfig::load().context("loading [api] config")?;
    let storage_cfg = StorageConfig::load().context("loading [storage] config")?;

    // 2. Persistence adapter (session file)
    let storage = FileSessionStorage::from_config(&storage_cfg)?;

    // 3. Session store, restored from disk
    let session = Arc::new(SessionStore::restore(Box::new(storage), Arc::new(TerminalNavigator)));

    // 4. HTTP adapter (cookies kept in the session) and gateway
    let transport = ReqwestTransport::new(&api_cfg, session.clone())?;
    let gateway = Arc::new(ApiGateway::new(transport, session.clone(), api_cfg.api_base()));

    Ok(Self { gateway, session })
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)))
    .with_writer(std::io::stderr)
    .init();

  let ctx = AppContext::build()?;
  commands::run(&ctx, cli.command).await
}
