use anyhow::Context;
use artshare_client::{ApiConfig, ENV_API_URL};
use artshare_config::{CONFIG_BACKEND, PATHS};
use artshare_core::domain::ApiBase;
use artshare_storage::StorageConfig;
use serde::Serialize;

use crate::AppContext;
use crate::cli::ConfigCommand;

/// What `config show` prints, one TOML document.
#[derive(Serialize)]
struct EffectiveConfig {
  api: ApiConfig,
  storage: StorageConfig,
}

pub fn config(ctx: &AppContext, cmd: ConfigCommand) -> anyhow::Result<()> {
  match cmd {
    ConfigCommand::Show => {
      let effective = EffectiveConfig { api: ApiConfig::load()?, storage: StorageConfig::load()? };
      println!("# {}", CONFIG_BACKEND.path().display());
      if std::env::var_os(ENV_API_URL).is_some() {
        println!("# api.base_url overridden by {ENV_API_URL}");
      }
      println!("# normalized api base: {}", ctx.gateway.base().describe());
      println!("# data dir: {}", PATHS.data_dir.display());
      print!("{}", toml::to_string_pretty(&effective).context("rendering config")?);
      Ok(())
    }

    ConfigCommand::SetUrl { url } => {
      let mut cfg = ApiConfig::load_stored()?;
      cfg.base_url = url.trim().to_string();
      cfg.save()?;
      println!("API base set to {}", ApiBase::new(&cfg.base_url).describe());
      Ok(())
    }
  }
}
