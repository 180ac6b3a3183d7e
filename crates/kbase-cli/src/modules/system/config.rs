use std::fs;
use std::path::{Path, PathBuf};

use super::types::CliConfig;
use crate::cli_args::{ConfigArgs, ConfigCommand};
use crate::modules::system::print_json;

/// Returns whether the config changed and needs saving.
pub(crate) fn handle_config_command(args: ConfigArgs, config: &mut CliConfig) -> anyhow::Result<bool> {
    match args.command {
        ConfigCommand::Show => {
            print_json(config)?;
            Ok(false)
        }
        ConfigCommand::Set(args) => {
            if args.addr.is_none() && args.session_backend.is_none() && args.public_key_path.is_none()
            {
                anyhow::bail!("nothing to set; pass --addr, --session-backend or --public-key-path");
            }
            if let Some(addr) = args.addr {
                config.addr = Some(addr.trim_end_matches('/').to_string());
            }
            if let Some(backend) = args.session_backend {
                config.session_backend = backend;
            }
            if let Some(path) = args.public_key_path {
                if !Path::new(&path).is_file() {
                    anyhow::bail!("public key file not found: {path}");
                }
                config.public_key_path = Some(path);
            }
            Ok(true)
        }
    }
}

pub(crate) fn kbase_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("HOME is not set"))?;
    Ok(Path::new(&home).join(".kbase"))
}

fn config_path() -> anyhow::Result<PathBuf> {
    Ok(kbase_dir()?.join("config.json"))
}

pub(crate) fn load_config() -> anyhow::Result<CliConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let contents = fs::read_to_string(&path)?;
    let config = serde_json::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("invalid config {}: {err}", path.display()))?;
    Ok(config)
}

pub(crate) fn save_config(config: &CliConfig) -> anyhow::Result<()> {
    let path = config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}
