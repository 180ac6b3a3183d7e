mod actions;
pub(crate) mod args;
pub(crate) mod config;
mod context;
pub(crate) mod types;

pub(crate) use actions::{handle_types_command, print_json};
pub(crate) use config::{handle_config_command, load_config, save_config};
pub(crate) use context::{build_context, KNOWLEDGE_ROUTE, SETTINGS_ROUTE};
pub(crate) use types::CommandContext;
