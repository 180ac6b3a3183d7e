use clap::{Args, Subcommand};

use super::types::SessionBackend;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    #[command(about = "Print the stored configuration")]
    Show,
    #[command(about = "Update stored settings")]
    Set(SetConfigArgs),
}

#[derive(Args)]
pub struct SetConfigArgs {
    #[arg(long, help = "API base URL")]
    pub addr: Option<String>,
    #[arg(long, value_enum, help = "Where the session credential is kept")]
    pub session_backend: Option<SessionBackend>,
    #[arg(long, help = "PEM file with the server's password encryption key")]
    pub public_key_path: Option<String>,
}

#[derive(Args)]
pub struct TypesArgs {
    #[arg(help = "Type name to print as JSON schema")]
    pub name: Option<String>,
}
