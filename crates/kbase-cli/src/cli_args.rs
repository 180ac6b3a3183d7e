use clap::{ArgAction, Parser, Subcommand};

pub use crate::modules::auth::args::*;
pub use crate::modules::kb::args::*;
pub use crate::modules::system::args::*;

#[derive(Parser)]
#[command(name = "kbase")]
#[command(about = "Knowledge base CLI")]
pub struct Cli {
    #[arg(long, env = "KBASE_ADDR", global = true, help = "API base URL")]
    pub addr: Option<String>,
    #[arg(
        long,
        env = "KBASE_SESSION_FILE",
        global = true,
        help = "Keep the session in this file instead of the OS keychain"
    )]
    pub session_file: Option<String>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Login(LoginArgs),
    Logout,
    Register(RegisterArgs),
    #[command(about = "Show the signed-in user")]
    Whoami,
    #[command(about = "Show tenant settings")]
    Tenant,
    #[command(about = "Manage knowledge bases")]
    Kb(KbArgs),
    Config(ConfigArgs),
    #[command(about = "List request types or print one as JSON schema")]
    Types(TypesArgs),
}
