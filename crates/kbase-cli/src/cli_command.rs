use crate::cli_args::*;
use crate::modules::auth::{handle_login, handle_logout, handle_register};
use crate::modules::kb::handle_kb;
use crate::modules::system::{print_json, CommandContext, SETTINGS_ROUTE};

pub(crate) async fn handle_command(command: Command, ctx: &CommandContext) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => handle_login(args, ctx).await?,
        Command::Logout => handle_logout(ctx).await?,
        Command::Register(args) => handle_register(args, ctx).await?,
        Command::Whoami => {
            ctx.enter(SETTINGS_ROUTE);
            let profile = ctx.client.user_info().await?.into_data()?;
            print_json(&profile)?;
        }
        Command::Tenant => {
            ctx.enter(SETTINGS_ROUTE);
            let tenant = ctx.client.tenant_info().await?.into_data()?;
            print_json(&tenant)?;
        }
        Command::Kb(args) => handle_kb(args, ctx).await?,
        Command::Config(_) | Command::Types(_) => {
            unreachable!("handled before the client is built")
        }
    }

    Ok(())
}
