use kbase_client::LOGIN_ROUTE;
use tracing::info;

use crate::cli_args::{LoginArgs, RegisterArgs};
use crate::modules::system::CommandContext;
use crate::{prompt_line, prompt_password};

fn ensure_encryption(ctx: &CommandContext) -> anyhow::Result<()> {
    if !ctx.client.encryption_supported() {
        anyhow::bail!(
            "password encryption is unavailable; set a valid key with `kbase config set --public-key-path`"
        );
    }
    Ok(())
}

pub(crate) async fn handle_login(args: LoginArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.enter(LOGIN_ROUTE);
    ensure_encryption(ctx)?;
    let email = match args.email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };

    let response = ctx.client.login(&email, &password).await?;
    if !response.is_success() {
        anyhow::bail!(
            "login failed: {} (code {})",
            response.payload.message,
            response.payload.code
        );
    }
    info!(email = %email, "session stored");
    println!("Logged in as {email}");
    Ok(())
}

pub(crate) async fn handle_logout(ctx: &CommandContext) -> anyhow::Result<()> {
    if !ctx.client.is_authenticated()? {
        println!("Not logged in");
        return Ok(());
    }
    ctx.client.logout().await?;
    println!("Logged out");
    Ok(())
}

pub(crate) async fn handle_register(args: RegisterArgs, ctx: &CommandContext) -> anyhow::Result<()> {
    ctx.enter(LOGIN_ROUTE);
    ensure_encryption(ctx)?;
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ")?,
    };
    let response = ctx
        .client
        .register(&args.nickname, &args.email, &password)
        .await?;
    response.into_result()?;
    println!("Registered {}", args.email);
    Ok(())
}
