use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use kbase_client::{
    ClientConfig, FileSessionStore, KbClient, KeyringSessionStore, NavigationCoordinator,
    Notifier, SessionStore,
};
use tracing::debug;

use super::config::kbase_dir;
use super::types::{CliConfig, CommandContext, SessionBackend};

pub(crate) const KNOWLEDGE_ROUTE: &str = "/knowledge";
pub(crate) const SETTINGS_ROUTE: &str = "/user-setting";

/// Prints user-facing notices on stderr so stdout stays machine-readable.
pub(crate) struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

fn session_store(
    session_file: Option<String>,
    config: &CliConfig,
) -> anyhow::Result<Arc<dyn SessionStore>> {
    if let Some(path) = session_file {
        return Ok(Arc::new(FileSessionStore::new(path)));
    }
    match config.session_backend {
        SessionBackend::Keyring => Ok(Arc::new(KeyringSessionStore::default())),
        SessionBackend::File => {
            let path: PathBuf = kbase_dir()?.join("session.json");
            Ok(Arc::new(FileSessionStore::new(path)))
        }
    }
}

pub(crate) fn build_context(
    addr_arg: Option<String>,
    session_file: Option<String>,
    config: &CliConfig,
) -> anyhow::Result<CommandContext> {
    let mut client_config = ClientConfig::from_env();
    if let Some(addr) = addr_arg.or_else(|| config.addr.clone()) {
        client_config = client_config.with_base_url(addr);
    }
    if let Some(path) = config.public_key_path.as_deref() {
        let pem = fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("failed to read public key {path}: {err}"))?;
        client_config = client_config.with_public_key_pem(pem);
    }
    debug!(addr = %client_config.base_url, "client configured");

    let session = session_store(session_file, config)?;
    let navigator = Arc::new(NavigationCoordinator::new());
    navigator.register(|route: &str| {
        eprintln!("Redirecting to {route}; run `kbase login` to continue");
    });
    let notifier: Arc<dyn Notifier> = Arc::new(StderrNotifier);
    let client = KbClient::from_config(
        &client_config,
        session,
        Arc::clone(&navigator),
        Arc::clone(&notifier),
    )?;
    Ok(CommandContext {
        client,
        navigator,
        notifier,
    })
}
