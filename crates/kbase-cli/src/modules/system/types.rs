use std::sync::Arc;

use clap::ValueEnum;
use kbase_client::{ClientError, KbClient, NavigationCoordinator, Notifier};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Clone, Debug)]
pub struct CliConfig {
    #[serde(default)]
    pub addr: Option<String>,
    #[serde(default)]
    pub session_backend: SessionBackend,
    #[serde(default)]
    pub public_key_path: Option<String>,
}

#[derive(Serialize, Deserialize, Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Keyring,
    File,
}

pub struct CommandContext {
    pub client: KbClient,
    pub navigator: Arc<NavigationCoordinator>,
    pub notifier: Arc<dyn Notifier>,
}

impl CommandContext {
    /// Marks which view the command stands for.
    pub fn enter(&self, route: &str) {
        self.navigator.set_current_route(route);
    }

    /// Surfaces a failed command. Auth rejections were already announced by
    /// the pipeline and are not repeated.
    pub fn report(&self, err: &anyhow::Error) {
        let announced = err
            .downcast_ref::<ClientError>()
            .is_some_and(ClientError::is_auth_rejected);
        if !announced {
            self.notifier.error(&format!("{err:#}"));
        }
    }
}
