#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notifier;
pub mod pipeline;
pub mod session;
pub mod transport;

pub use crate::client::KbClient;
pub use crate::config::*;
pub use crate::error::*;
pub use crate::navigation::*;
pub use crate::notifier::*;
pub use crate::pipeline::*;
pub use crate::session::*;
pub use crate::transport::*;
