#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![allow(clippy::missing_errors_doc)]

pub mod credential;
pub mod keys;

pub use crate::credential::*;
pub use crate::keys::*;
