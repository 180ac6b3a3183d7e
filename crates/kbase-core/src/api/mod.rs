pub mod auth;
pub mod envelope;
pub mod kb;

pub use auth::*;
pub use envelope::*;
pub use kb::*;
