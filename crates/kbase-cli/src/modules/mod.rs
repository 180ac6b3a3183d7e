pub(crate) mod auth;
pub(crate) mod kb;
pub(crate) mod system;
