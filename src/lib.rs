pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod docker_config;
pub mod error;
pub mod reference;
pub mod store;

pub use auth::{default_auth_handler, encode_auth, encoded_auth, Credential};
pub use error::{AuthError, Result};
