//! Configuration loader and schema types.
//!
//! Settings are layered: struct defaults, then an optional TOML file, then
//! `BEATBOX__`-prefixed environment variables.

mod load;
mod schema;

pub use load::{default_config_path, default_log_path, resolve_config_path};
pub use schema::*;
