//! TOML config loading for named collector profiles: `[default]`,
//! `[profiles.<name>]`, `[relaySets.<name>]`.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::ConfigError;
pub use loader::Config;
pub use schema::{ProfileDefaults, RawConfig, RawProfile, RelaySet};
