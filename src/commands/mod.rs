pub mod check;
pub mod probes;
pub mod snapshot;

use anyhow::Result;

use crate::config::{self, Config};

/// Load configuration, honoring a `--config` path override.
pub(crate) fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(p) => config::load_from(std::path::Path::new(p)),
        None => config::load(),
    }
}
