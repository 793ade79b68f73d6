use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;

fn default_profile() -> String {
    "local".to_string()
}

/// `REEL_*` variables, after loading `.env` from the working directory.
#[derive(Debug, Deserialize)]
pub struct Env {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default = "default_profile")]
    pub profile: String,
}

impl Default for Env {
    fn default() -> Self {
        Self {
            data_dir: None,
            profile: default_profile(),
        }
    }
}

static ENV: OnceLock<Env> = OnceLock::new();

pub fn env() -> &'static Env {
    ENV.get_or_init(|| {
        let _ = dotenvy::from_path(Path::new(".env"));
        envy::prefixed("REEL_").from_env().unwrap_or_else(|error| {
            tracing::warn!(error = %error, "env_invalid");
            Env::default()
        })
    })
}
