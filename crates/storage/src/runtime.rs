use std::path::PathBuf;

use crate::global::{ASSETS_DIR, SESSIONS_DIR, compute_default_base};

pub trait StorageRuntime: Send + Sync + 'static {
    fn data_base(&self) -> Result<PathBuf, crate::Error>;

    fn assets_base(&self) -> Result<PathBuf, crate::Error> {
        Ok(self.data_base()?.join(ASSETS_DIR))
    }

    fn sessions_base(&self) -> Result<PathBuf, crate::Error> {
        Ok(self.data_base()?.join(SESSIONS_DIR))
    }
}

/// Uses the configured directory when one is given, else the platform data
/// directory.
#[derive(Debug, Clone, Default)]
pub struct LocalRuntime {
    base: Option<PathBuf>,
}

impl LocalRuntime {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self { base }
    }
}

impl StorageRuntime for LocalRuntime {
    fn data_base(&self) -> Result<PathBuf, crate::Error> {
        self.base
            .clone()
            .or_else(compute_default_base)
            .ok_or(crate::Error::DataDirUnavailable)
    }
}
