mod error;
pub mod assets;
pub mod fs;
pub mod global;
mod runtime;
pub mod sessions;

pub use assets::DiskAssetStore;
pub use error::*;
pub use runtime::*;
pub use sessions::{FsSessionStore, SessionRecord};
