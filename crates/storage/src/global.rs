use std::path::PathBuf;

pub const ASSETS_DIR: &str = "assets";
pub const SESSIONS_DIR: &str = "sessions";

pub fn compute_default_base() -> Option<PathBuf> {
    let data_dir = dirs::data_dir()?;
    Some(data_dir.join(resolve_app_folder()))
}

fn resolve_app_folder() -> &'static str {
    if cfg!(debug_assertions) {
        "reel-dev"
    } else {
        "reel"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_lives_in_app_folder() {
        if let Some(base) = compute_default_base() {
            assert!(base.ends_with(resolve_app_folder()));
        }
    }
}
