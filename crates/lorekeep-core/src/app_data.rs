//! Where Lorekeep stores its own data (config and the default corpus file).
//!
//! Lore source documents stay wherever the operator keeps them; only the
//! embedded corpus and config live here.

use std::path::PathBuf;

/// Returns the directory for Lorekeep's config and default corpus location.
/// On macOS: `~/Library/Application Support/Lorekeep/`.
/// Creates the directory if it doesn't exist; returns `None` if we can't determine the path.
pub fn app_data_dir() -> Option<PathBuf> {
    let dir = directories::ProjectDirs::from("app", "Lorekeep", "Lorekeep")?
        .data_local_dir()
        .to_path_buf();
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_is_some() {
        assert!(app_data_dir().is_some());
    }
}
