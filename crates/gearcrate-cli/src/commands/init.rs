//! Init-config command - write a configuration file with default values.

use gearcrate_core::Config;
use std::path::{Path, PathBuf};

/// Write the default configuration to `path`, or the default location.
///
/// Returns the path written to. An existing file is only replaced with `force`.
pub fn run(path: Option<&Path>, force: bool) -> anyhow::Result<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::default_config_path()?,
    };

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Config::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearcrate_core::Transport;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("conf").join("gearcrate.toml");

        let written = run(Some(&path), false).unwrap();
        assert_eq!(written, path);

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api.transport, Transport::Local);
        assert_eq!(config.ui.default_search_limit.get(), 25);
    }

    #[test]
    fn test_existing_file_needs_force() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gearcrate.toml");
        std::fs::write(&path, "[ui]\ndefault_search_limit = 50\n").unwrap();

        assert!(run(Some(&path), false).is_err());
        assert_eq!(
            Config::load_from(&path).unwrap().ui.default_search_limit.get(),
            50
        );

        run(Some(&path), true).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().ui.default_search_limit.get(),
            25
        );
    }
}
