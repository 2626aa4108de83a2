use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use tracing::{error, info};

use crate::error::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Load a TOML settings file, with `KIWI__SECTION__KEY` environment
/// variables taking precedence, into `T`.
pub fn load_settings<T: DeserializeOwned>(path: &Path) -> Result<T> {
    info!("Attempting to load configuration from {}", path.display());

    let settings = Config::builder()
        .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(true))
        .add_source(Environment::with_prefix("KIWI").separator("__").try_parsing(true))
        .build()
        .and_then(|config| config.try_deserialize::<T>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration from {}", path.display());
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KiwiError;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Sample {
        loop_section: LoopSection,
    }

    #[derive(Debug, Deserialize)]
    struct LoopSection {
        gain: f32,
    }

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("kiwi-{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_settings_from_toml() {
        let path = temp_file("ok", "[loop_section]\ngain = 0.25\n");
        let sample: Sample = load_settings(&path).unwrap();
        assert_eq!(sample.loop_section.gain, 0.25);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("kiwi-does-not-exist.toml");
        let result: Result<Sample> = load_settings(&path);
        assert!(matches!(result, Err(KiwiError::Config(_))));
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let path = temp_file("missing", "[loop_section]\n");
        let result: Result<Sample> = load_settings(&path);
        assert!(matches!(result, Err(KiwiError::Config(_))));
        std::fs::remove_file(path).unwrap();
    }
}
