//! Configuration loading and validation

mod schema;

pub use schema::*;

use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

/// Example configuration written by `sculpture init`
pub const EXAMPLE_CONFIG: &str = include_str!("../../sculpture.example.yaml");

/// Load configuration from a YAML file
pub fn load_config(path: &Path) -> Result<SculptureConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {:?}", path))?;
    let config: SculptureConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config file {:?}", path))?;
    config.validate()?;
    info!("loaded configuration from {:?}", path);
    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_or_default(path: &Path) -> Result<SculptureConfig> {
    if path.exists() {
        load_config(path)
    } else {
        warn!("no configuration at {:?}, using defaults", path);
        Ok(SculptureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_minimal_config() {
        let yaml = r#"
audio:
  sample_rate: 48000

master:
  volume: 0.5
"#;
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.master.volume, 0.5);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"master:\n  volume: 3.0\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
    }

    #[test]
    fn test_example_config_is_valid() {
        let config: SculptureConfig = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.envelope.release(), 1.0);
    }
}
