use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::denoise::mask::EdgeMode;
use crate::encode::ffmpeg::OutputKind;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub denoise: DenoiseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub transcoder: TranscoderConfig,
}

#[derive(Debug, Deserialize)]
pub struct DenoiseConfig {
    #[serde(default = "default_strength")]
    pub strength: f32,
    #[serde(default)]
    pub edge_mode: EdgeMode,
}

#[derive(Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// Used when neither `--format` nor the output extension names a kind.
    pub format: Option<OutputKind>,
}

#[derive(Debug, Deserialize)]
pub struct TranscoderConfig {
    #[serde(default = "default_program")]
    pub program: PathBuf,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            strength: default_strength(),
            edge_mode: EdgeMode::default(),
        }
    }
}

impl Default for TranscoderConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

fn default_strength() -> f32 { 1.0 }
fn default_program() -> PathBuf { "ffmpeg".into() }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path, else `./hush.toml`, else the per-user config file.
pub fn find_config(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from("hush.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("hush").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("hush").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.denoise.strength, 1.0);
        assert_eq!(config.denoise.edge_mode, EdgeMode::Replicate);
        assert_eq!(config.output.format, None);
        assert_eq!(config.transcoder.program, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn parses_all_sections() {
        let config: Config = toml::from_str(
            r#"
            [denoise]
            strength = 2.5
            edge_mode = "zero"

            [output]
            format = "flac"

            [transcoder]
            program = "/opt/ffmpeg/bin/ffmpeg"
            "#,
        )
        .unwrap();
        assert_eq!(config.denoise.strength, 2.5);
        assert_eq!(config.denoise.edge_mode, EdgeMode::Zero);
        assert_eq!(config.output.format, Some(OutputKind::Flac));
        assert_eq!(config.transcoder.program, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
    }

    #[test]
    fn unreadable_or_invalid_config_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("missing.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[output]\nformat = \"aiff\"\n").unwrap();
        assert!(load_config(&bad).is_none());
    }

    #[test]
    fn explicit_path_wins() {
        let explicit = PathBuf::from("/etc/hush/custom.toml");
        assert_eq!(find_config(Some(explicit.clone())), Some(explicit));
    }
}
