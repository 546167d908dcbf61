mod types;

pub use types::*;

use anyhow::{Context, Result};
use dvdforged_ifo::attributes::VideoFormat;
use dvdforged_ifo::toc::PROVIDER_ID_LEN;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./dvdforged.toml",
        "~/.config/dvdforged/config.toml",
        "/etc/dvdforged/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    let provider = &config.output.provider_id;
    if provider.trim().is_empty() {
        anyhow::bail!("Provider id cannot be empty");
    }
    if provider.len() > PROVIDER_ID_LEN {
        tracing::warn!(
            "Provider id '{}' is longer than {} bytes and will be truncated",
            provider,
            PROVIDER_ID_LEN
        );
    }

    if config.output.video_format == VideoFormat::Unspecified {
        anyhow::bail!("Video format must be 'ntsc' or 'pal'");
    }

    Ok(())
}
