use dvdforged_ifo::attributes::VideoFormat;
use dvdforged_ifo::TocOptions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
}

/// Settings stamped into every Video Manager the tool writes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Provider string in the IFO header (at most 31 bytes are kept)
    #[serde(default = "default_provider_id")]
    pub provider_id: String,

    /// Broadcast standard assumed when no video attributes say otherwise
    #[serde(default = "default_video_format")]
    pub video_format: VideoFormat,
}

fn default_provider_id() -> String {
    TocOptions::default().provider_id
}

fn default_video_format() -> VideoFormat {
    VideoFormat::Ntsc
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            provider_id: default_provider_id(),
            video_format: default_video_format(),
        }
    }
}

impl OutputConfig {
    pub fn toc_options(&self) -> TocOptions {
        TocOptions {
            provider_id: self.provider_id.clone(),
            default_format: self.video_format,
        }
    }
}
