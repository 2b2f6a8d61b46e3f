//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.spectro-viz.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::audio::calculator::SPECTRUM_SIZE;
use crate::pipeline::DEFAULT_TICK_INTERVAL_MS;
use crate::viz::model::DEFAULT_BAND_COUNT;

const DEFAULT_SAMPLE_RATE: u32 = 44_100;

// Bin 32 of a 1024-sample window at 44.1kHz; keeps the demo peak on-grid.
const DEFAULT_TONE_HZ: f64 = 1378.125;

const CONFIG_TEMPLATE: &str = r#"# spectro-viz configuration file

# Number of spectrum bars to animate (max 256, default: 256)
# band_count = 256

# Decay timer interval in milliseconds (default: 15)
# tick_interval_ms = 15

# Demo feeder settings
# sample_rate = 44100
# tone_hz = 1378.125
"#;

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    pub band_count: Option<usize>,
    pub tick_interval_ms: Option<u64>,
    pub sample_rate: Option<u32>,
    pub tone_hz: Option<f64>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".spectro-viz.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            let _ = fs::write(&path, CONFIG_TEMPLATE);
            log::info!("created config template at {:?}", path);
        }

        fs::read_to_string(&path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Ok(content) = toml::to_string(self) {
                let _ = fs::write(&path, &content);
                log::info!("config saved to {:?}", path);
            }
        }
    }

    /// Band count, capped at the published spectrum size.
    pub fn band_count(&self) -> usize {
        self.band_count.unwrap_or(DEFAULT_BAND_COUNT).min(SPECTRUM_SIZE)
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.unwrap_or(DEFAULT_TICK_INTERVAL_MS)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    pub fn tone_hz(&self) -> f64 {
        self.tone_hz.unwrap_or(DEFAULT_TONE_HZ)
    }
}
