use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "colorburst.json";
pub const CONFIG_ENV: &str = "COLORBURST_CONFIG";

pub const DEFAULT_CONFETTI_COLORS: [&str; 3] = ["#ee2fbe", "#abe2de", "#65ae3c"];
pub const DEFAULT_INITIAL_IMAGE: &str = "https://images.dog.ceo/breeds/hound-afghan/n02088094_1003.jpg";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // null starts with an empty image
    pub initial_image: Option<String>,
    pub confetti: ConfettiSettings,
    pub extraction: ExtractionSettings,
    pub loader: LoaderSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            initial_image: Some(DEFAULT_INITIAL_IMAGE.to_string()),
            confetti: ConfettiSettings::default(),
            extraction: ExtractionSettings::default(),
            loader: LoaderSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiSettings {
    pub default_colors: Vec<String>,
    pub particle_count: Span,
    pub angle: Span,
    pub spread: Span,
    pub origin_y: f64,
}

impl Default for ConfettiSettings {
    fn default() -> Self {
        Self {
            default_colors: DEFAULT_CONFETTI_COLORS.iter().map(|c| c.to_string()).collect(),
            particle_count: Span::new(50.0, 100.0),
            angle: Span::new(55.0, 125.0),
            spread: Span::new(50.0, 70.0),
            origin_y: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub color_count: Option<u32>,
    pub quality: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    pub timeout_secs: u64,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_or_default(path)
    }
}
