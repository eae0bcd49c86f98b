use crate::config::ConfettiSettings;
use crate::random::random_in_range_with;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfettiOptions {
    pub particle_count: u32,
    pub angle: f64,
    pub spread: f64,
    pub origin: Origin,
    pub colors: Vec<String>,
    pub start_velocity: f64,
    pub decay: f64,
    pub gravity: f64,
    pub drift: f64,
    pub ticks: u32,
    pub scalar: f64,
}

impl Default for ConfettiOptions {
    fn default() -> Self {
        Self {
            particle_count: 50,
            angle: 90.0,
            spread: 45.0,
            origin: Origin { x: 0.5, y: 0.5 },
            colors: Vec::new(),
            start_velocity: 45.0,
            decay: 0.9,
            gravity: 1.0,
            drift: 0.0,
            ticks: 200,
            scalar: 1.0,
        }
    }
}

pub trait ConfettiLauncher {
    fn launch(&self, options: &ConfettiOptions);
}

impl<L: ConfettiLauncher + ?Sized> ConfettiLauncher for &L {
    fn launch(&self, options: &ConfettiOptions) {
        (**self).launch(options)
    }
}

impl<L: ConfettiLauncher + ?Sized> ConfettiLauncher for std::sync::Arc<L> {
    fn launch(&self, options: &ConfettiOptions) {
        (**self).launch(options)
    }
}

pub fn confetti_options<R: Rng + ?Sized>(
    rng: &mut R,
    palette: Option<Vec<String>>,
    settings: &ConfettiSettings,
) -> ConfettiOptions {
    let colors = palette
        .filter(|colors| !colors.is_empty())
        .unwrap_or_else(|| settings.default_colors.clone());

    let count = random_in_range_with(rng, settings.particle_count.min, settings.particle_count.max);

    ConfettiOptions {
        particle_count: count.max(0.0).floor() as u32,
        angle: random_in_range_with(rng, settings.angle.min, settings.angle.max),
        spread: random_in_range_with(rng, settings.spread.min, settings.spread.max),
        origin: Origin { x: 0.5, y: settings.origin_y },
        colors,
        ..ConfettiOptions::default()
    }
}

pub fn fire_confetti_with<L, R>(
    launcher: &L,
    rng: &mut R,
    palette: Option<Vec<String>>,
    settings: &ConfettiSettings,
) -> ConfettiOptions
where
    L: ConfettiLauncher + ?Sized,
    R: Rng + ?Sized,
{
    let options = confetti_options(rng, palette, settings);
    log::debug!(
        "Firing {} confetti at {:.1}° (spread {:.1}°) in {:?}",
        options.particle_count,
        options.angle,
        options.spread,
        options.colors
    );
    launcher.launch(&options);
    options
}

pub fn fire_confetti<L: ConfettiLauncher + ?Sized>(
    launcher: &L,
    palette: Option<Vec<String>>,
    settings: &ConfettiSettings,
) -> ConfettiOptions {
    fire_confetti_with(launcher, &mut rand::rng(), palette, settings)
}
