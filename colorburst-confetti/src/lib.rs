use colorburst_core::{Color, ConfettiLauncher, ConfettiOptions, DEFAULT_CONFETTI_COLORS};
use image::RgbaImage;
use imageproc::drawing::Blend;
use palette::Srgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard};

mod particle;
pub mod render;

pub use particle::{Particle, Shape, SHAPES};

#[derive(Clone)]
pub struct ConfettiEngine {
    state: Arc<Mutex<EngineState>>,
}

struct EngineState {
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ConfettiEngine {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_rng(width, height, StdRng::from_os_rng())
    }

    pub fn with_seed(width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u32, height: u32, rng: StdRng) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                width,
                height,
                particles: Vec::new(),
                rng,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        let mut state = self.state();
        state.width = width;
        state.height = height;
    }

    pub fn viewport(&self) -> (u32, u32) {
        let state = self.state();
        (state.width, state.height)
    }

    pub fn fire(&self, options: &ConfettiOptions) -> usize {
        let colors = resolve_colors(&options.colors);
        let mut state = self.state();
        let start_x = f64::from(state.width) * options.origin.x;
        let start_y = f64::from(state.height) * options.origin.y;

        let EngineState { particles, rng, .. } = &mut *state;
        let count = options.particle_count as usize;
        particles.reserve(count);
        for i in (0..count).rev() {
            let color = colors[i % colors.len()];
            let shape = SHAPES[rng.random_range(0..SHAPES.len())];
            particles.push(Particle::spawn(rng, options, shape, color, start_x, start_y));
        }

        log::debug!("Spawned {} particles, {} live", count, particles.len());
        count
    }

    pub fn tick(&self) -> bool {
        let mut state = self.state();
        let EngineState { particles, rng, .. } = &mut *state;
        particles.retain_mut(|p| p.update(rng));
        !particles.is_empty()
    }

    pub fn render(&self, canvas: &mut RgbaImage) {
        render::clear(canvas);
        let mut blend = Blend(std::mem::replace(canvas, RgbaImage::new(0, 0)));
        let state = self.state();
        for particle in &state.particles {
            render::fill_polygon(&mut blend, &particle.outline(), particle.color, particle.opacity());
        }
        *canvas = blend.0;
    }

    pub fn frame(&self) -> RgbaImage {
        let (width, height) = self.viewport();
        let mut canvas = RgbaImage::new(width, height);
        self.render(&mut canvas);
        canvas
    }

    pub fn is_busy(&self) -> bool {
        !self.state().particles.is_empty()
    }

    pub fn particle_count(&self) -> usize {
        self.state().particles.len()
    }

    pub fn clear(&self) {
        self.state().particles.clear();
    }
}

impl ConfettiLauncher for ConfettiEngine {
    fn launch(&self, options: &ConfettiOptions) {
        self.fire(options);
    }
}

pub fn parse_color(text: &str) -> Option<Srgb<u8>> {
    let text = text.trim();
    if let Ok(color) = text.parse::<Srgb<u8>>() {
        return Some(color);
    }
    text.parse::<Color>()
        .ok()
        .map(|c| Srgb::new(c.red, c.green, c.blue))
}

fn resolve_colors(colors: &[String]) -> Vec<Srgb<u8>> {
    let parsed: Vec<Srgb<u8>> = colors
        .iter()
        .filter_map(|c| {
            let color = parse_color(c);
            if color.is_none() {
                log::warn!("Ignoring unparseable confetti color {:?}", c);
            }
            color
        })
        .collect();

    if !parsed.is_empty() {
        return parsed;
    }
    DEFAULT_CONFETTI_COLORS
        .iter()
        .filter_map(|c| parse_color(c))
        .collect()
}
