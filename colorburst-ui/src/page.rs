use crate::loader::{ImageLoader, LoadError};
use crate::MainWindow;
use colorburst_core::page::{CONFETTI_BUTTON_ID, IMAGE_ID, URL_INPUT_ID};
use colorburst_core::{Color, ImageElement, InputElement, Page};
use image::RgbaImage;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct ImageState {
    src: String,
    generation: u64,
    complete: bool,
    pixels: Option<Arc<RgbaImage>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Stale,
    Loaded(Arc<RgbaImage>),
    Failed,
}

impl ImageState {
    pub fn begin(&mut self, src: &str) -> u64 {
        self.generation += 1;
        self.src = src.to_string();
        self.complete = false;
        self.generation
    }

    pub fn finish(&mut self, generation: u64, result: Result<RgbaImage, LoadError>) -> LoadOutcome {
        if generation != self.generation {
            return LoadOutcome::Stale;
        }
        self.complete = true;
        match result {
            Ok(image) => {
                let pixels = Arc::new(image);
                self.pixels = Some(pixels.clone());
                LoadOutcome::Loaded(pixels)
            }
            Err(_) => {
                self.pixels = None;
                LoadOutcome::Failed
            }
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn pixels(&self) -> Option<Arc<RgbaImage>> {
        self.pixels.clone()
    }
}

fn lock(state: &Mutex<ImageState>) -> MutexGuard<'_, ImageState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn to_slint_image(image: &RgbaImage) -> slint::Image {
    let buffer = slint::SharedPixelBuffer::<slint::Rgba8Pixel>::clone_from_slice(
        image.as_raw(),
        image.width(),
        image.height(),
    );
    slint::Image::from_rgba8(buffer)
}

#[derive(Debug, Clone, Copy)]
pub struct SlintButton;

#[derive(Clone)]
pub struct SlintImage {
    ui: slint::Weak<MainWindow>,
    state: Arc<Mutex<ImageState>>,
    loader: ImageLoader,
}

impl SlintImage {
    // Runs on the UI thread. Only the newest source raises image-loaded.
    fn deliver(ui: &slint::Weak<MainWindow>, state: &Mutex<ImageState>, generation: u64, result: Result<RgbaImage, LoadError>) {
        let outcome = lock(state).finish(generation, result);
        let Some(ui) = ui.upgrade() else { return };
        match outcome {
            LoadOutcome::Stale => log::debug!("Dropping stale image load #{}", generation),
            LoadOutcome::Loaded(pixels) => {
                ui.set_dog_image(to_slint_image(&pixels));
                ui.invoke_image_loaded();
            }
            LoadOutcome::Failed => ui.set_dog_image(slint::Image::default()),
        }
    }
}

impl ImageElement for SlintImage {
    type Pixels = RgbaImage;

    fn set_src(&self, src: &str) {
        let generation = lock(&self.state).begin(src);
        let ui = self.ui.clone();
        let state = self.state.clone();
        self.loader.spawn_load(src.to_string(), move |result| {
            let delivered = slint::invoke_from_event_loop(move || {
                SlintImage::deliver(&ui, &state, generation, result);
            });
            if let Err(e) = delivered {
                log::warn!("Event loop gone, dropping image load: {}", e);
            }
        });
    }

    fn src(&self) -> String {
        lock(&self.state).src().to_string()
    }

    fn is_complete(&self) -> bool {
        lock(&self.state).is_complete()
    }

    fn with_pixels<R>(&self, f: impl FnOnce(&Self::Pixels) -> R) -> Option<R> {
        let pixels = lock(&self.state).pixels()?;
        Some(f(&*pixels))
    }
}

#[derive(Clone)]
pub struct SlintInput {
    ui: slint::Weak<MainWindow>,
}

impl InputElement for SlintInput {
    fn value(&self) -> String {
        self.ui
            .upgrade()
            .map(|ui| ui.get_image_url().to_string())
            .unwrap_or_default()
    }
}

pub struct SlintPage {
    ui: slint::Weak<MainWindow>,
    image: SlintImage,
}

impl SlintPage {
    pub fn new(ui: &MainWindow, loader: ImageLoader) -> Self {
        let ui = slint::ComponentHandle::as_weak(ui);
        Self {
            image: SlintImage {
                ui: ui.clone(),
                state: Arc::default(),
                loader,
            },
            ui,
        }
    }
}

impl Page for SlintPage {
    type Button = SlintButton;
    type Image = SlintImage;
    type Input = SlintInput;

    fn button(&self, id: &str) -> Option<SlintButton> {
        (id == CONFETTI_BUTTON_ID).then_some(SlintButton)
    }

    fn image(&self, id: &str) -> Option<SlintImage> {
        (id == IMAGE_ID).then(|| self.image.clone())
    }

    fn input(&self, id: &str) -> Option<SlintInput> {
        (id == URL_INPUT_ID).then(|| SlintInput { ui: self.ui.clone() })
    }

    fn set_background_color(&self, color: &str) {
        let color = match color.parse::<Color>() {
            Ok(color) => color,
            Err(e) => {
                log::warn!("Ignoring background: {}", e);
                return;
            }
        };
        if let Some(ui) = self.ui.upgrade() {
            ui.set_page_background(slint::Color::from_rgb_u8(color.red, color.green, color.blue));
        }
    }
}
