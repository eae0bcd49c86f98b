use crate::color::to_rgb_strings;
use crate::config::{ConfettiSettings, ExtractionSettings, Settings};
use crate::confetti::{fire_confetti, ConfettiLauncher};
use crate::error::SetupError;
use crate::extract::ColorExtractor;
use anyhow::{anyhow, Context, Result};

pub const CONFETTI_BUTTON_ID: &str = "confetti-button";
pub const IMAGE_ID: &str = "dog-image";
pub const URL_INPUT_ID: &str = "image-url-input";

pub trait Page {
    type Button;
    type Image: ImageElement;
    type Input: InputElement;

    fn button(&self, id: &str) -> Option<Self::Button>;
    fn image(&self, id: &str) -> Option<Self::Image>;
    fn input(&self, id: &str) -> Option<Self::Input>;

    fn set_background_color(&self, color: &str);
}

pub trait ImageElement {
    type Pixels: ?Sized;

    fn set_src(&self, src: &str);

    fn src(&self) -> String;

    fn is_complete(&self) -> bool;

    fn with_pixels<R>(&self, f: impl FnOnce(&Self::Pixels) -> R) -> Option<R>;
}

pub trait InputElement {
    fn value(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    ButtonClick,
    UrlInput,
    ImageLoad,
}

type PixelsOf<P> = <<P as Page>::Image as ImageElement>::Pixels;

pub struct ConfettiPage<P: Page, X, L> {
    page: P,
    button: P::Button,
    image: P::Image,
    input: P::Input,
    extractor: X,
    launcher: L,
    confetti: ConfettiSettings,
    extraction: ExtractionSettings,
}

impl<P, X, L> ConfettiPage<P, X, L>
where
    P: Page,
    X: ColorExtractor<PixelsOf<P>>,
    L: ConfettiLauncher,
{
    pub fn bind(page: P, extractor: X, launcher: L, settings: &Settings) -> Result<Self, SetupError> {
        let button = page
            .button(CONFETTI_BUTTON_ID)
            .ok_or(SetupError::MissingElement { id: CONFETTI_BUTTON_ID })?;
        let image = page
            .image(IMAGE_ID)
            .ok_or(SetupError::MissingElement { id: IMAGE_ID })?;
        let input = page
            .input(URL_INPUT_ID)
            .ok_or(SetupError::MissingElement { id: URL_INPUT_ID })?;

        Ok(Self {
            page,
            button,
            image,
            input,
            extractor,
            launcher,
            confetti: settings.confetti.clone(),
            extraction: settings.extraction,
        })
    }

    pub fn wire(page: P, extractor: X, launcher: L, settings: &Settings) -> Result<Self, SetupError> {
        let this = Self::bind(page, extractor, launcher, settings)?;
        // No load event will follow for an image that is already there
        if this.image.is_complete() {
            log::debug!("Image already loaded at wiring time");
            if let Err(e) = this.handle_image_load() {
                log::error!("Image load handler failed: {:#}", e);
            }
        }
        Ok(this)
    }

    pub fn dispatch(&self, event: PageEvent) -> Result<()> {
        match event {
            PageEvent::ButtonClick => self.handle_button_click(),
            PageEvent::UrlInput => self.handle_url_input(),
            PageEvent::ImageLoad => self.handle_image_load()?,
        }
        Ok(())
    }

    pub fn handle_button_click(&self) {
        fire_confetti(&self.launcher, None, &self.confetti);
    }

    pub fn handle_url_input(&self) {
        let src = self.input.value();
        log::debug!("Image source set to {:?}", src);
        self.image.set_src(&src);
    }

    pub fn handle_image_load(&self) -> Result<()> {
        let palette = self
            .image
            .with_pixels(|pixels| -> Result<Vec<String>> {
                let color = self
                    .extractor
                    .get_color(pixels, self.extraction.quality)
                    .context("Failed to extract dominant color")?;
                self.page.set_background_color(&color.to_rgb_string());

                // A palette failure past this point keeps the new background

                let palette = self
                    .extractor
                    .get_palette(pixels, self.extraction.color_count, self.extraction.quality)
                    .context("Failed to extract palette")?;
                Ok(to_rgb_strings(&palette))
            })
            .ok_or_else(|| anyhow!("image {:?} has no pixel data", self.image.src()))??;

        fire_confetti(&self.launcher, Some(palette), &self.confetti);
        Ok(())
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn button(&self) -> &P::Button {
        &self.button
    }

    pub fn image(&self) -> &P::Image {
        &self.image
    }

    pub fn input(&self) -> &P::Input {
        &self.input
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::confetti::ConfettiOptions;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct StubImage {
        src: RefCell<String>,
        complete: Cell<bool>,
        pixels: RefCell<Option<Vec<Color>>>,
    }

    impl StubImage {
        fn finish_loading(&self, pixels: Vec<Color>) {
            *self.pixels.borrow_mut() = Some(pixels);
            self.complete.set(true);
        }
    }

    impl ImageElement for Rc<StubImage> {
        type Pixels = [Color];

        fn set_src(&self, src: &str) {
            *self.src.borrow_mut() = src.to_string();
            self.complete.set(false);
        }

        fn src(&self) -> String {
            self.src.borrow().clone()
        }

        fn is_complete(&self) -> bool {
            self.complete.get()
        }

        fn with_pixels<R>(&self, f: impl FnOnce(&Self::Pixels) -> R) -> Option<R> {
            self.pixels.borrow().as_deref().map(f)
        }
    }

    #[derive(Default)]
    struct StubInput {
        value: RefCell<String>,
    }

    impl InputElement for Rc<StubInput> {
        fn value(&self) -> String {
            self.value.borrow().clone()
        }
    }

    struct StubPage {
        missing: Option<&'static str>,
        background: Rc<RefCell<Option<String>>>,
        image: Rc<StubImage>,
        input: Rc<StubInput>,
    }

    impl StubPage {
        fn new() -> Self {
            Self {
                missing: None,
                background: Rc::default(),
                image: Rc::default(),
                input: Rc::default(),
            }
        }

        fn without(mut self, id: &'static str) -> Self {
            self.missing = Some(id);
            self
        }

        fn has(&self, id: &str) -> bool {
            self.missing != Some(id)
        }
    }

    impl Page for StubPage {
        type Button = ();
        type Image = Rc<StubImage>;
        type Input = Rc<StubInput>;

        fn button(&self, id: &str) -> Option<()> {
            (id == CONFETTI_BUTTON_ID && self.has(id)).then_some(())
        }

        fn image(&self, id: &str) -> Option<Rc<StubImage>> {
            (id == IMAGE_ID && self.has(id)).then(|| self.image.clone())
        }

        fn input(&self, id: &str) -> Option<Rc<StubInput>> {
            (id == URL_INPUT_ID && self.has(id)).then(|| self.input.clone())
        }

        fn set_background_color(&self, color: &str) {
            *self.background.borrow_mut() = Some(color.to_string());
        }
    }

    struct FirstPixel {
        fail_palette: bool,
    }

    impl ColorExtractor<[Color]> for FirstPixel {
        fn get_color(&self, image: &[Color], _quality: Option<u32>) -> Result<Color> {
            image.first().copied().ok_or_else(|| anyhow!("empty image"))
        }

        fn get_palette(&self, image: &[Color], _count: Option<u32>, _quality: Option<u32>) -> Result<Vec<Color>> {
            if self.fail_palette {
                return Err(anyhow!("palette unavailable"));
            }
            Ok(image.to_vec())
        }
    }

    #[derive(Default, Clone)]
    struct Recorder(Rc<RefCell<Vec<ConfettiOptions>>>);

    impl ConfettiLauncher for Recorder {
        fn launch(&self, options: &ConfettiOptions) {
            self.0.borrow_mut().push(options.clone());
        }
    }

    impl Recorder {
        fn count(&self) -> usize {
            self.0.borrow().len()
        }

        fn last_colors(&self) -> Vec<String> {
            self.0.borrow().last().map(|o| o.colors.clone()).unwrap_or_default()
        }
    }

    const DOG: [Color; 2] = [Color::new(200, 150, 100), Color::new(10, 20, 30)];

    fn wired(page: StubPage, recorder: &Recorder) -> ConfettiPage<StubPage, FirstPixel, Recorder> {
        ConfettiPage::wire(page, FirstPixel { fail_palette: false }, recorder.clone(), &Settings::default())
            .unwrap()
    }

    #[test]
    fn every_click_fires_default_confetti() {
        let recorder = Recorder::default();
        let page = wired(StubPage::new(), &recorder);

        for _ in 0..4 {
            page.dispatch(PageEvent::ButtonClick).unwrap();
        }

        assert_eq!(recorder.count(), 4);
        assert_eq!(recorder.last_colors(), ["#ee2fbe", "#abe2de", "#65ae3c"]);
    }

    #[test]
    fn clicks_ignore_image_state() {
        let recorder = Recorder::default();
        let stub = StubPage::new();
        stub.image.finish_loading(DOG.to_vec());
        let page = wired(stub, &recorder);
        assert_eq!(recorder.count(), 1);

        page.handle_button_click();
        assert_eq!(recorder.count(), 2);
        assert_eq!(recorder.last_colors().len(), 3);
    }

    #[test]
    fn url_input_sets_literal_source() {
        let recorder = Recorder::default();
        let page = wired(StubPage::new(), &recorder);

        *page.input().value.borrow_mut() = "https://example.com/dog.png".to_string();
        page.dispatch(PageEvent::UrlInput).unwrap();
        assert_eq!(page.image().src(), "https://example.com/dog.png");

        *page.input().value.borrow_mut() = "not a url".to_string();
        page.dispatch(PageEvent::UrlInput).unwrap();
        assert_eq!(page.image().src(), "not a url");

        *page.input().value.borrow_mut() = String::new();
        page.dispatch(PageEvent::UrlInput).unwrap();
        assert_eq!(page.image().src(), "");
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn image_load_sets_background_and_fires_palette_once() {
        let recorder = Recorder::default();
        let stub = StubPage::new();
        let background = stub.background.clone();
        let page = wired(stub, &recorder);
        assert_eq!(recorder.count(), 0);

        page.image().finish_loading(DOG.to_vec());
        page.dispatch(PageEvent::ImageLoad).unwrap();

        assert_eq!(background.borrow().as_deref(), Some("rgb(200,150,100)"));
        assert_eq!(recorder.count(), 1);
        assert_eq!(recorder.last_colors(), ["rgb(200,150,100)", "rgb(10,20,30)"]);
    }

    #[test]
    fn already_complete_image_is_handled_once_at_wiring() {
        let recorder = Recorder::default();
        let stub = StubPage::new();
        let background = stub.background.clone();
        stub.image.finish_loading(DOG.to_vec());

        let _page = wired(stub, &recorder);

        assert_eq!(recorder.count(), 1);
        assert_eq!(background.borrow().as_deref(), Some("rgb(200,150,100)"));
    }

    #[test]
    fn pending_image_waits_for_its_load_event() {
        let recorder = Recorder::default();
        let stub = StubPage::new();
        stub.image.set_src("https://example.com/dog.png");
        let background = stub.background.clone();

        let _page = wired(stub, &recorder);

        assert_eq!(recorder.count(), 0);
        assert!(background.borrow().is_none());
    }

    #[test]
    fn missing_element_aborts_setup() {
        for id in [CONFETTI_BUTTON_ID, IMAGE_ID, URL_INPUT_ID] {
            let recorder = Recorder::default();
            let stub = StubPage::new().without(id);
            stub.image.finish_loading(DOG.to_vec());
            let background = stub.background.clone();

            let result = ConfettiPage::wire(stub, FirstPixel { fail_palette: false }, recorder.clone(), &Settings::default());

            assert_eq!(result.err(), Some(SetupError::MissingElement { id }));
            assert_eq!(recorder.count(), 0);
            assert!(background.borrow().is_none());
        }
    }

    #[test]
    fn palette_failure_keeps_background_and_skips_confetti() {
        let recorder = Recorder::default();
        let stub = StubPage::new();
        let background = stub.background.clone();
        let page = ConfettiPage::wire(stub, FirstPixel { fail_palette: true }, recorder.clone(), &Settings::default())
            .unwrap();

        page.image().finish_loading(DOG.to_vec());
        let err = page.dispatch(PageEvent::ImageLoad).unwrap_err();

        assert!(err.to_string().contains("palette"));
        assert_eq!(background.borrow().as_deref(), Some("rgb(200,150,100)"));
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn load_without_pixels_is_an_error() {
        let recorder = Recorder::default();
        let page = wired(StubPage::new(), &recorder);
        page.image().set_src("broken.png");
        page.image().complete.set(true);

        assert!(page.handle_image_load().is_err());
        assert_eq!(recorder.count(), 0);
    }
}
